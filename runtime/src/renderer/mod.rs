//! Browser abstraction used by the sign-in flow.
//!
//! `Launcher` starts a fresh, isolated browser; `Renderer` is that browser;
//! `RenderContext` is one tab. Only the operations the sign-in form needs
//! are exposed. The Chromium implementation lives in [`chromium`].

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Result of navigating to a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A cookie read from the browser's jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
}

/// Starts browser instances. Each launch gets its own process and
/// profile; nothing is shared between launches.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Renderer>>;
}

/// A running browser.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a new tab.
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Close the browser and reap its process.
    async fn shutdown(self: Box<Self>) -> Result<()>;
}

/// A single tab.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate and wait for the load to finish.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResult>;
    /// Replace the value of the input matching `selector`.
    async fn fill(&mut self, selector: &str, value: &str) -> Result<()>;
    /// Click the element matching `selector` and wait for the resulting
    /// navigation to settle.
    async fn click_and_settle(&mut self, selector: &str, timeout: Duration) -> Result<()>;
    async fn get_url(&self) -> Result<String>;
    /// Serialized DOM of the current page.
    async fn get_html(&self) -> Result<String>;
    /// Every cookie visible to the browser.
    async fn cookies(&self) -> Result<Vec<BrowserCookie>>;
    async fn close(self: Box<Self>) -> Result<()>;
}
