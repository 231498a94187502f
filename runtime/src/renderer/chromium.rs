//! Chromium-based renderer using chromiumoxide.

use super::{BrowserCookie, Launcher, NavigationResult, RenderContext, Renderer};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. RECIPE_IMPORT_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("RECIPE_IMPORT_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches a new headless Chromium per call, each with its own
/// throwaway profile directory.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    chrome_path: Option<PathBuf>,
    headless: bool,
}

impl ChromiumLauncher {
    /// `chrome_path` overrides discovery via [`find_chromium`].
    pub fn new(chrome_path: Option<PathBuf>, headless: bool) -> Self {
        Self {
            chrome_path,
            headless,
        }
    }

    /// Browser configuration for one launch, with a fresh profile directory.
    ///
    /// The returned directory must outlive the browser; it is removed when
    /// dropped.
    fn prepare(&self) -> Result<(BrowserConfig, TempDir)> {
        let chrome_path = match &self.chrome_path {
            Some(p) => p.clone(),
            None => find_chromium().context(
                "Chromium not found. Set RECIPE_IMPORT_CHROMIUM_PATH or install Chrome.",
            )?,
        };

        let profile = tempfile::Builder::new()
            .prefix("recipe-import-profile-")
            .tempdir()
            .context("failed to create browser profile directory")?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(profile.path())
            .incognito()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        if !self.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;
        Ok((config, profile))
    }
}

#[async_trait]
impl Launcher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        let (config, profile) = self.prepare()?;
        debug!(profile = %profile.path().display(), "launching Chromium");

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {e}");
                }
            }
        });

        Ok(Box::new(ChromiumRenderer {
            browser: Some(browser),
            handler,
            _profile: profile,
        }))
    }
}

/// A running Chromium instance.
pub struct ChromiumRenderer {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    // Declared last: removed only after the browser has been dropped.
    _profile: TempDir,
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let browser = self.browser.as_ref().context("browser already closed")?;
        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;
        Ok(Box::new(ChromiumContext { page }))
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        let mut this = self;
        if let Some(mut browser) = this.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("failed to close Chromium cleanly: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!("failed to reap Chromium process: {e}");
            }
        }
        this.handler.abort();
        Ok(())
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        // chromiumoxide kills the child when `Browser` drops; the handler
        // task would otherwise outlive it.
        self.handler.abort();
    }
}

/// A single Chromium tab.
pub struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<NavigationResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(timeout, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await;

        match result {
            Ok(Ok(())) => {
                let final_url = self.get_url().await.unwrap_or_else(|_| url.to_string());
                Ok(NavigationResult {
                    final_url,
                    load_time_ms: start.elapsed().as_millis() as u64,
                })
            }
            Ok(Err(e)) => bail!("navigation to {url} failed: {e}"),
            Err(_) => bail!("navigation to {url} timed out after {}ms", timeout.as_millis()),
        }
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("no element matches {selector}"))?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .with_context(|| format!("failed to clear {selector}"))?;
        element
            .click()
            .await
            .with_context(|| format!("failed to focus {selector}"))?
            .type_str(value)
            .await
            .with_context(|| format!("failed to type into {selector}"))?;
        Ok(())
    }

    async fn click_and_settle(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("no element matches {selector}"))?;
        element
            .click()
            .await
            .with_context(|| format!("failed to click {selector}"))?;

        // A click that triggers no navigation leaves the page as it is;
        // the caller inspects whatever is there.
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => bail!("page did not settle after clicking {selector}: {e}"),
            Err(_) => {
                debug!(
                    "no navigation within {}ms after clicking {selector}",
                    timeout.as_millis()
                );
                Ok(())
            }
        }
    }

    async fn get_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .context("failed to get URL")?
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(url)
    }

    async fn get_html(&self) -> Result<String> {
        self.page.content().await.context("failed to get HTML")
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .context("failed to read cookies")?;
        Ok(cookies
            .into_iter()
            .map(|c| BrowserCookie {
                name: c.name,
                value: c.value,
            })
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let _ = self.page.close().await;
        Ok(())
    }
}
