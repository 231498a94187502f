//! Authenticated page fetches over reqwest.
//!
//! Not a browser: plain GETs with the session cookie attached. One request
//! at a time, no retries.

use crate::error::ImportError;
use crate::model::SessionToken;
use reqwest::header::COOKIE;
use std::time::Duration;
use tracing::{debug, warn};

/// Desktop Chrome user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/131.0.0.0 Safari/537.36";

/// HTTP client for listing and detail pages.
#[derive(Clone)]
pub struct SiteClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl SiteClient {
    pub fn new(timeout: Duration) -> Result<Self, ImportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ImportError::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// GET `url` with `Cookie: s=<token>` and return the body.
    ///
    /// A non-success status is not an error: the body is returned and
    /// parsed like any other page.
    pub async fn get_page(&self, url: &str, token: &SessionToken) -> Result<String, ImportError> {
        let transport = |source| ImportError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .header(COOKIE, token.cookie_header())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                url,
                status = status.as_u16(),
                final_url = %resp.url(),
                "non-success status; parsing body anyway"
            );
        }

        let body = resp.text().await.map_err(transport)?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "fetched page");
        Ok(body)
    }
}
