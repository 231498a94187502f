//! Sign-in by driving a browser through the site's form.

use super::{classify_sign_in, find_session_cookie, Authenticator};
use crate::error::AuthError;
use crate::model::{Credentials, SessionToken};
use crate::renderer::{Launcher, RenderContext};
use crate::site::{Site, EMAIL_FIELD, PASSWORD_FIELD, SUBMIT_CONTROL};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Authenticator backed by a fresh browser per sign-in.
///
/// The browser is private to one `authenticate` call and is shut down
/// before the call returns, whatever the outcome.
pub struct BrowserAuthenticator {
    launcher: Arc<dyn Launcher>,
    site: Site,
    timeout: Duration,
}

impl BrowserAuthenticator {
    pub fn new(launcher: Arc<dyn Launcher>, site: Site, timeout: Duration) -> Self {
        Self {
            launcher,
            site,
            timeout,
        }
    }

    async fn sign_in(
        &self,
        ctx: &mut dyn RenderContext,
        credentials: &Credentials,
    ) -> Result<SessionToken, AuthError> {
        let page = ctx
            .navigate(&self.site.sign_in_url(), self.timeout)
            .await
            .map_err(AuthError::automation)?;
        info!(load_ms = page.load_time_ms, "navigated to sign-in page");

        ctx.fill(EMAIL_FIELD, &credentials.username)
            .await
            .map_err(AuthError::automation)?;
        ctx.fill(PASSWORD_FIELD, &credentials.password)
            .await
            .map_err(AuthError::automation)?;
        ctx.click_and_settle(SUBMIT_CONTROL, self.timeout)
            .await
            .map_err(AuthError::automation)?;
        info!("sign-in submitted");

        let final_url = ctx.get_url().await.map_err(AuthError::automation)?;
        let html = ctx.get_html().await.map_err(AuthError::automation)?;
        classify_sign_in(&self.site, &final_url, &html)?;

        // Warm-up: settles the authenticated context before reading cookies.
        let warm_up = ctx
            .navigate(&self.site.listing_url(1), self.timeout)
            .await
            .map_err(AuthError::automation)?;
        debug!(final_url = %warm_up.final_url, "warm-up page loaded");

        let cookies = ctx.cookies().await.map_err(AuthError::automation)?;
        find_session_cookie(cookies.iter().map(|c| (c.name.as_str(), c.value.as_str())))
    }
}

#[async_trait]
impl Authenticator for BrowserAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        let renderer = self
            .launcher
            .launch()
            .await
            .map_err(AuthError::automation)?;

        let result = match renderer.new_context().await {
            Ok(mut ctx) => {
                let outcome = self.sign_in(ctx.as_mut(), credentials).await;
                if let Err(e) = ctx.close().await {
                    warn!("failed to close browser tab: {e}");
                }
                outcome
            }
            Err(e) => Err(AuthError::automation(e)),
        };

        if let Err(e) = renderer.shutdown().await {
            warn!("failed to shut down browser: {e}");
        }

        match &result {
            Ok(_) => info!("sign-in succeeded"),
            Err(e) => warn!("sign-in failed: {e}"),
        }
        result
    }
}
