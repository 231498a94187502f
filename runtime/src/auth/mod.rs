//! Session acquisition: turn credentials into a session token.
//!
//! [`Authenticator`] is the capability the rest of the crate depends on.
//! Two implementations exist:
//! - [`BrowserAuthenticator`] drives a real browser through the sign-in form.
//! - [`FormAuthenticator`] posts the same form over plain HTTP.
//!
//! Both judge the outcome with [`classify_sign_in`] and read the token with
//! [`find_session_cookie`].
//!
//! The sign-in markup is a hardcoded external contract. If the site renames
//! a form field, the browser flow fails to find it and reports
//! `AutomationFailure`; the form flow posts the wrong field names and the
//! site answers with its sign-in page, reported as `InvalidCredentials`.
//! Neither case can be told apart from a real outage or a real typo.

pub mod browser;
pub mod form;

pub use browser::BrowserAuthenticator;
pub use form::FormAuthenticator;

use crate::config::{AuthMode, Config};
use crate::error::AuthError;
use crate::model::{Credentials, SessionToken};
use crate::renderer::chromium::ChromiumLauncher;
use crate::site::{Site, FAILURE_BANNER, SESSION_COOKIE};
use async_trait::async_trait;
use std::sync::Arc;

/// Obtains a session token for a set of credentials.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Sign in. Callers must have rejected empty credentials already.
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, AuthError>;
}

/// Decide whether a submitted sign-in succeeded.
///
/// Fails with `InvalidCredentials` if the browser is still on the sign-in
/// page or the failure banner is present anywhere in the document.
pub fn classify_sign_in(site: &Site, final_url: &str, html: &str) -> Result<(), AuthError> {
    if site.is_sign_in_url(final_url) || html.contains(FAILURE_BANNER) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(())
}

/// Pick the session cookie out of a cookie jar listing.
///
/// An empty value counts as missing.
pub fn find_session_cookie<'a, I>(cookies: I) -> Result<SessionToken, AuthError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    cookies
        .into_iter()
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| SessionToken::new(value))
        .ok_or(AuthError::SessionCookieMissing)
}

/// Build the authenticator selected by `config.auth_mode`.
pub fn from_config(config: &Config) -> Arc<dyn Authenticator> {
    let site = Site::new(config.origin.clone());
    match config.auth_mode {
        AuthMode::Browser => {
            let launcher = ChromiumLauncher::new(config.chromium_path.clone(), config.headless);
            Arc::new(BrowserAuthenticator::new(
                Arc::new(launcher),
                site,
                config.navigation_timeout,
            ))
        }
        AuthMode::Form => Arc::new(FormAuthenticator::new(site, config.request_timeout)),
    }
}
