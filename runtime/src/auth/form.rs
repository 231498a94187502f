//! Sign-in by posting the site's form over plain HTTP.
//!
//! Works as long as the sign-in page does not need script execution.
//! Hidden inputs of the sign-in form (anti-forgery tokens) are carried over
//! into the post.

use super::{classify_sign_in, find_session_cookie, Authenticator};
use crate::error::AuthError;
use crate::extract::select_all;
use crate::http_client::USER_AGENT;
use crate::model::{Credentials, SessionToken};
use crate::site::{Site, EMAIL_FIELD, EMAIL_PARAM, PASSWORD_PARAM};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// The parts of the sign-in form needed to post it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInForm {
    /// Absolute URL the form posts to.
    pub action: String,
    /// Hidden `(name, value)` pairs, in document order.
    pub hidden: Vec<(String, String)>,
}

/// Locate the form that holds the email field.
///
/// Falls back to posting to `page_url` with no hidden fields when no such
/// form is found.
pub fn parse_sign_in_form(page_url: &str, html: &str) -> SignInForm {
    let fallback = SignInForm {
        action: page_url.to_string(),
        hidden: Vec::new(),
    };

    let document = Html::parse_document(html);
    let (Ok(email_sel), Ok(hidden_sel)) = (
        Selector::parse(EMAIL_FIELD),
        Selector::parse(r#"input[type="hidden"]"#),
    ) else {
        return fallback;
    };

    let Some(form) = select_all(&document, "form")
        .into_iter()
        .find(|f| f.select(&email_sel).next().is_some())
    else {
        return fallback;
    };

    let action = form
        .value()
        .attr("action")
        .filter(|a| !a.trim().is_empty())
        .and_then(|a| Url::parse(page_url).ok()?.join(a.trim()).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| page_url.to_string());

    let hidden = form
        .select(&hidden_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or("");
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    SignInForm { action, hidden }
}

/// Authenticator that posts the sign-in form with reqwest.
///
/// Every call uses its own cookie jar, so no session state is shared
/// between calls.
pub struct FormAuthenticator {
    site: Site,
    timeout: Duration,
}

impl FormAuthenticator {
    pub fn new(site: Site, timeout: Duration) -> Self {
        Self { site, timeout }
    }
}

#[async_trait]
impl Authenticator for FormAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(AuthError::automation)?;

        let sign_in_url = self.site.sign_in_url();
        let page = client
            .get(&sign_in_url)
            .send()
            .await
            .map_err(AuthError::automation)?
            .text()
            .await
            .map_err(AuthError::automation)?;
        let form = parse_sign_in_form(&sign_in_url, &page);
        debug!(action = %form.action, hidden = form.hidden.len(), "sign-in form located");

        let mut fields = form.hidden;
        fields.push((EMAIL_PARAM.to_string(), credentials.username.clone()));
        fields.push((PASSWORD_PARAM.to_string(), credentials.password.clone()));

        let resp = client
            .post(&form.action)
            .form(&fields)
            .send()
            .await
            .map_err(AuthError::automation)?;
        let final_url = resp.url().to_string();
        let body = resp.text().await.map_err(AuthError::automation)?;
        info!("sign-in submitted");

        if let Err(e) = classify_sign_in(&self.site, &final_url, &body) {
            warn!("sign-in failed: {e}");
            return Err(e);
        }

        client
            .get(self.site.listing_url(1))
            .send()
            .await
            .map_err(AuthError::automation)?;

        let origin = Url::parse(self.site.origin()).map_err(AuthError::automation)?;
        let header = jar
            .cookies(&origin)
            .and_then(|v| v.to_str().ok().map(str::to_string))
            .unwrap_or_default();
        let pairs = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='));

        let token = find_session_cookie(pairs)?;
        info!("sign-in succeeded");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <form action="/search"><input name="q"></form>
        <form method="post" action="/account/signin?ReturnUrl=%2F">
          <input type="hidden" name="__RequestVerificationToken" value="csrf-1">
          <input name="email"><input name="password" type="password">
          <input type="hidden" name="remember">
          <input type="submit" value="Sign in">
        </form>
    "#;

    #[test]
    fn test_parse_sign_in_form() {
        let form = parse_sign_in_form("https://onetsp.com/account/signin", PAGE);
        assert_eq!(form.action, "https://onetsp.com/account/signin?ReturnUrl=%2F");
        assert_eq!(
            form.hidden,
            vec![
                ("__RequestVerificationToken".to_string(), "csrf-1".to_string()),
                ("remember".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_no_form_falls_back_to_page_url() {
        let form = parse_sign_in_form("https://onetsp.com/account/signin", "<p>maintenance</p>");
        assert_eq!(form.action, "https://onetsp.com/account/signin");
        assert!(form.hidden.is_empty());
    }

    #[test]
    fn test_form_without_action_posts_to_page() {
        let html = r#"<form><input name="email"></form>"#;
        let form = parse_sign_in_form("http://127.0.0.1:4000/account/signin", html);
        assert_eq!(form.action, "http://127.0.0.1:4000/account/signin");
    }
}
