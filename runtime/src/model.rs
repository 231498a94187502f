//! Data carried between the login and import operations.

use crate::site::SESSION_COOKIE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login credentials. Transient; never stored.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque value of the site's session cookie.
///
/// There is no expiry tracking: a stale token is indistinguishable from a
/// fresh one until the site starts serving unauthenticated pages.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Cookie` header on authenticated fetches.
    pub fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// One recipe extracted from a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Detail page this record was read from.
    pub url: String,
    pub title: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// External source link, for recipes that link out.
    #[serde(rename = "recipeUrl")]
    pub recipe_url: Option<String>,
    pub tags: Vec<String>,
    /// Total time as displayed, e.g. "1 hr 15 mins".
    pub cooktime: Option<String>,
}
