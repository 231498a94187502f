//! Error types for the login and import operations.
//!
//! Every failure is terminal for the operation that raised it. The shell
//! maps each kind to a distinct status/message pair via [`ApiError`].

use std::time::Duration;

/// Missing required input, detected before any network activity.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username and password required")]
    MissingCredentials,

    #[error("token required")]
    MissingToken,
}

/// Failures of the login operation.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// The sign-in page came back, or the failure banner was present.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-in looked successful but the session cookie never appeared.
    #[error("session cookie not found after login")]
    SessionCookieMissing,

    /// The browsing session could not be launched, navigated, or driven.
    #[error("automation failure: {0}")]
    AutomationFailure(String),
}

impl AuthError {
    /// Wrap any error from the browsing engine or HTTP layer.
    pub fn automation(e: impl std::fmt::Display) -> Self {
        AuthError::AutomationFailure(e.to_string())
    }
}

/// Failures of the import operation.
///
/// Callers only distinguish "import failed"; the variants exist for
/// diagnostics and log output.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("listing did not end within {max_pages} pages")]
    PageLimitExceeded { max_pages: u32 },

    #[error("import did not finish within {}s", .elapsed.as_secs())]
    DeadlineExceeded { elapsed: Duration },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Status/message mapping used by the request shell.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Auth(AuthError::InvalidCredentials) => 401,
            ApiError::Auth(AuthError::SessionCookieMissing) => 401,
            ApiError::Auth(AuthError::AutomationFailure(_)) => 500,
            ApiError::Import(_) => 500,
        }
    }

    /// Short machine-stable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Auth(AuthError::InvalidCredentials) => "invalid_credentials",
            ApiError::Auth(AuthError::SessionCookieMissing) => "session_cookie_missing",
            ApiError::Auth(AuthError::AutomationFailure(_)) => "automation_failure",
            ApiError::Import(_) => "import_failure",
        }
    }
}
