//! Request and response bodies of the two operations.
//!
//! Validation happens here, before any network activity. Error bodies
//! follow the `{error, message?}` shape callers already consume.

use crate::error::{ApiError, AuthError, ValidationError};
use crate::model::{Credentials, RecipeRecord, SessionToken};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a login request.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields must be present and non-empty.
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        match (non_empty(self.username), non_empty(self.password)) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            _ => Err(ValidationError::MissingCredentials),
        }
    }
}

/// Body of an import request.
#[derive(Debug, Default, Deserialize)]
pub struct ImportRequest {
    pub token: Option<String>,
}

impl ImportRequest {
    pub fn validate(self) -> Result<SessionToken, ValidationError> {
        non_empty(self.token)
            .map(SessionToken::new)
            .ok_or(ValidationError::MissingToken)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub recipes: Vec<RecipeRecord>,
}

/// JSON body for an error response.
pub fn error_body(err: &ApiError) -> Value {
    match err {
        ApiError::Auth(AuthError::InvalidCredentials) => serde_json::json!({
            "error": "Login failed",
            "message": "Invalid email or password",
        }),
        ApiError::Auth(AuthError::SessionCookieMissing) => serde_json::json!({
            "error": "Authentication failed",
            "message": "Session cookie not found after login",
        }),
        ApiError::Auth(AuthError::AutomationFailure(description)) => {
            serde_json::json!({ "error": description })
        }
        ApiError::Validation(e) => serde_json::json!({ "error": e.to_string() }),
        ApiError::Import(e) => serde_json::json!({ "error": e.to_string() }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;

    fn login(json: &str) -> Result<Credentials, ValidationError> {
        serde_json::from_str::<LoginRequest>(json).unwrap().validate()
    }

    #[test]
    fn test_login_validation() {
        assert!(login(r#"{"username": "a@b.c", "password": "pw"}"#).is_ok());
        assert_eq!(
            login(r#"{"username": "a@b.c"}"#).unwrap_err(),
            ValidationError::MissingCredentials
        );
        assert_eq!(
            login(r#"{"username": "", "password": "pw"}"#).unwrap_err(),
            ValidationError::MissingCredentials
        );
        assert!(login("{}").is_err());
    }

    #[test]
    fn test_import_validation() {
        let ok: ImportRequest = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(ok.validate().unwrap().as_str(), "abc");
        let empty: ImportRequest = serde_json::from_str(r#"{"token": ""}"#).unwrap();
        assert_eq!(empty.validate().unwrap_err(), ValidationError::MissingToken);
    }

    #[test]
    fn test_error_bodies() {
        let body = error_body(&ApiError::from(AuthError::InvalidCredentials));
        assert_eq!(body["error"], "Login failed");
        assert_eq!(body["message"], "Invalid email or password");

        let body = error_body(&ApiError::from(ValidationError::MissingToken));
        assert_eq!(body, serde_json::json!({ "error": "token required" }));

        let body = error_body(&ApiError::from(ImportError::PageLimitExceeded { max_pages: 2 }));
        assert_eq!(body["error"], "listing did not end within 2 pages");
    }

    #[test]
    fn test_login_response_shape() {
        let resp = LoginResponse {
            token: SessionToken::new("tok"),
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({ "token": "tok" })
        );
    }
}
