//! Sign in once and print the session token.

use crate::auth;
use crate::cli::output;
use crate::config::Config;
use crate::protocol::{LoginRequest, LoginResponse};
use anyhow::Result;

/// The password falls back to `RECIPE_IMPORT_PASSWORD` so it need not
/// appear in the process list.
pub async fn run(config: &Config, username: String, password: Option<String>) -> Result<()> {
    let password = password.or_else(|| std::env::var("RECIPE_IMPORT_PASSWORD").ok());
    let credentials = LoginRequest {
        username: Some(username),
        password,
    }
    .validate()?;

    let authenticator = auth::from_config(config);
    let token = authenticator.authenticate(&credentials).await?;
    output::print_json(&LoginResponse { token })
}
