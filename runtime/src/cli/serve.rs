//! Run the HTTP shell.

use crate::config::Config;
use crate::rest;
use anyhow::Result;
use tracing::info;

pub async fn run(config: &Config) -> Result<()> {
    info!(
        "starting recipe-import v{} against {} ({:?} sign-in)",
        env!("CARGO_PKG_VERSION"),
        config.origin,
        config.auth_mode
    );
    rest::serve(config).await
}
