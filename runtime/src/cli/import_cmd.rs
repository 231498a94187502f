//! Import every recipe for a session token and print them as JSON.

use crate::cli::output;
use crate::config::Config;
use crate::import::Importer;
use crate::protocol::{ImportRequest, ImportResponse};
use anyhow::Result;

pub async fn run(config: &Config, token: String) -> Result<()> {
    let token = ImportRequest { token: Some(token) }.validate()?;
    let importer = Importer::from_config(config)?;
    let recipes = importer.run(&token).await?;
    output::print_json(&ImportResponse { recipes })
}
