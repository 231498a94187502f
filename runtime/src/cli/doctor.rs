//! Environment readiness check.

use crate::config::{AuthMode, Config};
use crate::http_client::USER_AGENT;
use crate::renderer::chromium::find_chromium;
use crate::site::Site;
use anyhow::Result;
use std::time::Duration;

/// Check Chromium availability and whether the site answers.
pub async fn run(config: &Config) -> Result<()> {
    println!("recipe-import doctor");
    println!("====================");
    println!();
    println!("Origin:    {}", config.origin);
    println!("Sign-in:   {:?}", config.auth_mode);
    match config.max_pages {
        Some(n) => println!("Max pages: {n}"),
        None => println!("Max pages: unbounded"),
    }
    println!();

    let chromium = config.chromium_path.clone().or_else(find_chromium);
    let browser_ok = match (&chromium, config.auth_mode) {
        (Some(path), _) => {
            println!("[OK] Chromium found: {}", path.display());
            true
        }
        (None, AuthMode::Browser) => {
            println!("[!!] Chromium NOT found. Set RECIPE_IMPORT_CHROMIUM_PATH or use --auth-mode form.");
            false
        }
        (None, AuthMode::Form) => {
            println!("[--] Chromium not found (not needed for form sign-in)");
            true
        }
    };

    let site = Site::new(config.origin.clone());
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()?;
    let site_ok = match client.get(site.sign_in_url()).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("[OK] Sign-in page reachable ({})", resp.status());
            true
        }
        Ok(resp) => {
            println!("[!!] Sign-in page answered {}", resp.status());
            false
        }
        Err(e) => {
            println!("[!!] Sign-in page unreachable: {e}");
            false
        }
    };

    println!();
    if browser_ok && site_ok {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }
    Ok(())
}
