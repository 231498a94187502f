//! Runtime configuration.
//!
//! Values come from `RECIPE_IMPORT_*` environment variables, then CLI flags
//! override them. The resulting [`Config`] is handed to the shell explicitly;
//! nothing reads the environment after startup.

use crate::site::DEFAULT_ORIGIN;
use anyhow::{bail, Context, Result};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Which [`Authenticator`](crate::auth::Authenticator) the shell uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AuthMode {
    /// Drive a headless Chromium through the sign-in form.
    #[default]
    Browser,
    /// Post the sign-in form directly over HTTP.
    Form,
}

impl AuthMode {
    fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" => Ok(Self::Browser),
            "form" => Ok(Self::Form),
            other => bail!("unknown auth mode '{other}' (expected 'browser' or 'form')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme + host of the recipe site.
    pub origin: String,
    /// Address the HTTP shell binds to.
    pub http_host: IpAddr,
    /// Port the HTTP shell binds to.
    pub http_port: u16,
    pub auth_mode: AuthMode,
    /// Timeout for each authenticated page fetch.
    pub request_timeout: Duration,
    /// Timeout for each browser navigation or settle wait.
    pub navigation_timeout: Duration,
    /// Hard cap on listing pages per import. `None` disables the cap.
    pub max_pages: Option<u32>,
    /// Upper bound on a whole import. `None` disables the deadline.
    pub import_deadline: Option<Duration>,
    /// Explicit Chromium executable; otherwise it is searched for.
    pub chromium_path: Option<PathBuf>,
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            http_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: 3000,
            auth_mode: AuthMode::Browser,
            request_timeout: Duration::from_secs(30),
            navigation_timeout: Duration::from_secs(30),
            max_pages: Some(1000),
            import_deadline: Some(Duration::from_secs(30 * 60)),
            chromium_path: None,
            headless: true,
        }
    }
}

impl Config {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("RECIPE_IMPORT_ORIGIN") {
            cfg.origin = v.trim().to_string();
        }
        if let Some(v) = get("RECIPE_IMPORT_HOST") {
            cfg.http_host = v
                .trim()
                .parse()
                .with_context(|| format!("invalid bind address '{v}'"))?;
        }
        if let Some(v) = get("RECIPE_IMPORT_PORT").or_else(|| get("PORT")) {
            cfg.http_port = v
                .trim()
                .parse()
                .with_context(|| format!("invalid port '{v}'"))?;
        }
        if let Some(v) = get("RECIPE_IMPORT_AUTH_MODE") {
            cfg.auth_mode = AuthMode::parse(&v)?;
        }
        if let Some(v) = get("RECIPE_IMPORT_REQUEST_TIMEOUT_MS") {
            cfg.request_timeout = Duration::from_millis(parse_u64("RECIPE_IMPORT_REQUEST_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = get("RECIPE_IMPORT_NAVIGATION_TIMEOUT_MS") {
            cfg.navigation_timeout =
                Duration::from_millis(parse_u64("RECIPE_IMPORT_NAVIGATION_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = get("RECIPE_IMPORT_MAX_PAGES") {
            let n = parse_u64("RECIPE_IMPORT_MAX_PAGES", &v)?;
            cfg.max_pages = match n {
                0 => None,
                n => Some(u32::try_from(n).context("RECIPE_IMPORT_MAX_PAGES is too large")?),
            };
        }
        if let Some(v) = get("RECIPE_IMPORT_DEADLINE_SECS") {
            cfg.import_deadline = match parse_u64("RECIPE_IMPORT_DEADLINE_SECS", &v)? {
                0 => None,
                n => Some(Duration::from_secs(n)),
            };
        }
        if let Some(v) = get("RECIPE_IMPORT_CHROMIUM_PATH") {
            cfg.chromium_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("RECIPE_IMPORT_HEADLESS") {
            cfg.headless = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => bail!("invalid RECIPE_IMPORT_HEADLESS value '{other}'"),
            };
        }

        Ok(cfg)
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a non-negative integer, got '{value}'"))
}
