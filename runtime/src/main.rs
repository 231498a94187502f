// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use recipe_import::cli;
use recipe_import::config::{AuthMode, Config};

#[derive(Parser)]
#[command(
    name = "recipe-import",
    about = "recipe-import: sign in to a recipe site and export every recipe as JSON",
    version,
    after_help = "Settings also come from RECIPE_IMPORT_* environment variables; flags win."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Site origin (e.g. "https://onetsp.com")
    #[arg(long, global = true)]
    origin: Option<String>,

    /// How to sign in
    #[arg(long, global = true, value_enum)]
    auth_mode: Option<AuthMode>,

    /// Maximum listing pages per import (0 = unbounded)
    #[arg(long, global = true)]
    max_pages: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the login and import operations over HTTP
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Sign in and print the session token
    Login {
        /// Account email
        #[arg(long)]
        username: String,
        /// Account password (or set RECIPE_IMPORT_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },
    /// Import every recipe for a session token
    Import {
        /// Session token from `login`
        #[arg(long)]
        token: String,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

impl Cli {
    /// Environment configuration with flag overrides applied.
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(origin) = &self.origin {
            config.origin = origin.clone();
        }
        if let Some(mode) = self.auth_mode {
            config.auth_mode = mode;
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = (max_pages > 0).then_some(max_pages);
        }
        if let Commands::Serve { port: Some(port) } = self.command {
            config.http_port = port;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "recipe-import", &mut std::io::stdout());
        return Ok(());
    }

    cli::output::init_tracing(cli.verbose, cli.log_json);

    let result = match cli.config() {
        Ok(config) => match cli.command {
            Commands::Serve { .. } => cli::serve::run(&config).await,
            Commands::Login { username, password } => {
                cli::login_cmd::run(&config, username, password).await
            }
            Commands::Import { token } => cli::import_cmd::run(&config, token).await,
            Commands::Doctor => cli::doctor::run(&config).await,
            Commands::Completions { .. } => Ok(()),
        },
        Err(e) => Err(e),
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}
