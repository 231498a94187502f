//! Logging setup and JSON output shared by the subcommands.

use serde::Serialize;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Initialize tracing once for the process.
///
/// `RUST_LOG` wins when set; otherwise `recipe_import=info`, or `debug`
/// with `--verbose`. Logs go to stderr so stdout stays machine-readable.
/// `json` switches to one JSON object per line.
pub fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose {
        "recipe_import=debug,tower_http=debug"
    } else {
        "recipe_import=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if let Err(e) = tracing::subscriber::set_global_default(build_subscriber(
        filter,
        json,
        std::io::stderr,
    )) {
        eprintln!("  Warning: logging already initialized: {e}");
    }
}

/// Formatted subscriber writing to `writer`, plain or JSON.
pub fn build_subscriber<W>(
    filter: EnvFilter,
    json: bool,
    writer: W,
) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    if json {
        Box::new(builder.json().finish())
    } else {
        Box::new(builder.finish())
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
