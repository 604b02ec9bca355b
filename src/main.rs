//! Nexus - terminal chat client for Google Gemini
//!
//! Main entry point: initializes tracing, loads and validates
//! configuration, and dispatches to the command handlers.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nexus::cli::{Cli, Commands};
use nexus::commands;
use nexus::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration before any request can be built
    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { generation } => {
            tracing::info!("Starting interactive chat");
            commands::chat::run_chat(config, generation).await
        }
        Commands::Ask {
            prompt,
            attach,
            json,
            generation,
        } => {
            tracing::info!("Running one-shot prompt");
            commands::ask::run_ask(config, prompt, attach, json, generation).await
        }
        Commands::Models { json } => commands::models::list_models(json),
        Commands::Auth { command } => commands::auth::run_auth(command),
    }
}

/// Initialize the tracing subscriber
///
/// Honors `RUST_LOG` when set; otherwise `--verbose` raises the crate's
/// level to debug. Logs go to stderr so they never interleave with chat
/// output on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "nexus=debug" } else { "nexus=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
