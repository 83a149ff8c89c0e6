use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use idea_crucible::{
    cli::{execute_command, Cli},
    completion::CompletionClient,
    config::{Config, LogFormat},
    critique::Analyzer,
    session::Workspace,
    storage::SqliteStateStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config);

    debug!(version = env!("CARGO_PKG_VERSION"), "Crucible starting");

    // Initialize storage
    let store = match SqliteStateStore::new(&config.database).await {
        Ok(s) => {
            debug!(path = %config.database.path.display(), "State database opened");
            s
        }
        Err(e) => {
            error!(error = %e, "Failed to open state database");
            return Err(e.into());
        }
    };

    let mut workspace = Workspace::hydrate(store).await?;

    // A missing credential is reported when analyzing, not here
    let client = CompletionClient::new(&config.provider, config.request.clone())?;
    let analyzer = Analyzer::new(client);

    let result = execute_command(cli.command, &mut workspace, &analyzer).await;

    if result.exit_code == 0 {
        print!("{}", result.message);
    } else {
        eprintln!("{}", result.message);
    }

    std::process::exit(result.exit_code);
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
