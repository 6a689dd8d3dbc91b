//! PromptShelf command-line entry point.
//!
//! Loads configuration, initializes logging, wires the services, and
//! dispatches one command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod app;
mod commands;
mod output;

use commands::Cli;
use shelf_core::config::{AppConfig, LoggingConfig};
use shelf_core::error::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file, or from `config/` for the
/// environment named by `SHELF_ENV`.
fn load_configuration(path: Option<&str>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("SHELF_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing. Logs go to stderr so command output stays clean.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
