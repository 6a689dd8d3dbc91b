//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::app::Shelf;
use crate::output;
use shelf_core::error::AppError;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Report which tables are in place
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, shelf: &Shelf) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            shelf_database::migration::run_migrations(shelf.pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let missing = shelf.pool.missing_tables().await?;
            for table in shelf_database::SHELF_TABLES {
                let state = if missing.contains(&table) { "missing" } else { "ready" };
                output::print_kv(table, state);
            }
            if !missing.is_empty() {
                output::print_warning("Run `promptshelf migrate run` to create missing tables");
            }
        }
    }
    Ok(())
}
