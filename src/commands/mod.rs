//! CLI command definitions and dispatch.

pub mod counts;
pub mod folder;
pub mod item;
pub mod migrate;
pub mod search;
pub mod share;

use clap::{Parser, Subcommand};

use crate::app::Shelf;
use crate::output::OutputFormat;
use shelf_core::config::AppConfig;
use shelf_core::error::AppError;
use shelf_core::types::UserId;
use shelf_service::RequestContext;

/// PromptShelf: prompts and bookmarks in nested folders
#[derive(Debug, Parser)]
#[command(name = "promptshelf", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to config/ + SHELF_ENV)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Account to act as
    #[arg(short, long, global = true)]
    pub user: Option<UserId>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Prompt and bookmark management
    Item(item::ItemArgs),
    /// Public share links
    Share(share::ShareArgs),
    /// Search items by text or `#tag`
    Search(search::SearchArgs),
    /// Item counts per folder
    Counts(counts::CountsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let shelf = Shelf::connect(config).await?;

        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &shelf).await,
            Commands::Folder(args) => {
                folder::execute(args, &shelf, &self.context()?, self.format).await
            }
            Commands::Item(args) => item::execute(args, &shelf, &self.context()?, self.format).await,
            Commands::Share(args) => {
                share::execute(args, &shelf, self.user.map(RequestContext::new), self.format).await
            }
            Commands::Search(args) => {
                search::execute(args, &shelf, &self.context()?, self.format).await
            }
            Commands::Counts(args) => {
                counts::execute(args, &shelf, &self.context()?, self.format).await
            }
        };

        shelf.pool.close().await;
        result
    }

    fn context(&self) -> Result<RequestContext, AppError> {
        self.user
            .map(RequestContext::new)
            .ok_or_else(|| AppError::validation("--user <UUID> is required for this command"))
    }
}

/// Short form of an optional id for table cells.
pub fn short_id(id: Option<impl std::fmt::Display>) -> String {
    id.map(|id| id.to_string().chars().take(8).collect())
        .unwrap_or_else(|| "-".to_string())
}
