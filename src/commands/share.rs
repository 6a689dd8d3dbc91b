//! Share link CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::app::Shelf;
use crate::output::{self, OutputFormat};
use shelf_core::error::AppError;
use shelf_core::types::ItemId;
use shelf_service::RequestContext;

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Publish an item under a fresh link
    On {
        /// Item ID
        id: ItemId,
    },
    /// Revoke an item's public link
    Off {
        /// Item ID
        id: ItemId,
    },
    /// Show the item behind a share token, as a visitor would see it
    Show {
        /// Share token
        token: String,
    },
}

/// Public view of a shared item
#[derive(Debug, Serialize, Tabled)]
struct SharedRow {
    /// Title
    title: String,
    /// Tags
    tags: String,
    /// Content
    content: String,
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    shelf: &Shelf,
    ctx: Option<RequestContext>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = &shelf.shares;
    let owner = || ctx.clone().ok_or_else(|| AppError::validation("--user <UUID> is required"));

    match &args.command {
        ShareCommand::On { id } => {
            let ctx = owner()?;
            let token = service
                .set_share(&ctx, *id, true)
                .await?
                .ok_or_else(|| AppError::internal("Sharing enabled without a token"))?;
            output::print_success("Item is now public");
            output::print_kv("Link", &service.share_url(&token));
        }
        ShareCommand::Off { id } => {
            let ctx = owner()?;
            service.set_share(&ctx, *id, false).await?;
            output::print_success("Public link revoked");
        }
        ShareCommand::Show { token } => match service.resolve_shared(token).await? {
            Some(item) => output::print_item(
                &SharedRow {
                    title: item.title,
                    tags: item.tags.join(", "),
                    content: item.content,
                },
                format,
            ),
            None => output::print_warning("No shared item for this link"),
        },
    }

    Ok(())
}
