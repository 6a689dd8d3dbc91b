//! Folder management CLI commands.

use std::collections::HashMap;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::app::Shelf;
use crate::output::{self, OutputFormat};
use shelf_core::error::AppError;
use shelf_core::types::{FolderId, Outcome};
use shelf_entity::folder::{Folder, FolderKind};
use shelf_service::RequestContext;
use shelf_service::folder::tree;

use super::short_id;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List all folders, creating the bookmark root if missing
    List,
    /// Show the folder tree with item totals
    Tree,
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<FolderId>,
        /// Create a website (bookmark) folder
        #[arg(long)]
        website: bool,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: FolderId,
        /// New name
        name: String,
    },
    /// Move a folder under another, or to the root
    Move {
        /// Folder ID
        id: FolderId,
        /// New parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<FolderId>,
    },
    /// Record whether a folder holds prompts or website bookmarks
    Kind {
        /// Folder ID
        id: FolderId,
        /// `prompt` or `website`
        kind: FolderKind,
    },
    /// Delete a folder and all of its subfolders
    Delete {
        /// Folder ID
        id: FolderId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Kind
    kind: String,
    /// Parent
    parent: String,
    /// Items in the subtree
    items: u64,
}

impl FolderRow {
    fn new(folder: &Folder, folders: &[Folder], counts: &HashMap<FolderId, u64>) -> Self {
        Self {
            id: folder.id.to_string(),
            name: folder.name.clone(),
            kind: folder.folder_kind.to_string(),
            parent: short_id(folder.parent_id),
            items: tree::total_count(folder.id, folders, counts),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    shelf: &Shelf,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = &shelf.folders;

    match &args.command {
        FolderCommand::List => {
            let folders = service.load_folders(ctx).await?;
            let counts = shelf.counts.recompute(ctx.owner()).await?;
            let rows: Vec<FolderRow> = folders
                .iter()
                .map(|f| FolderRow::new(f, &folders, &counts))
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Tree => {
            let folders = service.load_folders(ctx).await?;
            let counts = shelf.counts.recompute(ctx.owner()).await?;
            let forest = tree::build_forest(&folders);

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&forest)?;
                    println!("{json}");
                }
                OutputFormat::Table => {
                    println!("/");
                    for root in &forest {
                        for (depth, folder) in root.walk() {
                            let indent = "  ".repeat(depth + 1);
                            let marker = if folder.is_website() { " [web]" } else { "" };
                            println!(
                                "{indent}├── {}/{marker} ({})",
                                folder.name,
                                tree::total_count(folder.id, &folders, &counts)
                            );
                        }
                    }
                }
            }
        }
        FolderCommand::Create {
            name,
            parent,
            website,
        } => {
            let kind = if *website {
                FolderKind::Website
            } else {
                FolderKind::Prompt
            };
            match service.create_folder(ctx, name, *parent, kind).await? {
                Outcome::Complete(folder) => {
                    output::print_success(&format!(
                        "Folder '{}' created (id: {})",
                        folder.name, folder.id
                    ));
                }
                Outcome::Partial { value, error } => {
                    output::print_success(&format!(
                        "Folder '{}' created (id: {})",
                        value.name, value.id
                    ));
                    output::print_warning(&format!(
                        "{error}; retry with `promptshelf folder kind {} website`",
                        value.id
                    ));
                }
            }
        }
        FolderCommand::Rename { id, name } => {
            let record = service.rename_folder(ctx, *id, name).await?;
            output::print_success(&format!("Folder {} renamed to '{}'", record.id, record.name));
        }
        FolderCommand::Move { id, parent } => {
            let record = service.move_folder(ctx, *id, *parent).await?;
            let target = parent.map_or_else(|| "the root".to_string(), |p| p.to_string());
            output::print_success(&format!("Folder '{}' moved under {target}", record.name));
        }
        FolderCommand::Kind { id, kind } => {
            service.record_kind(ctx, *id, *kind).await?;
            output::print_success(&format!("Folder {id} is now a {kind} folder"));
        }
        FolderCommand::Delete { id, yes } => {
            let folder = service.get_folder(ctx, *id).await?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' and all of its subfolders? Items inside are kept unfiled.",
                        folder.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let outcome = service.delete_folder(ctx, *id).await?;
            let removed = outcome.value().len();
            output::print_success(&format!("Deleted '{}' ({removed} folders)", folder.name));
            if let Outcome::Partial { error, .. } = outcome {
                output::print_warning(&error.to_string());
            }
        }
    }

    Ok(())
}
