//! Prompt and bookmark CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::app::Shelf;
use crate::output::{self, OutputFormat};
use shelf_core::error::AppError;
use shelf_core::types::{FolderId, ItemId};
use shelf_entity::item::{CreateItem, Item, ItemPatch, Scope};
use shelf_service::RequestContext;
use shelf_service::folder::tree;
use shelf_service::item::tags::{available_tags, filter_by_tags};

use super::short_id;

/// Arguments for item commands
#[derive(Debug, Args)]
pub struct ItemArgs {
    /// Item subcommand
    #[command(subcommand)]
    pub command: ItemCommand,
}

/// Item subcommands
#[derive(Debug, Subcommand)]
pub enum ItemCommand {
    /// List items, optionally within a folder subtree
    List {
        /// Folder ID; includes all subfolders
        #[arg(long)]
        folder: Option<FolderId>,
        /// Only items carrying every given tag
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Add a prompt, or a bookmark with `--bookmark`
    Add {
        /// Title (bookmarks default to the page title)
        #[arg(short, long, default_value = "")]
        title: String,
        /// Markdown body, or the URL of a bookmark
        #[arg(short, long)]
        content: String,
        /// Folder ID
        #[arg(long)]
        folder: Option<FolderId>,
        /// Tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Thumbnail image URL
        #[arg(long)]
        image: Option<String>,
        /// Reference link
        #[arg(long)]
        link: Option<String>,
        /// Treat the content as a website URL
        #[arg(long)]
        bookmark: bool,
    },
    /// Edit an item
    Edit {
        /// Item ID
        id: ItemId,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
        /// Move into a folder
        #[arg(long, conflicts_with = "unfile")]
        folder: Option<FolderId>,
        /// Remove from its folder
        #[arg(long)]
        unfile: bool,
        /// Replace the tags
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Delete an item
    Delete {
        /// Item ID
        id: ItemId,
    },
    /// Set the manual order of items, first to last
    Reorder {
        /// Item IDs in their new order
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
}

/// Item display row
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// Item ID
    id: String,
    /// Title
    title: String,
    /// Folder
    folder: String,
    /// Tags
    tags: String,
    /// Public
    shared: bool,
    /// Last update
    updated_at: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            folder: short_id(item.folder_id),
            tags: item.tags.join(", "),
            shared: item.is_public,
            updated_at: item.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute item commands
pub async fn execute(
    args: &ItemArgs,
    shelf: &Shelf,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let service = &shelf.items;

    match &args.command {
        ItemCommand::List { folder, tags } => {
            let scope = match folder {
                Some(id) => {
                    let folders = shelf.folders.list_folders(ctx).await?;
                    tree::scope_for(*id, &folders)
                }
                None => Scope::All,
            };
            let items = service.list(ctx, &scope).await?;
            let rows: Vec<ItemRow> = filter_by_tags(&items, tags)
                .into_iter()
                .map(ItemRow::from)
                .collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table && !items.is_empty() {
                output::print_kv("Tags", &available_tags(&items).join(", "));
            }
        }
        ItemCommand::Add {
            title,
            content,
            folder,
            tags,
            image,
            link,
            bookmark,
        } => {
            let draft = CreateItem {
                folder_id: *folder,
                title: title.clone(),
                content: content.clone(),
                tags: tags.clone(),
                image_url: image.clone(),
                link_url: link.clone(),
                sort_order: 0,
            };

            let into_website = match folder {
                Some(id) => shelf.folders.get_folder(ctx, *id).await?.is_website(),
                None => false,
            };
            let draft = if *bookmark || into_website {
                shelf.enrichment.prepare_bookmark(draft).await
            } else {
                shelf.enrichment.prepare_prompt(draft).await
            };

            let item = service.create(ctx, draft).await?;
            output::print_item(&ItemRow::from(&item), format);
        }
        ItemCommand::Edit {
            id,
            title,
            content,
            folder,
            unfile,
            tags,
        } => {
            let folder_id = if *unfile {
                Some(None)
            } else {
                folder.map(Some)
            };
            let patch = ItemPatch {
                folder_id,
                title: title.clone(),
                content: content.clone(),
                tags: tags.clone(),
                ..ItemPatch::default()
            };
            let item = service.update(ctx, *id, patch).await?;
            output::print_item(&ItemRow::from(&item), format);
        }
        ItemCommand::Delete { id } => {
            service.delete(ctx, *id).await?;
            output::print_success(&format!("Item {id} deleted"));
        }
        ItemCommand::Reorder { ids } => {
            let mut ordered = Vec::with_capacity(ids.len());
            for id in ids {
                ordered.push(service.get(ctx, *id).await?);
            }

            let report = service.reorder(ctx, ordered).await;
            if report.is_complete() {
                output::print_success(&format!("{} items reordered", report.items.len()));
            } else {
                for (id, error) in &report.failures {
                    output::print_warning(&format!("Item {id}: {error}"));
                }
                return report.into_outcome().into_result().map(|_| ());
            }
        }
    }

    Ok(())
}
