//! Folder count CLI command.

use std::collections::HashMap;
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::app::Shelf;
use crate::output::{self, OutputFormat};
use shelf_core::error::AppError;
use shelf_core::types::FolderId;
use shelf_realtime::PgChangeFeed;
use shelf_service::RequestContext;
use shelf_service::folder::tree;

/// How often `--watch` checks that the change listener is still running.
const LISTENER_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Arguments for the counts command
#[derive(Debug, Args)]
pub struct CountsArgs {
    /// Keep printing counts as items change, until Ctrl-C
    #[arg(short, long)]
    pub watch: bool,
}

/// Count display row
#[derive(Debug, Serialize, Tabled)]
struct CountRow {
    /// Folder
    folder: String,
    /// Items filed directly
    direct: u64,
    /// Items in the subtree
    total: u64,
}

/// Execute the counts command
pub async fn execute(
    args: &CountsArgs,
    shelf: &Shelf,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let folders = shelf.folders.list_folders(ctx).await?;
    let print = |counts: &HashMap<FolderId, u64>| {
        let rows: Vec<CountRow> = folders
            .iter()
            .map(|f| CountRow {
                folder: f.name.clone(),
                direct: counts.get(&f.id).copied().unwrap_or(0),
                total: tree::total_count(f.id, &folders, counts),
            })
            .collect();
        output::print_list(&rows, format);
    };

    if !args.watch {
        let counts = shelf.counts.recompute(ctx.owner()).await?;
        print(&counts);
        return Ok(());
    }

    let feed = PgChangeFeed::start(&shelf.pool, &shelf.config.realtime).await?;
    let mut snapshots = shelf.counts.subscribe_counts();
    let _subscription = shelf.counts.watch(&feed, ctx.owner());
    let mut health = tokio::time::interval(LISTENER_CHECK_INTERVAL);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let counts = snapshots.borrow_and_update().counts.clone();
                print(&counts);
            }
            _ = health.tick() => {
                if !feed.is_listening() {
                    output::print_warning("Change listener stopped; counts are no longer live");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    output::print_success("Stopped watching");
    Ok(())
}
