//! Search CLI command.

use clap::Args;

use crate::app::Shelf;
use crate::output::{self, OutputFormat};
use shelf_core::error::AppError;
use shelf_service::search::highlight;
use shelf_service::{RequestContext, SearchMode};

use super::item::ItemRow;

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to find in titles and content, or `#tag`
    pub query: String,
    /// Mark matches in titles with `<mark>`
    #[arg(long)]
    pub highlight: bool,
}

/// Execute the search command
pub async fn execute(
    args: &SearchArgs,
    shelf: &Shelf,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mode = SearchMode::parse(&args.query);
    if !mode.is_active() {
        return Err(AppError::validation("Search query is empty"));
    }

    let mut results = shelf.search.run(ctx, &mode).await?;
    if args.highlight
        && let SearchMode::Text(term) = &mode
    {
        for item in &mut results {
            item.title = highlight(&item.title, term);
        }
    }

    let rows: Vec<ItemRow> = results.iter().map(ItemRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
