//! Tag and text search over the item store.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use shelf_core::config::SearchConfig;
use shelf_core::error::ErrorKind;
use shelf_core::result::AppResult;
use shelf_core::traits::Service;
use shelf_database::ItemStore;
use shelf_entity::item::{Item, ItemOrder, ItemQuery};

use super::mode::SearchMode;
use crate::context::RequestContext;

/// Item search service.
///
/// An active search ignores folder scoping and looks at every item of the
/// owner.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    /// Item store.
    items: Arc<dyn ItemStore>,
    /// Limits.
    config: SearchConfig,
}

impl Service for SearchEngine {}

impl SearchEngine {
    /// Creates a new search engine.
    pub fn new(items: Arc<dyn ItemStore>, config: SearchConfig) -> Self {
        Self { items, config }
    }

    /// Search limits and debounce settings.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Parses `query` and runs it.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> AppResult<Vec<Item>> {
        self.run(ctx, &SearchMode::parse(query)).await
    }

    /// Runs an already parsed query. `Idle` yields no results.
    pub async fn run(&self, ctx: &RequestContext, mode: &SearchMode) -> AppResult<Vec<Item>> {
        let result = match mode {
            SearchMode::Idle => return Ok(Vec::new()),
            SearchMode::Tag(term) => self.tag_search(ctx, term).await,
            SearchMode::Text(term) => self.text_search(ctx, term).await,
        };
        result.map_err(|e| {
            warn!(user_id = %ctx.user_id, error = %e, "Search failed");
            if e.is(ErrorKind::SearchUnavailable) {
                e
            } else {
                e.rekind(ErrorKind::SearchUnavailable, "Search failed")
            }
        })
    }

    /// Newest `tag_window` items whose tags contain `term`, ignoring case.
    async fn tag_search(&self, ctx: &RequestContext, term: &str) -> AppResult<Vec<Item>> {
        let needle = term.to_lowercase();
        debug!(user_id = %ctx.user_id, term, "Tag search");

        let query = ItemQuery::for_owner(ctx.owner())
            .ordered(ItemOrder::Recent)
            .limited(self.config.tag_window);
        let recent = self.items.select(&query).await?;

        Ok(recent
            .into_iter()
            .filter(|item| item.tags.iter().any(|t| t.to_lowercase().contains(&needle)))
            .collect())
    }

    /// Title/content substring hits followed by exact tag hits.
    async fn text_search(&self, ctx: &RequestContext, term: &str) -> AppResult<Vec<Item>> {
        debug!(user_id = %ctx.user_id, term, "Text search");

        let text_query = ItemQuery::for_owner(ctx.owner())
            .matching_text(term)
            .ordered(ItemOrder::Recent)
            .limited(self.config.text_limit);
        let tag_query = ItemQuery::for_owner(ctx.owner())
            .with_tag(term)
            .ordered(ItemOrder::Recent)
            .limited(self.config.tag_limit);

        let (by_text, by_tag) = tokio::try_join!(
            self.items.select(&text_query),
            self.items.select(&tag_query)
        )?;
        Ok(merge_results(by_text, by_tag))
    }
}

/// Concatenates `first` and `second`, keeping only the first occurrence of
/// each id.
pub fn merge_results(first: Vec<Item>, second: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(first.len() + second.len());
    first
        .into_iter()
        .chain(second)
        .filter(|item| seen.insert(item.id))
        .collect()
}
