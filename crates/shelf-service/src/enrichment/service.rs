//! Enrichment orchestration for new items.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shelf_core::config::EnrichmentConfig;
use shelf_core::result::AppResult;
use shelf_core::traits::{KeywordSuggester, PageInfo, PageInfoFetcher, Service};
use shelf_entity::item::CreateItem;

use super::keyword::{AnthropicKeywordSuggester, sanitize_keyword};
use super::page_info::MicrolinkFetcher;
use crate::item::tags::{extract_hashtags, normalize_tags};

/// Fills in what a draft is missing before it is saved.
///
/// Every collaborator call is best effort: failures are logged and the
/// draft passes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentService {
    page_info: Option<Arc<dyn PageInfoFetcher>>,
    keywords: Option<Arc<dyn KeywordSuggester>>,
}

impl Service for EnrichmentService {}

impl EnrichmentService {
    /// Creates a service over the given collaborators. `None` disables one.
    pub fn new(
        page_info: Option<Arc<dyn PageInfoFetcher>>,
        keywords: Option<Arc<dyn KeywordSuggester>>,
    ) -> Self {
        Self { page_info, keywords }
    }

    /// Builds the HTTP collaborators enabled in `config`.
    pub fn from_config(config: &EnrichmentConfig) -> AppResult<Self> {
        let page_info: Option<Arc<dyn PageInfoFetcher>> = if config.page_info.enabled {
            Some(Arc::new(MicrolinkFetcher::new(&config.page_info)?))
        } else {
            None
        };

        let keywords: Option<Arc<dyn KeywordSuggester>> = if config.keyword.enabled {
            match AnthropicKeywordSuggester::new(&config.keyword)? {
                Some(suggester) => Some(Arc::new(suggester)),
                None => {
                    warn!("Keyword suggestion enabled without an API key; disabling");
                    None
                }
            }
        } else {
            None
        };

        info!(
            page_info = page_info.is_some(),
            keywords = keywords.is_some(),
            "Enrichment configured"
        );
        Ok(Self::new(page_info, keywords))
    }

    /// One suggested tag for a prompt, or `None`.
    pub async fn suggest_tag(&self, title: &str, content: &str) -> Option<String> {
        let suggester = self.keywords.as_ref()?;
        match suggester.suggest_keyword(title, content).await {
            Ok(keyword) => keyword.as_deref().and_then(sanitize_keyword),
            Err(e) => {
                warn!(error = %e, "Keyword suggestion failed");
                None
            }
        }
    }

    /// Page metadata for `url`; empty when unavailable.
    pub async fn describe_url(&self, url: &str) -> PageInfo {
        let Some(fetcher) = self.page_info.as_ref() else {
            return PageInfo::default();
        };
        if !url.starts_with("http") {
            debug!(url, "Not an http URL, skipping page info");
            return PageInfo::default();
        }
        match fetcher.fetch_page_info(url).await {
            Ok(info) => info,
            Err(e) => {
                warn!(url, error = %e, "Page info unavailable");
                PageInfo::default()
            }
        }
    }

    /// Completes a bookmark draft from its page.
    ///
    /// The URL is `link_url`, or `content` when no link is set. An empty
    /// title becomes the page title, or the URL itself; a missing image
    /// becomes the page screenshot.
    pub async fn prepare_bookmark(&self, mut draft: CreateItem) -> CreateItem {
        let url = draft
            .link_url
            .clone()
            .unwrap_or_else(|| draft.content.trim().to_string());
        let needs_title = draft.title.trim().is_empty();
        if url.is_empty() || !(needs_title || draft.image_url.is_none()) {
            return draft;
        }

        let info = self.describe_url(&url).await;
        if needs_title {
            draft.title = info.title.unwrap_or_else(|| url.clone());
        }
        if draft.image_url.is_none() {
            draft.image_url = info.image_url;
        }
        if draft.link_url.is_none() {
            draft.link_url = Some(url);
        }
        draft
    }

    /// Completes a prompt draft's tags.
    ///
    /// Hashtags in the content are added to the tags. A draft that still
    /// has no tags gets the suggested one, if any.
    pub async fn prepare_prompt(&self, mut draft: CreateItem) -> CreateItem {
        let hashtags = extract_hashtags(&draft.content);
        draft.tags = normalize_tags(std::mem::take(&mut draft.tags).into_iter().chain(hashtags));

        if draft.tags.is_empty()
            && let Some(tag) = self.suggest_tag(&draft.title, &draft.content).await
        {
            draft.tags.push(tag);
        }
        draft
    }
}
