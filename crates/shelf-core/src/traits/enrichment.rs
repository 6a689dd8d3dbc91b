//! External enrichment collaborators.
//!
//! Both collaborators are best-effort: callers treat their failures as
//! "no suggestion" and never block an item save on them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Metadata scraped from a web page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page title, if one was found.
    pub title: Option<String>,
    /// Screenshot or preview image URL.
    pub image_url: Option<String>,
}

impl PageInfo {
    /// Whether nothing useful was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.image_url.is_none()
    }
}

/// Fetches a title and preview image for a URL.
#[async_trait]
pub trait PageInfoFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch page metadata. Implementations return `Ok(PageInfo::default())`
    /// on timeouts and non-success responses.
    async fn fetch_page_info(&self, url: &str) -> AppResult<PageInfo>;
}

/// Suggests a single keyword describing a prompt.
#[async_trait]
pub trait KeywordSuggester: Send + Sync + std::fmt::Debug + 'static {
    /// Suggest one keyword for the given title and content.
    async fn suggest_keyword(&self, title: &str, content: &str) -> AppResult<Option<String>>;
}
