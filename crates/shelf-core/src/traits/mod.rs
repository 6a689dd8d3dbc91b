//! Core traits defined in `shelf-core` and implemented by other crates.

pub mod change_feed;
pub mod enrichment;
pub mod service;

pub use change_feed::{ChangeFeed, ChangePublisher};
pub use enrichment::{KeywordSuggester, PageInfo, PageInfoFetcher};
pub use service::Service;
