//! Best-effort enrichment: keyword suggestions and page metadata.

pub mod keyword;
pub mod page_info;
pub mod service;

pub use keyword::{AnthropicKeywordSuggester, sanitize_keyword};
pub use page_info::MicrolinkFetcher;
pub use service::EnrichmentService;
