//! # shelf-service
//!
//! Service layer for PromptShelf. Each service orchestrates the store
//! traits from `shelf-database` to implement one use case family:
//! folders and their kinds, items, sharing, per-folder counts, search,
//! and enrichment.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod count;
pub mod enrichment;
pub mod folder;
pub mod item;
pub mod search;
pub mod share;

pub use context::RequestContext;
pub use count::CountAggregator;
pub use enrichment::EnrichmentService;
pub use folder::{FolderService, KindLedger};
pub use item::{ItemService, ReorderReport};
pub use search::{SearchEngine, SearchMode, SearchSession, SearchState};
pub use share::ShareService;
