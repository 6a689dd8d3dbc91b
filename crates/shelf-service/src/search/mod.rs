//! Query parsing, tag and text search, and debounced search sessions.

pub mod engine;
pub mod highlight;
pub mod mode;
pub mod session;

pub use engine::{SearchEngine, merge_results};
pub use highlight::highlight;
pub use mode::SearchMode;
pub use session::{SearchSession, SearchState};
