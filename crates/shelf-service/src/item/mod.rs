//! Item repository, reordering, and tag helpers.

pub mod reorder;
pub mod service;
pub mod tags;

pub use reorder::ReorderReport;
pub use service::ItemService;
