//! Per-folder item counts kept live by the change feed.

pub mod aggregator;

pub use aggregator::{CountAggregator, CountSnapshot};
