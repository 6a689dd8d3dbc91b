//! # shelf-realtime
//!
//! Change feeds for PromptShelf:
//!
//! - In-memory broadcast feed for single-process runs and tests
//! - PostgreSQL `LISTEN/NOTIFY` feed fed by table triggers
//! - [`Subscription`] handles that stop their listener task on drop

pub mod bridge;
pub mod subscription;

pub use bridge::memory_feed::MemoryChangeFeed;
pub use bridge::pg_listener::PgChangeFeed;
pub use subscription::Subscription;
