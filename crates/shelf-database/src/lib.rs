//! # shelf-database
//!
//! Store traits for folders, items, and account identity, their PostgreSQL
//! implementations, and an in-memory backend.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::{DatabasePool, SHELF_TABLES};
pub use memory::{MemoryBackend, StoreOp};
pub use repositories::{PgFolderStore, PgIdentityStore, PgItemStore};
pub use store::{FolderStore, IdentityStore, ItemStore};
