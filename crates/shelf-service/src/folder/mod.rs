//! Folder repository, kind ledger, and tree builder.

pub mod kinds;
pub mod service;
pub mod tree;

pub use kinds::KindLedger;
pub use service::FolderService;
