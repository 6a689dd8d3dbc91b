//! Folder domain entities.

pub mod kind;
pub mod model;
pub mod tree;

pub use kind::FolderKind;
pub use model::{Folder, FolderRecord};
pub use tree::FolderNode;
