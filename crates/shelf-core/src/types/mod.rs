//! Core type definitions used across the PromptShelf workspace.

pub mod id;
pub mod outcome;

pub use id::*;
pub use outcome::Outcome;
