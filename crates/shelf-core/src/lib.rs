//! # shelf-core
//!
//! Core crate for PromptShelf. Contains the error taxonomy, typed
//! identifiers, configuration schemas, change-feed events, and the
//! collaborator traits implemented by the database, realtime, and
//! service crates.
//!
//! This crate has **no** internal dependencies on other PromptShelf crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::Outcome;
