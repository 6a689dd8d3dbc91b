//! # shelf-entity
//!
//! Domain entity models for PromptShelf. Persisted rows derive
//! `sqlx::FromRow`; everything derives `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod folder;
pub mod item;
pub mod user;
