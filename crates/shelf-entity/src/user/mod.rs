//! Account entities.

pub mod model;

pub use model::{AccountMetadata, AccountUser, WEBSITE_FOLDER_IDS_KEY};
