//! Folder repository configuration.

use serde::{Deserialize, Serialize};

/// Folder bootstrap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    /// Name of the website root folder created on first load.
    #[serde(default = "default_bookmark_root_name")]
    pub bookmark_root_name: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            bookmark_root_name: default_bookmark_root_name(),
        }
    }
}

fn default_bookmark_root_name() -> String {
    "Bookmarks".to_string()
}
