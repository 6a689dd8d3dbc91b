//! Account user model.

use serde::{Deserialize, Serialize};

use shelf_core::types::{FolderId, UserId};

/// Metadata key holding the ids of website-kind folders.
pub const WEBSITE_FOLDER_IDS_KEY: &str = "website_folder_ids";

/// The signed-in account as the identity provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUser {
    /// Account identifier; owner of folders and items.
    pub id: UserId,
    /// Free-form account metadata.
    #[serde(default)]
    pub metadata: AccountMetadata,
}

/// Account metadata.
///
/// Only `website_folder_ids` is interpreted; every other key is carried
/// through untouched so write-backs do not clobber it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountMetadata {
    /// Folders whose kind is website.
    #[serde(default)]
    pub website_folder_ids: Vec<FolderId>,
    /// Any other metadata keys.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AccountMetadata {
    /// Parse metadata from a JSON value, tolerating a null or non-object.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Serialize to a JSON object.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }

    /// Shallow-merge a patch of top-level keys into this metadata.
    pub fn merge(&self, patch: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut merged = match self.to_value() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        Self::from_value(serde_json::Value::Object(merged))
    }
}
