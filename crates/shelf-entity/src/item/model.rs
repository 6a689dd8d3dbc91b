//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shelf_core::types::{FolderId, ItemId, UserId};

/// A prompt or website bookmark.
///
/// A bookmark is an item whose `content` holds a URL; both share one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// The item owner.
    pub owner_id: UserId,
    /// Containing folder, `None` when unfiled.
    pub folder_id: Option<FolderId>,
    /// Display title.
    pub title: String,
    /// Markdown body, or the bookmarked URL.
    pub content: String,
    /// Tags in insertion order.
    pub tags: Vec<String>,
    /// Thumbnail image URL.
    pub image_url: Option<String>,
    /// Reference link.
    pub link_url: Option<String>,
    /// Manual ordering within a scope.
    pub sort_order: i32,
    /// Whether the item is readable through its share token.
    pub is_public: bool,
    /// Share token, present exactly when `is_public` is true.
    pub share_token: Option<String>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Whether any tag equals `tag` exactly (case-sensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the share fields are consistent with each other.
    pub fn share_state_consistent(&self) -> bool {
        self.is_public == self.share_token.is_some()
    }

    /// Apply a patch in place. Identity and sharing fields are not part of
    /// a patch and are left untouched.
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(folder_id) = patch.folder_id {
            self.folder_id = folder_id;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(link_url) = &patch.link_url {
            self.link_url = link_url.clone();
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }
}

/// Data required to create a new item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateItem {
    /// Containing folder (None = unfiled).
    pub folder_id: Option<FolderId>,
    /// Display title.
    pub title: String,
    /// Markdown body or URL.
    pub content: String,
    /// Tags in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Thumbnail image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Reference link.
    #[serde(default)]
    pub link_url: Option<String>,
    /// Manual ordering.
    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update of an item.
///
/// There is no way to express a change of `id` or `owner_id`
/// here. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// Move to another folder, or unfile with `Some(None)`.
    #[serde(default)]
    pub folder_id: Option<Option<FolderId>>,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New content.
    #[serde(default)]
    pub content: Option<String>,
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New image URL.
    #[serde(default)]
    pub image_url: Option<Option<String>>,
    /// New link URL.
    #[serde(default)]
    pub link_url: Option<Option<String>>,
    /// New sort position.
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl ItemPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
