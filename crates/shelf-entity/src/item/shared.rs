//! Public projection of a shared item.

use serde::{Deserialize, Serialize};

use shelf_core::types::ItemId;

use super::model::Item;

/// What an anonymous visitor of a share link may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedItem {
    /// Item identifier.
    pub id: ItemId,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Thumbnail image URL.
    pub image_url: Option<String>,
}

impl From<Item> for SharedItem {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            content: item.content,
            tags: item.tags,
            image_url: item.image_url,
        }
    }
}
