//! Item query and scoping types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use shelf_core::types::{FolderId, UserId};

/// Folder scoping for item listings.
///
/// `All` means unscoped. `Folders` with an empty set is a valid scope that
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scope {
    /// Every item of the owner, filed or not.
    #[default]
    All,
    /// Items filed directly in one of these folders.
    Folders(BTreeSet<FolderId>),
}

impl Scope {
    /// Scope consisting of the given folders.
    pub fn folders(ids: impl IntoIterator<Item = FolderId>) -> Self {
        Self::Folders(ids.into_iter().collect())
    }

    /// Whether this scope can never match an item.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Folders(ids) if ids.is_empty())
    }

    /// Whether an item filed in `folder_id` falls inside this scope.
    pub fn contains(&self, folder_id: Option<FolderId>) -> bool {
        match self {
            Self::All => true,
            Self::Folders(ids) => folder_id.is_some_and(|id| ids.contains(&id)),
        }
    }
}

/// Result ordering for item selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrder {
    /// `sort_order` ascending, then `created_at` descending.
    #[default]
    Manual,
    /// `created_at` descending.
    Recent,
}

/// A select-with-filter-and-order against the item store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    /// Owner whose items are selected.
    pub owner_id: UserId,
    /// Only items filed in one of these folders (`None` = any).
    pub folder_ids: Option<Vec<FolderId>>,
    /// Case-insensitive substring over `title` OR `content`.
    pub text: Option<String>,
    /// Exact, case-sensitive tag membership.
    pub tag: Option<String>,
    /// Result ordering.
    pub order: ItemOrder,
    /// Maximum number of rows.
    pub limit: Option<u32>,
}

impl ItemQuery {
    /// An unfiltered query over all of the owner's items.
    pub fn for_owner(owner_id: UserId) -> Self {
        Self {
            owner_id,
            folder_ids: None,
            text: None,
            tag: None,
            order: ItemOrder::Manual,
            limit: None,
        }
    }

    /// Restrict to a set of folders.
    pub fn in_folders(mut self, ids: impl IntoIterator<Item = FolderId>) -> Self {
        self.folder_ids = Some(ids.into_iter().collect());
        self
    }

    /// Add a title/content substring filter.
    pub fn matching_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an exact tag filter.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the ordering.
    pub fn ordered(mut self, order: ItemOrder) -> Self {
        self.order = order;
        self
    }

    /// Cap the number of rows.
    pub fn limited(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
