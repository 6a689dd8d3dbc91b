//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use shelf_core::types::{FolderId, UserId};

use super::kind::FolderKind;

/// A folder row as persisted in the primary store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderRecord {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner.
    pub owner_id: UserId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A folder annotated with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner.
    pub owner_id: UserId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// Prompt or website folder.
    pub folder_kind: FolderKind,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Join a persisted row with its kind.
    pub fn from_record(record: FolderRecord, folder_kind: FolderKind) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name,
            parent_id: record.parent_id,
            folder_kind,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this folder holds website bookmarks.
    pub fn is_website(&self) -> bool {
        self.folder_kind == FolderKind::Website
    }
}
