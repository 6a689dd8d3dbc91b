//! Change-feed events.
//!
//! The backing store announces every insert, update, and delete on the
//! `folders` and `items` tables. Events carry no row diff: consumers
//! re-derive their state from a full refetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Table a change was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// The `folders` table.
    Folders,
    /// The `items` table (prompts and bookmarks).
    Items,
}

impl Table {
    /// SQL table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folders => "folders",
            Self::Items => "items",
        }
    }
}

/// Kind of row mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Table the change happened on.
    pub table: Table,
    /// Kind of mutation.
    pub kind: ChangeKind,
    /// Primary key of the affected row, when known.
    #[serde(default)]
    pub record_id: Option<Uuid>,
    /// Owner of the affected row, when known.
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// When the change was observed.
    #[serde(default = "Utc::now")]
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create a new change event stamped with the current time.
    pub fn new(
        table: Table,
        kind: ChangeKind,
        record_id: Option<Uuid>,
        owner_id: Option<UserId>,
    ) -> Self {
        Self {
            table,
            kind,
            record_id,
            owner_id,
            at: Utc::now(),
        }
    }

    /// Whether this event concerns the given owner. Events without an
    /// owner are treated as relevant to everyone.
    pub fn concerns(&self, owner: &UserId) -> bool {
        self.owner_id.is_none_or(|o| &o == owner)
    }
}
