//! Account identity repository implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use shelf_core::result::AppResult;
use shelf_core::types::UserId;
use shelf_entity::user::{AccountMetadata, AccountUser};

use super::store_error;
use crate::store::IdentityStore;

/// Account metadata kept in `account_users.metadata`.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    /// Create a new identity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn fetch_user(&self, id: UserId) -> AppResult<Option<AccountUser>> {
        let row: Option<(UserId, Value)> =
            sqlx::query_as("SELECT id, metadata FROM account_users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error("Failed to fetch account"))?;

        Ok(row.map(|(id, metadata)| AccountUser {
            id,
            metadata: AccountMetadata::from_value(metadata),
        }))
    }

    async fn update_metadata(&self, id: UserId, patch: &Map<String, Value>) -> AppResult<AccountUser> {
        // jsonb `||` replaces top-level keys, which is the shallow merge.
        let (id, metadata): (UserId, Value) = sqlx::query_as(
            "INSERT INTO account_users (id, metadata) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET metadata = account_users.metadata || EXCLUDED.metadata, updated_at = NOW() \
             RETURNING id, metadata",
        )
        .bind(id)
        .bind(Value::Object(patch.clone()))
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("Failed to update account metadata"))?;

        Ok(AccountUser {
            id,
            metadata: AccountMetadata::from_value(metadata),
        })
    }
}
