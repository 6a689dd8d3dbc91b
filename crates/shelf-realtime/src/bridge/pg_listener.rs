//! PostgreSQL `LISTEN/NOTIFY` change feed.
//!
//! Table triggers emit one JSON payload per row change on the configured
//! channel. A background task decodes them and rebroadcasts through a
//! [`MemoryChangeFeed`].

use std::time::Duration;

use sqlx::postgres::PgListener;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use shelf_core::config::RealtimeConfig;
use shelf_core::error::{AppError, ErrorKind};
use shelf_core::events::{ChangeEvent, ChangeKind, Table};
use shelf_core::result::AppResult;
use shelf_core::traits::{ChangeFeed, ChangePublisher};
use shelf_database::DatabasePool;

use super::memory_feed::MemoryChangeFeed;
use crate::subscription::Subscription;

/// Delay before retrying after the listener connection errors.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Change feed driven by database notifications.
#[derive(Debug)]
pub struct PgChangeFeed {
    inner: MemoryChangeFeed,
    listener: Subscription,
}

impl PgChangeFeed {
    /// Start listening on `config.notify_channel`.
    pub async fn start(pool: &DatabasePool, config: &RealtimeConfig) -> AppResult<Self> {
        let mut listener = pool.listener().await?;
        listener
            .listen(&config.notify_channel)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    format!("Failed to LISTEN on {}", config.notify_channel),
                    e,
                )
            })?;

        info!(channel = %config.notify_channel, "Listening for database changes");

        let inner = MemoryChangeFeed::new(config.channel_buffer_size);
        let listener = Subscription::spawn("pg-change-listener", run(listener, inner.clone()));
        Ok(Self { inner, listener })
    }

    /// Whether the background listener is still running.
    pub fn is_listening(&self) -> bool {
        self.listener.is_active()
    }
}

impl ChangeFeed for PgChangeFeed {
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.subscribe()
    }
}

async fn run(mut listener: PgListener, feed: MemoryChangeFeed) {
    loop {
        match listener.try_recv().await {
            Ok(Some(notification)) => match decode_payload(notification.payload()) {
                Ok(event) => feed.publish(event),
                Err(e) => warn!(error = %e, "Ignoring malformed change payload"),
            },
            Ok(None) => {
                // Notifications sent while disconnected are lost.
                warn!("Change listener reconnected; requesting full resync");
                for table in [Table::Folders, Table::Items] {
                    feed.publish(ChangeEvent::new(table, ChangeKind::Update, None, None));
                }
            }
            Err(e) => {
                warn!(error = %e, "Change listener error");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Decode a trigger payload.
pub fn decode_payload(payload: &str) -> AppResult<ChangeEvent> {
    let event: ChangeEvent = serde_json::from_str(payload)?;
    debug!(table = event.table.as_str(), kind = ?event.kind, "Decoded change payload");
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_trigger_payload() {
        let payload = r#"{"table":"folders","kind":"insert","record_id":"8d2b8f50-8d4e-4b4e-9a0e-3c21d1f0a7aa","owner_id":"0b7c1a52-4f8e-4d7e-8a55-2f3e9d4c6b10","at":"2026-03-01T10:00:00.123456+00:00"}"#;
        let event = decode_payload(payload).unwrap();
        assert_eq!(event.table, Table::Folders);
        assert_eq!(event.kind, ChangeKind::Insert);
        assert!(event.owner_id.is_some());
    }

    #[test]
    fn test_decode_rejects_unknown_table() {
        let err = decode_payload(r#"{"table":"users","kind":"insert"}"#).unwrap_err();
        assert!(err.is(ErrorKind::Serialization));
    }
}
