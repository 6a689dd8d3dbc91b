//! Change-feed traits.
//!
//! A feed fans [`ChangeEvent`]s out to any number of subscribers. The
//! in-memory and PostgreSQL implementations live in `shelf-realtime`.

use tokio::sync::broadcast;

use crate::events::ChangeEvent;

/// Source of change notifications.
pub trait ChangeFeed: Send + Sync + std::fmt::Debug + 'static {
    /// Register a new subscriber. Events published before this call are
    /// not replayed.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

/// Sink a store announces its own mutations to.
///
/// Backends whose database already emits notifications (PostgreSQL
/// triggers) do not need one; the in-memory backend does.
pub trait ChangePublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Announce a change. Delivery is best-effort: with no subscribers the
    /// event is dropped.
    fn publish(&self, event: ChangeEvent);
}
