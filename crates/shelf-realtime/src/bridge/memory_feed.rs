//! In-memory change feed for single-process deployments.

use tokio::sync::broadcast;
use tracing::trace;

use shelf_core::events::ChangeEvent;
use shelf_core::traits::{ChangeFeed, ChangePublisher};

/// Broadcast-backed change feed.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct MemoryChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl MemoryChangeFeed {
    /// Create a feed whose subscribers each buffer up to `buffer_size`
    /// events before lagging.
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeFeed for MemoryChangeFeed {
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl ChangePublisher for MemoryChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        trace!(table = event.table.as_str(), kind = ?event.kind, "Publishing change");
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::events::{ChangeKind, Table};

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let feed = MemoryChangeFeed::new(8);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        feed.publish(ChangeEvent::new(Table::Items, ChangeKind::Insert, None, None));

        assert_eq!(a.recv().await.unwrap().kind, ChangeKind::Insert);
        assert_eq!(b.recv().await.unwrap().table, Table::Items);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let feed = MemoryChangeFeed::new(8);
        feed.publish(ChangeEvent::new(Table::Folders, ChangeKind::Delete, None, None));

        let mut late = feed.subscribe();
        assert!(late.try_recv().is_err());
    }
}
