//! Direct item counts per folder.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::watch;
use tracing::{debug, warn};

use shelf_core::events::{ChangeEvent, Table};
use shelf_core::result::AppResult;
use shelf_core::traits::{ChangeFeed, Service};
use shelf_core::types::{FolderId, UserId};
use shelf_database::ItemStore;
use shelf_realtime::Subscription;

/// Published count state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountSnapshot {
    /// Folder id to the number of items filed directly in it.
    pub counts: HashMap<FolderId, u64>,
    /// Generation of the recompute that produced `counts`; 0 before the
    /// first one lands.
    pub generation: u64,
}

/// Maintains per-folder direct item counts.
///
/// Unfiled items are not counted. Subtree totals are derived at read time
/// with [`crate::folder::tree::total_count`].
#[derive(Debug)]
pub struct CountAggregator {
    /// Item store.
    items: Arc<dyn ItemStore>,
    /// Latest snapshot.
    state: watch::Sender<CountSnapshot>,
    /// Last generation handed out to a recompute.
    generation: AtomicU64,
}

impl Service for CountAggregator {}

impl CountAggregator {
    /// Creates a new count aggregator with empty counts.
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        let (state, _) = watch::channel(CountSnapshot::default());
        Self {
            items,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// The counts from the newest completed recompute.
    pub fn current_counts(&self) -> HashMap<FolderId, u64> {
        self.state.borrow().counts.clone()
    }

    /// Watch the snapshot as it changes.
    pub fn subscribe_counts(&self) -> watch::Receiver<CountSnapshot> {
        self.state.subscribe()
    }

    /// Re-derives every count from the store.
    ///
    /// Concurrent calls are allowed. Each call is stamped with a generation
    /// when it starts, and a result is only published if no later-started
    /// call has already published.
    pub async fn recompute(&self, owner: UserId) -> AppResult<HashMap<FolderId, u64>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let refs = self.items.folder_refs(owner).await?;
        let counts = tally(refs);

        let published = self.state.send_if_modified(|snapshot| {
            if generation <= snapshot.generation {
                return false;
            }
            snapshot.counts = counts.clone();
            snapshot.generation = generation;
            true
        });

        debug!(
            user_id = %owner,
            generation,
            published,
            folders = counts.len(),
            "Folder counts recomputed"
        );
        Ok(counts)
    }

    /// Keeps counts live for `owner`.
    ///
    /// The returned task recomputes once on start and again after each item
    /// change. Events already queued when a recompute begins are folded
    /// into it. Dropping the subscription stops the task.
    pub fn watch(self: &Arc<Self>, feed: &dyn ChangeFeed, owner: UserId) -> Subscription {
        let mut events = feed.subscribe();
        let this = Arc::clone(self);

        Subscription::spawn("folder-counts", async move {
            this.refresh(owner).await;
            loop {
                match events.recv().await {
                    Ok(event) if !affects_counts(&event, owner) => continue,
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(user_id = %owner, skipped, "Count watcher lagged");
                    }
                    Err(RecvError::Closed) => break,
                }

                loop {
                    match events.try_recv() {
                        Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                        Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                    }
                }

                this.refresh(owner).await;
            }
            debug!(user_id = %owner, "Change feed closed, count watcher exiting");
        })
    }

    async fn refresh(&self, owner: UserId) {
        if let Err(e) = self.recompute(owner).await {
            warn!(user_id = %owner, error = %e, "Folder count recompute failed");
        }
    }
}

fn affects_counts(event: &ChangeEvent, owner: UserId) -> bool {
    event.table == Table::Items && event.concerns(&owner)
}

fn tally(refs: impl IntoIterator<Item = Option<FolderId>>) -> HashMap<FolderId, u64> {
    let mut counts = HashMap::new();
    for folder_id in refs.into_iter().flatten() {
        *counts.entry(folder_id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_skips_unfiled() {
        let a = FolderId::new();
        let b = FolderId::new();
        let counts = tally([Some(a), None, Some(a), Some(b), None]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&a], 2);
        assert_eq!(counts[&b], 1);
    }

    #[test]
    fn test_only_own_item_events_count() {
        use shelf_core::events::ChangeKind;

        let owner = UserId::new();
        let mine = ChangeEvent::new(Table::Items, ChangeKind::Insert, None, Some(owner));
        let theirs = ChangeEvent::new(Table::Items, ChangeKind::Insert, None, Some(UserId::new()));
        let folder = ChangeEvent::new(Table::Folders, ChangeKind::Delete, None, Some(owner));
        let resync = ChangeEvent::new(Table::Items, ChangeKind::Update, None, None);

        assert!(affects_counts(&mine, owner));
        assert!(!affects_counts(&theirs, owner));
        assert!(!affects_counts(&folder, owner));
        assert!(affects_counts(&resync, owner));
    }
}
