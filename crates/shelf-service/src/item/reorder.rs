//! Result of a drag-and-drop reorder.

use shelf_core::error::AppError;
use shelf_core::types::{ItemId, Outcome};
use shelf_entity::item::Item;

/// Per-item outcome of a reorder.
///
/// `items` is the optimistic list with `sort_order` set to each item's
/// position, whether or not its write landed.
#[derive(Debug, Clone)]
pub struct ReorderReport {
    /// Items in their new order.
    pub items: Vec<Item>,
    /// Items whose `sort_order` write failed, with the cause.
    pub failures: Vec<(ItemId, AppError)>,
}

impl ReorderReport {
    /// Whether every write succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Ids whose write failed, in list order.
    pub fn failed_ids(&self) -> Vec<ItemId> {
        self.failures.iter().map(|(id, _)| *id).collect()
    }

    /// Fold into an [`Outcome`]: partial when any write failed.
    pub fn into_outcome(self) -> Outcome<Vec<Item>> {
        if self.failures.is_empty() {
            return Outcome::Complete(self.items);
        }
        let failed: Vec<String> = self.failures.iter().map(|(id, _)| id.to_string()).collect();
        let cause = AppError::store_unavailable(format!(
            "{} of {} writes failed ({})",
            self.failures.len(),
            self.items.len(),
            failed.join(", ")
        ));
        Outcome::partial(self.items, "Reorder", cause)
    }
}
