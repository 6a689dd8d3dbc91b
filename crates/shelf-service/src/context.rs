//! Request context carrying the acting account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelf_core::types::UserId;

/// Context for the current request.
///
/// Passed into every service method so that each operation knows whose
/// folders and items it touches. There is no ambient current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The signed-in account; owner of everything the request touches.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }

    /// The owner id every store call is scoped to.
    pub fn owner(&self) -> UserId {
        self.user_id
    }
}
