//! PostgreSQL implementations of the store traits.

pub mod folder;
pub mod identity;
pub mod item;

pub use folder::PgFolderStore;
pub use identity::PgIdentityStore;
pub use item::PgItemStore;

use shelf_core::error::{AppError, ErrorKind};

/// Map a driver error into the store-unavailable kind.
pub(crate) fn store_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::StoreUnavailable, message, e)
}
