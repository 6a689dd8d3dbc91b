//! Item domain entities (prompts and website bookmarks).

pub mod model;
pub mod query;
pub mod shared;

pub use model::{CreateItem, Item, ItemPatch};
pub use query::{ItemOrder, ItemQuery, Scope};
pub use shared::SharedItem;
