//! Share-token lifecycle and public share lookup.

pub mod link;
pub mod service;

pub use link::{generate_token, share_url};
pub use service::ShareService;
