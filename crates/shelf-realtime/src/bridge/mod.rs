//! Change-feed implementations.

pub mod memory_feed;
pub mod pg_listener;
