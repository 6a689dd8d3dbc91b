//! Search engine configuration.

use serde::{Deserialize, Serialize};

/// Limits and timing for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce window applied to query changes, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Cap on title/content substring matches in text mode.
    #[serde(default = "default_text_limit")]
    pub text_limit: u32,
    /// Cap on exact tag matches in text mode.
    #[serde(default = "default_tag_limit")]
    pub tag_limit: u32,
    /// Number of most recent items scanned client-side in `#tag` mode.
    #[serde(default = "default_tag_window")]
    pub tag_window: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            text_limit: default_text_limit(),
            tag_limit: default_tag_limit(),
            tag_window: default_tag_window(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_text_limit() -> u32 {
    50
}

fn default_tag_limit() -> u32 {
    20
}

fn default_tag_window() -> u32 {
    50
}
