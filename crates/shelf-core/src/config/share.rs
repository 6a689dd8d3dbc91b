//! Public share link configuration.

use serde::{Deserialize, Serialize};

/// Settings for rendering public share links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Origin prepended to `/share/{token}`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}
