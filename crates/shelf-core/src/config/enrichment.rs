//! External enrichment collaborator configuration.

use serde::{Deserialize, Serialize};

/// Settings for the page-info fetcher and keyword suggester.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnrichmentConfig {
    /// URL metadata fetcher.
    #[serde(default)]
    pub page_info: PageInfoConfig,
    /// AI keyword suggester.
    #[serde(default)]
    pub keyword: KeywordConfig,
}

/// Microlink-compatible page metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfoConfig {
    /// Whether bookmark enrichment is attempted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// API endpoint.
    #[serde(default = "default_page_info_endpoint")]
    pub endpoint: String,
    /// Optional API key sent as `x-api-key`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_page_info_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PageInfoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_page_info_endpoint(),
            api_key: None,
            timeout_seconds: default_page_info_timeout(),
        }
    }
}

/// Messages-API keyword suggester.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Whether keyword suggestion is attempted. Requires `api_key`.
    #[serde(default)]
    pub enabled: bool,
    /// API endpoint.
    #[serde(default = "default_keyword_endpoint")]
    pub endpoint: String,
    /// API key sent as `x-api-key`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default = "default_keyword_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_keyword_timeout")]
    pub timeout_seconds: u64,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_keyword_endpoint(),
            api_key: None,
            model: default_keyword_model(),
            timeout_seconds: default_keyword_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_page_info_endpoint() -> String {
    "https://api.microlink.io".to_string()
}

fn default_page_info_timeout() -> u64 {
    15
}

fn default_keyword_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_keyword_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_keyword_timeout() -> u64 {
    10
}
