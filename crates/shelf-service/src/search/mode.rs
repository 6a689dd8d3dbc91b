//! Search query modes.

use serde::{Deserialize, Serialize};

/// What a search query asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "term", rename_all = "snake_case")]
pub enum SearchMode {
    /// No active search; the folder scope applies.
    #[default]
    Idle,
    /// `#term`: substring match against tags.
    Tag(String),
    /// Anything else: title/content substring plus exact tag.
    Text(String),
}

impl SearchMode {
    /// Parses a raw query. Surrounding whitespace is ignored; a lone `#`
    /// is idle.
    pub fn parse(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Self::Idle;
        }
        match trimmed.strip_prefix('#') {
            Some(rest) if rest.trim().is_empty() => Self::Idle,
            Some(rest) => Self::Tag(rest.trim().to_string()),
            None => Self::Text(trimmed.to_string()),
        }
    }

    /// Whether a search is active.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The term to highlight in results, if any.
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Tag(term) | Self::Text(term) => Some(term),
        }
    }
}
