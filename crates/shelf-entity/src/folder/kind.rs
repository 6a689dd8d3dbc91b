//! Folder kind tag.

use serde::{Deserialize, Serialize};

/// Which list view a folder's contents render in.
///
/// The kind is not a column of the folder table; it is kept in the owner's
/// account metadata and joined in when folders are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    /// Holds prompts (markdown text items).
    #[default]
    Prompt,
    /// Holds website bookmarks (items whose content is a URL).
    Website,
}

impl FolderKind {
    /// Lowercase name used in serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Website => "website",
        }
    }
}

impl std::fmt::Display for FolderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FolderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "website" => Ok(Self::Website),
            other => Err(format!("unknown folder kind '{other}'")),
        }
    }
}
