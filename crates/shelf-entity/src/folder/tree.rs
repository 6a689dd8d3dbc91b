//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Folder;

/// A node in a folder forest. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder at this node.
    pub folder: Folder,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Create a leaf node.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            folder,
            children: Vec::new(),
        }
    }

    /// Number of folders in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(FolderNode::len).sum::<usize>()
    }

    /// Always false; a node contains at least itself.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first walk yielding `(depth, folder)` pairs, parent before children.
    pub fn walk(&self) -> Vec<(usize, &Folder)> {
        let mut out = Vec::new();
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Folder)>) {
        out.push((depth, &self.folder));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}
