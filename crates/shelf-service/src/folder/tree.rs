//! Folder tree building and path resolution.
//!
//! Pure functions over the flat folder list. Parent references are plain
//! ids, so nothing here trusts the list to be acyclic: every walk carries
//! a visited set.

use std::collections::{HashMap, HashSet, VecDeque};

use shelf_core::types::FolderId;
use shelf_entity::folder::{Folder, FolderNode};
use shelf_entity::item::Scope;

fn by_name_then_id(a: &&Folder, b: &&Folder) -> std::cmp::Ordering {
    a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0))
}

/// Sorted children lists keyed by parent id.
fn children_index(folders: &[Folder]) -> HashMap<FolderId, Vec<&Folder>> {
    let mut children: HashMap<FolderId, Vec<&Folder>> = HashMap::new();
    for folder in folders {
        if let Some(parent_id) = folder.parent_id {
            children.entry(parent_id).or_default().push(folder);
        }
    }
    for list in children.values_mut() {
        list.sort_by(by_name_then_id);
    }
    children
}

/// Builds a forest from a flat list of folders.
///
/// A folder whose parent is null or not in the list is a root. Folders
/// caught in a parent cycle are promoted to roots so every folder shows up
/// exactly once. Roots and children are ordered by name, then id.
pub fn build_forest(folders: &[Folder]) -> Vec<FolderNode> {
    let ids: HashSet<FolderId> = folders.iter().map(|f| f.id).collect();
    let children = children_index(folders);
    let mut visited: HashSet<FolderId> = HashSet::with_capacity(folders.len());

    let mut roots: Vec<&Folder> = folders
        .iter()
        .filter(|f| f.parent_id.is_none_or(|p| !ids.contains(&p)))
        .collect();
    roots.sort_by(by_name_then_id);

    let mut forest: Vec<FolderNode> = Vec::with_capacity(roots.len());
    for root in roots {
        if let Some(node) = build_node(root, &children, &mut visited) {
            forest.push(node);
        }
    }

    if visited.len() < ids.len() {
        let mut stranded: Vec<&Folder> = folders
            .iter()
            .filter(|f| !visited.contains(&f.id))
            .collect();
        stranded.sort_by(by_name_then_id);
        for folder in stranded {
            if let Some(node) = build_node(folder, &children, &mut visited) {
                forest.push(node);
            }
        }
        forest.sort_by(|a, b| by_name_then_id(&&a.folder, &&b.folder));
    }

    forest
}

fn build_node(
    folder: &Folder,
    children: &HashMap<FolderId, Vec<&Folder>>,
    visited: &mut HashSet<FolderId>,
) -> Option<FolderNode> {
    if !visited.insert(folder.id) {
        return None;
    }
    let mut node = FolderNode::leaf(folder.clone());
    if let Some(kids) = children.get(&folder.id) {
        for child in kids {
            if let Some(child_node) = build_node(child, children, visited) {
                node.children.push(child_node);
            }
        }
    }
    Some(node)
}

/// Every folder below `id`, breadth first. Excludes `id` itself; empty for
/// a leaf or an unknown id.
pub fn descendant_ids(id: FolderId, folders: &[Folder]) -> Vec<FolderId> {
    let children = children_index(folders);
    let mut visited: HashSet<FolderId> = HashSet::from([id]);
    let mut queue: VecDeque<FolderId> = VecDeque::from([id]);
    let mut out = Vec::new();

    while let Some(current) = queue.pop_front() {
        for child in children.get(&current).into_iter().flatten() {
            if visited.insert(child.id) {
                out.push(child.id);
                queue.push_back(child.id);
            }
        }
    }
    out
}

/// Folder names from the root down to `id`.
///
/// Empty for `None` or an unknown id. The walk stops quietly at a dangling
/// parent or a folder it has already seen.
pub fn ancestor_chain(id: Option<FolderId>, folders: &[Folder]) -> Vec<String> {
    let by_id: HashMap<FolderId, &Folder> = folders.iter().map(|f| (f.id, f)).collect();
    let mut seen: HashSet<FolderId> = HashSet::new();
    let mut chain = Vec::new();
    let mut cursor = id;

    while let Some(current) = cursor {
        let Some(folder) = by_id.get(&current) else {
            break;
        };
        if !seen.insert(current) {
            break;
        }
        chain.push(folder.name.clone());
        cursor = folder.parent_id;
    }

    chain.reverse();
    chain
}

/// The folder itself plus all of its descendants, as an item scope.
pub fn scope_for(id: FolderId, folders: &[Folder]) -> Scope {
    Scope::folders(std::iter::once(id).chain(descendant_ids(id, folders)))
}

/// Items filed in `id` or anywhere below it.
pub fn total_count(id: FolderId, folders: &[Folder], counts: &HashMap<FolderId, u64>) -> u64 {
    std::iter::once(id)
        .chain(descendant_ids(id, folders))
        .map(|f| counts.get(&f).copied().unwrap_or(0))
        .sum()
}
