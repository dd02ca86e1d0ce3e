//! Lazily materialized project tree

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use std::fmt;

use super::path;

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Dir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

/// One entry of a directory listing, in the order the backend returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeError {
    NotFound(String),
    ParentNotDirectory,
    ParentNotLoaded,
    NameExists,
    RootImmutable,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::NotFound(p) => write!(f, "no node at '{p}'"),
            FileTreeError::ParentNotDirectory => write!(f, "parent is not a directory"),
            FileTreeError::ParentNotLoaded => write!(f, "parent listing is not loaded"),
            FileTreeError::NameExists => write!(f, "name already exists in parent"),
            FileTreeError::RootImmutable => write!(f, "the project root cannot be changed"),
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    name: String,
    path: String,
    parent: Option<NodeId>,
    /// `None` until the first listing arrives; files never get children.
    children: Option<Vec<NodeId>>,
    loading: bool,
}

impl Node {
    fn new(kind: NodeKind, name: String, path: String, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            name,
            path,
            parent,
            children: None,
            loading: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }

    pub fn load_state(&self) -> LoadState {
        match (self.kind, self.loading, self.children.is_some()) {
            (NodeKind::File, _, _) => LoadState::Loaded,
            (NodeKind::Dir, true, _) => LoadState::Loading,
            (NodeKind::Dir, false, true) => LoadState::Loaded,
            (NodeKind::Dir, false, false) => LoadState::NotLoaded,
        }
    }
}

/// Entries the backend reports but the explorer never shows.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    id_by_path: FxHashMap<String, NodeId>,
    /// Expanded directories by canonical path. The root is always shown.
    expanded: FxHashSet<String>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node::new(
            NodeKind::Dir,
            String::new(),
            path::ROOT.to_string(),
            None,
        ));
        let mut id_by_path = FxHashMap::default();
        id_by_path.insert(path::ROOT.to_string(), root);

        Self {
            arena,
            root,
            id_by_path,
            expanded: FxHashSet::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.id_by_path.get(path).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn node_at(&self, path: &str) -> Option<&Node> {
        self.find(path).and_then(|id| self.arena.get(id))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.id_by_path.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.node_at(path).is_some_and(Node::is_dir)
    }

    pub fn load_state(&self, path: &str) -> Option<LoadState> {
        self.node_at(path).map(Node::load_state)
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        path::is_root(path) || self.expanded.contains(path)
    }

    pub fn expanded_paths(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Child paths in backend order, or `None` while unloaded.
    pub fn children(&self, path: &str) -> Option<Vec<&str>> {
        let node = self.node_at(path)?;
        let children = node.children.as_ref()?;
        Some(
            children
                .iter()
                .filter_map(|id| self.arena.get(*id))
                .map(|n| n.path.as_str())
                .collect(),
        )
    }

    pub fn root_nodes(&self) -> Vec<&Node> {
        self.arena
            .get(self.root)
            .and_then(|n| n.children.as_ref())
            .map(|ids| ids.iter().filter_map(|id| self.arena.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Marks a directory as expanded. Only loaded directories may be expanded.
    pub fn expand(&mut self, path: &str) -> Result<(), FileTreeError> {
        let node = self
            .node_at(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        if !node.is_dir() {
            return Err(FileTreeError::ParentNotDirectory);
        }
        if node.children.is_none() {
            return Err(FileTreeError::ParentNotLoaded);
        }
        if !path::is_root(path) {
            self.expanded.insert(path.to_string());
        }
        Ok(())
    }

    /// Removes the path from the expanded set. Cached children stay.
    pub fn collapse(&mut self, path: &str) -> bool {
        self.expanded.remove(path)
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Drops a path that no longer resolves to a directory.
    pub fn forget_expanded(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    /// Starts a listing for `path`. Returns `Ok(true)` when a request must be
    /// issued; `Ok(false)` when one is already outstanding.
    pub fn begin_load(&mut self, path: &str, force: bool) -> Result<bool, FileTreeError> {
        let id = self
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        let node = self
            .arena
            .get_mut(id)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        if !node.is_dir() {
            return Err(FileTreeError::ParentNotDirectory);
        }
        if node.loading {
            return Ok(false);
        }
        if node.children.is_some() && !force {
            return Ok(false);
        }
        node.loading = true;
        Ok(true)
    }

    /// Installs a listing. Children that survive (same name and kind) keep
    /// their node and cached subtree; the rest are detached.
    pub fn finish_load(&mut self, path: &str, entries: &[DirEntry]) -> Result<(), FileTreeError> {
        let id = self
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        let previous = self
            .arena
            .get(id)
            .and_then(|n| n.children.clone())
            .unwrap_or_default();

        let mut survivors: FxHashMap<(String, NodeKind), NodeId> = FxHashMap::default();
        for child in previous {
            if let Some(node) = self.arena.get(child) {
                survivors.insert((node.name.clone(), node.kind), child);
            }
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            if is_hidden(&entry.name) || entry.name.contains(path::SEPARATOR) {
                continue;
            }
            if !seen.insert(entry.name.as_str()) {
                continue;
            }
            let kind = if entry.is_dir {
                NodeKind::Dir
            } else {
                NodeKind::File
            };
            let child = match survivors.remove(&(entry.name.clone(), kind)) {
                Some(existing) => existing,
                None => {
                    let child_path = path::join(path, &entry.name);
                    let child =
                        self.arena
                            .insert(Node::new(kind, entry.name.clone(), child_path.clone(), Some(id)));
                    self.id_by_path.insert(child_path, child);
                    child
                }
            };
            children.push(child);
        }

        for (_, stale) in survivors {
            self.remove_subtree(stale);
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.children = Some(children);
            node.loading = false;
        }
        Ok(())
    }

    /// Clears the in-flight marker, leaving the previous listing (if any) intact.
    pub fn fail_load(&mut self, path: &str) {
        if let Some(id) = self.find(path) {
            if let Some(node) = self.arena.get_mut(id) {
                node.loading = false;
            }
        }
    }

    /// Appends a node to a loaded directory.
    pub fn insert_child(
        &mut self,
        parent: &str,
        name: &str,
        kind: NodeKind,
    ) -> Result<String, FileTreeError> {
        let parent_id = self
            .find(parent)
            .ok_or_else(|| FileTreeError::NotFound(parent.to_string()))?;
        let child_path = path::join(parent, name);
        {
            let parent_node = self
                .arena
                .get(parent_id)
                .ok_or_else(|| FileTreeError::NotFound(parent.to_string()))?;
            if !parent_node.is_dir() {
                return Err(FileTreeError::ParentNotDirectory);
            }
            if parent_node.children.is_none() {
                return Err(FileTreeError::ParentNotLoaded);
            }
            if self.id_by_path.contains_key(&child_path) {
                return Err(FileTreeError::NameExists);
            }
        }

        let id = self.arena.insert(Node::new(
            kind,
            path::file_name(&child_path).to_string(),
            child_path.clone(),
            Some(parent_id),
        ));
        self.id_by_path.insert(child_path.clone(), id);
        if let Some(children) = self
            .arena
            .get_mut(parent_id)
            .and_then(|n| n.children.as_mut())
        {
            children.push(id);
        }
        Ok(child_path)
    }

    /// Renames a node in place, re-keying its whole subtree and any expanded
    /// paths beneath it. Returns the new canonical path.
    ///
    /// `new_name` must be a single segment.
    pub fn rename(&mut self, from: &str, new_name: &str) -> Result<String, FileTreeError> {
        if path::is_root(from) {
            return Err(FileTreeError::RootImmutable);
        }
        let id = self
            .find(from)
            .ok_or_else(|| FileTreeError::NotFound(from.to_string()))?;
        let parent = path::parent(from).unwrap_or(path::ROOT);
        let to = path::join(parent, new_name);
        if to == from {
            return Ok(to);
        }
        if self.id_by_path.contains_key(&to) {
            return Err(FileTreeError::NameExists);
        }

        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.arena.get_mut(node_id) else {
                continue;
            };
            let Some(rebased) = path::rebase(&node.path, from, &to) else {
                continue;
            };
            let old = std::mem::replace(&mut node.path, rebased.clone());
            // A listing in flight reports under the old path and is dropped.
            node.loading = false;
            if let Some(children) = &node.children {
                stack.extend(children.iter().copied());
            }
            self.id_by_path.remove(&old);
            self.id_by_path.insert(rebased, node_id);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.name = path::file_name(&to).to_string();
        }

        let moved: Vec<String> = self
            .expanded
            .iter()
            .filter(|p| path::is_within(p, from))
            .cloned()
            .collect();
        for old in moved {
            self.expanded.remove(&old);
            if let Some(rebased) = path::rebase(&old, from, &to) {
                self.expanded.insert(rebased);
            }
        }
        Ok(to)
    }

    /// Detaches a node and its subtree from the tree.
    pub fn remove(&mut self, path: &str) -> Result<(), FileTreeError> {
        if path::is_root(path) {
            return Err(FileTreeError::RootImmutable);
        }
        let id = self
            .find(path)
            .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        let parent = self.arena.get(id).and_then(|n| n.parent);
        if let Some(children) = parent
            .and_then(|p| self.arena.get_mut(p))
            .and_then(|n| n.children.as_mut())
        {
            children.retain(|c| *c != id);
        }
        self.remove_subtree(id);
        Ok(())
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.arena.remove(node_id) {
                if let Some(children) = node.children {
                    stack.extend(children);
                }
                self.expanded.remove(&node.path);
                self.id_by_path.remove(&node.path);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    pub path: String,
    pub depth: u16,
    pub name: String,
    pub is_dir: bool,
    pub is_expanded: bool,
    pub load_state: LoadState,
}

impl FileTree {
    /// Visible rows, depth-first in backend order.
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let is_root = id == self.root;
            let expanded = is_root || self.expanded.contains(&node.path);
            if !is_root {
                result.push(FileTreeRow {
                    path: node.path.clone(),
                    depth,
                    name: node.name.clone(),
                    is_dir: node.is_dir(),
                    is_expanded: expanded,
                    load_state: node.load_state(),
                });
            }

            if expanded {
                if let Some(children) = &node.children {
                    let child_depth = if is_root { 0 } else { depth + 1 };
                    for child in children.iter().rev() {
                        stack.push((*child, child_depth));
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
