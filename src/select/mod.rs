//! Selection state and content cache.
//!
//! Selection is a set of file paths in the order they were selected;
//! directories are never stored, only expanded to their descendant files
//! at toggle time. The cache holds fetched contents keyed by path and
//! lives until a new source is loaded.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::tree::Node;

#[derive(Debug, Default)]
pub struct Selection {
    selected: IndexSet<String>,
    cache: HashMap<String, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect a node.
    ///
    /// Files toggle their own path; directories toggle every descendant
    /// file path, expanded at this moment — later tree changes do not
    /// re-evaluate past toggles.
    pub fn toggle(&mut self, node: &Node, select: bool) {
        match node {
            Node::File { path, .. } => {
                if select {
                    self.selected.insert(path.clone());
                } else {
                    self.selected.shift_remove(path);
                }
            }
            Node::Dir { .. } => {
                for path in node.file_paths() {
                    if select {
                        self.selected.insert(path);
                    } else {
                        self.selected.shift_remove(&path);
                    }
                }
            }
        }
    }

    pub fn select_path(&mut self, path: impl Into<String>) {
        self.selected.insert(path.into());
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    /// Selected file paths in selection order.
    pub fn selected_paths(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// True iff every descendant file of `dir` is selected. Computed on
    /// demand since both the tree and the selection can change.
    pub fn is_dir_fully_selected(&self, dir: &Node) -> bool {
        let paths = dir.file_paths();
        !paths.is_empty() && paths.iter().all(|p| self.selected.contains(p))
    }

    /// Selected paths that have no cached content yet.
    pub fn uncached_paths(&self) -> Vec<String> {
        self.selected.iter().filter(|p| !self.cache.contains_key(*p)).cloned().collect()
    }

    pub fn cached(&self, path: &str) -> Option<&str> {
        self.cache.get(path).map(String::as_str)
    }

    pub fn cache_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.cache
    }

    /// Drop all selection and cached content. Called when a new
    /// repository or folder replaces the tree.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.cache.clear();
    }
}
