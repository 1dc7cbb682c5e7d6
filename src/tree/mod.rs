//! Repository file tree construction and rendering.
//!
//! Converts the flat blob list reported by a source into a nested
//! directory/file tree, and renders that tree as a `tree`-command-style
//! ASCII outline for prompt headers.

use serde::Serialize;
use thiserror::Error;

/// A file entry as reported by a source: repository-relative path plus byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub path: String,
    pub size: u64,
}

impl Blob {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self { path: path.into(), size }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A blob path implies a directory where a same-named file already
    /// exists in that parent, or the reverse.
    #[error("path conflict at '{path}': a {existing} with that name already exists")]
    Conflict { path: String, existing: &'static str },

    #[error("duplicate blob path: {0}")]
    Duplicate(String),
}

/// A node in the repository tree.
///
/// Serializes with a `"type": "dir" | "file"` tag, matching the JSON shape
/// the GitHub listing endpoint reports for its entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Dir { name: String, path: String, children: Vec<Node> },
    File { name: String, path: String, size: u64 },
}

impl Node {
    /// The synthetic root every tree hangs off: a directory named "root"
    /// with an empty path.
    pub fn root() -> Self {
        Node::Dir { name: "root".to_string(), path: String::new(), children: Vec::new() }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Dir { name, .. } | Node::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Node::Dir { path, .. } | Node::File { path, .. } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir { .. })
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Dir { children, .. } => children,
            Node::File { .. } => &[],
        }
    }

    /// Collect every descendant file path, depth-first, preserving the
    /// sibling order the tree was built with.
    pub fn file_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_file_paths(&mut out);
        out
    }

    fn collect_file_paths(&self, out: &mut Vec<String>) {
        match self {
            Node::File { path, .. } => out.push(path.clone()),
            Node::Dir { children, .. } => {
                for child in children {
                    child.collect_file_paths(out);
                }
            }
        }
    }
}

/// Build a tree from a flat blob list.
///
/// Sibling order is first-seen order from the input: a directory node is
/// appended the first time a blob path passes through it, a file node when
/// its owning blob is reached. Directories are never taken from the input
/// directly, only inferred from file path prefixes.
///
/// Fails with [`TreeError::Conflict`] when a path implies a directory where
/// a same-named file already exists in that parent (or the reverse), and
/// with [`TreeError::Duplicate`] on a repeated file path.
pub fn build_tree(blobs: &[Blob]) -> Result<Node, TreeError> {
    let mut root = Node::root();
    for blob in blobs {
        insert_blob(&mut root, blob)?;
    }
    Ok(root)
}

fn insert_blob(root: &mut Node, blob: &Blob) -> Result<(), TreeError> {
    let mut segments: Vec<&str> = blob.path.split('/').collect();
    let file_name = match segments.pop() {
        Some(name) if !name.is_empty() => name,
        _ => return Ok(()), // empty path, nothing to insert
    };

    let mut current = root;
    for segment in segments {
        current = descend(current, segment, &blob.path)?;
    }

    let children = match current {
        Node::Dir { children, .. } => children,
        Node::File { .. } => unreachable!("walk only descends into directories"),
    };
    if children.iter().any(|c| c.name() == file_name && c.is_dir()) {
        return Err(TreeError::Conflict { path: blob.path.clone(), existing: "directory" });
    }
    if children.iter().any(|c| c.name() == file_name && !c.is_dir()) {
        return Err(TreeError::Duplicate(blob.path.clone()));
    }
    children.push(Node::File {
        name: file_name.to_string(),
        path: blob.path.clone(),
        size: blob.size,
    });
    Ok(())
}

/// Find or create the child directory `segment` of `node` and return it.
fn descend<'a>(
    node: &'a mut Node,
    segment: &str,
    blob_path: &str,
) -> Result<&'a mut Node, TreeError> {
    let parent_path = node.path().to_string();
    let Node::Dir { children, .. } = node else {
        unreachable!("walk only descends into directories")
    };

    if children.iter().any(|c| c.name() == segment && !c.is_dir()) {
        return Err(TreeError::Conflict { path: blob_path.to_string(), existing: "file" });
    }

    let pos = match children.iter().position(|c| c.name() == segment && c.is_dir()) {
        Some(pos) => pos,
        None => {
            let path = if parent_path.is_empty() {
                segment.to_string()
            } else {
                format!("{parent_path}/{segment}")
            };
            children.push(Node::Dir { name: segment.to_string(), path, children: Vec::new() });
            children.len() - 1
        }
    };
    Ok(&mut children[pos])
}

/// Render a tree as an ASCII outline.
///
/// The output starts with a literal `/` line for the root, uses `├── ` /
/// `└── ` connectors with `│   ` / `    ` continuation prefixes, and
/// suffixes directory names with `/`.
pub fn render_tree(root: &Node) -> String {
    let mut out = String::from("/\n");
    render_children(root.children(), "", &mut out);
    out
}

fn render_children(children: &[Node], prefix: &str, out: &mut String) {
    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        let connector = if is_last { "└── " } else { "├── " };
        match child {
            Node::Dir { name, children, .. } => {
                out.push_str(prefix);
                out.push_str(connector);
                out.push_str(name);
                out.push_str("/\n");
                let continuation = if is_last { "    " } else { "│   " };
                render_children(children, &format!("{prefix}{continuation}"), out);
            }
            Node::File { name, .. } => {
                out.push_str(prefix);
                out.push_str(connector);
                out.push_str(name);
                out.push('\n');
            }
        }
    }
}
