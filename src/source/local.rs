//! Local folder source.
//!
//! Walks a directory at load time into an in-memory path → bytes map,
//! mirroring how a folder upload hands the host a set of relative paths
//! with their contents. Listing and content lookups never touch the disk
//! again after the initial walk.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ignore::WalkBuilder;
use tracing::debug;

use crate::source::{Source, SourceError};
use crate::tree::Blob;
use crate::utils::{decode_text, normalize_path};

pub struct LocalSource {
    blobs: Vec<Blob>,
    files: HashMap<String, Vec<u8>>,
}

/// Options for the directory walk backing a [`LocalSource`].
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub respect_gitignore: bool,
    pub follow_symlinks: bool,
    /// Files larger than this are left out of the map entirely.
    pub max_file_bytes: u64,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { respect_gitignore: true, follow_symlinks: false, max_file_bytes: 1_048_576 }
    }
}

impl LocalSource {
    /// Walk `root` and load every eligible file into memory.
    ///
    /// Paths are repository-relative with `/` separators. Entries are
    /// sorted by relative path so listings are deterministic across
    /// platforms and walk orders.
    pub fn load(root: &Path, options: &WalkOptions) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed resolving path: {}", root.display()))?;
        if !root.is_dir() {
            anyhow::bail!("Path is not a directory: {}", root.display());
        }

        let walker = WalkBuilder::new(&root)
            .hidden(true)
            .git_ignore(options.respect_gitignore)
            .git_global(options.respect_gitignore)
            .git_exclude(options.respect_gitignore)
            .follow_links(options.follow_symlinks)
            .build();

        let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };
            if metadata.len() > options.max_file_bytes {
                debug!(path = %entry.path().display(), "skipping oversized file");
                continue;
            }

            let relative = match entry.path().strip_prefix(&root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let Some(relative) = relative.to_str() else { continue };
            let relative = normalize_path(relative);

            let bytes = std::fs::read(entry.path())
                .with_context(|| format!("Failed reading file: {}", entry.path().display()))?;
            entries.push((relative, bytes));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let blobs =
            entries.iter().map(|(path, bytes)| Blob::new(path.clone(), bytes.len() as u64)).collect();
        let files = entries.into_iter().collect();

        Ok(Self { blobs, files })
    }

    pub fn file_count(&self) -> usize {
        self.blobs.len()
    }
}

#[async_trait]
impl Source for LocalSource {
    async fn list_blobs(&self) -> Result<Vec<Blob>, SourceError> {
        Ok(self.blobs.clone())
    }

    async fn fetch_content(&self, path: &str) -> Result<String, SourceError> {
        let bytes =
            self.files.get(path).ok_or_else(|| SourceError::NotFound(path.to_string()))?;
        Ok(decode_text(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, LocalSource) {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir(root.join("src")).expect("mkdir src");
        fs::write(root.join("src/main.rs"), "fn main() {}\n").expect("write main");
        fs::write(root.join("README.md"), "# Demo\n").expect("write readme");

        let source = LocalSource::load(root, &WalkOptions::default()).expect("load");
        (tmp, source)
    }

    #[tokio::test]
    async fn load_lists_relative_blobs_sorted() {
        let (_tmp, source) = fixture();
        let blobs = source.list_blobs().await.expect("blobs");
        let paths: Vec<&str> = blobs.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "src/main.rs"]);
        assert_eq!(blobs[0].size, "# Demo\n".len() as u64);
    }

    #[tokio::test]
    async fn fetch_content_serves_from_memory_map() {
        let (tmp, source) = fixture();
        // Deleting the backing file proves lookups come from the map.
        fs::remove_file(tmp.path().join("src/main.rs")).expect("rm");
        let content = source.fetch_content("src/main.rs").await.expect("content");
        assert_eq!(content, "fn main() {}\n");
    }

    #[tokio::test]
    async fn fetch_content_misses_with_not_found() {
        let (_tmp, source) = fixture();
        let err = source.fetch_content("missing.txt").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn load_respects_gitignore() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::write(root.join(".gitignore"), "ignored.txt\n").expect("write gitignore");
        fs::write(root.join("ignored.txt"), "secret").expect("write ignored");
        fs::write(root.join("kept.txt"), "kept").expect("write kept");

        let source = LocalSource::load(root, &WalkOptions::default()).expect("load");
        let blobs = source.list_blobs().await.expect("blobs");
        let paths: Vec<&str> = blobs.iter().map(|b| b.path.as_str()).collect();
        assert!(paths.contains(&"kept.txt"));
        assert!(!paths.contains(&"ignored.txt"));
    }

    #[test]
    fn load_skips_oversized_files() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::write(root.join("big.txt"), vec![b'x'; 64]).expect("write big");
        fs::write(root.join("small.txt"), "ok").expect("write small");

        let options = WalkOptions { max_file_bytes: 16, ..WalkOptions::default() };
        let source = LocalSource::load(root, &options).expect("load");
        assert_eq!(source.file_count(), 1);
    }
}
