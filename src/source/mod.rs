//! Blob sources (GitHub API, local folders).
//!
//! A source produces the flat blob list the tree is built from and serves
//! raw file contents for individual paths. The GitHub variant talks to the
//! REST API; the local variant walks a directory into an in-memory map.

use async_trait::async_trait;
use thiserror::Error;

use crate::tree::Blob;

pub mod github;
pub mod local;

pub use github::GithubSource;
pub use local::LocalSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid GitHub repository URL: {0}")]
    InvalidUrl(String),

    /// The blob listing request failed. Fatal to the operation: no partial
    /// tree is ever installed from a failed listing.
    #[error("failed to list repository files: {0}")]
    Listing(String),

    /// A single content fetch failed. Isolated per path.
    #[error("failed to fetch '{path}': {reason}")]
    Fetch { path: String, reason: String },

    /// A path was not present in the local file map.
    #[error("no local file loaded for path '{0}'")]
    NotFound(String),
}

/// A repository content source.
///
/// `list_blobs` failures abort the whole listing; `fetch_content` failures
/// are isolated to their path by the fetch pipeline.
#[async_trait]
pub trait Source: Send + Sync {
    async fn list_blobs(&self) -> Result<Vec<Blob>, SourceError>;

    async fn fetch_content(&self, path: &str) -> Result<String, SourceError>;
}

/// Owner and repository name extracted from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub owner: String,
    pub repo: String,
}

impl RepoLocator {
    /// Parse `https://github.com/<owner>/<repo>`, tolerating extra path
    /// segments and a trailing `.git` suffix.
    pub fn parse(url: &str) -> Result<Self, SourceError> {
        let rest = url
            .split_once("github.com/")
            .map(|(_, rest)| rest)
            .ok_or_else(|| SourceError::InvalidUrl(url.to_string()))?;

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let owner = segments.next().ok_or_else(|| SourceError::InvalidUrl(url.to_string()))?;
        let repo = segments.next().ok_or_else(|| SourceError::InvalidUrl(url.to_string()))?;
        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            return Err(SourceError::InvalidUrl(url.to_string()));
        }

        Ok(Self { owner: owner.to_string(), repo: repo.to_string() })
    }
}
