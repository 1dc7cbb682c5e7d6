//! GitHub REST API source.
//!
//! Listing goes through the git-trees endpoint (`HEAD`, recursive); raw
//! content comes from `raw.githubusercontent.com`. The bearer token, when
//! present, is only ever attached as the `Authorization` header of these
//! two requests.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::source::{RepoLocator, Source, SourceError};
use crate::tree::Blob;

const API_HOST: &str = "https://api.github.com";
const RAW_HOST: &str = "https://raw.githubusercontent.com";

pub struct GithubSource {
    locator: RepoLocator,
    token: Option<String>,
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    size: u64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

impl GithubSource {
    pub fn new(locator: RepoLocator, token: Option<String>) -> Self {
        Self {
            locator,
            token,
            client: reqwest::Client::new(),
            api_base: API_HOST.to_string(),
            raw_base: RAW_HOST.to_string(),
        }
    }

    /// Point the source at alternative hosts (GitHub Enterprise, test servers).
    pub fn with_hosts(mut self, api_base: impl Into<String>, raw_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.raw_base = raw_base.into();
        self
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("token {token}")),
            None => request,
        }
    }
}

#[async_trait]
impl Source for GithubSource {
    async fn list_blobs(&self) -> Result<Vec<Blob>, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/HEAD?recursive=1",
            self.api_base, self.locator.owner, self.locator.repo
        );
        debug!(%url, "listing repository tree");

        let request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "repo-prompt");
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| SourceError::Listing(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The API reports the reason in a JSON `message` field.
            let message = response
                .json::<ApiError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(SourceError::Listing(message));
        }

        let listing: TreeResponse =
            response.json().await.map_err(|e| SourceError::Listing(e.to_string()))?;

        // Directories are inferred from blob paths; "tree" entries are dropped.
        Ok(listing
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| Blob::new(entry.path, entry.size))
            .collect())
    }

    async fn fetch_content(&self, path: &str) -> Result<String, SourceError> {
        let url = format!(
            "{}/{}/{}/HEAD/{}",
            self.raw_base, self.locator.owner, self.locator.repo, path
        );
        debug!(%url, "fetching raw content");

        let request = self.client.get(&url).header("User-Agent", "repo-prompt");
        let response = self.authorize(request).send().await.map_err(|e| SourceError::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Fetch {
                path: path.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        // The body is returned verbatim; no decoding beyond the transport's.
        response.text().await.map_err(|e| SourceError::Fetch {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}
