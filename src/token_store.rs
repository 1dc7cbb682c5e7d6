//! GitHub token persistence.
//!
//! The token lives in a single file under the user's config directory and
//! is only ever read back to become the `Authorization` header of outbound
//! GitHub requests. Nothing else touches it.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

const TOKEN_FILE: &str = "github-token";

fn token_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "repo-prompt")
        .context("Could not determine a config directory for this platform")?;
    Ok(dirs.config_dir().join(TOKEN_FILE))
}

/// Read the stored token, if any. Unreadable or empty files count as absent.
pub fn load_token() -> Option<String> {
    let path = token_path().ok()?;
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub fn store_token(token: &str) -> Result<()> {
    let path = token_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating config directory: {}", parent.display()))?;
    }
    fs::write(&path, token.trim())
        .with_context(|| format!("Failed writing token file: {}", path.display()))
}

pub fn clear_token() -> Result<()> {
    let path = token_path()?;
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("Failed removing token file: {}", path.display()))?;
    }
    Ok(())
}

/// Where the token is (or would be) stored.
pub fn token_location() -> Result<PathBuf> {
    token_path()
}
