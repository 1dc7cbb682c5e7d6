//! Configuration loading.
//!
//! An optional `repo-prompt.toml` (or `.repo-prompt.yml`) in the working
//! directory supplies defaults the CLI flags override.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::assemble::DEFAULT_DENYLIST;

const CONFIG_CANDIDATES: &[&str] = &["repo-prompt.toml", ".repo-prompt.yml", ".repo-prompt.yaml"];

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default repository URL when neither --repo nor --path is given.
    pub repo: Option<String>,

    /// Cap on simultaneous in-flight content fetches.
    pub max_concurrency: Option<usize>,

    /// Replaces the built-in extension denylist when set.
    pub denylist: Option<Vec<String>>,

    /// Path substrings excluded before the tree is built.
    pub exclude: Option<Vec<String>>,

    /// Extensions to keep (without dots); everything else is dropped.
    pub include_ext: Option<Vec<String>>,
}

impl Config {
    /// The effective extension denylist, lowercased.
    pub fn denylist_set(&self) -> HashSet<String> {
        match &self.denylist {
            Some(entries) => entries.iter().map(|e| e.to_ascii_lowercase()).collect(),
            None => DEFAULT_DENYLIST.clone(),
        }
    }
}

/// Load a config file.
///
/// With an explicit `config_path`, parse errors are fatal. Auto-discovered
/// files that fail to parse are logged and ignored, falling back to the
/// defaults.
pub fn load_config(search_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();
    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let parsed = match ext.as_str() {
        "toml" => toml::from_str::<Config>(&content)
            .with_context(|| format!("Invalid TOML config: {}", config_file.display())),
        "yml" | "yaml" => serde_yaml::from_str::<Config>(&content)
            .with_context(|| format!("Invalid YAML config: {}", config_file.display())),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(config) => Ok(config),
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!("Ignoring auto-discovered config {}: {}", config_file.display(), e);
            Ok(Config::default())
        }
    }
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|name| search_dir.join(name)).find(|p| p.is_file())
}
