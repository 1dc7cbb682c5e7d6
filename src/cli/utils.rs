//! Shared CLI utilities.

use anyhow::Result;
use std::path::PathBuf;

use crate::source::{GithubSource, LocalSource, RepoLocator, Source};
use crate::source::local::WalkOptions;
use crate::tree::Blob;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

/// Source selection shared between `pack` and `info`.
pub struct SourceArgs {
    pub path: Option<PathBuf>,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub respect_gitignore: bool,
    pub max_file_bytes: Option<u64>,
}

/// Build the source the command will read from.
///
/// Exactly one of `path` and `repo` must be set; a local path walks the
/// folder up front, a repo URL becomes a GitHub API client.
pub fn build_source(args: &SourceArgs) -> Result<Box<dyn Source>> {
    match (&args.path, &args.repo) {
        (Some(_), Some(_)) => anyhow::bail!("Cannot specify both --path and --repo"),
        (None, None) => anyhow::bail!("Either --path or --repo must be specified"),
        (Some(path), None) => {
            let mut options = WalkOptions {
                respect_gitignore: args.respect_gitignore,
                ..WalkOptions::default()
            };
            if let Some(max) = args.max_file_bytes {
                options.max_file_bytes = max;
            }
            Ok(Box::new(LocalSource::load(path, &options)?))
        }
        (None, Some(url)) => {
            let locator = RepoLocator::parse(url)?;
            Ok(Box::new(GithubSource::new(locator, args.token.clone())))
        }
    }
}

/// Drop blobs before the tree is built: keep only listed extensions when an
/// include list is given, and drop any path containing an exclude substring
/// (case-insensitive, matching how the filter bar treats patterns).
pub fn filter_blobs(
    blobs: Vec<Blob>,
    include_ext: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Vec<Blob> {
    blobs
        .into_iter()
        .filter(|blob| {
            if let Some(extensions) = include_ext {
                let ext = crate::utils::extension_of(&blob.path).unwrap_or_default();
                if !extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
                {
                    return false;
                }
            }
            if let Some(patterns) = exclude {
                let path = blob.path.to_ascii_lowercase();
                if patterns.iter().any(|p| path.contains(&p.to_ascii_lowercase())) {
                    return false;
                }
            }
            true
        })
        .collect()
}
