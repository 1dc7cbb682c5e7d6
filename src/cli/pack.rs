//! Pack command implementation

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use regex::RegexBuilder;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

use super::utils::{build_source, filter_blobs, parse_csv, SourceArgs};
use crate::assemble::assemble;
use crate::config::load_config;
use crate::fetch::{fetch_many, FetchOptions, DEFAULT_MAX_CONCURRENCY};
use crate::select::Selection;
use crate::token_store;
use crate::tree::{build_tree, Node};

#[derive(Args)]
pub struct PackArgs {
    /// Local directory path to pack
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// GitHub repository URL to pack
    #[arg(short = 'r', long, value_name = "URL")]
    pub repo: Option<String>,

    /// GitHub token (overrides the stored one)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Path to config file (repo-prompt.toml or .repo-prompt.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include only these extensions (comma-separated, e.g., 'rs,toml')
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Exclude paths containing these substrings (comma-separated)
    #[arg(short = 'e', long, value_name = "PATTERNS")]
    pub exclude: Option<String>,

    /// Select only files whose name or path matches this regex (repeatable)
    #[arg(long, value_name = "REGEX", num_args = 1..)]
    pub select_pattern: Vec<String>,

    /// Pick files interactively instead of selecting everything
    #[arg(long)]
    pub interactive: bool,

    /// Maximum simultaneous content fetches
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Skip local files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Ignore .gitignore rules when walking a local folder
    #[arg(long)]
    pub no_gitignore: bool,

    /// Write the prompt to this file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: PackArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed starting async runtime")?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: PackArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, args.config.as_deref())?;

    let token = args.token.clone().or_else(token_store::load_token);
    // The config's default repo only kicks in when no source flag is given.
    let repo = if args.path.is_none() {
        args.repo.clone().or_else(|| config.repo.clone())
    } else {
        args.repo.clone()
    };
    let source_args = SourceArgs {
        path: args.path.clone(),
        repo,
        token,
        respect_gitignore: !args.no_gitignore,
        max_file_bytes: args.max_file_bytes,
    };
    let source = build_source(&source_args)?;

    let blobs = source.list_blobs().await?;
    let include_ext = parse_csv(&args.include_ext).or_else(|| config.include_ext.clone());
    let exclude = parse_csv(&args.exclude).or_else(|| config.exclude.clone());
    let blobs = filter_blobs(blobs, include_ext.as_deref(), exclude.as_deref());
    if blobs.is_empty() {
        anyhow::bail!("No files to pack after filtering");
    }

    let root = build_tree(&blobs)?;

    let mut selection = Selection::new();
    select_files(&args, &root, &mut selection)?;
    if selection.selected_count() == 0 {
        anyhow::bail!("Nothing selected");
    }

    let options = FetchOptions {
        max_concurrency: args
            .max_concurrency
            .or(config.max_concurrency)
            .unwrap_or(DEFAULT_MAX_CONCURRENCY),
        show_progress: std::io::stderr().is_terminal(),
    };
    let denylist = config.denylist_set();
    // Denylisted files never reach the output; skip fetching them.
    let pending: Vec<String> = selection
        .uncached_paths()
        .into_iter()
        .filter(|p| !crate::utils::extension_of(p).is_some_and(|ext| denylist.contains(&ext)))
        .collect();
    let outcome = fetch_many(&pending, source.as_ref(), selection.cache_mut(), &options).await;
    if !outcome.failed.is_empty() {
        eprintln!(
            "Warning: {} of {} files could not be fetched and were left out:",
            outcome.failed.len(),
            pending.len()
        );
        for path in &outcome.failed {
            eprintln!("  {path}");
        }
    }

    let prompt = assemble(&root, &selection, &denylist);

    match &args.output {
        Some(path) => {
            fs::write(path, &prompt)
                .with_context(|| format!("Failed writing output file: {}", path.display()))?;
            eprintln!(
                "Wrote {} files ({} bytes) to {}",
                outcome.fetched + outcome.skipped,
                prompt.len(),
                path.display()
            );
        }
        None => print!("{prompt}"),
    }

    Ok(())
}

/// Apply the selection flags: `--select-pattern` wins, then
/// `--interactive`, falling back to selecting every file.
fn select_files(args: &PackArgs, root: &Node, selection: &mut Selection) -> Result<()> {
    if !args.select_pattern.is_empty() {
        for pattern in &args.select_pattern {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid selection pattern: {pattern}"))?;
            for path in root.file_paths() {
                let name = path.rsplit('/').next().unwrap_or(&path);
                if regex.is_match(name) || regex.is_match(&path) {
                    selection.select_path(path);
                }
            }
        }
        return Ok(());
    }

    if args.interactive {
        let paths = root.file_paths();
        let defaults = vec![true; paths.len()];
        let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select files to include")
            .items(&paths)
            .defaults(&defaults)
            .interact()?;
        for idx in chosen {
            if let Some(path) = paths.get(idx) {
                selection.select_path(path.clone());
            }
        }
        return Ok(());
    }

    selection.toggle(root, true);
    Ok(())
}
