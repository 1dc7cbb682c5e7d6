//! Info command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::{build_source, filter_blobs, parse_csv, SourceArgs};
use crate::token_store;
use crate::tree::{build_tree, render_tree};

#[derive(Args)]
pub struct InfoArgs {
    /// Local directory path to inspect
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// GitHub repository URL to inspect
    #[arg(short = 'r', long, value_name = "URL")]
    pub repo: Option<String>,

    /// GitHub token (overrides the stored one)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Include only these extensions (comma-separated)
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Exclude paths containing these substrings (comma-separated)
    #[arg(short = 'e', long, value_name = "PATTERNS")]
    pub exclude: Option<String>,

    /// Ignore .gitignore rules when walking a local folder
    #[arg(long)]
    pub no_gitignore: bool,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(args))
}

async fn run_async(args: InfoArgs) -> Result<()> {
    let token = args.token.clone().or_else(token_store::load_token);
    let source = build_source(&SourceArgs {
        path: args.path.clone(),
        repo: args.repo.clone(),
        token,
        respect_gitignore: !args.no_gitignore,
        max_file_bytes: None,
    })?;

    let blobs = source.list_blobs().await?;
    let include_ext = parse_csv(&args.include_ext);
    let exclude = parse_csv(&args.exclude);
    let blobs = filter_blobs(blobs, include_ext.as_deref(), exclude.as_deref());

    let total_bytes: u64 = blobs.iter().map(|b| b.size).sum();
    let root = build_tree(&blobs)?;

    print!("{}", render_tree(&root));
    println!();
    println!("Files: {}", blobs.len());
    println!("Total size: {total_bytes} bytes");

    Ok(())
}
