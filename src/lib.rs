//! repo-prompt: assemble LLM prompts from repository files.
//!
//! Points at a GitHub repository or a local folder, builds a file tree
//! from the flat blob listing, fetches the contents of the selected files
//! concurrently, and concatenates everything into a single prompt
//! document: tree outline first, fenced file blocks after.

pub mod assemble;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod select;
pub mod source;
pub mod token_store;
pub mod tree;
pub mod utils;
