//! Prompt assembly.
//!
//! Combines the rendered tree outline with the cached contents of the
//! selected files into one UTF-8 document. Files whose extension is on the
//! denylist, and files whose content has not been fetched yet, are left
//! out of the file blocks.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::select::Selection;
use crate::tree::{render_tree, Node};
use crate::utils::extension_of;

/// Extensions excluded from prompt assembly by default: binary formats
/// whose bytes are useless in a text prompt.
pub static DEFAULT_DENYLIST: Lazy<HashSet<String>> = Lazy::new(|| {
    ["png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "pdf", "zip", "tar", "gz", "woff",
     "woff2", "ttf", "eot", "mp3", "mp4", "avi", "mov", "exe", "dll", "so", "dylib", "o", "a",
     "class", "jar", "bin"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

const TREE_HEADER: &str = "## PROJECT TREE";
const CONTENTS_HEADER: &str = "## FILE CONTENTS";

/// Assemble the final prompt text.
///
/// File blocks appear in selection order, each labelled with its path and
/// fenced with triple backticks. Deterministic given the same tree,
/// selection order, and cache contents.
pub fn assemble(root: &Node, selection: &Selection, denylist: &HashSet<String>) -> String {
    let mut out = String::new();
    out.push_str(TREE_HEADER);
    out.push('\n');
    out.push_str(&render_tree(root));
    out.push_str(CONTENTS_HEADER);
    out.push('\n');

    for path in selection.selected_paths() {
        if extension_of(path).is_some_and(|ext| denylist.contains(&ext)) {
            continue;
        }
        // Not yet fetched (or its fetch failed): silently absent.
        let Some(content) = selection.cached(path) else { continue };
        out.push_str(&format!("### FILE: {path}\n```\n{content}\n```\n\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{build_tree, Blob};

    fn tree_of(paths: &[&str]) -> Node {
        let blobs: Vec<Blob> = paths.iter().map(|p| Blob::new(*p, 1)).collect();
        build_tree(&blobs).expect("tree")
    }

    fn selection_with(paths: &[&str], cached: &[(&str, &str)]) -> Selection {
        let mut selection = Selection::new();
        for path in paths {
            selection.select_path(*path);
        }
        for (path, content) in cached {
            selection.cache_mut().insert(path.to_string(), content.to_string());
        }
        selection
    }

    #[test]
    fn assemble_starts_with_tree_then_file_blocks() {
        let root = tree_of(&["src/main.rs"]);
        let selection = selection_with(&["src/main.rs"], &[("src/main.rs", "fn main() {}")]);

        let prompt = assemble(&root, &selection, &DEFAULT_DENYLIST);
        assert!(prompt.starts_with("## PROJECT TREE\n/\n"));
        assert!(prompt.contains("└── main.rs"));
        assert!(prompt.contains("### FILE: src/main.rs\n```\nfn main() {}\n```\n"));
    }

    #[test]
    fn denylisted_extension_is_excluded_even_when_cached() {
        let root = tree_of(&["logo.png", "a.txt"]);
        let selection =
            selection_with(&["logo.png", "a.txt"], &[("logo.png", "\u{fffd}"), ("a.txt", "text")]);

        let prompt = assemble(&root, &selection, &DEFAULT_DENYLIST);
        assert!(!prompt.contains("### FILE: logo.png"));
        assert!(prompt.contains("### FILE: a.txt"));
    }

    #[test]
    fn unfetched_paths_are_skipped() {
        let root = tree_of(&["a.txt", "b.txt"]);
        let selection = selection_with(&["a.txt", "b.txt"], &[("b.txt", "bee")]);

        let prompt = assemble(&root, &selection, &DEFAULT_DENYLIST);
        assert!(!prompt.contains("### FILE: a.txt"));
        assert!(prompt.contains("### FILE: b.txt"));
    }

    #[test]
    fn blocks_follow_selection_order() {
        let root = tree_of(&["a.txt", "b.txt"]);
        let selection =
            selection_with(&["b.txt", "a.txt"], &[("a.txt", "aaa"), ("b.txt", "bbb")]);

        let prompt = assemble(&root, &selection, &DEFAULT_DENYLIST);
        let b_pos = prompt.find("### FILE: b.txt").expect("b block");
        let a_pos = prompt.find("### FILE: a.txt").expect("a block");
        assert!(b_pos < a_pos);
    }

    #[test]
    fn denylist_matching_is_case_insensitive_on_extension() {
        let root = tree_of(&["Logo.PNG"]);
        let selection = selection_with(&["Logo.PNG"], &[("Logo.PNG", "bytes")]);

        let prompt = assemble(&root, &selection, &DEFAULT_DENYLIST);
        assert!(!prompt.contains("### FILE: Logo.PNG"));
    }

    #[test]
    fn assemble_is_deterministic() {
        let root = tree_of(&["a.txt", "b.txt"]);
        let selection =
            selection_with(&["a.txt", "b.txt"], &[("a.txt", "aaa"), ("b.txt", "bbb")]);

        let first = assemble(&root, &selection, &DEFAULT_DENYLIST);
        let second = assemble(&root, &selection, &DEFAULT_DENYLIST);
        assert_eq!(first, second);
    }
}
