//! Content and full digests.
//!
//! The full digest is the downloadable artifact; its layout is a stable
//! contract for anything consuming it.

use super::tree::render_tree_digest;
use crate::domain::{FileTree, RepoDetails, MISSING_CONTENT_PLACEHOLDER, NO_FILES_SELECTED};
use crate::utils::estimate_tokens;
use serde::Serialize;

const DELIMITER_WIDTH: usize = 48;

/// Selected file contents, framed, in tree traversal order.
pub fn render_content_digest(tree: &FileTree) -> String {
    let selected = tree.selected_files();
    if selected.is_empty() {
        return NO_FILES_SELECTED.to_string();
    }

    let delimiter = "=".repeat(DELIMITER_WIDTH);
    let mut out = String::new();
    for file in selected {
        let content = file.content.as_deref().unwrap_or(MISSING_CONTENT_PLACEHOLDER);
        out.push('\n');
        out.push_str(&delimiter);
        out.push_str("\nFile: /");
        out.push_str(&file.path);
        out.push('\n');
        out.push_str(&delimiter);
        out.push('\n');
        out.push_str(content);
        out.push('\n');
    }
    out
}

/// Metadata header, tree digest and content digest.
pub fn render_full_digest(
    repo: &RepoDetails,
    files_analyzed: usize,
    tree_digest: &str,
    content_digest: &str,
) -> String {
    format!(
        "Repository: {}\nFiles analyzed: {}\nEstimated tokens: {}\n\n\
         Directory structure:\n{}\n\nFiles Content:\n{}",
        repo.slug(),
        files_analyzed,
        estimate_tokens(content_digest),
        tree_digest,
        content_digest,
    )
}

/// The three derived renderings of one tree state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub tree: String,
    pub content: String,
    pub full: String,
    pub files_analyzed: usize,
    pub estimated_tokens: u64,
}

impl Digest {
    pub fn render(repo: &RepoDetails, tree: &FileTree) -> Self {
        let tree_digest = render_tree_digest(tree, &repo.name);
        let content = render_content_digest(tree);
        let files_analyzed = tree.selected_files().len();
        let full = render_full_digest(repo, files_analyzed, &tree_digest, &content);
        Self {
            estimated_tokens: estimate_tokens(&content),
            tree: tree_digest,
            content,
            full,
            files_analyzed,
        }
    }
}

/// File name used when exporting the full digest.
pub fn digest_file_name(repo: &RepoDetails) -> String {
    format!("{}_digest.txt", repo.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entry;
    use crate::scan::{IgnoreRules, TreeBuilder};
    use crate::select::toggle;
    use similar_asserts::assert_eq;

    fn repo() -> RepoDetails {
        RepoDetails {
            owner: "acme".into(),
            name: "demo".into(),
            default_branch: "main".into(),
            stars: 3,
            description: String::new(),
        }
    }

    fn tree_with_content() -> FileTree {
        let entries = vec![
            Entry::file("src/a.rs", Some(5), "1"),
            Entry::file("src/b.rs", Some(5), "2"),
            Entry::file("README.md", Some(5), "3"),
        ];
        let mut tree = TreeBuilder::new(IgnoreRules::default()).build(&entries).expect("tree");
        tree.for_each_file_mut(|f| {
            if f.path != "src/b.rs" {
                f.content = Some(format!("content of {}", f.name));
            }
        });
        tree
    }

    #[test]
    fn test_no_selection_yields_placeholder() {
        let mut tree = tree_with_content();
        toggle(&mut tree, "src", false).unwrap();
        toggle(&mut tree, "README.md", false).unwrap();
        assert_eq!(render_content_digest(&tree), "// No files selected.");
    }

    #[test]
    fn test_content_digest_frames_each_selected_file() {
        let tree = tree_with_content();
        let digest = render_content_digest(&tree);
        let bar = "=".repeat(48);
        let expected = format!(
            "\n{bar}\nFile: /src/a.rs\n{bar}\ncontent of a.rs\n\
             \n{bar}\nFile: /src/b.rs\n{bar}\n// Content not found\n\
             \n{bar}\nFile: /README.md\n{bar}\ncontent of README.md\n"
        );
        assert_eq!(digest, expected);
        assert_eq!(digest.matches("File: /").count(), tree.selected_files().len());
    }

    #[test]
    fn test_full_digest_layout() {
        let mut tree = tree_with_content();
        toggle(&mut tree, "src", false).unwrap();
        let digest = Digest::render(&repo(), &tree);

        let content = digest.content.clone();
        let tokens = content.chars().count().div_ceil(4);
        let expected = format!(
            "Repository: acme/demo\nFiles analyzed: 1\nEstimated tokens: {tokens}\n\n\
             Directory structure:\n└── demo\n    └── README.md\n\n\n\
             Files Content:\n{content}"
        );
        assert_eq!(digest.full, expected);
        assert_eq!(digest.files_analyzed, 1);
        assert_eq!(digest.estimated_tokens, tokens as u64);
    }

    #[test]
    fn test_digest_file_name() {
        assert_eq!(digest_file_name(&repo()), "demo_digest.txt");
    }
}
