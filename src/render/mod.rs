//! Digest rendering (tree, content, full digest, markdown outline)
//!
//! Every function here is a pure function of the tree state: nothing is
//! cached, so a digest is stale as soon as selection or content changes.

pub mod digest;
pub mod tree;

pub use digest::{digest_file_name, render_content_digest, render_full_digest, Digest};
pub use tree::{render_markdown_tree, render_tree_digest};
