//! Selection state: cascading toggles, extension toggles and derived stats.
//!
//! All mutation goes through `&mut FileTree`. The flat file list is a
//! traversal of the same nodes, so a toggle is visible in both views at once.

use crate::domain::{ExtensionStat, FileTree, Node, ProcessingStats};
use crate::error::SelectionError;
use crate::utils::estimate_tokens_for_bytes;
use std::collections::HashMap;
use tracing::debug;

/// Set the node at `path` and every descendant to `checked`.
///
/// An unknown path leaves the tree untouched.
pub fn toggle(tree: &mut FileTree, path: &str, checked: bool) -> Result<(), SelectionError> {
    let node = tree.find_mut(path).ok_or_else(|| SelectionError::UnknownPath(path.to_string()))?;
    set_recursive(node, checked);
    debug!("Toggled {} -> {}", path, checked);
    Ok(())
}

fn set_recursive(node: &mut Node, checked: bool) {
    node.is_selected = checked;
    for child in &mut node.children {
        set_recursive(child, checked);
    }
}

/// Toggle every file with extension `ext`, wherever it sits in the hierarchy.
///
/// A partially selected group becomes fully selected, a fully selected group
/// becomes fully deselected. Returns the applied state, or `None` when no file
/// has the extension.
pub fn toggle_extension(tree: &mut FileTree, ext: &str) -> Option<bool> {
    let stat = extension_stats(tree).into_iter().find(|s| s.extension == ext)?;
    let target = !stat.fully_selected();
    tree.for_each_file_mut(|file| {
        if file.extension == ext {
            file.is_selected = target;
        }
    });
    debug!("Toggled extension {} ({} files) -> {}", ext, stat.count, target);
    Some(target)
}

/// Effective selection for rendering: a file's own flag, or for a directory
/// whether any descendant file is selected. Never cached.
pub fn has_selected_descendant(node: &Node) -> bool {
    if node.is_file() {
        return node.is_selected;
    }
    node.children.iter().any(has_selected_descendant)
}

/// Per-extension counts, most common first; ties keep first-seen order.
pub fn extension_stats(tree: &FileTree) -> Vec<ExtensionStat> {
    let mut order: Vec<ExtensionStat> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for file in tree.files() {
        if file.extension.is_empty() || file.extension == "." {
            continue;
        }
        let idx = *index.entry(file.extension.as_str()).or_insert_with(|| {
            order.push(ExtensionStat { extension: file.extension.clone(), count: 0, selected: 0 });
            order.len() - 1
        });
        order[idx].count += 1;
        if file.is_selected {
            order[idx].selected += 1;
        }
    }

    order.sort_by(|a, b| b.count.cmp(&a.count));
    order
}

pub fn processing_stats(tree: &FileTree) -> ProcessingStats {
    let files = tree.files();
    let selected: Vec<&Node> = files.iter().copied().filter(|f| f.is_selected).collect();
    let total_size: u64 = selected.iter().map(|f| f.size.unwrap_or(0)).sum();
    ProcessingStats {
        total_files: files.len(),
        selected_files: selected.len(),
        total_size,
        estimated_tokens: estimate_tokens_for_bytes(total_size),
    }
}
