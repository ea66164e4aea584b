//! Builds the selectable tree from a flat repository listing.

use super::rules::IgnoreRules;
use crate::domain::{Entry, EntryKind, FileTree, Node, DEFAULT_MAX_AUTO_SELECT_BYTES};
use crate::error::IngestError;
use tracing::debug;

/// Converts listing entries into a sorted [`FileTree`].
pub struct TreeBuilder {
    rules: IgnoreRules,
    max_auto_select_bytes: u64,
}

impl TreeBuilder {
    pub fn new(rules: IgnoreRules) -> Self {
        Self { rules, max_auto_select_bytes: DEFAULT_MAX_AUTO_SELECT_BYTES }
    }

    /// Files larger than this start unselected.
    pub fn max_auto_select_bytes(mut self, bytes: u64) -> Self {
        self.max_auto_select_bytes = bytes;
        self
    }

    /// Build the tree. Any malformed or conflicting entry fails the whole build.
    pub fn build(&self, entries: &[Entry]) -> Result<FileTree, IngestError> {
        let mut roots = Vec::new();
        let mut ignored = 0usize;

        for entry in entries {
            validate_path(&entry.path)?;
            if self.rules.is_ignored(entry) {
                ignored += 1;
                continue;
            }
            self.insert(&mut roots, entry)?;
        }

        debug!("Built tree from {} entries ({} ignored)", entries.len(), ignored);
        Ok(FileTree::from_roots(roots))
    }

    fn insert(&self, roots: &mut Vec<Node>, entry: &Entry) -> Result<(), IngestError> {
        let segments: Vec<&str> = entry.path.split('/').collect();
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(IngestError::EmptySegment { path: entry.path.clone() });
        };

        let mut siblings = roots;
        let mut dir_path = String::new();
        for segment in parents {
            if !dir_path.is_empty() {
                dir_path.push('/');
            }
            dir_path.push_str(segment);

            let idx = match siblings.iter().position(|n| n.name == *segment) {
                Some(idx) if siblings[idx].is_dir() => idx,
                Some(_) => {
                    return Err(IngestError::KindConflict {
                        path: dir_path,
                        existing: EntryKind::File.label(),
                        found: EntryKind::Directory.label(),
                    })
                }
                None => {
                    insert_sorted(siblings, Node::new_dir(dir_path.clone(), segment.to_string()))
                }
            };
            let current = siblings;
            siblings = &mut current[idx].children;
        }

        if let Some(existing) = siblings.iter().find(|n| n.name == *leaf) {
            return match (existing.kind, entry.kind) {
                (EntryKind::Directory, EntryKind::Directory) => Ok(()),
                (EntryKind::File, EntryKind::File) => {
                    Err(IngestError::DuplicatePath { path: entry.path.clone() })
                }
                (existing, found) => Err(IngestError::KindConflict {
                    path: entry.path.clone(),
                    existing: existing.label(),
                    found: found.label(),
                }),
            };
        }

        let node = match entry.kind {
            EntryKind::Directory => Node::new_dir(entry.path.clone(), leaf.to_string()),
            EntryKind::File => {
                let selected = entry.size.map_or(true, |size| size <= self.max_auto_select_bytes);
                Node::new_file(
                    entry.path.clone(),
                    leaf.to_string(),
                    entry.size,
                    entry.content_hash.clone(),
                    selected,
                )
            }
        };
        insert_sorted(siblings, node);
        Ok(())
    }
}

/// Insert keeping siblings ordered; returns the new node's index.
fn insert_sorted(siblings: &mut Vec<Node>, node: Node) -> usize {
    let idx = siblings.partition_point(|n| n.sibling_order(&node).is_lt());
    siblings.insert(idx, node);
    idx
}

fn validate_path(path: &str) -> Result<(), IngestError> {
    if path.split('/').any(str::is_empty) {
        return Err(IngestError::EmptySegment { path: path.to_string() });
    }
    Ok(())
}
