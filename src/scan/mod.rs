//! Repository listing → selectable tree

use crate::domain::{Config, Entry, FileTree};
use crate::error::IngestError;

pub mod builder;
pub mod rules;

pub use builder::TreeBuilder;
pub use rules::IgnoreRules;

/// Build a tree using the ignore rules and selection threshold from `config`.
pub fn build_tree(config: &Config, entries: &[Entry]) -> Result<FileTree, IngestError> {
    let rules = IgnoreRules::from_config(config)?;
    TreeBuilder::new(rules).max_auto_select_bytes(config.max_auto_select_bytes).build(entries)
}
