//! Summary statistics over the current selection.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub selected_files: usize,
    /// Bytes across selected files with a known size.
    pub total_size: u64,
    pub estimated_tokens: u64,
}

/// File count and selected count for one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionStat {
    pub extension: String,
    pub count: usize,
    pub selected: usize,
}

impl ExtensionStat {
    pub fn fully_selected(&self) -> bool {
        self.selected == self.count
    }
}
