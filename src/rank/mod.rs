//! File ranking by query relevance

use crate::domain::{FileTree, RankingWeights, ScoredFile};

pub mod context;
pub mod ranker;

pub use context::{build_context, build_prompt};
pub use ranker::{tokenize, Candidate, RelevanceRanker};

/// Selected files with content, in traversal order.
pub fn candidates(tree: &FileTree) -> Vec<Candidate<'_>> {
    tree.files().into_iter().filter_map(Candidate::from_node).collect()
}

pub fn rank_files(tree: &FileTree, query: &str, weights: RankingWeights) -> Vec<ScoredFile> {
    RelevanceRanker::new(weights).rank(&candidates(tree), query)
}
