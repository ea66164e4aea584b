//! Keyword relevance scoring of files against a free-text query.

use crate::domain::{Node, RankingWeights, ScoredFile};
use regex::Regex;
use tracing::debug;

/// Names that are useful context whatever the question.
const MANIFEST_MARKERS: &[&str] =
    &["package.json", "requirements.txt", "tsconfig", "cargo.toml", "pyproject.toml", "go.mod"];

/// A file considered for the context window.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub content: &'a str,
}

impl<'a> Candidate<'a> {
    /// `None` unless the node is a selected file with content.
    pub fn from_node(node: &'a Node) -> Option<Self> {
        if !node.is_file() || !node.is_selected {
            return None;
        }
        let content = node.content.as_deref()?;
        Some(Self { name: &node.name, path: &node.path, content })
    }
}

struct QueryTerm {
    text: String,
    pattern: Regex,
}

pub struct RelevanceRanker {
    weights: RankingWeights,
}

impl RelevanceRanker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    /// Rank `files` for `query`, best first.
    ///
    /// Deterministic: ties keep input order. A query without tokens returns
    /// the first few files unscored.
    pub fn rank(&self, files: &[Candidate<'_>], query: &str) -> Vec<ScoredFile> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return files
                .iter()
                .take(self.weights.generic_results)
                .map(|f| ScoredFile { path: f.path.to_string(), score: 0 })
                .collect();
        }

        let terms: Vec<QueryTerm> = tokens
            .into_iter()
            .filter(|t| t.chars().count() >= self.weights.min_token_len)
            .filter_map(|text| {
                let pattern = Regex::new(&regex::escape(&text)).ok()?;
                Some(QueryTerm { text, pattern })
            })
            .collect();

        let mut scored: Vec<ScoredFile> = files
            .iter()
            .map(|f| ScoredFile { path: f.path.to_string(), score: self.score(f, &terms) })
            .collect();

        // Stable: equal scores keep input order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(self.weights.max_results);
        debug!("Ranked {} candidates for {:?}, kept {}", files.len(), query, scored.len());
        scored
    }

    fn score(&self, file: &Candidate<'_>, terms: &[QueryTerm]) -> u32 {
        let w = &self.weights;
        let name = file.name.to_lowercase();
        let path = file.path.to_lowercase();
        let mut score = 0u32;

        if name.contains("readme") {
            score = score.saturating_add(w.readme_bonus);
        }
        if MANIFEST_MARKERS.iter().any(|m| name.contains(m)) {
            score = score.saturating_add(w.manifest_bonus);
        }

        if terms.is_empty() {
            return score;
        }
        let content = file.content.to_lowercase();
        for term in terms {
            if name.contains(&term.text) {
                score = score.saturating_add(w.filename_bonus);
            }
            if path.contains(&term.text) {
                score = score.saturating_add(w.path_bonus);
            }
            let occurrences = term.pattern.find_iter(&content).count();
            let hits = u32::try_from(occurrences).unwrap_or(u32::MAX).min(w.content_cap);
            score = score.saturating_add(hits);
        }
        score
    }
}

impl Default for RelevanceRanker {
    fn default() -> Self {
        Self::new(RankingWeights::default())
    }
}

/// Whitespace-separated, lowercased, non-empty tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}
