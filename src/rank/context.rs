//! Context-window assembly for a single question.

use super::ranker::Candidate;
use crate::domain::ScoredFile;
use std::collections::HashMap;

pub const NO_MATCH_NOTE: &str = "No specific file content matched the query keywords. \
Answering based on general knowledge and directory structure.";

/// Tree digest followed by the ranked files' contents, each framed with
/// start/end markers, in ranked order.
pub fn build_context(tree_digest: &str, ranked: &[ScoredFile], files: &[Candidate<'_>]) -> String {
    let mut context = format!("Directory Structure:\n{}\n\n", tree_digest);

    let by_path: HashMap<&str, &Candidate<'_>> = files.iter().map(|f| (f.path, f)).collect();
    let picked: Vec<&Candidate<'_>> =
        ranked.iter().filter_map(|s| by_path.get(s.path.as_str()).copied()).collect();

    if picked.is_empty() {
        context.push_str(NO_MATCH_NOTE);
        return context;
    }

    context.push_str("Selected Relevant Files for Context:\n");
    for file in picked {
        context.push_str(&format!("\n--- START OF FILE {} ---\n", file.path));
        context.push_str(file.content);
        context.push_str(&format!("\n--- END OF FILE {} ---\n", file.path));
    }
    context
}

/// The user turn actually sent to the model: context block, then the question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("[Context Data]\n{}\n\n[User Question]\n{}", context, question)
}
