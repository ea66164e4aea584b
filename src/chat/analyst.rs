//! Retrieval-augmented question answering over the selected files.

use super::model::LanguageModel;
use crate::domain::{ChatMessage, RankingWeights, ScoredFile};
use crate::error::ChatError;
use crate::rank::{build_context, build_prompt, Candidate, RelevanceRanker};
use tracing::debug;

pub const SYSTEM_INSTRUCTION: &str = "You are a senior software engineer assistant.
You are analyzing a GitHub repository.
A subset of relevant files has been retrieved based on the user's query to fit into context.
Use the provided Directory Structure to understand the project layout.
Use the provided \"Selected Relevant Files\" to answer specific implementation questions.
If a file is referenced but not provided in the content, explain that you don't have its content but can infer from the structure.
Be concise, technical, and accurate. Use Markdown for code blocks.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub text: String,
    pub relevant_files: Vec<ScoredFile>,
}

pub struct Analyst<M> {
    model: M,
    ranker: RelevanceRanker,
}

impl<M: LanguageModel> Analyst<M> {
    pub fn new(model: M, weights: RankingWeights) -> Self {
        Self { model, ranker: RelevanceRanker::new(weights) }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Rank `files` for `query`, assemble the context window and ask the model.
    pub async fn analyze(
        &self,
        files: &[Candidate<'_>],
        tree_digest: &str,
        query: &str,
        history: &[ChatMessage],
    ) -> Result<Analysis, ChatError> {
        let relevant_files = self.ranker.rank(files, query);
        let context = build_context(tree_digest, &relevant_files, files);
        debug!(
            "Context for {:?}: {} files, {} chars",
            query,
            relevant_files.len(),
            context.chars().count()
        );

        let prompt = build_prompt(&context, query);
        let text = self.model.complete(SYSTEM_INSTRUCTION, history, &prompt).await?;
        Ok(Analysis { text, relevant_files })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and replays canned answers.
    #[derive(Default)]
    pub(crate) struct ScriptedModel {
        pub answers: Mutex<Vec<Result<String, ChatError>>>,
        pub prompts: Mutex<Vec<(usize, String)>>,
    }

    impl ScriptedModel {
        pub(crate) fn answering(answers: Vec<Result<String, ChatError>>) -> Self {
            Self { answers: Mutex::new(answers), prompts: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(
            &self,
            _system: &str,
            history: &[ChatMessage],
            prompt: &str,
        ) -> Result<String, ChatError> {
            self.prompts.lock().unwrap().push((history.len(), prompt.to_string()));
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                Ok("ok".into())
            } else {
                answers.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_analyze_ranks_and_builds_prompt() {
        let analyst = Analyst::new(
            ScriptedModel::answering(vec![Ok("It parses.".into())]),
            RankingWeights::default(),
        );
        let files = vec![
            Candidate { name: "parser.ts", path: "src/parser.ts", content: "class Parser {}" },
            Candidate { name: "index.ts", path: "src/index.ts", content: "import parser" },
        ];

        let analysis = analyst.analyze(&files, "└── demo\n", "parser", &[]).await.unwrap();

        assert_eq!(analysis.text, "It parses.");
        assert_eq!(analysis.relevant_files[0].path, "src/parser.ts");
        let prompts = analyst.model().prompts.lock().unwrap();
        let (_, prompt) = &prompts[0];
        assert!(prompt.starts_with("[Context Data]\nDirectory Structure:\n└── demo\n"));
        assert!(prompt.contains("--- START OF FILE src/parser.ts ---\nclass Parser {}"));
        assert!(prompt.ends_with("[User Question]\nparser"));
    }
}
