//! Conversation history with one model turn per question.

use super::analyst::Analyst;
use super::model::LanguageModel;
use crate::domain::{ChatMessage, FileTree};
use crate::rank::candidates;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Ask one question about `tree`.
    ///
    /// Appends the user turn, then either the model's answer or an error turn.
    /// Earlier turns are never dropped. Failed exchanges are not sent back to
    /// the model as history.
    pub async fn ask<M: LanguageModel>(
        &mut self,
        analyst: &Analyst<M>,
        tree: &FileTree,
        tree_digest: &str,
        question: &str,
    ) -> &ChatMessage {
        let prior = self.model_history();
        self.history.push(ChatMessage::user(question));

        let files = candidates(tree);
        let reply = match analyst.analyze(&files, tree_digest, question, &prior).await {
            Ok(analysis) => ChatMessage::model(analysis.text, analysis.relevant_files),
            Err(e) => {
                warn!("Analysis failed: {}", e);
                ChatMessage::error(format!("Error analyzing: {}", e))
            }
        };
        self.history.push(reply);
        &self.history[self.history.len() - 1]
    }

    /// Prior turns in order, skipping each error turn and the question that caused it.
    fn model_history(&self) -> Vec<ChatMessage> {
        let mut out: Vec<ChatMessage> = Vec::with_capacity(self.history.len());
        for message in &self.history {
            if message.is_error {
                out.pop();
            } else {
                out.push(message.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::analyst::tests::ScriptedModel;
    use crate::domain::{Entry, RankingWeights, Role};
    use crate::error::ChatError;
    use crate::scan::TreeBuilder;

    fn tree() -> FileTree {
        let mut tree = TreeBuilder::new(Default::default())
            .build(&[Entry::file("src/lib.rs", Some(10), "h1")])
            .unwrap();
        tree.for_each_file_mut(|n| n.content = Some("pub fn lib() {}".into()));
        tree
    }

    #[tokio::test]
    async fn test_failure_appends_error_turn_and_keeps_history() {
        let analyst = Analyst::new(
            ScriptedModel::answering(vec![
                Ok("First answer".into()),
                Err(ChatError::Unavailable("quota".into())),
                Ok("Third answer".into()),
            ]),
            RankingWeights::default(),
        );
        let tree = tree();
        let mut session = ChatSession::new();

        session.ask(&analyst, &tree, "└── demo\n", "what is lib?").await;
        let failed = session.ask(&analyst, &tree, "└── demo\n", "and then?").await.clone();
        assert!(failed.is_error);
        assert_eq!(failed.role, Role::Model);
        assert!(failed.text.starts_with("Error analyzing: "));

        let last = session.ask(&analyst, &tree, "└── demo\n", "retry").await;
        assert_eq!(last.text, "Third answer");

        assert_eq!(session.history().len(), 6);
        assert_eq!(session.history()[1].text, "First answer");
        let prompts = analyst.model().prompts.lock().unwrap();
        let sent_history: Vec<usize> = prompts.iter().map(|(n, _)| *n).collect();
        assert_eq!(sent_history, vec![0, 2, 2]);
    }

    #[tokio::test]
    async fn test_answer_lists_relevant_files() {
        let analyst = Analyst::new(ScriptedModel::default(), RankingWeights::default());
        let mut session = ChatSession::new();
        let reply = session.ask(&analyst, &tree(), "└── demo\n", "lib").await;
        assert!(!reply.is_error);
        assert_eq!(reply.relevant_files[0].path, "src/lib.rs");
    }
}
