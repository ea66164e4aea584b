//! Ranking results and chat turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file path with its relevance score for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredFile {
    pub path: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub relevant_files: Vec<ScoredFile>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
            relevant_files: Vec::new(),
        }
    }

    pub fn model(text: impl Into<String>, relevant_files: Vec<ScoredFile>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
            relevant_files,
        }
    }

    /// A failed model turn. Kept in history but marked so callers can style it apart.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: true,
            relevant_files: Vec::new(),
        }
    }
}
