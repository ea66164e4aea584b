//! Question answering over the ingested repository

pub mod analyst;
pub mod model;
pub mod session;

pub use analyst::{Analysis, Analyst, SYSTEM_INSTRUCTION};
pub use model::{GeminiModel, LanguageModel, EMPTY_ANSWER};
pub use session::ChatSession;
