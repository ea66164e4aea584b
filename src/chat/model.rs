//! Language model client seam and the Gemini implementation

use crate::domain::{ChatMessage, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL};
use crate::error::ChatError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

pub const EMPTY_ANSWER: &str = "No response generated.";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Produces one answer for a conversation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// `history` holds the prior turns, oldest first; `prompt` is the new user turn.
    async fn complete(
        &self,
        system: &str,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<String, ChatError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self { role: role.map(str::to_string), parts: vec![Part { text: Some(text.to_string()) }] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Gemini `generateContent` over the Developer API.
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiModel {
    pub fn new(api_key: Option<String>) -> Result<Self, ChatError> {
        Self::with_options(api_key, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL)
    }

    pub fn with_options(
        api_key: Option<String>,
        base_url: &str,
        model: &str,
    ) -> Result<Self, ChatError> {
        let api_key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            ChatError::Unavailable("no Gemini API key configured (set GEMINI_API_KEY)".into())
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ChatError::Transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    #[instrument(skip_all, fields(model = %self.model, turns = history.len()))]
    async fn complete(
        &self,
        system: &str,
        history: &[ChatMessage],
        prompt: &str,
    ) -> Result<String, ChatError> {
        let mut contents: Vec<Content> =
            history.iter().map(|m| Content::text(Some(m.role.as_str()), &m.text)).collect();
        contents.push(Content::text(Some("user"), prompt));

        let request =
            GenerateContentRequest { system_instruction: Content::text(None, system), contents };
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("API error: {} - {}", status, body);
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ChatError::Unavailable(format!("Gemini rejected the API key: {}", message))
                }
                _ => ChatError::Api { status_code: status.as_u16(), message },
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::UnexpectedResponse(e.to_string()))?;
        let text = parsed.text();
        if text.trim().is_empty() {
            return Ok(EMPTY_ANSWER.to_string());
        }
        Ok(text)
    }
}
