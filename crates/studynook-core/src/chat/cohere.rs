//! Cohere `/v1/chat` client.

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ChatBackend, ChatMessage, ChatRole};
use crate::error::{ChatError, Result};
use crate::storage::ChatConfig;

pub const PREAMBLE: &str = "You are StudyBot, a friendly AI study assistant. Keep your responses \
short, clear, and to the point. When using bullet points, use a maximum of 3-4 points. Focus on \
practical, actionable advice. Be encouraging but brief.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    chat_history: Vec<HistoryEntry<'a>>,
    model: &'a str,
    preamble: &'a str,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    role: &'static str,
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    text: Option<String>,
}

pub struct CohereClient {
    client: Client,
    config: ChatConfig,
    api_key: String,
}

impl CohereClient {
    pub fn new(config: ChatConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key: api_key.into(),
        }
    }

    /// Build a client whose key comes from the environment variable named
    /// by `config.api_key_env`.
    pub fn from_config(config: ChatConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ChatError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;
        Ok(Self::new(config, api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat", self.config.base_url.trim_end_matches('/'))
    }

    async fn post(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let body = ChatRequest {
            message,
            chat_history: history
                .iter()
                .map(|m| HistoryEntry {
                    role: match m.role {
                        ChatRole::User => "USER",
                        ChatRole::Bot => "CHATBOT",
                    },
                    message: &m.content,
                })
                .collect(),
            model: &self.config.model,
            preamble: PREAMBLE,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(history = history.len(), "sending chat request");
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ChatError::from)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "chat API error");
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: ChatResponse = resp.json().await.map_err(ChatError::from)?;
        Ok(parsed.text.unwrap_or_default())
    }
}

impl ChatBackend for CohereClient {
    fn complete(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = Result<String>> + Send {
        self.post(message, history)
    }
}
