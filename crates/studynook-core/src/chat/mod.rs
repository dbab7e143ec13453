//! StudyBot: a short-answer study assistant behind a pluggable backend.

mod cohere;

pub use cohere::{CohereClient, PREAMBLE};

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

pub const GREETING: &str = "Hi! I'm your study buddy. How can I help you today? 📚";
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't process your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Something that can answer a message given the conversation so far.
pub trait ChatBackend {
    fn complete(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = Result<String>> + Send;
}

/// A conversation with the assistant.
pub struct StudyBot<B> {
    backend: B,
    messages: Vec<ChatMessage>,
}

impl<B: ChatBackend> StudyBot<B> {
    /// Fresh conversation opening with [`GREETING`].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: vec![ChatMessage::bot(GREETING)],
        }
    }

    /// Resume a saved conversation. An empty history gets the greeting.
    pub fn from_history(backend: B, messages: Vec<ChatMessage>) -> Self {
        if messages.is_empty() {
            return Self::new(backend);
        }
        Self { backend, messages }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `input` and return the reply.
    ///
    /// The history is only extended once the backend answers; a failed call
    /// leaves it as it was.
    pub async fn send(&mut self, input: &str) -> Result<ChatMessage> {
        if input.trim().is_empty() {
            return Err(ValidationError::Empty("message".into()).into());
        }

        let text = self.backend.complete(input, &self.messages).await?;
        let reply = if text.trim().is_empty() {
            ChatMessage::bot(FALLBACK_REPLY)
        } else {
            ChatMessage::bot(text)
        };

        self.messages.push(ChatMessage::user(input));
        self.messages.push(reply.clone());
        Ok(reply)
    }
}

/// Normalise `-`, `*` and `•` list markers at line start to `• `. The
/// marker must be followed by whitespace (a space or a tab).
pub fn normalize_bullets(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            let mut chars = line.chars();
            match (chars.next(), chars.next()) {
                (Some('-' | '*' | '•'), Some(gap)) if gap.is_whitespace() => {
                    format!("• {}", chars.as_str())
                }
                _ => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
