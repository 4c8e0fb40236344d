//! Append-only conversation with a bounded upstream context window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CHAT_CONTEXT_WINDOW;
use crate::error::{InsightError, CHAT_FALLBACK};
use crate::gateway::{InsightGateway, InsightResult};

pub const GREETING: &str = "Hello! I'm your AI assistant for Campaign Insights. I can help you analyze your campaign performance, understand trends, and provide optimization recommendations. What would you like to know about your data?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// A user turn that has been recorded but not yet answered.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub message: String,
    /// The prior messages sent upstream, oldest first.
    pub context: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            messages: vec![ChatMessage::new(Role::Assistant, GREETING)],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record the user's message right away and capture the context for the upstream call.
    pub fn begin_turn(&mut self, user_text: &str) -> Result<PendingTurn, InsightError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(InsightError::Validation("message must not be empty".to_string()));
        }

        let start = self.messages.len().saturating_sub(CHAT_CONTEXT_WINDOW);
        let context = self.messages[start..].to_vec();
        self.messages.push(ChatMessage::new(Role::User, text));

        Ok(PendingTurn {
            message: text.to_string(),
            context,
        })
    }

    /// Append the assistant's side of the turn: the reply, or the fallback on failure.
    pub fn complete_turn(&mut self, result: &InsightResult) -> &ChatMessage {
        let content = match result {
            Ok(text) => text.clone(),
            Err(_) => CHAT_FALLBACK.to_string(),
        };
        self.messages.push(ChatMessage::new(Role::Assistant, content));
        &self.messages[self.messages.len() - 1]
    }

    /// One full turn for a caller that owns the session outright: `begin_turn`,
    /// the upstream call, then `complete_turn`. Shared sessions run the same three
    /// steps without holding the lock across the call (see `ChatWidget::send`).
    pub async fn append(
        &mut self,
        gateway: &InsightGateway,
        user_text: &str,
    ) -> (&[ChatMessage], InsightResult) {
        let pending = match self.begin_turn(user_text) {
            Ok(p) => p,
            Err(e) => return (&self.messages, Err(e)),
        };
        let result = gateway
            .request_chat_reply(&pending.message, &pending.context)
            .await;
        self.complete_turn(&result);
        (&self.messages, result)
    }
}
