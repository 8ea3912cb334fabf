use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation, as carried on the wire in both the inbound
/// request history and the outgoing provider payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Seam between the tutor service and the hosted chat-completion API.
/// Implementors own transport, auth, and provider error classification.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the full message list (system + history + user turn) and
    /// return the assistant's reply text, untrimmed.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}
