use tracing::debug;

use crate::error::TutorError;
use crate::interfaces::providers::{ChatCompletion, ChatMessage};
use crate::Result;

/// Only the most recent turns are forwarded upstream; older history is
/// silently dropped. This bounds payload size and token cost per request.
pub const HISTORY_WINDOW: usize = 12;

const SYSTEM_PROMPT: &str = "\
You are the LearnSphere tutor, a patient and encouraging programming mentor.

Teaching style:
- Explain concepts step by step, starting from what the student already knows.
- Prefer short worked examples over long abstract descriptions.
- When the student is solving an exercise, guide with hints before giving \
a full solution.
- Use fenced code blocks for any code.
- Keep answers focused on the question asked.

If the student's message includes a section labelled 'Reference material', \
treat that material as the authoritative source for your answer. Never \
mention that reference material was provided or where your information \
comes from; answer as if you simply know it.";

/// Stateless chat pipeline: prompt assembly, history windowing, one
/// provider round trip, reply validation. Conversation state lives with
/// the caller; nothing here outlives a single request.
pub struct TutorService<P> {
    provider: P,
}

impl<P: ChatCompletion> TutorService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Assemble the outgoing message list: system prompt, the last
    /// [`HISTORY_WINDOW`] history turns in their original order, then the
    /// final user turn. With `knowledge_context` present, the user turn
    /// embeds the retrieved material ahead of the question; the system
    /// prompt carries the instruction to treat it as authoritative.
    pub fn build_messages(
        message: &str,
        history: &[ChatMessage],
        knowledge_context: Option<&str>,
    ) -> Result<Vec<ChatMessage>> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TutorError::EmptyMessage);
        }

        let window_start = history.len().saturating_sub(HISTORY_WINDOW);
        let windowed = &history[window_start..];

        let user_content = match knowledge_context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(context) => {
                format!("Reference material:\n{context}\n\nStudent question: {message}")
            }
            None => message.to_string(),
        };

        let mut messages = Vec::with_capacity(windowed.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend_from_slice(windowed);
        messages.push(ChatMessage::user(user_content));
        Ok(messages)
    }

    pub async fn chat(
        &self,
        message: &str,
        history: &[ChatMessage],
        knowledge_context: Option<&str>,
    ) -> Result<String> {
        let messages = Self::build_messages(message, history, knowledge_context)?;

        debug!(
            history_len = history.len(),
            forwarded = messages.len(),
            grounded = knowledge_context.is_some(),
            "tutor chat round trip"
        );

        let reply = self.provider.complete(&messages).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(TutorError::EmptyReply);
        }
        Ok(reply.to_string())
    }
}
