use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{ProviderConfig, MAX_TOKENS, TEMPERATURE};
use crate::error::TutorError;
use crate::interfaces::providers::{ChatCompletion, ChatMessage};
use crate::Result;

/// Client for Groq's OpenAI-compatible `/chat/completions` endpoint.
///
/// Constructed per request from a freshly resolved [`ProviderConfig`];
/// holds no state beyond the config and the HTTP connection pool.
pub struct GroqClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl GroqClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn extract_reply(response: &Value) -> Option<String> {
        response
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|text| text.to_string())
    }

    /// Providers wrap failures as `{"error": {"message": ...}}`; fall back
    /// to the raw body when the shape differs.
    fn extract_error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|message| message.as_str())
                    .map(|message| message.to_string())
            })
            .unwrap_or_else(|| body.trim().to_string())
    }

    fn classify_failure(status: StatusCode, body: &str) -> TutorError {
        let message = Self::extract_error_message(body);
        match status {
            StatusCode::UNAUTHORIZED => TutorError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => TutorError::RateLimited,
            StatusCode::BAD_REQUEST => TutorError::BadRequest(message),
            other => TutorError::Provider {
                status: other.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let payload = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        // One round trip, no retry.
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| TutorError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TutorError::Network(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(Self::classify_failure(status, &body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| TutorError::Serialization(format!("chat completion decode: {e}")))?;

        Ok(Self::extract_reply(&value).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let response = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Recursion is..."}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        });
        assert_eq!(
            GroqClient::extract_reply(&response).as_deref(),
            Some("Recursion is...")
        );
    }

    #[test]
    fn missing_choices_yield_none() {
        assert!(GroqClient::extract_reply(&json!({"choices": []})).is_none());
        assert!(GroqClient::extract_reply(&json!({})).is_none());
    }

    #[test]
    fn classifies_provider_statuses() {
        let body = r#"{"error":{"message":"bad key"}}"#;
        assert!(matches!(
            GroqClient::classify_failure(StatusCode::UNAUTHORIZED, body),
            TutorError::Unauthorized
        ));
        assert!(matches!(
            GroqClient::classify_failure(StatusCode::TOO_MANY_REQUESTS, body),
            TutorError::RateLimited
        ));
        match GroqClient::classify_failure(StatusCode::BAD_REQUEST, body) {
            TutorError::BadRequest(message) => assert_eq!(message, "bad key"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
        match GroqClient::classify_failure(StatusCode::SERVICE_UNAVAILABLE, "plain text") {
            TutorError::Provider { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "plain text");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }
}
