use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling settings are fixed service policy, not caller-controlled.
pub const TEMPERATURE: f32 = 0.6;
pub const MAX_TOKENS: u32 = 1024;

/// Provider settings for one chat-completion round trip.
///
/// Resolved fresh for every request rather than cached at startup, so a
/// rotated `GROQ_API_KEY` takes effect without a daemon restart.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| TutorError::Config("GROQ_API_KEY is not set".to_string()))?;

        let base_url = std::env::var("GROQ_BASE_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("GROQ_MODEL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}

/// Where each request obtains its provider settings. `Env` re-reads the
/// environment per invocation; `Fixed` pins a config, used by tests and
/// by deployments that inject settings at startup.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Env,
    Fixed(ProviderConfig),
}

impl ConfigSource {
    pub fn resolve(&self) -> Result<ProviderConfig> {
        match self {
            Self::Env => ProviderConfig::from_env(),
            Self::Fixed(config) => Ok(config.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_source_resolves_without_environment() {
        let source = ConfigSource::Fixed(ProviderConfig {
            api_key: "key".to_string(),
            base_url: "http://localhost:9".to_string(),
            model: "test-model".to_string(),
        });
        let config = source.resolve().unwrap();
        assert_eq!(config.model, "test-model");
        assert_eq!(config.base_url, "http://localhost:9");
    }
}
