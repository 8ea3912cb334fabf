use thiserror::Error;

/// Failure taxonomy for the tutor pipeline. Upstream-caused variants
/// (`Unauthorized`, `RateLimited`, `BadRequest`, `Provider`, `Network`)
/// are classified from the provider response; the rest are local.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("the tutor returned an empty reply")]
    EmptyReply,
    #[error("chat provider rejected the API credentials")]
    Unauthorized,
    #[error("chat provider rate limit reached, try again shortly")]
    RateLimited,
    #[error("chat provider rejected the request: {0}")]
    BadRequest(String),
    #[error("chat provider error ({status}): {message}")]
    Provider { status: u16, message: String },
    #[error("could not reach chat provider: {0}")]
    Network(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("tutor service error: {0}")]
    Service(String),
}

pub use crate::Result;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_variants_have_distinct_messages() {
        let unauthorized = TutorError::Unauthorized.to_string();
        let rate_limited = TutorError::RateLimited.to_string();
        assert_ne!(unauthorized, rate_limited);
        assert!(unauthorized.contains("credentials"));
        assert!(rate_limited.contains("rate limit"));
    }

    #[test]
    fn provider_variant_carries_status_and_message() {
        let err = TutorError::Provider {
            status: 503,
            message: "overloaded".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("overloaded"));
    }
}
