//! Error types for the planner gateway.

use guide_core::GuideError;
use thiserror::Error;

/// Errors that can occur while talking to the planner service.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// No API key was configured.
    #[error("OPENROUTER_API_KEY not set")]
    NoApiKey,

    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("api error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body was not a chat completion.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The completion carried no text.
    #[error("planner returned an empty response")]
    EmptyResponse,
}

impl From<PlannerError> for GuideError {
    fn from(err: PlannerError) -> Self {
        GuideError::Planner(err.to_string())
    }
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::Api {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "api error (429): rate limited");
    }

    #[test]
    fn test_into_guide_error() {
        let err: GuideError = PlannerError::NoApiKey.into();
        assert!(matches!(err, GuideError::Planner(msg) if msg.contains("OPENROUTER_API_KEY")));
    }
}
