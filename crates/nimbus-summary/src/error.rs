//! Summarization error types.

use nimbus_core::NetworkError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SummarizationError {
    #[error("No API key configured for the text-generation service")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("API error: {0}")]
    Api(String),

    #[error("Text-generation response contained no text")]
    EmptyResponse,
}

impl SummarizationError {
    /// Whether the service answered but had nothing to say.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, Self::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_empty_response_is_empty() {
        assert!(SummarizationError::EmptyResponse.is_empty_response());
        assert!(!SummarizationError::MissingCredentials.is_empty_response());
        assert!(!SummarizationError::Api("quota".into()).is_empty_response());
    }
}
