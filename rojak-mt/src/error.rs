use std::time::Duration;
use thiserror::Error;

/// Error types for translation and speech providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// Provider misconfigured or rejected our request (bad key, 4xx)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport-level failure talking to a provider
    #[error("Network error: {0}")]
    NetworkError(String),
    /// No model is configured for this pipeline
    #[error("Translation model unavailable: {0}")]
    ModelUnavailable(String),
    /// The provider answered but the translation failed
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// The provider did not answer within the configured bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Speech synthesis failed
    #[error("Speech synthesis error: {0}")]
    SpeechError(String),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MtError::NetworkError(format!("request timed out: {}", err))
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            MtError::ConfigError("API key cannot be empty".to_string()).to_string(),
            "Configuration error: API key cannot be empty"
        );
        assert_eq!(
            MtError::Timeout(Duration::from_secs(20)).to_string(),
            "Timed out after 20s"
        );
        assert_eq!(
            MtError::Timeout(Duration::from_millis(20)).to_string(),
            "Timed out after 20ms"
        );
        assert!(
            MtError::ModelUnavailable("no API key".to_string())
                .to_string()
                .contains("unavailable")
        );
    }
}
