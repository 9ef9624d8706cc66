//! Pipeline errors.

use super::error_code::{self, AuthlintErrorCode};
use super::{ConfigError, VocabularyError};

/// Errors that can stop an analyzer from being built or a run from starting.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl AuthlintErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Vocabulary(e) => e.error_code(),
            Self::ThreadPool(_) => error_code::CONFIG_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_keeps_its_source_code() {
        let config: PipelineError = ConfigError::ValidationFailed {
            field: "scan.threads".to_string(),
            message: "too many".to_string(),
        }
        .into();
        let vocabulary: PipelineError = VocabularyError::AmbiguousRule { index: 3 }.into();
        let pool = PipelineError::ThreadPool("no threads".to_string());

        assert_eq!(config.error_code(), error_code::CONFIG_ERROR);
        assert_eq!(vocabulary.error_code(), error_code::VOCABULARY_ERROR);
        assert_eq!(pool.error_code(), error_code::CONFIG_ERROR);
        assert!(vocabulary.to_string().contains("Rule #3"));
    }
}
