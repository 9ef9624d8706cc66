//! Vocabulary errors.

use super::error_code::{self, AuthlintErrorCode};

/// Errors raised while compiling the callee-name vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("Rule #{index} must set exactly one of `name` or `pattern`")]
    AmbiguousRule { index: usize },

    #[error("Unknown role '{role}' in rule #{index}")]
    UnknownRole { index: usize, role: String },

    #[error("Invalid pattern in rule #{index}: {message}")]
    InvalidPattern { index: usize, message: String },

    #[error("Failed to load vocabulary from {path}: {message}")]
    Load { path: String, message: String },
}

impl AuthlintErrorCode for VocabularyError {
    fn error_code(&self) -> &'static str {
        error_code::VOCABULARY_ERROR
    }
}
