//! Parse errors.

use super::error_code::{self, AuthlintErrorCode};

/// Errors that can occur while reading or parsing a source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to load grammar: {0}")]
    GrammarLoad(String),

    #[error("Parser produced no tree for {path}")]
    NoTree { path: String },

    #[error("Syntax error in {path} at {line}:{column} ({error_count} error node(s))")]
    Syntax {
        path: String,
        line: u32,
        column: u32,
        error_count: u32,
    },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("{path} exceeds the size limit ({size} > {limit} bytes)")]
    TooLarge { path: String, size: u64, limit: u64 },
}

impl ParseError {
    /// Best-effort 1-based location of the failure, `(0, 0)` when unknown.
    pub fn location(&self) -> (u32, u32) {
        match self {
            Self::Syntax { line, column, .. } => (*line, *column),
            _ => (0, 0),
        }
    }
}

impl AuthlintErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::GrammarLoad(_) => error_code::GRAMMAR_ERROR,
            Self::Io { .. } | Self::TooLarge { .. } => error_code::IO_ERROR,
            Self::NoTree { .. } | Self::Syntax { .. } => error_code::PARSE_ERROR,
        }
    }
}
