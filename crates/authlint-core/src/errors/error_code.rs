//! Stable error codes surfaced to callers and log consumers.

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const GRAMMAR_ERROR: &str = "GRAMMAR_ERROR";
pub const VOCABULARY_ERROR: &str = "VOCABULARY_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";

/// Maps an error to its stable code.
pub trait AuthlintErrorCode {
    fn error_code(&self) -> &'static str;
}
