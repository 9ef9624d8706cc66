//! Error handling for authlint.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod parse_error;
pub mod pipeline_error;
pub mod vocabulary_error;

pub use config_error::ConfigError;
pub use error_code::AuthlintErrorCode;
pub use parse_error::ParseError;
pub use pipeline_error::PipelineError;
pub use vocabulary_error::VocabularyError;
