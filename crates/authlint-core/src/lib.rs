//! authlint-core: shared foundation for the authlint analyzer.
//!
//! - `config`: TOML configuration with layered resolution
//! - `errors`: one `thiserror` enum per subsystem, with stable error codes
//! - `traits`: cooperative cancellation
//! - `tracing_setup`: subscriber installation for structured logs

pub mod config;
pub mod errors;
pub mod traits;
pub mod tracing_setup;

pub use config::AuthlintConfig;
pub use errors::{ConfigError, ParseError, PipelineError, VocabularyError};
pub use traits::{Cancellable, CancellationToken};
