//! Configuration system for authlint.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod authlint_config;
pub mod exception_config;
pub mod report_config;
pub mod route_config;
pub mod scan_config;
pub mod vocabulary_config;

pub use authlint_config::{AuthlintConfig, CliOverrides};
pub use exception_config::ExceptionConfig;
pub use report_config::ReportConfig;
pub use route_config::RouteConfig;
pub use scan_config::ScanConfig;
pub use vocabulary_config::{VocabularyConfig, VocabularyRuleDef};
