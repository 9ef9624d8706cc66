//! Top-level authlint configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ExceptionConfig, ReportConfig, RouteConfig, ScanConfig, VocabularyConfig};
use crate::errors::ConfigError;

/// Project config file name, looked up in the analysis root.
pub const PROJECT_CONFIG_FILE: &str = "authlint.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`AUTHLINT_*`)
/// 3. Project config (`authlint.toml` in project root)
/// 4. User config (`~/.authlint/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthlintConfig {
    pub scan: ScanConfig,
    pub routes: RouteConfig,
    pub vocabulary: VocabularyConfig,
    pub exceptions: ExceptionConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scan_threads: Option<usize>,
    pub scan_max_file_size: Option<u64>,
    pub admin_prefix: Option<String>,
    pub vocabulary_path: Option<String>,
}

impl AuthlintConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing and embedding).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &AuthlintConfig) -> Result<(), ConfigError> {
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref prefix) = config.routes.admin_prefix {
            if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "routes.admin_prefix".to_string(),
                    message: "must start with '/' and name at least one segment".to_string(),
                });
            }
        }
        if let Some(ref pattern) = config.exceptions.pattern {
            if pattern.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "exceptions.pattern".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        for (index, rule) in config.vocabulary.rules.iter().enumerate() {
            if rule.name.is_some() == rule.pattern.is_some() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("vocabulary.rules[{index}]"),
                    message: "set exactly one of `name` or `pattern`".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.authlint/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut AuthlintConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: AuthlintConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it sets a value.
    fn merge(base: &mut AuthlintConfig, other: &AuthlintConfig) {
        // Scan
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }

        // Routes
        if other.routes.admin_prefix.is_some() {
            base.routes.admin_prefix = other.routes.admin_prefix.clone();
        }
        if !other.routes.handler_names.is_empty() {
            base.routes.handler_names = other.routes.handler_names.clone();
        }

        // Vocabulary
        if other.vocabulary.path.is_some() {
            base.vocabulary.path = other.vocabulary.path.clone();
        }
        if !other.vocabulary.rules.is_empty() {
            base.vocabulary.rules = other.vocabulary.rules.clone();
        }
        if other.vocabulary.extend_defaults.is_some() {
            base.vocabulary.extend_defaults = other.vocabulary.extend_defaults;
        }
        if !other.vocabulary.rpc_callees.is_empty() {
            base.vocabulary.rpc_callees = other.vocabulary.rpc_callees.clone();
        }

        // Exceptions
        if other.exceptions.pattern.is_some() {
            base.exceptions.pattern = other.exceptions.pattern.clone();
        }

        // Report
        if other.report.module_segment.is_some() {
            base.report.module_segment = other.report.module_segment;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `AUTHLINT_SCAN_THREADS`, `AUTHLINT_ROUTES_ADMIN_PREFIX`, etc.
    fn apply_env_overrides(config: &mut AuthlintConfig) {
        if let Ok(val) = std::env::var("AUTHLINT_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUTHLINT_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUTHLINT_ROUTES_ADMIN_PREFIX") {
            config.routes.admin_prefix = Some(val);
        }
        if let Ok(val) = std::env::var("AUTHLINT_VOCABULARY_PATH") {
            config.vocabulary.path = Some(val);
        }
        if let Ok(val) = std::env::var("AUTHLINT_EXCEPTIONS_PATTERN") {
            config.exceptions.pattern = Some(val);
        }
        if let Ok(val) = std::env::var("AUTHLINT_REPORT_MODULE_SEGMENT") {
            if let Ok(v) = val.parse::<usize>() {
                config.report.module_segment = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut AuthlintConfig, cli: &CliOverrides) {
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.scan_max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(ref v) = cli.admin_prefix {
            config.routes.admin_prefix = Some(v.clone());
        }
        if let Some(ref v) = cli.vocabulary_path {
            config.vocabulary.path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.authlint/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".authlint"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
