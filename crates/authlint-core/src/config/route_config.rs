//! Route classification configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ADMIN_PREFIX: &str = "/admin";

/// Configuration for handler discovery and route categorization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Path prefix marking platform-administration routes. Default: `/admin`.
    pub admin_prefix: Option<String>,
    /// Function names treated as handlers even without route metadata.
    /// Default: `lambda_handler`, `handler`.
    #[serde(default)]
    pub handler_names: Vec<String>,
}

impl RouteConfig {
    pub fn effective_admin_prefix(&self) -> &str {
        self.admin_prefix.as_deref().unwrap_or(DEFAULT_ADMIN_PREFIX)
    }

    pub fn effective_handler_names(&self) -> Vec<String> {
        if self.handler_names.is_empty() {
            vec!["lambda_handler".to_string(), "handler".to_string()]
        } else {
            self.handler_names.clone()
        }
    }
}
