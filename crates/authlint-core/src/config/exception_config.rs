//! Exception-annotation configuration.

use serde::{Deserialize, Serialize};

/// Matches `# <standard-id> exception: <reason>`.
pub const DEFAULT_EXCEPTION_PATTERN: &str = r"#\s*[A-Za-z0-9][\w.\-]*\s+exception:";

/// Configuration for the comment that exempts an admin-override call site.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExceptionConfig {
    /// Regex tested against the call's line and the preceding non-blank line.
    pub pattern: Option<String>,
}

impl ExceptionConfig {
    pub fn effective_pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_EXCEPTION_PATTERN)
    }
}
