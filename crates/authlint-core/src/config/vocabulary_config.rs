//! Callee-name vocabulary configuration.
//!
//! The vocabulary is data: an ordered list of rules mapping callee names
//! (exact `name` or regex `pattern`) to a role. The first matching rule wins.

use serde::{Deserialize, Serialize};

/// A single vocabulary rule as written in TOML.
///
/// ```toml
/// [[vocabulary.rules]]
/// name = "is_org_member"
/// role = "membership_check"
///
/// [[vocabulary.rules]]
/// pattern = "^can_[a-z0-9_]+$"
/// role = "permission_check"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRuleDef {
    pub role: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Vocabulary section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Standalone TOML file holding `[[rules]]`; replaces inline rules.
    pub path: Option<String>,
    /// Inline rules.
    #[serde(default)]
    pub rules: Vec<VocabularyRuleDef>,
    /// Keep the built-in table after the configured rules. Default: true.
    pub extend_defaults: Option<bool>,
    /// Method names whose first string argument names a remote procedure,
    /// e.g. `client.rpc("is_org_member", {...})`. Default: `rpc`.
    #[serde(default)]
    pub rpc_callees: Vec<String>,
}

impl VocabularyConfig {
    pub fn effective_extend_defaults(&self) -> bool {
        self.extend_defaults.unwrap_or(true)
    }

    pub fn effective_rpc_callees(&self) -> Vec<String> {
        if self.rpc_callees.is_empty() {
            vec!["rpc".to_string()]
        } else {
            self.rpc_callees.clone()
        }
    }
}
