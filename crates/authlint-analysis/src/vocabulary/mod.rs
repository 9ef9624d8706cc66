//! Callee-name vocabulary: the single place where call names become roles.
//!
//! The table is data (TOML), compiled once into exact-name lookups and
//! regexes. Classification preserves rule order: the first rule that matches
//! a name decides its role.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use authlint_core::config::{VocabularyConfig, VocabularyRuleDef};
use authlint_core::errors::VocabularyError;

const DEFAULT_VOCABULARY: &str = include_str!("default_vocabulary.toml");

/// Role of an authorization-relevant call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallRole {
    MembershipCheck,
    PermissionCheck,
    AdminCheck,
    /// Tracked in the call sequence but ignored by every matcher.
    Unknown,
}

impl CallRole {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "membership_check" => Some(Self::MembershipCheck),
            "permission_check" => Some(Self::PermissionCheck),
            "admin_check" => Some(Self::AdminCheck),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MembershipCheck => "membership_check",
            Self::PermissionCheck => "permission_check",
            Self::AdminCheck => "admin_check",
            Self::Unknown => "unknown",
        }
    }
}

/// A standalone vocabulary file: `[[rules]]` entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyFile {
    #[serde(default)]
    pub rules: Vec<VocabularyRuleDef>,
}

#[derive(Debug, Clone)]
struct PatternRule {
    order: usize,
    regex: regex::Regex,
    role: CallRole,
}

/// Compiled vocabulary, shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    exact: FxHashMap<String, (usize, CallRole)>,
    patterns: Vec<PatternRule>,
    rpc_callees: FxHashSet<String>,
}

impl Vocabulary {
    /// The built-in table with the default RPC callee (`rpc`).
    pub fn builtin() -> Result<Self, VocabularyError> {
        let rules = Self::default_rules()?;
        Self::compile(&rules, ["rpc".to_string()])
    }

    /// Rules of the built-in table, in evaluation order.
    pub fn default_rules() -> Result<Vec<VocabularyRuleDef>, VocabularyError> {
        let file: VocabularyFile =
            toml::from_str(DEFAULT_VOCABULARY).map_err(|e| VocabularyError::Load {
                path: "<builtin>".to_string(),
                message: e.to_string(),
            })?;
        Ok(file.rules)
    }

    /// Build from the `[vocabulary]` config section.
    ///
    /// Configured rules (from `path` when set, else inline) come first; the
    /// built-in table follows unless `extend_defaults = false`.
    pub fn from_config(config: &VocabularyConfig) -> Result<Self, VocabularyError> {
        let mut rules = match config.path {
            Some(ref path) => Self::load_file(std::path::Path::new(path))?,
            None => config.rules.clone(),
        };
        if config.effective_extend_defaults() {
            rules.extend(Self::default_rules()?);
        }
        Self::compile(&rules, config.effective_rpc_callees())
    }

    /// Build from a standalone TOML document with `[[rules]]` only.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = toml::from_str(toml_str).map_err(|e| VocabularyError::Load {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::compile(&file.rules, ["rpc".to_string()])
    }

    fn load_file(path: &std::path::Path) -> Result<Vec<VocabularyRuleDef>, VocabularyError> {
        let content = std::fs::read_to_string(path).map_err(|e| VocabularyError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file: VocabularyFile = toml::from_str(&content).map_err(|e| VocabularyError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(file.rules)
    }

    /// Compile rule definitions. Disabled rules are skipped but keep their slot.
    pub fn compile(
        rules: &[VocabularyRuleDef],
        rpc_callees: impl IntoIterator<Item = String>,
    ) -> Result<Self, VocabularyError> {
        let mut exact = FxHashMap::default();
        let mut patterns = Vec::new();

        for (index, rule) in rules.iter().enumerate() {
            if rule.enabled == Some(false) {
                continue;
            }
            let role = CallRole::parse_str(&rule.role).ok_or_else(|| VocabularyError::UnknownRole {
                index,
                role: rule.role.clone(),
            })?;
            match (&rule.name, &rule.pattern) {
                (Some(name), None) => {
                    exact.entry(name.clone()).or_insert((index, role));
                }
                (None, Some(pattern)) => {
                    let regex = regex::Regex::new(pattern).map_err(|e| {
                        VocabularyError::InvalidPattern {
                            index,
                            message: e.to_string(),
                        }
                    })?;
                    patterns.push(PatternRule {
                        order: index,
                        regex,
                        role,
                    });
                }
                _ => return Err(VocabularyError::AmbiguousRule { index }),
            }
        }

        Ok(Self {
            exact,
            patterns,
            rpc_callees: rpc_callees.into_iter().collect(),
        })
    }

    /// Role of a normalized callee name, or `None` when no rule matches.
    pub fn classify(&self, name: &str) -> Option<CallRole> {
        let exact = self.exact.get(name).copied();
        let limit = exact.map(|(order, _)| order).unwrap_or(usize::MAX);
        for rule in &self.patterns {
            if rule.order > limit {
                break;
            }
            if rule.regex.is_match(name) {
                return Some(rule.role);
            }
        }
        exact.map(|(_, role)| role)
    }

    /// Whether `method` names an RPC dispatcher whose first string argument
    /// is the real callee.
    pub fn is_rpc_callee(&self, method: &str) -> bool {
        self.rpc_callees.contains(method)
    }

    pub fn rule_count(&self) -> usize {
        self.exact.len() + self.patterns.len()
    }
}
