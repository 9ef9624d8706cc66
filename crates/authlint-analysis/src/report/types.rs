//! Report model types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routes::{HttpMethod, RouteHandler};

/// Validation layer. Serialized as the integer `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Layer {
    /// Admin-route authorization, owned by the Layer-1 checker.
    AdminAuth,
    /// Resource authorization on data routes.
    ResourceAuth,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::AdminAuth, Layer::ResourceAuth];

    pub fn number(&self) -> u8 {
        match self {
            Self::AdminAuth => 1,
            Self::ResourceAuth => 2,
        }
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> u8 {
        layer.number()
    }
}

impl TryFrom<u8> for Layer {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::AdminAuth),
            2 => Ok(Self::ResourceAuth),
            other => Err(format!("unknown layer {other}")),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.number())
    }
}

/// Severity of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Error/warning tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub error_count: usize,
    pub warning_count: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
    }

    pub fn absorb(&mut self, other: &SeverityCounts) {
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
    }

    pub fn total(&self) -> usize {
        self.error_count + self.warning_count
    }
}

/// Per-module tallies, split by layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCounts {
    pub layer1: SeverityCounts,
    pub layer2: SeverityCounts,
}

impl ModuleCounts {
    pub fn layer_mut(&mut self, layer: Layer) -> &mut SeverityCounts {
        match layer {
            Layer::AdminAuth => &mut self.layer1,
            Layer::ResourceAuth => &mut self.layer2,
        }
    }

    pub fn absorb(&mut self, other: &ModuleCounts) {
        self.layer1.absorb(&other.layer1);
        self.layer2.absorb(&other.layer2);
    }
}

/// One finding against one route handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIssue {
    pub issue_id: String,
    pub layer: Layer,
    pub severity: Severity,
    /// Shared by every issue raised against the same handler.
    pub route: Arc<RouteHandler>,
    pub line_number: u32,
    pub message: String,
}

impl AuthIssue {
    /// Total order: file, line, issue id, then function, path and method.
    /// Layer, severity and message break any remaining ties.
    #[allow(clippy::type_complexity)]
    pub fn sort_key(&self) -> (&str, u32, &str, &str, &str, HttpMethod, Layer, Severity, &str) {
        (
            self.route.file_path.as_str(),
            self.line_number,
            self.issue_id.as_str(),
            self.route.function_name.as_str(),
            self.route.path_template.as_str(),
            self.route.http_method,
            self.layer,
            self.severity,
            self.message.as_str(),
        )
    }
}

/// A file skipped because it could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParseFailure {
    pub file_path: String,
    /// 1-based; 0 when the failure has no location.
    pub line: u32,
    pub column: u32,
    pub error_code: String,
    pub message: String,
}

/// A handler excluded from Layer-2 analysis because it has no usable route.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoverageWarning {
    pub file_path: String,
    pub line: u32,
    pub function_name: String,
    pub reason: String,
}

/// Run-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_analyzed: usize,
    pub files_failed: usize,
    /// Files never started because the run was cancelled.
    pub files_skipped: usize,
    pub admin_handlers: usize,
    pub data_handlers: usize,
    pub unclassified_handlers: usize,
    pub call_sites: usize,
}

impl RunStats {
    pub fn absorb(&mut self, other: &RunStats) {
        self.files_analyzed += other.files_analyzed;
        self.files_failed += other.files_failed;
        self.files_skipped += other.files_skipped;
        self.admin_handlers += other.admin_handlers;
        self.data_handlers += other.data_handlers;
        self.unclassified_handlers += other.unclassified_handlers;
        self.call_sites += other.call_sites;
    }

    pub fn total_handlers(&self) -> usize {
        self.admin_handlers + self.data_handlers + self.unclassified_handlers
    }
}

/// Aggregated result of a run. Immutable once built by `ReportBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub(super) by_layer: BTreeMap<Layer, SeverityCounts>,
    pub(super) by_module: BTreeMap<String, ModuleCounts>,
    pub(super) by_issue_type: BTreeMap<String, usize>,
    pub(super) issues: Vec<AuthIssue>,
    pub(super) parse_errors: Vec<ParseFailure>,
    pub(super) coverage_warnings: Vec<CoverageWarning>,
    pub(super) stats: RunStats,
}

impl ValidationReport {
    pub fn by_layer(&self) -> &BTreeMap<Layer, SeverityCounts> {
        &self.by_layer
    }

    pub fn by_module(&self) -> &BTreeMap<String, ModuleCounts> {
        &self.by_module
    }

    pub fn by_issue_type(&self) -> &BTreeMap<String, usize> {
        &self.by_issue_type
    }

    /// Issues in their total order.
    pub fn issues(&self) -> &[AuthIssue] {
        &self.issues
    }

    pub fn parse_errors(&self) -> &[ParseFailure] {
        &self.parse_errors
    }

    pub fn coverage_warnings(&self) -> &[CoverageWarning] {
        &self.coverage_warnings
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Counts for one layer, zero when the layer produced nothing.
    pub fn layer_counts(&self, layer: Layer) -> SeverityCounts {
        self.by_layer.get(&layer).copied().unwrap_or_default()
    }

    pub fn has_errors(&self, layer: Layer) -> bool {
        self.layer_counts(layer).error_count > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.parse_errors.is_empty()
    }

    pub fn issues_for_layer(&self, layer: Layer) -> impl Iterator<Item = &AuthIssue> {
        self.issues.iter().filter(move |i| i.layer == layer)
    }
}
