//! Report aggregation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for report grouping.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Zero-based path component naming the module of a file. Default: 1.
    pub module_segment: Option<usize>,
}

impl ReportConfig {
    pub fn effective_module_segment(&self) -> usize {
        self.module_segment.unwrap_or(1)
    }
}
