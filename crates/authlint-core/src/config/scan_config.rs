//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Configuration for reading and scheduling source files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Worker threads for per-file analysis. 0 or unset = rayon default.
    pub threads: Option<usize>,
    /// Maximum file size to analyze, in bytes. Default: 1 MiB.
    pub max_file_size: Option<u64>,
}

impl ScanConfig {
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1024 * 1024)
    }
}
