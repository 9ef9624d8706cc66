//! Pipeline input and per-file output types.

use std::path::Path;
use std::sync::Arc;

use authlint_core::errors::ParseError;

use crate::extractor::CallSite;
use crate::report::AuthIssue;
use crate::routes::RouteHandler;

/// One source file handed to the analyzer. Discovery happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as it should appear in the report.
    pub path: String,
    pub source: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Read a file from disk, refusing anything larger than `max_size` bytes.
    pub fn read(path: &Path, max_size: u64) -> Result<Self, ParseError> {
        let display = path.display().to_string();
        let metadata = std::fs::metadata(path).map_err(|e| ParseError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;
        if metadata.len() > max_size {
            return Err(ParseError::TooLarge {
                path: display,
                size: metadata.len(),
                limit: max_size,
            });
        }
        let source = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: display,
            source,
        })
    }
}

/// Result of analyzing one route of one handler.
#[derive(Debug, Clone)]
pub struct HandlerAnalysis {
    pub route: Arc<RouteHandler>,
    /// Shared by every route of the same function.
    pub call_sites: Arc<[CallSite]>,
    pub issues: Vec<AuthIssue>,
}

/// Result of analyzing one file.
#[derive(Debug)]
pub struct FileAnalysis {
    pub file_path: String,
    pub result: Result<Vec<HandlerAnalysis>, ParseError>,
}

impl FileAnalysis {
    pub fn handlers(&self) -> &[HandlerAnalysis] {
        match &self.result {
            Ok(handlers) => handlers,
            Err(_) => &[],
        }
    }

    pub fn issues(&self) -> impl Iterator<Item = &AuthIssue> {
        self.handlers().iter().flat_map(|h| h.issues.iter())
    }
}

/// Admin-route authorization, validated outside this crate.
///
/// Called once per `admin` route; whatever it returns is aggregated as
/// Layer-1 issues.
pub trait Layer1Checker: Send + Sync {
    fn check(&self, route: &Arc<RouteHandler>, call_sites: &[CallSite]) -> Vec<AuthIssue>;
}

/// Accepts every admin route.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLayer1Checker;

impl Layer1Checker for NoopLayer1Checker {
    fn check(&self, _route: &Arc<RouteHandler>, _call_sites: &[CallSite]) -> Vec<AuthIssue> {
        Vec::new()
    }
}
