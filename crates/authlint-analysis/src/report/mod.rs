//! Report model: issues, tallies, and their commutative aggregation.

pub mod builder;
pub mod module_key;
pub mod types;

pub use builder::ReportBuilder;
pub use module_key::module_of;
pub use types::{
    AuthIssue, CoverageWarning, Layer, ModuleCounts, ParseFailure, RunStats, Severity,
    SeverityCounts, ValidationReport,
};
