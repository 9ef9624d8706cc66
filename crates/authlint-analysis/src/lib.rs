//! authlint-analysis: the two-layer authorization analyzer.
//!
//! Per file, leaves first:
//! - `parsers`: tree-sitter Python parsing, syntax-error detection
//! - `routes`: handler discovery and admin/data/unclassified classification
//! - `vocabulary`: configurable callee-name → role table
//! - `extractor`: ordered, role-tagged call sequence of a handler body
//! - `matchers`: the three Layer-2 checks
//! - `report`: commutative aggregation into a `ValidationReport`
//! - `pipeline`: parallel orchestration over many files
//! - `reporters`: JSON and console renderings of a report

pub mod extractor;
pub mod matchers;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod reporters;
pub mod routes;
pub mod vocabulary;

pub use extractor::{CallSequenceExtractor, CallSite};
pub use pipeline::{AuthAnalyzer, FileAnalysis, HandlerAnalysis, Layer1Checker, SourceFile};
pub use report::{AuthIssue, Layer, ReportBuilder, Severity, ValidationReport};
pub use routes::{HttpMethod, RouteCategory, RouteClassifier, RouteHandler};
pub use vocabulary::{CallRole, Vocabulary};
