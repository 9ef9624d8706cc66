//! Analysis pipeline: parse → discover → extract → match, per file, in
//! parallel, reduced into one `ValidationReport`.
//!
//! Files share nothing. Each rayon worker folds its files into a private
//! `ReportBuilder`; partial builders are merged at the end.

pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use authlint_core::config::AuthlintConfig;
use authlint_core::errors::{AuthlintErrorCode, ParseError, PipelineError};
use authlint_core::traits::{Cancellable, CancellationToken};

pub use types::{FileAnalysis, HandlerAnalysis, Layer1Checker, NoopLayer1Checker, SourceFile};

use crate::extractor::{CallSequenceExtractor, ExceptionMarker};
use crate::matchers::Layer2Suite;
use crate::parsers::parse_python;
use crate::report::{CoverageWarning, ParseFailure, ReportBuilder, ValidationReport};
use crate::routes::{RouteCategory, RouteClassifier};
use crate::vocabulary::Vocabulary;

/// The two-layer authorization analyzer. Immutable and shareable across
/// threads once built.
pub struct AuthAnalyzer {
    vocabulary: Vocabulary,
    exceptions: ExceptionMarker,
    classifier: RouteClassifier,
    layer2: Layer2Suite,
    layer1: Box<dyn Layer1Checker>,
    threads: usize,
    max_file_size: u64,
    module_segment: usize,
}

impl AuthAnalyzer {
    pub fn new(config: &AuthlintConfig) -> Result<Self, PipelineError> {
        let vocabulary = Vocabulary::from_config(&config.vocabulary)?;
        tracing::debug!(rules = vocabulary.rule_count(), "vocabulary compiled");
        Ok(Self {
            vocabulary,
            exceptions: ExceptionMarker::new(config.exceptions.effective_pattern())?,
            classifier: RouteClassifier::new(&config.routes)?,
            layer2: Layer2Suite::new(),
            layer1: Box::new(NoopLayer1Checker),
            threads: config.scan.effective_threads(),
            max_file_size: config.scan.effective_max_file_size(),
            module_segment: config.report.effective_module_segment(),
        })
    }

    /// Replace the vocabulary built from configuration.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Register the admin-route checker.
    pub fn with_layer1_checker(mut self, checker: impl Layer1Checker + 'static) -> Self {
        self.layer1 = Box::new(checker);
        self
    }

    /// Analyze one file without aggregating.
    pub fn analyze_source(&self, file: &SourceFile) -> FileAnalysis {
        FileAnalysis {
            file_path: file.path.clone(),
            result: self.analyze_file(file),
        }
    }

    /// Analyze a batch of in-memory sources.
    pub fn analyze(&self, files: &[SourceFile]) -> Result<ValidationReport, PipelineError> {
        self.analyze_with_cancellation(files, &CancellationToken::new())
    }

    /// Analyze a batch, stopping submission of new files once `token` is
    /// cancelled. Files not started are counted as skipped; the report
    /// covers everything that did run.
    pub fn analyze_with_cancellation<C: Cancellable + Sync>(
        &self,
        files: &[SourceFile],
        token: &C,
    ) -> Result<ValidationReport, PipelineError> {
        self.run(files, token, |file| self.analyze_source(file))
    }

    /// Read and analyze files from disk. Unreadable or oversized files are
    /// reported as parse failures.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Result<ValidationReport, PipelineError> {
        self.run(paths, &CancellationToken::new(), |path| {
            match SourceFile::read(path, self.max_file_size) {
                Ok(file) => self.analyze_source(&file),
                Err(e) => FileAnalysis {
                    file_path: path.display().to_string(),
                    result: Err(e),
                },
            }
        })
    }

    fn run<T, C, F>(&self, items: &[T], token: &C, analyze: F) -> Result<ValidationReport, PipelineError>
    where
        T: Sync,
        C: Cancellable + Sync,
        F: Fn(&T) -> FileAnalysis + Sync + Send,
    {
        let span = tracing::info_span!("authlint.analyze", files = items.len());
        let _guard = span.enter();

        let segment = self.module_segment;
        let reduce = || {
            items
                .par_iter()
                .fold(
                    || ReportBuilder::new(segment),
                    |mut builder, item| {
                        if token.is_cancelled() {
                            builder.record_skipped(1);
                        } else {
                            Self::accumulate(&mut builder, analyze(item));
                        }
                        builder
                    },
                )
                .reduce(|| ReportBuilder::new(segment), ReportBuilder::merge)
        };

        let builder = if self.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;
            pool.install(reduce)
        } else {
            reduce()
        };

        let report = builder.build();
        let stats = report.stats();
        tracing::info!(
            files = stats.files_analyzed,
            failed = stats.files_failed,
            skipped = stats.files_skipped,
            handlers = stats.total_handlers(),
            issues = report.issues().len(),
            "analysis complete"
        );
        Ok(report)
    }

    fn analyze_file(&self, file: &SourceFile) -> Result<Vec<HandlerAnalysis>, ParseError> {
        let size = file.source.len() as u64;
        if size > self.max_file_size {
            return Err(ParseError::TooLarge {
                path: file.path.clone(),
                size,
                limit: self.max_file_size,
            });
        }

        let tree = parse_python(&file.source, &file.path)?;
        let lines: Vec<&str> = file.source.lines().collect();
        let extractor = CallSequenceExtractor::new(&self.vocabulary, &self.exceptions);

        let mut analyses = Vec::new();
        for discovered in self.classifier.discover(&tree, &file.source, &lines, &file.path) {
            let call_sites: Arc<[_]> = extractor.extract(discovered.function, &file.source, &lines).into();
            for route in discovered.routes {
                let route = Arc::new(route);
                let issues = match route.category {
                    RouteCategory::Admin => self.layer1.check(&route, &call_sites),
                    RouteCategory::Data => self.layer2.check(&route, &call_sites),
                    RouteCategory::Unclassified => Vec::new(),
                };
                analyses.push(HandlerAnalysis {
                    route,
                    call_sites: Arc::clone(&call_sites),
                    issues,
                });
            }
        }

        tracing::debug!(file = %file.path, handlers = analyses.len(), "file analyzed");
        Ok(analyses)
    }

    fn accumulate(builder: &mut ReportBuilder, analysis: FileAnalysis) {
        let handlers = match analysis.result {
            Ok(handlers) => handlers,
            Err(e) => {
                tracing::warn!(file = %analysis.file_path, error = %e, "skipping file");
                let (line, column) = e.location();
                builder.add_parse_failure(ParseFailure {
                    file_path: analysis.file_path,
                    line,
                    column,
                    error_code: e.error_code().to_string(),
                    message: e.to_string(),
                });
                return;
            }
        };

        builder.record_file();
        for handler in handlers {
            let route = &handler.route;
            builder.record_handler(route.category, handler.call_sites.len());
            if route.category == RouteCategory::Unclassified {
                let reason = if route.path_template.is_empty() {
                    "no route metadata".to_string()
                } else {
                    format!("path `{}` matches no route convention", route.path_template)
                };
                builder.add_coverage_warning(CoverageWarning {
                    file_path: route.file_path.clone(),
                    line: route.start_line,
                    function_name: route.function_name.clone(),
                    reason,
                });
            }
            builder.add_issues(handler.issues);
        }
    }
}
