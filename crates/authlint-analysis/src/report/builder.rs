//! Commutative aggregation of issues into a `ValidationReport`.

use std::collections::BTreeMap;

use super::module_key::module_of;
use super::types::{
    AuthIssue, CoverageWarning, Layer, ModuleCounts, ParseFailure, RunStats, SeverityCounts,
    ValidationReport,
};
use crate::routes::RouteCategory;

/// Accumulates partial results. Merging builders sums counters and
/// concatenates lists, so the final report does not depend on the order in
/// which files or partial reports were combined.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    module_segment: usize,
    by_layer: BTreeMap<Layer, SeverityCounts>,
    by_module: BTreeMap<String, ModuleCounts>,
    by_issue_type: BTreeMap<String, usize>,
    issues: Vec<AuthIssue>,
    parse_errors: Vec<ParseFailure>,
    coverage_warnings: Vec<CoverageWarning>,
    stats: RunStats,
}

impl ReportBuilder {
    pub fn new(module_segment: usize) -> Self {
        Self {
            module_segment,
            by_layer: BTreeMap::new(),
            by_module: BTreeMap::new(),
            by_issue_type: BTreeMap::new(),
            issues: Vec::new(),
            parse_errors: Vec::new(),
            coverage_warnings: Vec::new(),
            stats: RunStats::default(),
        }
    }

    pub fn add_issue(&mut self, issue: AuthIssue) {
        self.by_layer.entry(issue.layer).or_default().record(issue.severity);
        self.by_module
            .entry(module_of(&issue.route.file_path, self.module_segment))
            .or_default()
            .layer_mut(issue.layer)
            .record(issue.severity);
        *self.by_issue_type.entry(issue.issue_id.clone()).or_default() += 1;
        self.issues.push(issue);
    }

    pub fn add_issues(&mut self, issues: impl IntoIterator<Item = AuthIssue>) {
        for issue in issues {
            self.add_issue(issue);
        }
    }

    pub fn add_parse_failure(&mut self, failure: ParseFailure) {
        self.stats.files_failed += 1;
        self.parse_errors.push(failure);
    }

    pub fn add_coverage_warning(&mut self, warning: CoverageWarning) {
        self.coverage_warnings.push(warning);
    }

    pub fn record_file(&mut self) {
        self.stats.files_analyzed += 1;
    }

    pub fn record_skipped(&mut self, count: usize) {
        self.stats.files_skipped += count;
    }

    pub fn record_handler(&mut self, category: RouteCategory, call_sites: usize) {
        match category {
            RouteCategory::Admin => self.stats.admin_handlers += 1,
            RouteCategory::Data => self.stats.data_handlers += 1,
            RouteCategory::Unclassified => self.stats.unclassified_handlers += 1,
        }
        self.stats.call_sites += call_sites;
    }

    /// Combine two partial results.
    pub fn merge(mut self, other: ReportBuilder) -> Self {
        for (layer, counts) in &other.by_layer {
            self.by_layer.entry(*layer).or_default().absorb(counts);
        }
        for (module, counts) in &other.by_module {
            self.by_module.entry(module.clone()).or_default().absorb(counts);
        }
        for (issue_id, count) in &other.by_issue_type {
            *self.by_issue_type.entry(issue_id.clone()).or_default() += count;
        }
        self.issues.extend(other.issues);
        self.parse_errors.extend(other.parse_errors);
        self.coverage_warnings.extend(other.coverage_warnings);
        self.stats.absorb(&other.stats);
        self
    }

    /// Sort every list into its total order and freeze.
    pub fn build(mut self) -> ValidationReport {
        self.issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.parse_errors.sort();
        self.coverage_warnings.sort();

        debug_assert!(self.is_consistent(), "report counters disagree with issue list");

        ValidationReport {
            by_layer: self.by_layer,
            by_module: self.by_module,
            by_issue_type: self.by_issue_type,
            issues: self.issues,
            parse_errors: self.parse_errors,
            coverage_warnings: self.coverage_warnings,
            stats: self.stats,
        }
    }

    /// Counters must equal a recount of the issue list.
    fn is_consistent(&self) -> bool {
        let layer_total: usize = self.by_layer.values().map(SeverityCounts::total).sum();
        let module_total: usize = self
            .by_module
            .values()
            .map(|m| m.layer1.total() + m.layer2.total())
            .sum();
        let type_total: usize = self.by_issue_type.values().sum();
        let n = self.issues.len();
        if layer_total != n || module_total != n || type_total != n {
            return false;
        }
        Layer::ALL.iter().all(|layer| {
            let expected = self.issues.iter().filter(|i| i.layer == *layer).count();
            self.by_layer.get(layer).map_or(0, SeverityCounts::total) == expected
        }) && self.parse_errors.len() == self.stats.files_failed
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use crate::routes::{HttpMethod, RouteHandler};
    use std::sync::Arc;

    fn issue(file: &str, line: u32, id: &str, layer: Layer) -> AuthIssue {
        AuthIssue {
            issue_id: id.to_string(),
            layer,
            severity: Severity::Error,
            route: Arc::new(RouteHandler {
                file_path: file.to_string(),
                function_name: "handler".to_string(),
                http_method: HttpMethod::Get,
                path_template: "/chat".to_string(),
                category: RouteCategory::Data,
                start_line: 1,
                end_line: 10,
            }),
            line_number: line,
            message: String::new(),
        }
    }

    #[test]
    fn counters_follow_issues() {
        let mut builder = ReportBuilder::new(1);
        builder.add_issue(issue("fn/chat/a.py", 3, "x", Layer::ResourceAuth));
        builder.add_issue(issue("fn/chat/a.py", 1, "y", Layer::ResourceAuth));
        builder.add_issue(issue("fn/admin/b.py", 2, "z", Layer::AdminAuth));
        let report = builder.build();

        assert_eq!(report.layer_counts(Layer::ResourceAuth).error_count, 2);
        assert_eq!(report.layer_counts(Layer::AdminAuth).error_count, 1);
        assert_eq!(report.by_module()["chat"].layer2.error_count, 2);
        assert_eq!(report.by_module()["admin"].layer1.error_count, 1);
        assert_eq!(report.by_issue_type()["x"], 1);
        assert!(report.has_errors(Layer::AdminAuth));
    }

    #[test]
    fn build_sorts_by_file_then_line() {
        let mut builder = ReportBuilder::new(1);
        builder.add_issue(issue("b.py", 1, "x", Layer::ResourceAuth));
        builder.add_issue(issue("a.py", 9, "x", Layer::ResourceAuth));
        builder.add_issue(issue("a.py", 2, "y", Layer::ResourceAuth));
        let report = builder.build();
        let order: Vec<(&str, u32)> = report
            .issues()
            .iter()
            .map(|i| (i.route.file_path.as_str(), i.line_number))
            .collect();
        assert_eq!(order, vec![("a.py", 2), ("a.py", 9), ("b.py", 1)]);
    }

    #[test]
    fn empty_builder_gives_empty_report() {
        let report = ReportBuilder::default().build();
        assert!(report.is_clean());
        assert!(report.by_layer().is_empty());
        assert!(!report.has_errors(Layer::ResourceAuth));
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut builder = ReportBuilder::new(1);
        builder.add_issue(issue("a.py", 1, "x", Layer::ResourceAuth));
        builder.record_file();
        let alone = builder.clone().build();
        let merged = builder.merge(ReportBuilder::new(1)).build();
        assert_eq!(alone, merged);
    }
}
