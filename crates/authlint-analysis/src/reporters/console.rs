//! Console reporter: human-readable output with optional color codes.

use super::Reporter;
use crate::report::{Layer, Severity, ValidationReport};

/// Console reporter for terminal output.
pub struct ConsoleReporter {
    pub use_color: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn color_start(&self, severity: Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[31m",   // red
            Severity::Warning => "\x1b[33m", // yellow
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, report: &ValidationReport) -> Result<String, String> {
        let mut output = String::new();

        output.push_str("Authorization Validation Report\n");
        output.push_str("===============================\n\n");

        for layer in Layer::ALL {
            let issues: Vec<_> = report.issues_for_layer(layer).collect();
            let counts = report.layer_counts(layer);
            output.push_str(&format!(
                "{} ({} errors, {} warnings)\n",
                match layer {
                    Layer::AdminAuth => "Layer 1: admin authorization",
                    Layer::ResourceAuth => "Layer 2: resource authorization",
                },
                counts.error_count,
                counts.warning_count
            ));
            for issue in issues {
                output.push_str(&format!(
                    "  {}{}{}: {}:{}: [{}] {} in {}\n",
                    self.color_start(issue.severity),
                    issue.severity,
                    self.color_end(),
                    issue.route.file_path,
                    issue.line_number,
                    issue.issue_id,
                    issue.message,
                    issue.route.function_name,
                ));
            }
            output.push('\n');
        }

        if !report.by_module().is_empty() {
            output.push_str("By module:\n");
            for (module, counts) in report.by_module() {
                output.push_str(&format!(
                    "  {module}: layer 1 {}/{}, layer 2 {}/{} (errors/warnings)\n",
                    counts.layer1.error_count,
                    counts.layer1.warning_count,
                    counts.layer2.error_count,
                    counts.layer2.warning_count,
                ));
            }
            output.push('\n');
        }

        if !report.parse_errors().is_empty() {
            output.push_str("Parse errors (files skipped):\n");
            for failure in report.parse_errors() {
                output.push_str(&format!(
                    "  {}:{}:{}: {}\n",
                    failure.file_path, failure.line, failure.column, failure.message
                ));
            }
            output.push('\n');
        }

        if !report.coverage_warnings().is_empty() {
            output.push_str("Unclassified handlers (not checked):\n");
            for warning in report.coverage_warnings() {
                output.push_str(&format!(
                    "  {}:{}: {} ({})\n",
                    warning.file_path, warning.line, warning.function_name, warning.reason
                ));
            }
            output.push('\n');
        }

        let stats = report.stats();
        output.push_str(&format!(
            "Summary: {} files, {} handlers ({} data, {} admin, {} unclassified), {} issues\n",
            stats.files_analyzed,
            stats.total_handlers(),
            stats.data_handlers,
            stats.admin_handlers,
            stats.unclassified_handlers,
            report.issues().len(),
        ));
        if stats.files_skipped > 0 {
            output.push_str(&format!("Cancelled: {} files not analyzed\n", stats.files_skipped));
        }

        let failed = Layer::ALL.iter().any(|l| report.has_errors(*l));
        output.push_str(if failed { "Result: FAILED\n" } else { "Result: PASSED\n" });

        Ok(output)
    }
}
