//! JSON reporter: the report data contract plus a pass/fail summary.

use serde_json::json;

use super::Reporter;
use crate::report::{Layer, ValidationReport};

/// JSON reporter for machine-readable output.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, report: &ValidationReport) -> Result<String, String> {
        let report_value = serde_json::to_value(report).map_err(|e| e.to_string())?;
        let output = json!({
            "passed": !Layer::ALL.iter().any(|l| report.has_errors(*l)),
            "total_issues": report.issues().len(),
            "parse_error_count": report.parse_errors().len(),
            "coverage_warning_count": report.coverage_warnings().len(),
            "report": report_value,
        });
        serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
    }
}
