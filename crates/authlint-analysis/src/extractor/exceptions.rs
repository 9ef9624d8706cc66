//! Exception annotations: `# <standard-id> exception: <reason>` comments that
//! exempt a single call site from the admin-override check.

use authlint_core::errors::ConfigError;
use regex::Regex;

/// Tests source lines for the exception-marker convention.
#[derive(Debug, Clone)]
pub struct ExceptionMarker {
    pattern: Regex,
}

impl ExceptionMarker {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::ValidationFailed {
            field: "exceptions.pattern".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { pattern })
    }

    /// Whether the call starting on 1-based `line` is annotated.
    ///
    /// `statement_line` is where the enclosing statement starts; it equals
    /// `line` unless the call is continued from an earlier line. Accepted
    /// annotations are a trailing comment on the call line or on the
    /// statement's first line, and a comment-only line directly above either
    /// of them (blank lines skipped). A trailing comment on a neighbouring
    /// statement never annotates.
    pub fn is_annotated(&self, lines: &[&str], line: u32, statement_line: u32) -> bool {
        let continued = (statement_line != 0 && statement_line < line).then_some(statement_line);
        std::iter::once(line)
            .chain(continued)
            .any(|anchor| self.trailing(lines, anchor) || self.preceding(lines, anchor))
    }

    fn trailing(&self, lines: &[&str], line: u32) -> bool {
        line > 0
            && lines
                .get((line - 1) as usize)
                .is_some_and(|current| self.line_matches(current))
    }

    fn preceding(&self, lines: &[&str], line: u32) -> bool {
        if line == 0 {
            return false;
        }
        let idx = ((line - 1) as usize).min(lines.len());
        lines[..idx]
            .iter()
            .rev()
            .find(|l| !l.trim().is_empty())
            .is_some_and(|prev| prev.trim_start().starts_with('#') && self.pattern.is_match(prev))
    }

    fn line_matches(&self, line: &str) -> bool {
        line.contains('#') && self.pattern.is_match(line)
    }
}
