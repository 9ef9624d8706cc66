//! Route handler types.

use serde::{Deserialize, Serialize};

/// HTTP method of a route. Anything outside the five tracked verbs is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Unknown,
}

impl HttpMethod {
    pub fn parse_str(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route category. Every handler is in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteCategory {
    /// Platform administration, validated by the Layer-1 checker.
    Admin,
    /// Tenant-owned resource, subject to Layer-2 checks.
    Data,
    /// No usable route metadata; excluded from Layer-2, reported as coverage.
    Unclassified,
}

/// One request handler (function × route) found in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteHandler {
    pub file_path: String,
    pub function_name: String,
    pub http_method: HttpMethod,
    /// e.g. `/chat/sessions/{id}`; empty when unrecoverable.
    pub path_template: String,
    pub category: RouteCategory,
    /// 1-based, inclusive.
    pub start_line: u32,
    pub end_line: u32,
}

impl RouteHandler {
    /// `GET /chat/sessions/{id}`, or the function name when there is no path.
    pub fn label(&self) -> String {
        if self.path_template.is_empty() {
            format!("{}()", self.function_name)
        } else {
            format!("{} {}", self.http_method, self.path_template)
        }
    }
}
