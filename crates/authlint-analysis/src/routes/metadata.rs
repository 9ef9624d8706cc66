//! Route metadata conventions.
//!
//! Three places may name a handler's routes, all collected in source order:
//! - docstring lines: `GET /chat/sessions/{id}`, optionally labelled
//!   (`Route:`, `Endpoint:`, `Path:`) or bulleted;
//! - comment lines directly above the definition: `# Route: POST /chat`;
//! - decorators: `@router.get("/chat")`, `@app.route("/chat", methods=["GET", "POST"])`.

use authlint_core::errors::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tree_sitter::Node;

use super::types::HttpMethod;
use crate::parsers::{node_text, start_line, string_literal_value};

const METHODS: &str = "GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS|ANY";

/// Compiled recognizers for the three metadata conventions.
#[derive(Debug, Clone)]
pub struct MetadataPatterns {
    docstring: Regex,
    comment: Regex,
    decorator_verb: Regex,
    decorator_route: Regex,
}

impl MetadataPatterns {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            docstring: compile(&format!(
                r"^\s*(?:[-*]\s+)?(?:(?i:routes?|endpoints?|paths?)\s*:\s*)?({METHODS})\s+(/\S*)"
            ))?,
            comment: compile(&format!(
                r"^\s*#\s*(?i:routes?|endpoints?)\s*:\s*({METHODS})\s+(/\S*)"
            ))?,
            decorator_verb: compile(
                r#"\.(get|post|put|patch|delete)\s*\(\s*[rRuU]?(?:'([^']*)'|"([^"]*)")"#,
            )?,
            decorator_route: compile(
                r#"\.(?:route|api_route)\s*\(\s*[rRuU]?(?:'([^']*)'|"([^"]*)")"#,
            )?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::ValidationFailed {
        field: "routes.metadata".to_string(),
        message: e.to_string(),
    })
}

/// Where a route was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Docstring,
    Comment,
    Decorator,
}

/// One (method, path) declaration attached to a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
    pub method: HttpMethod,
    pub path: String,
    pub source: MetadataSource,
    /// 1-based line of the declaration.
    pub line: u32,
}

impl MetadataPatterns {
    /// Collect route declarations for a function.
    ///
    /// `definition` is the `function_definition`; `outer` is the node whose
    /// first line starts the declaration (the `decorated_definition` when
    /// decorators are present, else the function itself).
    pub fn collect(
        &self,
        definition: Node<'_>,
        outer: Node<'_>,
        source: &str,
        lines: &[&str],
    ) -> Vec<RouteMetadata> {
        let bytes = source.as_bytes();
        let mut routes = Vec::new();

        routes.extend(self.comment_routes(lines, start_line(&outer)));
        if outer.kind() == "decorated_definition" {
            let mut cursor = outer.walk();
            for decorator in outer.named_children(&mut cursor).filter(|n| n.kind() == "decorator") {
                let text = node_text(&decorator, bytes);
                routes.extend(self.decorator_routes(text, start_line(&decorator)));
            }
        }
        routes.extend(self.docstring_routes(definition, bytes));

        let mut seen: SmallVec<[(HttpMethod, String); 4]> = SmallVec::new();
        routes.retain(|r| {
            let key = (r.method, r.path.clone());
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        });
        routes
    }

    /// Routes from the contiguous comment block ending right above `def_line`.
    fn comment_routes(&self, lines: &[&str], def_line: u32) -> Vec<RouteMetadata> {
        let mut found = Vec::new();
        let mut idx = def_line.saturating_sub(1) as usize;
        while idx > 0 {
            idx -= 1;
            let Some(line) = lines.get(idx) else { break };
            if !line.trim_start().starts_with('#') {
                break;
            }
            if let Some(caps) = self.comment.captures(line) {
                found.push(RouteMetadata {
                    method: HttpMethod::parse_str(&caps[1]),
                    path: clean_path(&caps[2]),
                    source: MetadataSource::Comment,
                    line: idx as u32 + 1,
                });
            }
        }
        found.reverse();
        found
    }

    fn decorator_routes(&self, text: &str, line: u32) -> Vec<RouteMetadata> {
        if let Some(caps) = self.decorator_verb.captures(text) {
            let path = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str()).unwrap_or("");
            return vec![RouteMetadata {
                method: HttpMethod::parse_str(&caps[1]),
                path: clean_path(path),
                source: MetadataSource::Decorator,
                line,
            }];
        }
        if let Some(caps) = self.decorator_route.captures(text) {
            let path = clean_path(caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or(""));
            return decorator_methods(text)
                .into_iter()
                .map(|method| RouteMetadata {
                    method,
                    path: path.clone(),
                    source: MetadataSource::Decorator,
                    line,
                })
                .collect();
        }
        Vec::new()
    }

    fn docstring_routes(&self, definition: Node<'_>, source: &[u8]) -> Vec<RouteMetadata> {
        let Some((docstring, first_line)) = docstring(definition, source) else {
            return Vec::new();
        };
        docstring
            .lines()
            .enumerate()
            .filter_map(|(offset, line)| {
                let caps = self.docstring.captures(line)?;
                Some(RouteMetadata {
                    method: HttpMethod::parse_str(&caps[1]),
                    path: clean_path(&caps[2]),
                    source: MetadataSource::Docstring,
                    line: first_line + offset as u32,
                })
            })
            .collect()
    }
}

/// `methods=["GET", "POST"]`, defaulting to GET.
fn decorator_methods(text: &str) -> SmallVec<[HttpMethod; 2]> {
    let Some(start) = text.find("methods=") else {
        return smallvec![HttpMethod::Get];
    };
    let rest = &text[start + "methods=".len()..];
    let (Some(open), Some(close)) = (rest.find(['[', '(']), rest.find([']', ')'])) else {
        return smallvec![HttpMethod::Get];
    };
    if close <= open {
        return smallvec![HttpMethod::Get];
    }
    let methods: SmallVec<[HttpMethod; 2]> = rest[open + 1..close]
        .split(',')
        .map(|m| m.trim().trim_matches('\'').trim_matches('"'))
        .filter(|m| !m.is_empty())
        .map(HttpMethod::parse_str)
        .collect();
    if methods.is_empty() {
        smallvec![HttpMethod::Get]
    } else {
        methods
    }
}

/// Docstring text and its 1-based starting line.
pub fn docstring(definition: Node<'_>, source: &[u8]) -> Option<(String, u32)> {
    let body = definition.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let mut inner = first.walk();
    let literal = first.named_children(&mut inner).next()?;
    if literal.kind() != "string" {
        return None;
    }
    let text = string_literal_value(node_text(&literal, source))?;
    Some((text, start_line(&literal)))
}

fn clean_path(raw: &str) -> String {
    raw.trim_end_matches([',', '.', ';', ')', '`', '"', '\'']).to_string()
}
