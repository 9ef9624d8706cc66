//! Handler discovery and route categorization.

use authlint_core::config::RouteConfig;
use authlint_core::errors::ConfigError;
use rustc_hash::FxHashSet;
use tree_sitter::{Node, Tree};

use super::metadata::{MetadataPatterns, RouteMetadata};
use super::types::{HttpMethod, RouteCategory, RouteHandler};
use crate::parsers::{end_line, node_text, start_line};

/// A candidate handler function and the routes it serves.
///
/// `routes` holds one `RouteHandler` per declared (method, path); a candidate
/// without metadata gets a single unclassified route with an empty path.
#[derive(Debug)]
pub struct DiscoveredHandler<'tree> {
    pub function: Node<'tree>,
    pub routes: Vec<RouteHandler>,
}

/// Finds candidate handlers in a parsed file and assigns route categories.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    admin_prefix: String,
    handler_names: FxHashSet<String>,
    patterns: MetadataPatterns,
}

impl RouteClassifier {
    pub fn new(config: &RouteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            admin_prefix: config.effective_admin_prefix().trim_end_matches('/').to_string(),
            handler_names: config.effective_handler_names().into_iter().collect(),
            patterns: MetadataPatterns::new()?,
        })
    }

    /// Category of a path template.
    ///
    /// Admin when the path is the admin prefix or lies beneath it on a segment
    /// boundary (`/admin/x` but not `/administrators`). Data for any other
    /// absolute path with a non-empty first segment, parameters included
    /// (`/{orgId}/chats`). Everything else is unclassified.
    pub fn categorize(&self, path: &str) -> RouteCategory {
        if path == self.admin_prefix
            || path
                .strip_prefix(self.admin_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        {
            return RouteCategory::Admin;
        }

        let Some(rest) = path.strip_prefix('/') else {
            return RouteCategory::Unclassified;
        };
        let first = rest.split('/').next().unwrap_or("");
        if first.is_empty() {
            RouteCategory::Unclassified
        } else {
            RouteCategory::Data
        }
    }

    /// Candidate handlers of a file, in source order.
    ///
    /// Candidates are module-level functions and methods of module-level
    /// classes (nested classes included). Functions defined inside other
    /// functions belong to their parent's body and are never candidates.
    pub fn discover<'tree>(
        &self,
        tree: &'tree Tree,
        source: &str,
        lines: &[&str],
        file_path: &str,
    ) -> Vec<DiscoveredHandler<'tree>> {
        let mut found = Vec::new();
        self.discover_in(tree.root_node(), None, source, lines, file_path, &mut found);
        found
    }

    fn discover_in<'tree>(
        &self,
        container: Node<'tree>,
        class_name: Option<&str>,
        source: &str,
        lines: &[&str],
        file_path: &str,
        found: &mut Vec<DiscoveredHandler<'tree>>,
    ) {
        let bytes = source.as_bytes();
        let mut cursor = container.walk();
        for child in container.named_children(&mut cursor) {
            let (definition, outer) = match child.kind() {
                "decorated_definition" => match child.child_by_field_name("definition") {
                    Some(def) => (def, child),
                    None => continue,
                },
                "function_definition" | "class_definition" => (child, child),
                _ => continue,
            };

            match definition.kind() {
                "function_definition" => {
                    if let Some(handler) =
                        self.candidate(definition, outer, class_name, source, lines, file_path)
                    {
                        found.push(handler);
                    }
                }
                "class_definition" => {
                    let Some(name) = definition.child_by_field_name("name") else {
                        continue;
                    };
                    let qualified = match class_name {
                        Some(parent) => format!("{parent}.{}", node_text(&name, bytes)),
                        None => node_text(&name, bytes).to_string(),
                    };
                    if let Some(body) = definition.child_by_field_name("body") {
                        self.discover_in(body, Some(&qualified), source, lines, file_path, found);
                    }
                }
                _ => {}
            }
        }
    }

    fn candidate<'tree>(
        &self,
        definition: Node<'tree>,
        outer: Node<'tree>,
        class_name: Option<&str>,
        source: &str,
        lines: &[&str],
        file_path: &str,
    ) -> Option<DiscoveredHandler<'tree>> {
        let name_node = definition.child_by_field_name("name")?;
        let name = node_text(&name_node, source.as_bytes());
        let metadata = self.patterns.collect(definition, outer, source, lines);

        if metadata.is_empty() && !self.handler_names.contains(name) {
            return None;
        }

        let function_name = match class_name {
            Some(class) => format!("{class}.{name}"),
            None => name.to_string(),
        };
        let build = |method: HttpMethod, path: String| RouteHandler {
            file_path: file_path.to_string(),
            function_name: function_name.clone(),
            http_method: method,
            category: self.categorize(&path),
            path_template: path,
            start_line: start_line(&definition),
            end_line: end_line(&definition),
        };

        let routes: Vec<RouteHandler> = if metadata.is_empty() {
            tracing::debug!(
                file = %file_path,
                function = %function_name,
                "handler has no route metadata"
            );
            vec![build(HttpMethod::Unknown, String::new())]
        } else {
            metadata
                .into_iter()
                .map(|RouteMetadata { method, path, .. }| build(method, path))
                .collect()
        };

        Some(DiscoveredHandler {
            function: definition,
            routes,
        })
    }
}
