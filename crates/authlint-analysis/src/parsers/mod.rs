//! Tree-sitter parser subsystem: Python grammar, thread_local parser instances.

pub mod error_tolerant;
pub mod python;

pub use python::parse_python;

use tree_sitter::Node;

/// 1-based line of a node's first row.
pub fn start_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// 1-based line of a node's last row.
pub fn end_line(node: &Node) -> u32 {
    node.end_position().row as u32 + 1
}

/// UTF-8 text of a node, empty on invalid bytes.
pub fn node_text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Value of a Python string literal's source text, without prefix or quotes.
/// Returns `None` for anything that is not a plain quoted literal.
pub fn string_literal_value(text: &str) -> Option<String> {
    let body = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return Some(body[quote.len()..body.len() - quote.len()].to_string());
        }
    }
    None
}
