//! Syntax-error discovery in tree-sitter trees.

use tree_sitter::Node;

/// Location of an ERROR or MISSING node, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Count ERROR/MISSING nodes in a tree and return their locations in source order.
pub fn count_errors(root: Node) -> (u32, Vec<ErrorLocation>) {
    let mut count = 0u32;
    let mut locations = Vec::new();
    collect_errors(root, &mut count, &mut locations);
    (count, locations)
}

fn collect_errors(node: Node, count: &mut u32, locations: &mut Vec<ErrorLocation>) {
    if node.is_error() || node.is_missing() {
        *count += 1;
        locations.push(ErrorLocation {
            line: node.start_position().row as u32 + 1,
            column: node.start_position().column as u32 + 1,
        });
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, count, locations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn clean_source_has_no_errors() {
        let tree = parse("def f(x):\n    return x\n");
        let (count, locations) = count_errors(tree.root_node());
        assert_eq!(count, 0);
        assert!(locations.is_empty());
    }

    #[test]
    fn broken_source_reports_location() {
        let tree = parse("def f(x:\n    return x\n");
        let (count, locations) = count_errors(tree.root_node());
        assert!(count >= 1);
        assert!(locations[0].line >= 1);
    }
}
