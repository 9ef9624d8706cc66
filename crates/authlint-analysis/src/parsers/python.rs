//! Python parser.
//!
//! One tree-sitter `Parser` per worker thread. A tree containing any ERROR or
//! MISSING node is rejected: the analyzer never reasons over partial trees.

use std::cell::RefCell;

use authlint_core::errors::ParseError;
use tree_sitter::{Parser, Tree};

use super::error_tolerant::count_errors;

thread_local! {
    static PYTHON_PARSER: RefCell<Option<Parser>> = RefCell::new(None);
}

fn new_parser() -> Result<Parser, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::GrammarLoad(e.to_string()))?;
    Ok(parser)
}

/// Parse Python source into a syntax tree.
///
/// Returns `ParseError::Syntax` pointing at the first error node when the
/// source is not valid Python.
pub fn parse_python(source: &str, path: &str) -> Result<Tree, ParseError> {
    let tree = PYTHON_PARSER.with(|cell| -> Result<Option<Tree>, ParseError> {
        let mut slot = cell.borrow_mut();
        let mut parser = match slot.take() {
            Some(parser) => parser,
            None => new_parser()?,
        };
        let tree = parser.parse(source, None);
        *slot = Some(parser);
        Ok(tree)
    })?;

    let tree = tree.ok_or_else(|| ParseError::NoTree {
        path: path.to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let (error_count, locations) = count_errors(root);
        let (line, column) = locations
            .first()
            .map(|loc| (loc.line, loc.column))
            .unwrap_or((1, 1));
        return Err(ParseError::Syntax {
            path: path.to_string(),
            line,
            column,
            error_count: error_count.max(1),
        });
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_module() {
        let tree = parse_python("def hello(name):\n    print(name)\n", "hello.py").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }

    #[test]
    fn rejects_invalid_module() {
        let err = parse_python("def broken(:\n    pass\n", "broken.py").unwrap_err();
        match err {
            ParseError::Syntax { path, line, .. } => {
                assert_eq!(path, "broken.py");
                assert!(line >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parser_is_reused_across_calls() {
        for _ in 0..3 {
            assert!(parse_python("x = 1\n", "a.py").is_ok());
        }
    }
}
