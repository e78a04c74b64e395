//! Syntax validation for user grading scripts (Python).
//!
//! The script is parsed, never executed. A tree containing error or
//! missing nodes is invalid; the first offending node names the location.

use thiserror::Error;
use tree_sitter::{Node, Parser};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("invalid syntax at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("script parser unavailable: {0}")]
    Parser(String),
}

/// Check that `script` is syntactically valid Python. The empty script is
/// valid.
pub fn validate_python(script: &str) -> Result<(), ScriptError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ScriptError::Parser(e.to_string()))?;

    let tree = parser
        .parse(script, None)
        .ok_or_else(|| ScriptError::Parser("parse returned no tree".into()))?;

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let node = first_error_node(root).unwrap_or(root);
    let position = node.start_position();
    Err(ScriptError::Syntax {
        line: position.row + 1,
        column: position.column,
    })
}

/// Depth-first search for the first ERROR or missing node under `node`.
fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_statement_is_valid() {
        assert!(validate_python("print(123)").is_ok());
    }

    #[test]
    fn empty_script_is_valid() {
        assert!(validate_python("").is_ok());
    }

    #[test]
    fn multiline_function_is_valid() {
        let script = "def grade(doc):\n    return doc.get('score', 0) > 50\n";
        assert!(validate_python(script).is_ok());
    }

    #[test]
    fn broken_def_is_invalid() {
        let err = validate_python("def f(:\n    pass\n").unwrap_err();
        match err {
            ScriptError::Syntax { line, .. } => assert_eq!(line, 1),
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_paren_is_invalid() {
        assert!(matches!(
            validate_python("print(123"),
            Err(ScriptError::Syntax { .. })
        ));
    }

    #[test]
    fn error_location_points_at_the_offending_line() {
        let err = validate_python("x = 1\ny = ((2\n").unwrap_err();
        match err {
            ScriptError::Syntax { line, .. } => assert!(line >= 2, "line was {line}"),
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn error_message_is_descriptive() {
        let err = validate_python("def f(:").unwrap_err();
        assert!(err.to_string().contains("invalid syntax at line"));
    }
}
