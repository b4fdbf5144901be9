//! Tree-sitter parser wrapper for Python source code.

use tree_sitter::{Node, Parser, Tree};

use crate::error::{Error, Result};

/// Python parser backed by tree-sitter.
///
/// Holds the configured [`Parser`] so repeated parses (document, then
/// replacement fragment) reuse one instance.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a parser with the Python grammar loaded.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| Error::Syntax(format!("failed to load python grammar: {e}")))?;
        Ok(Self { parser })
    }

    /// Parse source text into a tree. The tree may still contain error
    /// nodes; callers decide whether those are fatal via [`Self::check`].
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::Syntax("parser produced no tree".into()))
    }

    /// Parse source text and reject trees containing any error.
    pub fn parse_checked(&mut self, source: &str) -> Result<Tree> {
        let tree = self.parse(source)?;
        Self::check(&tree)?;
        Ok(tree)
    }

    /// Return an error describing the first syntax problem in the tree,
    /// or `Ok(())` for a clean parse.
    pub fn check(tree: &Tree) -> Result<()> {
        let root = tree.root_node();
        if !root.has_error() {
            return Ok(());
        }
        match first_problem(root) {
            Some(node) if node.is_missing() => Err(Error::Syntax(format!(
                "missing {} at line {}",
                node.kind(),
                node.start_position().row + 1
            ))),
            Some(node) => Err(Error::Syntax(format!(
                "invalid syntax at line {}",
                node.start_position().row + 1
            ))),
            None => Err(Error::Syntax("invalid syntax".into())),
        }
    }
}

/// Depth-first search for the first ERROR or missing node.
fn first_problem(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.has_error() {
            continue;
        }
        if let Some(found) = first_problem(child) {
            return Some(found);
        }
    }
    None
}
