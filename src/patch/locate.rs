//! Declaration lookup within a parsed Python module.
//!
//! Walks top-level declarations and one level of class members to find a
//! function by name, recording the line region and the exact leading
//! whitespace of its first line.

use tree_sitter::{Node, Tree};

/// Whether a located declaration is a free function or a class method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// A module-level `def`.
    Function,
    /// A `def` directly inside a class body.
    Method {
        /// Name of the owning class.
        class: String,
    },
}

/// A located named function block within parsed source.
///
/// Line indices are 0-based; `end_line` is an exclusive upper bound so the
/// region can be sliced as `lines[start_line..end_line]`. `indent_prefix` is
/// the literal leading whitespace of the region's first line, i.e. the captured
/// string, not a nominal indent unit, so mixed tabs and unusual widths
/// survive the round trip.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub start_line: usize,
    pub end_line: usize,
    pub indent_prefix: String,
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DeclKind::Function => write!(f, "function '{}'", self.name),
            DeclKind::Method { class } => write!(f, "method '{}.{}'", class, self.name),
        }
    }
}

/// Find the first function named `name` in the module.
///
/// Traversal order is a documented tie-break: top-level declarations are
/// visited top to bottom, and for each class the immediate member functions
/// are checked before the next top-level node. Only one nesting level is
/// searched; functions inside other functions or nested classes are not
/// discovered. The first match wins even when later declarations share the
/// name.
pub fn find_declaration(tree: &Tree, source: &str, name: &str) -> Option<Declaration> {
    let root = tree.root_node();
    let mut cursor = root.walk();

    for child in root.named_children(&mut cursor) {
        let node = resolve_decorated(child);
        match node.kind() {
            "class_definition" => {
                let class_name = node_name(node, source).unwrap_or_default();
                let Some(body) = node.child_by_field_name("body") else {
                    continue;
                };
                let mut members = body.walk();
                for member in body.named_children(&mut members) {
                    let member = resolve_decorated(member);
                    if member.kind() == "function_definition"
                        && node_name(member, source) == Some(name)
                    {
                        return Some(declaration_for(
                            member,
                            source,
                            name,
                            DeclKind::Method {
                                class: class_name.to_string(),
                            },
                        ));
                    }
                }
            }
            "function_definition" if node_name(node, source) == Some(name) => {
                return Some(declaration_for(node, source, name, DeclKind::Function));
            }
            _ => {}
        }
    }

    None
}

/// Decorated definitions wrap the real node; descend to it so the region
/// starts at the `def` line, leaving decorators untouched.
fn resolve_decorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition").unwrap_or(node)
    } else {
        node
    }
}

/// Extract the identifier text of a definition's `name` field.
fn node_name<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    let name = node.child_by_field_name("name")?;
    name.utf8_text(source.as_bytes()).ok()
}

fn declaration_for(node: Node<'_>, source: &str, name: &str, kind: DeclKind) -> Declaration {
    let start_line = node.start_position().row;
    let end_line = node.end_position().row + 1;
    let first_line = source.split('\n').nth(start_line).unwrap_or("");
    let indent_prefix = first_line[..first_line.len() - first_line.trim_start().len()].to_string();

    Declaration {
        name: name.to_string(),
        kind,
        start_line,
        end_line,
        indent_prefix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::PythonParser;

    const SOURCE: &str = "\
def alpha():
    return 1

class First:
    def shared(self):
        return 1

    @staticmethod
    def tagged():
        return 3

class Second:
    def shared(self):
        return 2

def omega():
    return 4
";

    fn locate(name: &str) -> Option<Declaration> {
        let mut parser = PythonParser::new().unwrap();
        let tree = parser.parse_checked(SOURCE).unwrap();
        find_declaration(&tree, SOURCE, name)
    }

    #[test]
    fn finds_top_level_function() {
        let decl = locate("alpha").unwrap();
        assert_eq!(decl.kind, DeclKind::Function);
        assert_eq!(decl.start_line, 0);
        assert_eq!(decl.end_line, 2);
        assert_eq!(decl.indent_prefix, "");
    }

    #[test]
    fn finds_method_with_class_indent() {
        let decl = locate("shared").unwrap();
        assert_eq!(
            decl.kind,
            DeclKind::Method {
                class: "First".into()
            }
        );
        assert_eq!(decl.indent_prefix, "    ");
    }

    #[test]
    fn duplicate_name_resolves_to_first_class() {
        // First.shared spans lines 5-6 (1-based); Second.shared comes later.
        let decl = locate("shared").unwrap();
        assert_eq!(decl.start_line, 4);
        assert_eq!(decl.end_line, 6);
    }

    #[test]
    fn decorated_method_region_starts_at_def() {
        let decl = locate("tagged").unwrap();
        // The @staticmethod line is left outside the region.
        assert_eq!(decl.start_line, 8);
        assert_eq!(decl.end_line, 10);
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(locate("zeta").is_none());
    }

    #[test]
    fn nested_functions_are_not_discovered() {
        let source = "\
def outer():
    def inner():
        return 1
    return inner
";
        let mut parser = PythonParser::new().unwrap();
        let tree = parser.parse_checked(source).unwrap();
        assert!(find_declaration(&tree, source, "inner").is_none());
    }
}
