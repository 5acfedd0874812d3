//! Docstring location.
//!
//! A docstring is a bare string literal in the first statement position of a
//! module, class or function body. The rule is purely positional: a string
//! expression anywhere else is ordinary code.

use tree_sitter::Node;

use super::lines::{DocstringRanges, LineSpan};
use super::source::walk_preorder;

/// Scope node kinds whose body can carry a docstring. Async functions are
/// `function_definition` nodes with a leading `async` token.
const SCOPE_KINDS: &[&str] = &["module", "class_definition", "function_definition"];

/// Find every docstring in the tree rooted at `root`.
pub fn locate(root: Node, source: &[u8]) -> DocstringRanges {
    let mut ranges = DocstringRanges::new();

    walk_preorder(root, |node| {
        if SCOPE_KINDS.contains(&node.kind()) {
            if let Some(stmt) = scope_body(node).and_then(first_statement) {
                if is_docstring_statement(stmt, source) {
                    ranges.insert(LineSpan::new(
                        stmt.start_position().row,
                        stmt.end_position().row,
                    ));
                }
            }
        }
        true
    });

    ranges
}

/// The node holding a scope's statements.
fn scope_body(scope: Node) -> Option<Node> {
    if scope.kind() == "module" {
        Some(scope)
    } else {
        scope.child_by_field_name("body")
    }
}

/// First statement of a body; comments and line continuations are not statements.
fn first_statement(body: Node) -> Option<Node> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| !child.is_extra());
    first
}

fn is_docstring_statement(stmt: Node, source: &[u8]) -> bool {
    if stmt.kind() != "expression_statement" {
        return false;
    }

    // `"a", "b"` is a tuple expression with two children, not a docstring.
    let mut cursor = stmt.walk();
    let exprs: Vec<Node> = stmt
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();

    match exprs.as_slice() {
        [expr] => is_string_literal(*expr, source),
        _ => false,
    }
}

fn is_string_literal(node: Node, source: &[u8]) -> bool {
    match node.kind() {
        "string" => is_plain_string(node, source),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let parts: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|child| !child.is_extra())
                .collect();
            !parts.is_empty()
                && parts
                    .iter()
                    .all(|part| part.kind() == "string" && is_plain_string(*part, source))
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|child| !child.is_extra())
                .collect();
            matches!(inner.as_slice(), [expr] if is_string_literal(*expr, source))
        }
        _ => false,
    }
}

/// A text string: f-strings and bytes literals never count as docstrings.
fn is_plain_string(node: Node, source: &[u8]) -> bool {
    let text = node.utf8_text(source).unwrap_or("");
    let prefix = text.split(['"', '\'']).next().unwrap_or("");
    !prefix.chars().any(|c| matches!(c, 'f' | 'F' | 'b' | 'B'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::source::SourceUnit;

    fn docstrings(source: &str) -> DocstringRanges {
        let unit = SourceUnit::parse(source.as_bytes());
        let tree = unit.tree().expect("test source should parse");
        locate(tree.root_node(), unit.source())
    }

    #[test]
    fn test_module_docstring_only_first_statement() {
        let ranges = docstrings("\"\"\"doc\"\"\"\n\n# comment\nx = 1\n\"\"\"not a docstring\"\"\"\n");
        assert_eq!(ranges.spans(), &[LineSpan::new(0, 0)]);
    }

    #[test]
    fn test_multiline_docstrings_in_all_scopes() {
        let source = r#"
class Config:
    """Config holder.

    Spans several lines.
    """

    def load(self):
        '''Load it.'''
        return 1

async def fetch():
    """Fetch
    things."""
    return 2
"#;
        let ranges = docstrings(source);
        assert_eq!(
            ranges.spans(),
            &[LineSpan::new(2, 5), LineSpan::new(8, 8), LineSpan::new(12, 13)]
        );
    }

    #[test]
    fn test_comment_before_docstring_is_ignored() {
        let source = "def f():\n    # leading comment\n    \"\"\"Doc.\"\"\"\n    return 1\n";
        let ranges = docstrings(source);
        assert_eq!(ranges.spans(), &[LineSpan::new(2, 2)]);
    }

    #[test]
    fn test_non_docstring_first_statements() {
        let source = r#"
def assigned():
    x = "not a docstring"

def returned():
    return "not a docstring"

def formatted():
    f"not {a} docstring"

def raw_bytes():
    b"not a docstring"

def tuple_of_strings():
    "a", "b"

def passes():
    pass
"#;
        assert!(docstrings(source).is_empty());
    }

    #[test]
    fn test_concatenated_and_parenthesized_strings() {
        let source = "def f():\n    (\"part one \"\n     \"part two\")\n    return 1\n\ndef g():\n    r\"raw doc\"\n";
        let ranges = docstrings(source);
        assert_eq!(ranges.spans(), &[LineSpan::new(1, 2), LineSpan::new(6, 6)]);
    }

    #[test]
    fn test_string_after_first_statement_is_code() {
        let source = "def f():\n    x = 1\n    \"\"\"late string\"\"\"\n    return x\n";
        assert!(docstrings(source).is_empty());
    }
}
