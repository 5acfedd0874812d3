//! Function and method span extraction.

use std::fmt;

use tree_sitter::Node;

use super::lines::{count_effective, DocstringRanges};

/// Whether a definition is a free function or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Function,
    Method,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::Function => "function",
            FunctionKind::Method => "method",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or method definition and its effective size.
///
/// Spans of nested definitions overlap the span of their enclosing
/// function: the inner lines count toward both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    /// The function name.
    pub name: String,
    pub kind: FunctionKind,
    /// Owning class, present only for methods.
    pub class_name: Option<String>,
    /// The `def` line (1-indexed), decorators excluded.
    pub start_line: usize,
    /// Last line of the final body statement (1-indexed, inclusive).
    pub end_line: usize,
    /// Code lines within `[start_line, end_line]`.
    pub effective_lines: usize,
}

impl FunctionSpan {
    /// Get the qualified name (Class.method for methods).
    pub fn qualified_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }

    /// Check if this span's effective size exceeds `threshold`.
    pub fn exceeds(&self, threshold: usize) -> bool {
        self.effective_lines > threshold
    }
}

/// Scope a node is visited in.
#[derive(Clone)]
enum Scope {
    Module,
    Class(String),
    Function,
}

/// Extract every function definition in pre-order: outer before inner,
/// top to bottom.
pub fn extract<S: AsRef<str>>(
    root: Node,
    source: &[u8],
    lines: &[S],
    docstrings: &DocstringRanges,
) -> Vec<FunctionSpan> {
    let mut functions = Vec::new();
    let mut stack = vec![(root, Scope::Module)];

    while let Some((node, scope)) = stack.pop() {
        let child_scope = match node.kind() {
            "function_definition" => {
                functions.push(function_span(node, &scope, source, lines, docstrings));
                Scope::Function
            }
            "class_definition" => Scope::Class(node_name(node, source)),
            _ => scope,
        };

        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push((child, child_scope.clone()));
        }
    }

    functions
}

fn function_span<S: AsRef<str>>(
    node: Node,
    scope: &Scope,
    source: &[u8],
    lines: &[S],
    docstrings: &DocstringRanges,
) -> FunctionSpan {
    let (kind, class_name) = match scope {
        Scope::Class(name) => (FunctionKind::Method, Some(name.clone())),
        Scope::Module | Scope::Function => (FunctionKind::Function, None),
    };

    let start_line = node.start_position().row + 1;
    let end_line = match node.child_by_field_name("body") {
        Some(body) => last_code_line(body),
        None => last_line(node),
    }
    .max(start_line);

    FunctionSpan {
        name: node_name(node, source),
        kind,
        class_name,
        start_line,
        end_line,
        effective_lines: count_effective(lines, docstrings, start_line - 1, end_line),
    }
}

fn node_name(node: Node, source: &[u8]) -> String {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
        .unwrap_or("<anonymous>")
        .to_string()
}

/// Last line occupied by real syntax under `node`, ignoring trailing
/// comments the grammar may attach to the end of a block.
fn last_code_line(node: Node) -> usize {
    let mut current = node;
    loop {
        let last = (0..current.child_count())
            .rev()
            .filter_map(|i| current.child(i))
            .find(|child| !child.is_extra() && child.end_byte() > child.start_byte());

        match last {
            Some(child) => current = child,
            None => return last_line(current),
        }
    }
}

/// 1-indexed last line of a node. A node ending at column 0 stops on the
/// previous line.
fn last_line(node: Node) -> usize {
    let start = node.start_position();
    let end = node.end_position();
    if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    }
}
