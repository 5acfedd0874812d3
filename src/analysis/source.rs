//! Decoding and parsing of a single Python source file.

use tree_sitter::{Language, Node, Parser, Tree};

use super::SkipReason;

/// Byte order mark some editors prepend to UTF-8 files.
const BOM: char = '\u{feff}';

/// Statement kinds tree-sitter-python accepts but a Python 3 parser rejects.
const PY2_ONLY_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// Decode raw file bytes, replacing invalid UTF-8 sequences.
///
/// Line endings are normalized to `\n`: `\r\n` and a lone `\r` both end a
/// line, so tree-sitter rows and the split lines stay aligned.
pub fn decode_lossy(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.strip_prefix(BOM).unwrap_or(&text);
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

/// Outcome of parsing one source file.
pub enum Syntax {
    /// The file parsed cleanly.
    Tree(Tree),
    /// The file could not be parsed.
    Failed(SkipReason),
}

/// One decoded source file together with its parse outcome.
///
/// Created once per file and dropped once the file has been analyzed.
pub struct SourceUnit {
    text: String,
    syntax: Syntax,
}

impl SourceUnit {
    /// Decode and parse raw bytes.
    ///
    /// Every call builds its own tree-sitter parser; nothing is shared
    /// between files.
    pub fn parse(raw: &[u8]) -> Self {
        let text = decode_lossy(raw);
        let syntax = match parse_python(&text) {
            Ok(tree) => match find_syntax_error(tree.root_node()) {
                Some(node) => {
                    let pos = node.start_position();
                    Syntax::Failed(SkipReason::SyntaxError {
                        line: pos.row + 1,
                        column: pos.column + 1,
                    })
                }
                None => Syntax::Tree(tree),
            },
            Err(e) => Syntax::Failed(SkipReason::Parser(e.to_string())),
        };

        Self { text, syntax }
    }

    /// Source bytes for node text extraction.
    pub fn source(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Physical lines, split the same way tree-sitter counts rows.
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// The parse tree, if parsing succeeded.
    pub fn tree(&self) -> Option<&Tree> {
        match &self.syntax {
            Syntax::Tree(tree) => Some(tree),
            Syntax::Failed(_) => None,
        }
    }
}

fn parse_python(text: &str) -> anyhow::Result<Tree> {
    let language: Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    parser
        .parse(text, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse Python source"))
}

/// Find the first node (in document order) that makes the file invalid.
fn find_syntax_error(root: Node) -> Option<Node> {
    let mut found = None;
    walk_preorder(root, |node| {
        if found.is_some() {
            return false;
        }
        if node.is_error() || node.is_missing() || PY2_ONLY_STATEMENTS.contains(&node.kind()) {
            found = Some(node);
            return false;
        }
        true
    });
    found
}

/// Iterative pre-order walk. The callback returns whether to descend into
/// the node's children.
pub(crate) fn walk_preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut cursor = root.walk();
    loop {
        if visit(cursor.node()) && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}
