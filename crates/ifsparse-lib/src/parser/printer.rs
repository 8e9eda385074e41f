//! Indented tree dump.
//!
//! ```text
//! SourceFile
//!   ProcedureDecl
//!     name: Identifier "P"
//!     body: NullStmt
//! ```
//!
//! Leaves and `Error` nodes show their source text; tokens are listed only on request.

use std::fmt::Write;

use super::span::TextRange;
use super::tree::{Node, NodeKind, SyntaxElement, SyntaxTree};

pub struct TreePrinter<'t> {
    tree: &'t SyntaxTree,
    spans: bool,
    tokens: bool,
}

impl<'t> TreePrinter<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self {
            tree,
            spans: false,
            tokens: false,
        }
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    /// Also print every token, including the final `Eof`.
    pub fn with_tokens(mut self, value: bool) -> Self {
        self.tokens = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        self.format_node(self.tree.root(), None, 0, w)
    }

    fn format_node(
        &self,
        node: Node<'t>,
        field: Option<&str>,
        indent: usize,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        let field = field.map(|f| format!("{f}: ")).unwrap_or_default();
        let span = self.span_str(node.span());
        let kind = node.kind();
        let leaf = kind.is_leaf();

        if leaf || kind == NodeKind::Error {
            writeln!(w, "{prefix}{field}{kind}{span} {:?}", node.text())?;
        } else {
            writeln!(w, "{prefix}{field}{kind}{span}")?;
        }
        if leaf && !self.tokens {
            return Ok(());
        }

        for child in node.children() {
            match child {
                SyntaxElement::Node(n) => {
                    let name = node.field_of(n.id()).map(|f| f.as_str());
                    self.format_node(n, name, indent + 1, w)?;
                }
                SyntaxElement::Token(t) if self.tokens => {
                    let child_prefix = "  ".repeat(indent + 1);
                    let child_span = self.span_str(t.span());
                    writeln!(w, "{child_prefix}{:?}{child_span} {:?}", t.kind(), t.text())?;
                }
                SyntaxElement::Token(_) => {}
            }
        }
        Ok(())
    }

    fn span_str(&self, range: TextRange) -> String {
        if !self.spans {
            return String::new();
        }
        format!(
            " [{}..{}]",
            u32::from(range.start()),
            u32::from(range.end())
        )
    }
}
