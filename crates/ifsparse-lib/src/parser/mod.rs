//! Parser infrastructure for the PL/SQL dialect.
//!
//! # Architecture
//!
//! Source text is lexed into span-only tokens, then a hand-written recursive
//! descent parser with a Pratt expression core builds an arena tree:
//!
//! - Zero-copy lexing: tokens carry spans, text is sliced from source on demand
//! - Trivia side table: whitespace and comments never reach the grammar, but every
//!   token remembers the trivia before it, so the tree reproduces the input exactly
//! - Checkpoint-based wrapping: binary operators, joins and annotated items are
//!   wrapped retroactively once the parser knows what it is looking at
//! - Named fields: productions file their children under `name`, `body`, `condition`...
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree. Recovery follows these rules:
//!
//! 1. Tokens that fit nowhere are wrapped in `Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (the parent may handle them)
//! 3. A statement that cannot continue skips to the next `;` or a synchronization keyword
//! 4. A block missing its `END` reports where it was opened and is closed at the enclosing boundary
//! 5. On the nesting limit, the remaining input goes into a single `Error` node

pub mod ast;
pub mod keywords;
pub mod lexer;
pub mod printer;
pub mod span;
pub mod syntax_kind;
pub mod tree;

mod core;
mod grammar;

#[cfg(test)]
mod tests;

pub use keywords::Keywords;
pub use span::{LineCol, LineIndex, TextRange, TextSize};
pub use syntax_kind::{SyntaxKind, TokenSet};
pub use tree::{Field, Node, NodeId, NodeKind, SyntaxElement, SyntaxTree, Token};

use crate::diagnostics::Diagnostics;
use core::Parser;

/// Maximum nesting of blocks, statements and expressions before the parser gives up.
pub const DEFAULT_RECURSION_LIMIT: u32 = 256;

/// How `CASE` terminators are checked.
///
/// A `CASE` expression closes with `END CASE` and a `CASE` statement with a plain
/// `END`. Code in the wild mixes the two up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseTerminators {
    /// A swapped terminator is an error.
    #[default]
    Strict,
    /// A swapped terminator is a warning.
    Lenient,
}

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub(crate) case_terminators: CaseTerminators,
    pub(crate) recursion_limit: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            case_terminators: CaseTerminators::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_case_terminators(mut self, mode: CaseTerminators) -> Self {
        self.case_terminators = mode;
        self
    }

    /// Zero is clamped to one so the root production can still run.
    pub fn with_recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit.max(1);
        self
    }

    pub fn case_terminators(&self) -> CaseTerminators {
        self.case_terminators
    }

    pub fn recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Lexes and parses `source`. The tree is always complete; problems are in the diagnostics.
pub fn parse_source(
    source: &str,
    keywords: &Keywords,
    options: &ParseOptions,
) -> (SyntaxTree, Diagnostics) {
    let lexed = lexer::lex(source, keywords);
    let (tree, mut diagnostics) = Parser::new(source, lexed, options).parse();
    diagnostics.sort();
    (tree, diagnostics)
}
