//! Parser state machine and low-level operations.

use std::cell::Cell;

use super::ParseOptions;
use super::lexer::{Lexed, Token, Trivia, token_text};
use super::span::{TextRange, TextSize};
use super::syntax_kind::{SyntaxKind, TokenSet};
use super::tree::{Checkpoint, Field, NodeId, NodeKind, SyntaxTree, TreeBuilder};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Severity};

const DEBUG_FUEL: u32 = 512;

#[derive(Debug, Clone, Copy)]
pub(super) struct OpenBlock {
    pub what: &'static str,
    pub span: TextRange,
}

/// Trivia never reaches the parser: `tokens` holds only significant tokens, ending in `Eof`.
pub(crate) struct Parser<'src, 'o> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    trivia: Vec<Trivia>,
    pub(super) pos: usize,
    pub(super) builder: TreeBuilder,
    pub(super) diagnostics: Diagnostics,
    pub(super) options: &'o ParseOptions,
    pub(super) depth: u32,
    last_diagnostic_pos: Option<TextSize>,
    pub(super) debug_fuel: Cell<u32>,
    nesting_exceeded: bool,
}

impl<'src, 'o> Parser<'src, 'o> {
    pub fn new(source: &'src str, lexed: Lexed, options: &'o ParseOptions) -> Self {
        let Lexed {
            tokens,
            trivia,
            diagnostics,
        } = lexed;
        debug_assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::Eof));
        Self {
            source,
            builder: TreeBuilder::new(tokens.clone()),
            tokens,
            trivia,
            pos: 0,
            diagnostics,
            options,
            depth: 0,
            last_diagnostic_pos: None,
            debug_fuel: Cell::new(DEBUG_FUEL),
            nesting_exceeded: false,
        }
    }

    pub fn parse(mut self) -> (SyntaxTree, Diagnostics) {
        let root = self.parse_root();
        let tree = self.builder.finish(self.source, self.trivia, root);
        (tree, self.diagnostics)
    }

    fn reset_debug_fuel(&self) {
        self.debug_fuel.set(DEBUG_FUEL);
    }

    /// Every lookahead burns fuel and every bump refills it, so a loop that
    /// never consumes a token panics here instead of hanging.
    fn ensure_progress(&self) {
        let fuel = self.debug_fuel.get();
        assert!(fuel != 0, "parser stalled at token {}", self.pos);
        self.debug_fuel.set(fuel - 1);
    }

    pub(super) fn nth(&self, lookahead: usize) -> SyntaxKind {
        self.ensure_progress();
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + lookahead).min(last)].kind
    }

    pub(super) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn nth_at(&self, lookahead: usize, kind: SyntaxKind) -> bool {
        self.nth(lookahead) == kind
    }

    pub(super) fn at_any(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(super) fn at_ident_like(&self) -> bool {
        self.current().is_ident_like()
    }

    pub(super) fn eof(&self) -> bool {
        self.at(SyntaxKind::Eof)
    }

    pub(super) fn nth_text(&self, lookahead: usize) -> &'src str {
        let last = self.tokens.len() - 1;
        token_text(self.source, &self.tokens[(self.pos + lookahead).min(last)])
    }

    /// Contextual word: a plain identifier spelled `word` (case-insensitive).
    pub(super) fn nth_word(&self, lookahead: usize, word: &str) -> bool {
        self.nth_at(lookahead, SyntaxKind::Ident) && self.nth_text(lookahead).eq_ignore_ascii_case(word)
    }

    pub(super) fn at_word(&self, word: &str) -> bool {
        self.nth_word(0, word)
    }

    pub(super) fn current_span(&self) -> TextRange {
        let last = self.tokens.len() - 1;
        self.tokens[self.pos.min(last)].span
    }

    /// End of the last consumed token, or 0 at the start of input.
    pub(super) fn prev_end(&self) -> TextSize {
        self.pos
            .checked_sub(1)
            .map_or_else(TextSize::default, |i| self.tokens[i].span.end())
    }

    pub(super) fn start_node(&mut self, kind: NodeKind) {
        self.builder.start_node(kind);
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    pub(super) fn finish_node(&mut self) -> NodeId {
        self.builder.finish_node()
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    /// Runs `f` and files every node it adds to the open node under `field`.
    pub(super) fn field<R>(&mut self, field: Field, f: impl FnOnce(&mut Self) -> R) -> R {
        let mark = self.builder.child_count();
        let result = f(self);
        self.builder.tag_since(mark, field);
        result
    }

    pub(super) fn bump(&mut self) {
        assert!(!self.eof(), "bump called at EOF");
        self.reset_debug_fuel();
        self.builder.token(self.pos);
        self.pos += 1;
    }

    /// Consumes the `Eof` token; only the root production does this.
    pub(super) fn bump_eof(&mut self) {
        debug_assert!(self.eof());
        self.builder.token(self.pos);
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Wraps the current token in a leaf node.
    pub(super) fn bump_leaf(&mut self, kind: NodeKind) -> NodeId {
        self.start_node(kind);
        self.bump();
        self.finish_node()
    }

    /// On mismatch: emit diagnostic but don't consume.
    pub(super) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = self.current().describe();
        let message = format!("expected {}, found {}", kind.describe(), found);
        if let Some(range) = self.error_range() {
            self.diagnostics
                .report(DiagnosticKind::UnexpectedToken, range)
                .message(message)
                .expected(TokenSet::single(kind))
                .emit();
        }
        false
    }

    /// `;` after a statement or declaration. Missing ones are reported at the end of
    /// the previous token, where the user would type it.
    pub(super) fn expect_semicolon(&mut self) -> bool {
        if self.eat(SyntaxKind::Semicolon) {
            return true;
        }
        let at = TextRange::empty(self.prev_end());
        let found = self.current().describe();
        if self.should_report(self.current_span().start()) {
            self.diagnostics
                .report(DiagnosticKind::MissingTerminator, at)
                .message(format!("found {found}"))
                .expected(TokenSet::single(SyntaxKind::Semicolon))
                .emit();
        }
        false
    }

    pub(super) fn should_report(&mut self, pos: TextSize) -> bool {
        if self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    /// Range for a diagnostic at the current token, or `None` when suppressed.
    ///
    /// `Garbage` was already reported by the lexer.
    fn error_range(&mut self) -> Option<TextRange> {
        if self.at(SyntaxKind::Garbage) {
            return None;
        }
        let range = self.current_span();
        self.should_report(range.start()).then_some(range)
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let Some(range) = self.error_range() else {
            return;
        };
        self.diagnostics.report(kind, range).emit();
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let Some(range) = self.error_range() else {
            return;
        };
        self.diagnostics.report(kind, range).message(message).emit();
    }

    pub(super) fn error_at(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
        severity: Severity,
    ) {
        if !self.should_report(range.start()) {
            return;
        }
        self.diagnostics
            .report(kind, range)
            .message(message)
            .severity(severity)
            .emit();
    }

    fn bump_as_error(&mut self) {
        if !self.eof() {
            self.start_node(NodeKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_as_error();
    }

    /// Reports `kind`, then skips into an `Error` node until a token in `recovery`.
    /// A `;` met on the way is consumed and ends the skip.
    pub(super) fn error_recover(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        recovery: TokenSet,
    ) {
        self.error_msg(kind, message);
        self.skip_until(recovery);
    }

    /// Silent version of [`error_recover`](Self::error_recover) for follow-up resynchronization.
    pub(super) fn skip_until(&mut self, recovery: TokenSet) {
        if self.at_any(recovery) || self.eof() {
            return;
        }
        self.start_node(NodeKind::Error);
        let mut skipped = 0usize;
        while !self.at_any(recovery) && !self.eof() {
            let semicolon = self.at(SyntaxKind::Semicolon);
            self.bump();
            skipped += 1;
            if semicolon {
                break;
            }
        }
        self.finish_node();
        tracing::trace!(skipped, resync = ?self.current(), "recovered");
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= self.options.recursion_limit {
            self.swallow_rest();
            return false;
        }
        self.depth += 1;
        self.reset_debug_fuel();
        true
    }

    pub(super) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.reset_debug_fuel();
    }

    /// Nesting limit hit: report once and move the remaining input into one `Error` node.
    fn swallow_rest(&mut self) {
        if !self.nesting_exceeded {
            self.nesting_exceeded = true;
            let range = self.current_span();
            let limit = self.options.recursion_limit;
            self.last_diagnostic_pos = Some(range.start());
            self.diagnostics
                .report(DiagnosticKind::NestingTooDeep, range)
                .message(format!("limit is {limit}"))
                .emit();
            tracing::debug!(limit, "nesting limit exceeded");
        }
        if self.eof() {
            return;
        }
        self.start_node(NodeKind::Error);
        while !self.eof() {
            self.bump();
        }
        self.finish_node();
    }

    /// Reports a block whose closing keyword is missing, pointing back at its opening.
    pub(super) fn error_unclosed(&mut self, open: OpenBlock, expected: &str) {
        let current = self.current_span();
        if !self.should_report(current.start()) {
            return;
        }
        let found = self.current().describe();
        self.diagnostics
            .report(DiagnosticKind::UnclosedBlock, current)
            .message(format!("expected {expected}, found {found}"))
            .related_to(format!("{} opened here", open.what), open.span)
            .emit();
    }

    pub(super) fn open_block(&self, what: &'static str) -> OpenBlock {
        OpenBlock {
            what,
            span: self.current_span(),
        }
    }
}
