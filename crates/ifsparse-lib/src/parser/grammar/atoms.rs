use crate::diagnostics::DiagnosticKind;
use crate::parser::core::Parser;
use crate::parser::span::TextRange;
use crate::parser::syntax_kind::SyntaxKind::*;
use crate::parser::tree::{Field, NodeKind};

impl<'src> Parser<'src, '_> {
    /// Any word, reserved or not. Member names after `.` may be keywords (`t.count`, `arr.delete`).
    pub(super) fn nth_is_word(&self, lookahead: usize) -> bool {
        let kind = self.nth(lookahead);
        kind.is_ident_like() || kind.is_keyword()
    }

    /// Identifier leaf. Reports `ExpectedIdentifier` without consuming when absent.
    pub(super) fn parse_identifier(&mut self) -> Option<&'src str> {
        if !self.at_ident_like() {
            self.error(DiagnosticKind::ExpectedIdentifier);
            return None;
        }
        let text = self.nth_text(0);
        self.bump_leaf(NodeKind::Identifier);
        Some(text)
    }

    /// `a`, `pkg.proc` or `schema.pkg.proc` as one leaf.
    pub(super) fn parse_qualified_name(&mut self) -> bool {
        if !self.at_ident_like() {
            self.error(DiagnosticKind::ExpectedIdentifier);
            return false;
        }
        if !(self.nth_at(1, Dot) && self.nth_is_word(2)) {
            self.bump_leaf(NodeKind::Identifier);
            return true;
        }
        self.start_node(NodeKind::QualifiedIdentifier);
        self.bump();
        while self.at(Dot) && self.nth_is_word(1) {
            self.bump();
            self.bump();
        }
        self.finish_node();
        true
    }

    /// Leaf over the next `count` tokens, e.g. `NOT NULL` or `LEFT OUTER`.
    pub(super) fn bump_leaf_n(&mut self, kind: NodeKind, count: usize) {
        self.start_node(kind);
        for _ in 0..count {
            if self.eof() {
                break;
            }
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn bump_modifier(&mut self, count: usize) {
        self.bump_leaf_n(NodeKind::Modifier, count);
    }

    /// Closes a parenthesis opened at `open`, or reports it as unclosed.
    pub(super) fn expect_closing_paren(&mut self, open: TextRange) -> bool {
        if self.eat(RParen) {
            return true;
        }
        let current = self.current_span();
        if self.at(Garbage) || !self.should_report(current.start()) {
            return false;
        }
        let found = self.current().describe();
        self.diagnostics
            .report(DiagnosticKind::UnclosedParen, current)
            .message(format!("found {found}"))
            .related_to("`(` opened here", open)
            .emit();
        false
    }

    /// `NOT NULL` column or variable constraint.
    pub(super) fn parse_not_null(&mut self) {
        if self.at(KwNot) && self.nth_at(1, KwNull) {
            self.field(Field::Constraint, |p| p.bump_modifier(2));
        }
    }

    /// Type reference: `NUMBER(10, 2)`, `VARCHAR2(100 CHAR)`, `tab.col%TYPE`,
    /// `REF CURSOR`, `TIMESTAMP WITH TIME ZONE`.
    pub(super) fn parse_type_spec(&mut self) -> bool {
        if !self.at_ident_like() {
            self.error(DiagnosticKind::ExpectedType);
            return false;
        }
        let base = self.nth_text(0);
        self.start_node(NodeKind::TypeSpec);

        let two_words = (self.at(KwRef) && self.nth_at(1, KwCursor))
            || (self.at_word("long") && self.nth_word(1, "raw"))
            || (self.at_word("double") && self.nth_word(1, "precision"));
        self.field(Field::Name, |p| {
            if two_words {
                p.bump_leaf_n(NodeKind::Identifier, 2);
            } else {
                p.parse_qualified_name();
            }
        });

        if self.at(Percent) && (self.nth_at(1, KwType) || self.nth_word(1, "rowtype")) {
            self.bump();
            self.field(Field::Attribute, |p| p.bump_leaf(NodeKind::Identifier));
        } else if self.at(LParen) {
            self.parse_type_arguments();
        }

        let temporal =
            base.eq_ignore_ascii_case("timestamp") || base.eq_ignore_ascii_case("interval");
        if temporal && self.at(KwWith) {
            let count = if self.nth_word(1, "local") { 4 } else { 3 };
            self.field(Field::Modifiers, |p| p.bump_modifier(count));
        } else if base.eq_ignore_ascii_case("interval")
            && (self.at_word("day") || self.at_word("year"))
            && self.nth_at(1, KwTo)
        {
            self.field(Field::Modifiers, |p| p.bump_modifier(3));
        }

        self.finish_node();
        true
    }

    fn parse_type_arguments(&mut self) {
        let open = self.current_span();
        self.bump();
        loop {
            if self.at(Star) {
                self.field(Field::Arguments, |p| p.bump_leaf(NodeKind::Wildcard));
            } else {
                self.field(Field::Arguments, |p| p.parse_expr());
            }
            if self.at_word("char") || self.at_word("byte") {
                self.field(Field::Modifiers, |p| p.bump_modifier(1));
            }
            if !self.eat(Comma) {
                break;
            }
        }
        self.expect_closing_paren(open);
    }
}
