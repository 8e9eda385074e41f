//! Annotations, conditional compilation and template directives.
//!
//! Annotations are parsed into the `annotations` field of whatever item follows;
//! the item then adopts them through its checkpoint. Directive bodies hold ordinary
//! items, except template sections, which keep their text raw since it is a
//! patch against another layer rather than code on its own.

use crate::diagnostics::DiagnosticKind;
use crate::parser::core::Parser;
use crate::parser::span::TextRange;
use crate::parser::syntax_kind::SyntaxKind::*;
use crate::parser::syntax_kind::TokenSet;
use crate::parser::syntax_kind::token_sets::TEMPLATE_BOUNDARY;
use crate::parser::tree::{Checkpoint, Field, NodeKind};

const DIRECTIVE_BODY_END: TokenSet = TokenSet::new(&[DirElsif, DirElse, DirEnd, Eof]);

impl Parser<'_, '_> {
    /// Zero or more `@Name` or `@Name(args)` markers.
    pub(super) fn parse_annotations(&mut self) {
        self.field(Field::Annotations, |p| {
            while p.at(Annotation) {
                p.start_node(NodeKind::Annotation);
                p.bump();
                // Arguments must touch the name: `@Name (` starts something else.
                if p.at(LParen) && p.current_span().start() == p.prev_end() {
                    p.field(Field::Arguments, |p| p.parse_annotation_arguments());
                }
                p.finish_node();
            }
        });
    }

    /// Balanced parentheses kept as one leaf.
    fn parse_annotation_arguments(&mut self) {
        self.start_node(NodeKind::AnnotationArguments);
        let open = self.current_span();
        let mut depth = 0usize;
        loop {
            match self.current() {
                LParen => depth += 1,
                RParen => depth -= 1,
                Eof => break,
                _ => {}
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
        if depth > 0 && self.should_report(self.current_span().start()) {
            self.diagnostics
                .report(DiagnosticKind::UnclosedParen, self.current_span())
                .message("found end of file")
                .related_to("`(` opened here", open)
                .emit();
        }
        self.finish_node();
    }

    /// `$IF cond $THEN items [$ELSIF cond $THEN items]... [$ELSE items] $END`
    pub(super) fn parse_conditional_compilation(&mut self, cp: Checkpoint) {
        debug_assert!(self.at(DirIf));
        self.start_node_at(cp, NodeKind::ConditionalCompilation);
        let open = self.current_span();
        self.bump();
        self.field(Field::Condition, |p| p.parse_expr());
        self.expect(DirThen);
        self.field(Field::ThenBody, |p| p.parse_directive_body());
        self.field(Field::ElsifClauses, |p| {
            while p.at(DirElsif) {
                p.start_node(NodeKind::ElsifClause);
                p.bump();
                p.field(Field::Condition, |p| p.parse_expr());
                p.expect(DirThen);
                p.field(Field::ThenBody, |p| p.parse_directive_body());
                p.finish_node();
            }
        });
        if self.at(DirElse) {
            self.field(Field::ElseClause, |p| {
                p.start_node(NodeKind::ElseClause);
                p.bump();
                p.field(Field::Body, |p| p.parse_directive_body());
                p.finish_node();
            });
        }
        self.expect_directive_end(open, "`$IF`");
        self.finish_node();
    }

    fn parse_directive_body(&mut self) {
        while !self.at_any(DIRECTIVE_BODY_END) {
            let before = self.pos;
            self.parse_mixed_item();
            if self.pos == before {
                self.bump_stray(DiagnosticKind::UnexpectedToken);
            }
        }
    }

    /// `$ERROR message $END`
    pub(super) fn parse_error_directive(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::ErrorDirective);
        let open = self.current_span();
        self.bump();
        self.field(Field::Message, |p| p.parse_expr());
        self.expect_directive_end(open, "`$ERROR`");
        self.finish_node();
    }

    /// `$SEARCH text $REPLACE text $END` and the other patch markers.
    pub(super) fn parse_template_directive(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::TemplateDirective);
        let open = self.current_span();
        self.field(Field::Sections, |p| {
            while p.current().is_template_marker() {
                p.start_node(NodeKind::TemplateSection);
                p.bump();
                p.field(Field::Text, |p| p.parse_template_text());
                p.finish_node();
            }
        });
        self.expect_directive_end(open, "template");
        self.finish_node();
    }

    /// Raw tokens up to the next marker. Nested `$IF` and `$ERROR` consume their own `$END`.
    fn parse_template_text(&mut self) {
        self.start_node(NodeKind::TemplateText);
        let mut depth = 0usize;
        while !self.eof() {
            match self.current() {
                DirIf | DirError => depth += 1,
                DirEnd if depth > 0 => depth -= 1,
                kind if depth == 0 && TEMPLATE_BOUNDARY.contains(kind) => break,
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
    }

    fn expect_directive_end(&mut self, open: TextRange, what: &str) {
        if self.eat(DirEnd) {
            return;
        }
        let current = self.current_span();
        if !self.should_report(current.start()) {
            return;
        }
        let found = self.current().describe();
        self.diagnostics
            .report(DiagnosticKind::UnclosedDirective, current)
            .message(format!("found {found}"))
            .related_to(format!("{what} opened here"), open)
            .emit();
    }
}
