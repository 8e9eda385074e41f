//! Pratt expression parsing.
//!
//! A precedence level `L` maps to the binding power pair `(2L - 1, 2L)`, which
//! makes every binary operator left-associative:
//!
//! | Level | Operators |
//! |---|---|
//! | 1 | `OR` |
//! | 2 | `AND` |
//! | 3 | comparisons, `[NOT] BETWEEN`, `[NOT] LIKE`, `[NOT] IN`, `IS [NOT] NULL` |
//! | 4 | `+ -` |
//! | 5 | `* / % MOD` |
//! | 6 | `\|\|` |
//! | 7 | prefix `+ - NOT` |
//!
//! Postfix forms (`.member`, calls, `%ATTR`, `(+)`, `.*`) are applied to the
//! primary before any infix operator is considered, so they bind tightest.

use crate::diagnostics::{DiagnosticKind, Severity};
use crate::parser::CaseTerminators;
use crate::parser::core::{OpenBlock, Parser};
use crate::parser::span::TextRange;
use crate::parser::syntax_kind::SyntaxKind::{self, *};
use crate::parser::tree::{Checkpoint, Field, NodeKind};

const PREFIX_BP: u8 = 13;
pub(super) const COMPARISON_BP: u8 = 5;
const ADDITIVE_BP: u8 = 7;

/// Words after `%` that make a cursor attribute rather than a modulo.
const CURSOR_ATTRIBUTES: &[&str] = &[
    "found",
    "notfound",
    "isopen",
    "rowcount",
    "bulk_rowcount",
    "bulk_exceptions",
    "rowtype",
];

fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    let level = match kind {
        KwOr => 1,
        KwAnd => 2,
        Eq | NotEq | Lt | Gt | LtEq | GtEq | KwBetween | KwLike | KwIn | KwIs => 3,
        Plus | Minus => 4,
        Star | Slash | Percent | KwMod => 5,
        Concat => 6,
        _ => return None,
    };
    Some((2 * level - 1, 2 * level))
}

fn is_callable(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Identifier
            | NodeKind::QualifiedIdentifier
            | NodeKind::MemberAccess
            | NodeKind::FunctionCall
            | NodeKind::CursorAttribute
    )
}

/// Where a `CASE` appears; each position has its own terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CaseContext {
    Expression,
    Statement,
}

impl Parser<'_, '_> {
    /// Parses an expression, reporting `ExpectedExpression` if none starts here.
    pub(super) fn parse_expr(&mut self) -> bool {
        self.parse_expr_bp(0)
    }

    pub(super) fn parse_expr_bp(&mut self, min_bp: u8) -> bool {
        if !self.enter_recursion() {
            return false;
        }
        let parsed = self.parse_expr_bp_inner(min_bp);
        self.exit_recursion();
        parsed
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> bool {
        let cp = self.checkpoint();
        if matches!(self.current(), Plus | Minus | KwNot) {
            self.start_node(NodeKind::UnaryExpr);
            self.field(Field::Operator, |p| p.bump_leaf(NodeKind::Operator));
            self.field(Field::Operand, |p| p.parse_expr_bp(PREFIX_BP));
            self.finish_node();
        } else if !self.parse_postfix_expr() {
            return false;
        }

        loop {
            // `NOT IN`, `NOT LIKE`, `NOT BETWEEN` are infix; a lone `NOT` here is not.
            let negated = self.at(KwNot) && matches!(self.nth(1), KwIn | KwLike | KwBetween);
            let op = if negated { self.nth(1) } else { self.current() };
            let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let op_len = if negated { 2 } else { 1 };
            match op {
                KwBetween => self.parse_between(cp, op_len),
                KwIn => self.parse_in(cp, op_len, r_bp),
                KwLike => self.parse_like(cp, op_len, r_bp),
                KwIs => self.parse_is_null(cp),
                _ => {
                    self.wrap(cp, NodeKind::BinaryExpr, Field::Left);
                    self.field(Field::Operator, |p| p.bump_leaf(NodeKind::Operator));
                    self.field(Field::Right, |p| p.parse_expr_bp(r_bp));
                    self.finish_node();
                }
            }
        }
        true
    }

    /// Opens `kind` around everything since `cp` and files it under `field`.
    pub(super) fn wrap(&mut self, cp: Checkpoint, kind: NodeKind, field: Field) {
        self.start_node_at(cp, kind);
        self.builder.tag_since(0, field);
    }

    /// `x [NOT] BETWEEN low AND high`. The bounds bind tighter than `AND`.
    fn parse_between(&mut self, cp: Checkpoint, op_len: usize) {
        self.wrap(cp, NodeKind::BetweenExpr, Field::Operand);
        self.field(Field::Operator, |p| p.bump_leaf_n(NodeKind::Operator, op_len));
        self.field(Field::Low, |p| p.parse_expr_bp(ADDITIVE_BP));
        self.expect(KwAnd);
        self.field(Field::High, |p| p.parse_expr_bp(COMPARISON_BP));
        self.finish_node();
    }

    fn parse_in(&mut self, cp: Checkpoint, op_len: usize, r_bp: u8) {
        self.wrap(cp, NodeKind::InExpr, Field::Operand);
        self.field(Field::Operator, |p| p.bump_leaf_n(NodeKind::Operator, op_len));
        if self.at(LParen) && !self.at_subquery() {
            self.field(Field::List, |p| p.parse_expression_list());
        } else {
            self.field(Field::List, |p| p.parse_expr_bp(r_bp));
        }
        self.finish_node();
    }

    fn parse_like(&mut self, cp: Checkpoint, op_len: usize, r_bp: u8) {
        self.wrap(cp, NodeKind::LikeExpr, Field::Operand);
        self.field(Field::Operator, |p| p.bump_leaf_n(NodeKind::Operator, op_len));
        self.field(Field::Right, |p| p.parse_expr_bp(r_bp));
        if self.eat(KwEscape) {
            self.field(Field::Escape, |p| p.parse_expr_bp(r_bp));
        }
        self.finish_node();
    }

    /// `x IS [NOT] NULL`; the whole `IS NOT NULL` is the operator leaf.
    fn parse_is_null(&mut self, cp: Checkpoint) {
        self.wrap(cp, NodeKind::IsNullExpr, Field::Operand);
        self.field(Field::Operator, |p| {
            p.start_node(NodeKind::Operator);
            p.bump();
            p.eat(KwNot);
            p.expect(KwNull);
            p.finish_node();
        });
        self.finish_node();
    }

    /// `( expr, ... )` always as a list, even with one element.
    pub(super) fn parse_expression_list(&mut self) {
        self.start_node(NodeKind::ExpressionList);
        let open = self.current_span();
        self.bump();
        if !self.at(RParen) {
            self.parse_expr_list(Field::Items);
        }
        self.expect_closing_paren(open);
        self.finish_node();
    }

    /// Comma-separated expressions, each filed under `field`.
    pub(super) fn parse_expr_list(&mut self, field: Field) {
        loop {
            self.field(field, |p| p.parse_expr());
            if !self.eat(Comma) {
                break;
            }
        }
    }

    pub(super) fn at_subquery(&self) -> bool {
        self.at(LParen) && matches!(self.nth(1), KwSelect | KwWith)
    }

    fn at_cursor_attribute(&self) -> bool {
        self.at(Percent)
            && (self.nth_at(1, KwType) || CURSOR_ATTRIBUTES.iter().any(|w| self.nth_word(1, w)))
    }

    /// Primary followed by `.member`, `(args)`, `%ATTR`, `(+)` and `.*`.
    ///
    /// Also used on its own for assignment targets and INTO lists, where a full
    /// expression would swallow `:=`-adjacent operators.
    pub(super) fn parse_postfix_expr(&mut self) -> bool {
        let cp = self.checkpoint();
        let Some(mut last) = self.parse_primary() else {
            return false;
        };
        loop {
            match self.current() {
                Dot if self.nth_at(1, Star) => {
                    self.start_node_at(cp, NodeKind::Wildcard);
                    self.bump();
                    self.bump();
                    self.finish_node();
                    break;
                }
                Dot if self.nth_is_word(1) => {
                    self.wrap(cp, NodeKind::MemberAccess, Field::Object);
                    self.bump();
                    self.field(Field::Member, |p| p.bump_leaf(NodeKind::Identifier));
                    self.finish_node();
                    last = NodeKind::MemberAccess;
                }
                LParen if is_callable(last) => {
                    self.parse_call(cp);
                    last = NodeKind::FunctionCall;
                }
                Percent if self.at_cursor_attribute() => {
                    self.wrap(cp, NodeKind::CursorAttribute, Field::Cursor);
                    self.bump();
                    self.field(Field::Attribute, |p| p.bump_leaf(NodeKind::Identifier));
                    self.finish_node();
                    last = NodeKind::CursorAttribute;
                }
                OuterJoin => {
                    self.wrap(cp, NodeKind::UnaryExpr, Field::Operand);
                    self.field(Field::Operator, |p| p.bump_leaf(NodeKind::Operator));
                    self.finish_node();
                    last = NodeKind::UnaryExpr;
                }
                _ => break,
            }
        }
        true
    }

    fn parse_primary(&mut self) -> Option<NodeKind> {
        let kind = match self.current() {
            Number | StringLit | KwNull | KwTrue | KwFalse => {
                self.bump_leaf(NodeKind::Literal);
                NodeKind::Literal
            }
            Ident
                if self.nth_at(1, StringLit)
                    && (self.at_word("date") || self.at_word("timestamp")) =>
            {
                self.bump_leaf_n(NodeKind::Literal, 2);
                NodeKind::Literal
            }
            Ident if self.nth_at(1, StringLit) && self.at_word("interval") => {
                let unit = ["year", "month", "day", "hour", "minute", "second"]
                    .iter()
                    .any(|w| self.nth_word(2, w));
                self.bump_leaf_n(NodeKind::Literal, if unit { 3 } else { 2 });
                NodeKind::Literal
            }
            Ident if self.at_word("cast") && self.nth_at(1, LParen) => {
                self.parse_cast();
                NodeKind::CastExpr
            }
            KwExtract if self.nth_at(1, LParen) => {
                self.parse_extract();
                NodeKind::ExtractExpr
            }
            Colon if self.nth_is_word(1) || self.nth_at(1, Number) => {
                self.bump_leaf_n(NodeKind::BindVariable, 2);
                NodeKind::BindVariable
            }
            Inquiry => {
                self.bump_leaf(NodeKind::InquiryDirective);
                NodeKind::InquiryDirective
            }
            LParen if self.at_subquery() => {
                self.parse_subquery();
                NodeKind::Subquery
            }
            LParen => self.parse_parenthesized(),
            KwExists => {
                self.parse_exists();
                NodeKind::ExistsExpr
            }
            KwPrior => {
                self.start_node(NodeKind::PriorExpr);
                self.bump();
                self.field(Field::Operand, |p| p.parse_expr_bp(PREFIX_BP));
                self.finish_node();
                NodeKind::PriorExpr
            }
            KwCase => {
                self.parse_case_expr();
                NodeKind::CaseExpr
            }
            kind if kind.is_ident_like() => {
                self.bump_leaf(NodeKind::Identifier);
                NodeKind::Identifier
            }
            kind => {
                let found = kind.describe();
                self.error_msg(DiagnosticKind::ExpectedExpression, format!("found {found}"));
                return None;
            }
        };
        Some(kind)
    }

    /// `(expr)` or, once a comma shows up, the tuple `(a, b, ...)`.
    fn parse_parenthesized(&mut self) -> NodeKind {
        self.start_node(NodeKind::ParenthesizedExpr);
        let open = self.current_span();
        self.bump();
        let mark = self.builder.child_count();
        self.parse_expr();
        let kind = if self.at(Comma) {
            self.builder.retag(NodeKind::ExpressionList);
            self.builder.tag_since(mark, Field::Items);
            while self.eat(Comma) {
                self.field(Field::Items, |p| p.parse_expr());
            }
            NodeKind::ExpressionList
        } else {
            self.builder.tag_since(mark, Field::Value);
            NodeKind::ParenthesizedExpr
        };
        self.expect_closing_paren(open);
        self.finish_node();
        kind
    }

    fn parse_exists(&mut self) {
        self.start_node(NodeKind::ExistsExpr);
        self.bump();
        if self.at_subquery() {
            self.field(Field::Query, |p| p.parse_subquery());
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpression, "EXISTS needs a subquery");
        }
        self.finish_node();
    }

    /// `CAST(expr AS type)`
    fn parse_cast(&mut self) {
        self.start_node(NodeKind::CastExpr);
        self.bump();
        let open = self.current_span();
        self.bump();
        self.field(Field::Value, |p| p.parse_expr());
        self.expect(KwAs);
        self.field(Field::Type, |p| p.parse_type_spec());
        self.expect_closing_paren(open);
        self.finish_node();
    }

    /// `EXTRACT(part FROM expr)`
    fn parse_extract(&mut self) {
        self.start_node(NodeKind::ExtractExpr);
        self.bump();
        let open = self.current_span();
        self.bump();
        self.field(Field::Part, |p| p.parse_identifier());
        self.expect(KwFrom);
        self.field(Field::Value, |p| p.parse_expr());
        self.expect_closing_paren(open);
        self.finish_node();
    }

    /// Call suffix: arguments, then optional `WITHIN GROUP (ORDER BY ...)` and `OVER (...)`.
    fn parse_call(&mut self, cp: Checkpoint) {
        self.wrap(cp, NodeKind::FunctionCall, Field::Function);
        let open = self.current_span();
        self.bump();
        if self.at(Star) && self.nth_at(1, RParen) {
            self.field(Field::Arguments, |p| p.bump_leaf(NodeKind::Wildcard));
        } else if !self.at(RParen) {
            if matches!(self.current(), KwDistinct | KwUnique | KwAll) {
                self.field(Field::Quantifier, |p| p.bump_modifier(1));
            }
            loop {
                self.field(Field::Arguments, |p| p.parse_argument());
                if !self.eat(Comma) {
                    break;
                }
            }
        }
        self.expect_closing_paren(open);

        if self.at_word("within") && self.nth_at(1, KwGroup) {
            self.bump();
            self.bump();
            let open = self.current_span();
            if self.expect(LParen) {
                if self.at(KwOrder) {
                    self.field(Field::WithinGroup, |p| p.parse_order_by());
                } else {
                    self.expect(KwOrder);
                }
                self.expect_closing_paren(open);
            }
        }
        if self.at(KwOver) && self.nth_at(1, LParen) {
            self.field(Field::Over, |p| p.parse_over_clause());
        }
        self.finish_node();
    }

    /// Positional `expr` or named `name => expr`.
    pub(super) fn parse_argument(&mut self) {
        if self.at_ident_like() && self.nth_at(1, Arrow) {
            self.start_node(NodeKind::NamedArgument);
            self.field(Field::Name, |p| p.bump_leaf(NodeKind::Identifier));
            self.bump();
            self.field(Field::Value, |p| p.parse_expr());
            self.finish_node();
        } else {
            self.parse_expr();
        }
    }

    /// `OVER ([PARTITION BY ...] [ORDER BY ...] [ROWS|RANGE ...])`
    fn parse_over_clause(&mut self) {
        self.start_node(NodeKind::OverClause);
        self.bump();
        let open = self.current_span();
        self.bump();
        if self.at(KwPartition) && self.nth_at(1, KwBy) {
            self.bump();
            self.bump();
            self.parse_expr_list(Field::PartitionBy);
        }
        if self.at(KwOrder) {
            self.field(Field::OrderBy, |p| p.parse_order_by());
        }
        if self.at_word("rows") || self.at_word("range") {
            // Frame bounds are kept as text.
            self.start_node(NodeKind::WindowFrame);
            while !matches!(self.current(), RParen | Semicolon | Eof) {
                self.bump();
            }
            self.finish_node();
        }
        self.expect_closing_paren(open);
        self.finish_node();
    }

    fn parse_case_expr(&mut self) {
        self.start_node(NodeKind::CaseExpr);
        let open = self.open_block("CASE");
        self.bump();
        if !self.at(KwWhen) {
            self.field(Field::Selector, |p| p.parse_expr());
        }
        self.field(Field::WhenClauses, |p| {
            while p.at(KwWhen) {
                p.start_node(NodeKind::CaseWhenClause);
                p.bump();
                p.field(Field::Condition, |p| p.parse_expr());
                p.expect(KwThen);
                p.field(Field::Value, |p| p.parse_expr());
                p.finish_node();
            }
        });
        if self.at(KwElse) {
            self.field(Field::ElseClause, |p| {
                p.start_node(NodeKind::ElseClause);
                p.bump();
                p.field(Field::Value, |p| p.parse_expr());
                p.finish_node();
            });
        }
        self.parse_case_end(CaseContext::Expression, open);
        self.finish_node();
    }

    /// Closes a `CASE` opened at `open`. A terminator that belongs to the other
    /// position is still consumed so the tree stays aligned.
    pub(super) fn parse_case_end(&mut self, context: CaseContext, open: OpenBlock) {
        let expected = match context {
            CaseContext::Expression => "END CASE",
            CaseContext::Statement => "END",
        };
        if !self.at(KwEnd) {
            self.error_unclosed(open, expected);
            return;
        }
        let start = self.current_span().start();
        self.bump();
        let closed_with_case = self.eat(KwCase);
        let message = match (context, closed_with_case) {
            (CaseContext::Expression, false) => "CASE expression must be closed with `END CASE`",
            (CaseContext::Statement, true) => {
                "CASE statement must be closed with `END`, not `END CASE`"
            }
            _ => return,
        };
        let severity = match self.options.case_terminators {
            CaseTerminators::Strict => Severity::Error,
            CaseTerminators::Lenient => Severity::Warning,
        };
        let range = TextRange::new(start, self.prev_end());
        self.error_at(DiagnosticKind::CaseTerminatorMismatch, range, message, severity);
    }
}
