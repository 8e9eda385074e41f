//! Embedded SQL: queries, DML and transaction control.
//!
//! Table expressions are a left-associative chain: explicit joins and `APPLY`
//! bind first, then each `,` wraps everything so far in an `ImplicitJoin`.

use crate::diagnostics::DiagnosticKind;
use crate::parser::core::Parser;
use crate::parser::syntax_kind::SyntaxKind::*;
use crate::parser::syntax_kind::token_sets::{ALIAS_STOP, SET_OPERATORS};
use crate::parser::tree::{Checkpoint, Field, NodeKind};

/// Whether `INTO` may appear in the query being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum IntoClause {
    /// PL/SQL statement position: `SELECT ... INTO` is its own statement kind.
    Allowed,
    /// Subqueries, cursor bodies, `INSERT ... SELECT`.
    Forbidden,
}

impl Parser<'_, '_> {
    /// SQL in statement position; the caller takes care of the `;`.
    ///
    /// Returns whether a statement node was produced.
    pub(super) fn parse_sql_statement(&mut self, cp: Checkpoint) -> bool {
        match self.current() {
            KwSelect | KwWith | LParen => return self.parse_query(cp, IntoClause::Allowed),
            KwInsert => self.parse_insert(cp),
            KwUpdate => self.parse_update(cp),
            KwDelete => self.parse_delete(cp),
            KwMerge => self.parse_merge(cp),
            KwCommit => self.parse_commit(cp),
            KwRollback => self.parse_rollback(cp),
            KwSavepoint => self.parse_savepoint(cp),
            _ => {
                self.error(DiagnosticKind::ExpectedStatement);
                return false;
            }
        }
        true
    }

    /// `( query )`
    pub(super) fn parse_subquery(&mut self) {
        self.start_node(NodeKind::Subquery);
        let open = self.current_span();
        self.bump();
        let cp = self.checkpoint();
        self.field(Field::Query, |p| p.parse_query(cp, IntoClause::Forbidden));
        self.expect_closing_paren(open);
        self.finish_node();
    }

    /// A select, or several joined by `UNION [ALL]`, `INTERSECT`, `MINUS`.
    pub(super) fn parse_query(&mut self, cp: Checkpoint, into: IntoClause) -> bool {
        if !self.enter_recursion() {
            return false;
        }
        self.parse_query_operand(cp, into);
        while self.at_any(SET_OPERATORS) {
            self.wrap(cp, NodeKind::SetOperation, Field::Left);
            let count = if self.at(KwUnion) && self.nth_at(1, KwAll) { 2 } else { 1 };
            self.field(Field::Operator, |p| p.bump_leaf_n(NodeKind::Operator, count));
            let right = self.checkpoint();
            self.field(Field::Right, |p| p.parse_query_operand(right, into));
            self.finish_node();
        }
        self.exit_recursion();
        true
    }

    fn parse_query_operand(&mut self, cp: Checkpoint, into: IntoClause) {
        if self.at_subquery() {
            self.parse_subquery();
        } else {
            self.parse_select(cp, into);
        }
    }

    fn parse_select(&mut self, cp: Checkpoint, into: IntoClause) {
        self.start_node_at(cp, NodeKind::SelectStmt);
        if self.at(KwWith) {
            self.bump();
            loop {
                self.field(Field::Ctes, |p| p.parse_cte());
                if !self.eat(Comma) {
                    break;
                }
            }
        }
        if !self.expect(KwSelect) {
            self.finish_node();
            return;
        }
        if matches!(self.current(), KwDistinct | KwUnique | KwAll) {
            self.field(Field::Quantifier, |p| p.bump_modifier(1));
        }
        loop {
            self.field(Field::SelectList, |p| p.parse_select_item());
            if !self.eat(Comma) {
                break;
            }
        }

        let into_start = self.current_span();
        let bulk = self.at(KwBulk) && self.nth_at(1, KwCollect);
        if bulk || self.at(KwInto) {
            if into == IntoClause::Forbidden {
                self.error_at(
                    DiagnosticKind::IntoNotAllowed,
                    into_start,
                    "a query used as a value cannot select INTO variables",
                    DiagnosticKind::IntoNotAllowed.default_severity(),
                );
            }
            if bulk {
                self.builder.retag(NodeKind::BulkCollectIntoStmt);
                self.field(Field::BulkCollect, |p| p.bump_modifier(2));
            } else {
                self.builder.retag(NodeKind::SelectIntoStmt);
            }
            self.parse_into_targets();
        }

        if self.eat(KwFrom) {
            self.field(Field::From, |p| p.parse_table_expression());
        } else {
            self.expect(KwFrom);
        }
        self.parse_where_clause();
        if self.at_hierarchical_clause() {
            self.field(Field::Hierarchical, |p| p.parse_hierarchical_clause());
        }
        if self.at(KwGroup) && self.nth_at(1, KwBy) {
            self.bump();
            self.bump();
            self.parse_expr_list(Field::GroupBy);
        }
        if self.eat(KwHaving) {
            self.field(Field::Having, |p| p.parse_expr());
        }
        let mut order_by = false;
        let mut for_update = false;
        loop {
            if !order_by && self.at(KwOrder) {
                order_by = true;
                self.field(Field::OrderBy, |p| p.parse_order_by());
            } else if !for_update && self.at(KwFor) && self.nth_at(1, KwUpdate) {
                for_update = true;
                self.field(Field::ForUpdate, |p| p.parse_for_update());
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// `name [(col, ...)] AS (query)`
    fn parse_cte(&mut self) {
        self.start_node(NodeKind::CommonTableExpr);
        self.field(Field::Name, |p| p.parse_identifier());
        if self.at(LParen) {
            let open = self.current_span();
            self.bump();
            self.parse_identifier_list(Field::Columns);
            self.expect_closing_paren(open);
        }
        self.expect(KwAs);
        if self.at_subquery() {
            self.field(Field::Query, |p| p.parse_subquery());
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpression, "expected `(` and a query");
        }
        self.finish_node();
    }

    fn parse_identifier_list(&mut self, field: Field) {
        loop {
            self.field(field, |p| p.parse_qualified_name());
            if !self.eat(Comma) {
                break;
            }
        }
    }

    fn parse_select_item(&mut self) {
        if self.at(Star) {
            self.bump_leaf(NodeKind::Wildcard);
            return;
        }
        self.start_node(NodeKind::SelectItem);
        self.field(Field::Value, |p| p.parse_expr());
        self.parse_alias();
        self.finish_node();
    }

    fn at_alias(&self) -> bool {
        self.at_ident_like() && !self.at_any(ALIAS_STOP) && !self.at_join() && !self.at_apply()
    }

    /// Join words are soft, so they count only when `JOIN` follows.
    fn at_join(&self) -> bool {
        match self.current() {
            KwJoin => true,
            KwInner | KwCross => self.nth_at(1, KwJoin),
            KwLeft | KwRight | KwFull => {
                self.nth_at(1, KwJoin) || (self.nth_at(1, KwOuter) && self.nth_at(2, KwJoin))
            }
            _ => false,
        }
    }

    fn at_apply(&self) -> bool {
        matches!(self.current(), KwCross | KwOuter) && self.nth_at(1, KwApply)
    }

    fn parse_alias(&mut self) {
        if self.eat(KwAs) {
            self.field(Field::Alias, |p| p.parse_identifier());
        } else if self.at_alias() {
            self.field(Field::Alias, |p| p.bump_leaf(NodeKind::Identifier));
        }
    }

    /// `INTO a, b.c, :d [LIMIT n]`
    pub(super) fn parse_into_targets(&mut self) {
        if !self.expect(KwInto) {
            return;
        }
        loop {
            self.field(Field::Into, |p| p.parse_postfix_expr());
            if !self.eat(Comma) {
                break;
            }
        }
        if self.eat_word("limit") {
            self.field(Field::Limit, |p| p.parse_expr());
        }
    }

    fn parse_table_expression(&mut self) {
        let cp = self.checkpoint();
        self.parse_joined_table(cp);
        while self.at(Comma) {
            self.wrap(cp, NodeKind::ImplicitJoin, Field::Left);
            self.bump();
            let right = self.checkpoint();
            self.field(Field::Right, |p| p.parse_joined_table(right));
            self.finish_node();
        }
    }

    /// A table reference followed by explicit joins and applies.
    fn parse_joined_table(&mut self, cp: Checkpoint) {
        self.parse_table_ref();
        loop {
            if self.at_apply() {
                self.wrap(cp, NodeKind::ApplyClause, Field::Left);
                self.field(Field::ApplyType, |p| p.bump_modifier(1));
                self.bump();
                self.field(Field::Right, |p| p.parse_table_ref());
                self.finish_node();
            } else if self.at_join() {
                self.parse_join(cp);
            } else {
                break;
            }
        }
    }

    fn parse_join(&mut self, cp: Checkpoint) {
        self.wrap(cp, NodeKind::JoinClause, Field::Left);
        let cross = self.at(KwCross);
        match self.current() {
            KwJoin => {}
            KwLeft | KwRight | KwFull => {
                let count = if self.nth_at(1, KwOuter) { 2 } else { 1 };
                self.field(Field::JoinType, |p| p.bump_modifier(count));
            }
            _ => self.field(Field::JoinType, |p| p.bump_modifier(1)),
        }
        self.expect(KwJoin);
        self.field(Field::Right, |p| p.parse_table_ref());
        if !cross {
            if self.eat(KwOn) {
                self.field(Field::Condition, |p| p.parse_expr());
            } else if self.eat(KwUsing) {
                let open = self.current_span();
                if self.expect(LParen) {
                    self.parse_identifier_list(Field::Columns);
                    self.expect_closing_paren(open);
                }
            } else {
                self.expect(KwOn);
            }
        }
        self.finish_node();
    }

    /// Table, view, subquery or `TABLE(collection)`, with an optional alias.
    pub(super) fn parse_table_ref(&mut self) {
        self.start_node(NodeKind::TableRef);
        if self.at_subquery() {
            self.field(Field::Table, |p| p.parse_subquery());
        } else if self.at(KwTable) && self.nth_at(1, LParen) {
            self.field(Field::Table, |p| {
                p.start_node(NodeKind::TableCollectionExpr);
                p.bump();
                let open = p.current_span();
                p.bump();
                p.field(Field::Value, |p| p.parse_expr());
                p.expect_closing_paren(open);
                p.finish_node();
            });
        } else if !self.field(Field::Table, |p| p.parse_qualified_name()) {
            self.finish_node();
            return;
        }
        self.parse_alias();
        self.finish_node();
    }

    fn parse_where_clause(&mut self) {
        if !self.eat(KwWhere) {
            return;
        }
        if self.at(KwCurrent) && self.nth_at(1, KwOf) {
            self.field(Field::Where, |p| {
                p.start_node(NodeKind::WhereCurrentOf);
                p.bump();
                p.bump();
                p.field(Field::Cursor, |p| p.parse_identifier());
                p.finish_node();
            });
        } else {
            self.field(Field::Where, |p| p.parse_expr());
        }
    }

    fn at_hierarchical_clause(&self) -> bool {
        (self.at(KwStart) && self.nth_at(1, KwWith)) || (self.at(KwConnect) && self.nth_at(1, KwBy))
    }

    /// `START WITH` and `CONNECT BY [NOCYCLE]`, in either order.
    fn parse_hierarchical_clause(&mut self) {
        self.start_node(NodeKind::HierarchicalClause);
        let mut start_with = false;
        let mut connect_by = false;
        loop {
            if !start_with && self.at(KwStart) && self.nth_at(1, KwWith) {
                start_with = true;
                self.bump();
                self.bump();
                self.field(Field::StartWith, |p| p.parse_expr());
            } else if !connect_by && self.at(KwConnect) && self.nth_at(1, KwBy) {
                connect_by = true;
                self.bump();
                self.bump();
                if self.at(KwNocycle) {
                    self.field(Field::Modifiers, |p| p.bump_modifier(1));
                }
                self.field(Field::ConnectBy, |p| p.parse_expr());
            } else {
                break;
            }
        }
        self.finish_node();
    }

    /// `ORDER [SIBLINGS] BY item, ...`
    pub(super) fn parse_order_by(&mut self) {
        self.start_node(NodeKind::OrderByClause);
        self.bump();
        if self.at(KwSiblings) {
            self.field(Field::Modifiers, |p| p.bump_modifier(1));
        }
        self.expect(KwBy);
        loop {
            self.field(Field::Items, |p| p.parse_order_by_item());
            if !self.eat(Comma) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_order_by_item(&mut self) {
        self.start_node(NodeKind::OrderByItem);
        self.field(Field::Value, |p| p.parse_expr());
        if matches!(self.current(), KwAsc | KwDesc) {
            self.field(Field::Direction, |p| p.bump_modifier(1));
        }
        if self.at_word("nulls") && (self.nth_word(1, "first") || self.nth_word(1, "last")) {
            self.field(Field::Nulls, |p| p.bump_modifier(2));
        }
        self.finish_node();
    }

    /// `FOR UPDATE [OF col, ...] [NOWAIT | WAIT n | SKIP LOCKED]`
    fn parse_for_update(&mut self) {
        self.start_node(NodeKind::ForUpdateClause);
        self.bump();
        self.bump();
        if self.eat(KwOf) {
            loop {
                self.field(Field::Columns, |p| p.parse_postfix_expr());
                if !self.eat(Comma) {
                    break;
                }
            }
        }
        if self.at(KwNowait) {
            self.field(Field::Wait, |p| p.bump_modifier(1));
        } else if self.at(KwWait) {
            let count = if self.nth_at(1, Number) { 2 } else { 1 };
            self.field(Field::Wait, |p| p.bump_modifier(count));
        } else if self.at_word("skip") && self.nth_word(1, "locked") {
            self.field(Field::Wait, |p| p.bump_modifier(2));
        }
        self.finish_node();
    }

    fn parse_insert(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::InsertStmt);
        self.bump();
        self.expect(KwInto);
        self.field(Field::Table, |p| p.parse_table_ref());
        if self.at(LParen) && !self.at_subquery() {
            let open = self.current_span();
            self.bump();
            self.parse_identifier_list(Field::Columns);
            self.expect_closing_paren(open);
        }
        self.parse_insert_source();
        self.parse_returning_clause();
        self.finish_node();
    }

    /// `VALUES (...)`, `VALUES record` or a query.
    fn parse_insert_source(&mut self) {
        if self.eat(KwValues) {
            if self.at(LParen) {
                self.field(Field::Values, |p| p.parse_expression_list());
            } else {
                self.field(Field::Values, |p| p.parse_expr());
            }
        } else if self.at_subquery() {
            self.field(Field::Query, |p| p.parse_subquery());
        } else if matches!(self.current(), KwSelect | KwWith) {
            let cp = self.checkpoint();
            self.field(Field::Query, |p| p.parse_query(cp, IntoClause::Forbidden));
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected VALUES or a query");
        }
    }

    fn parse_update(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::UpdateStmt);
        self.bump();
        self.field(Field::Table, |p| p.parse_table_ref());
        self.expect(KwSet);
        self.parse_set_clauses();
        self.parse_where_clause();
        self.parse_returning_clause();
        self.finish_node();
    }

    /// `col = expr, (a, b) = (subquery), ...`
    fn parse_set_clauses(&mut self) {
        loop {
            self.field(Field::Set, |p| {
                p.start_node(NodeKind::SetClause);
                p.field(Field::Target, |p| p.parse_postfix_expr());
                p.expect(Eq);
                p.field(Field::Value, |p| p.parse_expr());
                p.finish_node();
            });
            if !self.eat(Comma) {
                break;
            }
        }
    }

    fn parse_delete(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::DeleteStmt);
        self.bump();
        self.eat(KwFrom);
        self.field(Field::Table, |p| p.parse_table_ref());
        self.parse_where_clause();
        self.parse_returning_clause();
        self.finish_node();
    }

    /// `RETURNING expr, ... INTO target, ...` (`RETURN` is a synonym).
    fn parse_returning_clause(&mut self) {
        if !matches!(self.current(), KwReturning | KwReturn) {
            return;
        }
        self.field(Field::Returning, |p| {
            p.start_node(NodeKind::ReturningClause);
            p.bump();
            p.parse_expr_list(Field::Values);
            p.parse_into_targets();
            p.finish_node();
        });
    }

    fn parse_merge(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::MergeStmt);
        self.bump();
        self.expect(KwInto);
        self.field(Field::Table, |p| p.parse_table_ref());
        self.expect(KwUsing);
        self.field(Field::Source, |p| p.parse_table_ref());
        self.expect(KwOn);
        self.field(Field::Condition, |p| p.parse_expr());
        while self.at(KwWhen) {
            if self.nth_at(1, KwMatched) {
                self.field(Field::Clauses, |p| p.parse_merge_matched());
            } else if self.nth_at(1, KwNot) && self.nth_at(2, KwMatched) {
                self.field(Field::Clauses, |p| p.parse_merge_not_matched());
            } else {
                self.error_and_bump(
                    DiagnosticKind::UnexpectedToken,
                    "expected WHEN MATCHED or WHEN NOT MATCHED",
                );
            }
        }
        self.finish_node();
    }

    /// `WHEN MATCHED [AND cond] THEN UPDATE SET ... [WHERE ...] [DELETE WHERE ...] | DELETE`
    fn parse_merge_matched(&mut self) {
        self.start_node(NodeKind::MergeMatchedClause);
        self.bump();
        self.bump();
        if self.eat(KwAnd) {
            self.field(Field::Condition, |p| p.parse_expr());
        }
        self.expect(KwThen);
        if self.eat(KwUpdate) {
            self.expect(KwSet);
            self.parse_set_clauses();
            self.parse_where_clause();
            if self.at(KwDelete) && self.nth_at(1, KwWhere) {
                self.bump();
                self.parse_where_clause();
            }
        } else if self.eat(KwDelete) {
            self.parse_where_clause();
        } else {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected UPDATE or DELETE");
        }
        self.finish_node();
    }

    /// `WHEN NOT MATCHED [AND cond] THEN INSERT [(cols)] VALUES (...) [WHERE ...]`
    fn parse_merge_not_matched(&mut self) {
        self.start_node(NodeKind::MergeNotMatchedClause);
        self.bump();
        self.bump();
        self.bump();
        if self.eat(KwAnd) {
            self.field(Field::Condition, |p| p.parse_expr());
        }
        self.expect(KwThen);
        if self.expect(KwInsert) {
            if self.at(LParen) {
                let open = self.current_span();
                self.bump();
                self.parse_identifier_list(Field::Columns);
                self.expect_closing_paren(open);
            }
            if self.expect(KwValues) && self.at(LParen) {
                self.field(Field::Values, |p| p.parse_expression_list());
            }
            self.parse_where_clause();
        }
        self.finish_node();
    }

    fn parse_commit(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::CommitStmt);
        self.bump();
        self.eat_word("work");
        self.finish_node();
    }

    /// `ROLLBACK [WORK] [TO [SAVEPOINT] name]`
    fn parse_rollback(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::RollbackStmt);
        self.bump();
        self.eat_word("work");
        if self.eat(KwTo) {
            self.eat(KwSavepoint);
            self.field(Field::Name, |p| p.parse_identifier());
        }
        self.finish_node();
    }

    fn parse_savepoint(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::SavepointStmt);
        self.bump();
        self.field(Field::Name, |p| p.parse_identifier());
        self.finish_node();
    }
}
