//! Statements, blocks and exception handlers.

use super::expressions::{COMPARISON_BP, CaseContext};
use super::sql::IntoClause;
use crate::diagnostics::DiagnosticKind;
use crate::parser::core::{OpenBlock, Parser};
use crate::parser::syntax_kind::SyntaxKind::*;
use crate::parser::syntax_kind::TokenSet;
use crate::parser::syntax_kind::token_sets::{BLOCK_END, STMT_RECOVERY};
use crate::parser::tree::{Checkpoint, Field, NodeKind};

/// Keywords a `<<label>>` can be attached to.
const LABEL_TARGETS: TokenSet = TokenSet::new(&[KwLoop, KwWhile, KwFor, KwBegin, KwDeclare]);

const FORALL_DML: TokenSet = TokenSet::new(&[KwInsert, KwUpdate, KwDelete, KwMerge, KwSelect]);

impl Parser<'_, '_> {
    /// Statements up to a token in `stop`. `Eof` always stops.
    pub(super) fn parse_statement_list(&mut self, stop: TokenSet) {
        while !self.at_any(stop) && !self.eof() {
            let before = self.pos;
            self.parse_statement_item();
            if self.pos == before {
                self.bump_stray(DiagnosticKind::ExpectedStatement);
            }
        }
    }

    /// Reports the current token with `found ...` and consumes it into an `Error` node.
    pub(super) fn bump_stray(&mut self, kind: DiagnosticKind) {
        let found = self.current().describe();
        self.error_and_bump(kind, format!("found {found}"));
    }

    fn parse_statement_item(&mut self) {
        let cp = self.checkpoint();
        self.parse_annotations();
        if self.at(KwProcedure) || self.at(KwFunction) {
            self.error_msg(
                DiagnosticKind::DeclarationInStatementList,
                "subprograms belong in the declaration section",
            );
            self.parse_subprogram(cp);
            return;
        }
        self.parse_statement(cp);
    }

    /// One statement, adopting annotations and labels parsed since `cp`.
    pub(super) fn parse_statement(&mut self, cp: Checkpoint) {
        if !self.enter_recursion() {
            return;
        }
        self.parse_statement_inner(cp);
        self.exit_recursion();
    }

    fn parse_statement_inner(&mut self, cp: Checkpoint) {
        if self.at(LabelOpen) {
            while self.at(LabelOpen) {
                self.parse_label();
            }
            // A label in front of anything else is a statement of its own.
            if !self.at_any(LABEL_TARGETS) {
                return;
            }
        }

        match self.current() {
            KwNull => {
                self.start_statement(cp, NodeKind::NullStmt);
                self.bump();
                self.finish_statement();
            }
            KwIf => self.parse_if(cp),
            KwLoop => self.parse_loop(cp),
            KwWhile => self.parse_while(cp),
            KwFor => self.parse_for(cp),
            KwForall => self.parse_forall(cp),
            KwReturn => self.parse_return(cp),
            KwRaise => self.parse_raise(cp),
            KwExit => self.parse_exit(cp, NodeKind::ExitStmt),
            KwContinue => self.parse_exit(cp, NodeKind::ContinueStmt),
            KwGoto => self.parse_goto(cp),
            KwBegin | KwDeclare => self.parse_block(cp),
            KwCase => self.parse_case_stmt(cp),
            KwExecute => self.parse_execute_immediate(cp),
            KwOpen => self.parse_open(cp),
            KwFetch => self.parse_fetch(cp),
            KwClose => self.parse_close(cp),
            KwSelect | KwWith | KwInsert | KwUpdate | KwDelete | KwMerge | KwCommit
            | KwRollback => self.parse_sql_in_statement(cp),
            KwSavepoint if self.nth(1).is_ident_like() => self.parse_sql_in_statement(cp),
            LParen if self.at_subquery() => self.parse_sql_in_statement(cp),
            DirIf => self.parse_conditional_compilation(cp),
            DirError => self.parse_error_directive(cp),
            kind if kind.is_template_marker() => self.parse_template_directive(cp),
            kind if kind.is_ident_like() || kind == Colon => self.parse_call_or_assignment(cp),
            Semicolon => self.bump_stray(DiagnosticKind::UnexpectedToken),
            kind => {
                self.error_recover(
                    DiagnosticKind::ExpectedStatement,
                    format!("found {}", kind.describe()),
                    STMT_RECOVERY,
                );
            }
        }
    }

    /// Opens a statement node at `cp`; labels parsed before it become its `label`.
    fn start_statement(&mut self, cp: Checkpoint, kind: NodeKind) {
        self.start_node_at(cp, kind);
        self.builder.tag_since(0, Field::Label);
    }

    /// Takes the `;` (skipping to a sync point if it is missing) and closes the node.
    fn finish_statement(&mut self) {
        if !self.expect_semicolon() {
            self.skip_until(STMT_RECOVERY);
        }
        self.finish_node();
    }

    fn parse_label(&mut self) {
        debug_assert!(self.at(LabelOpen));
        self.start_node(NodeKind::LabelStmt);
        self.bump();
        self.field(Field::Name, |p| p.parse_identifier());
        self.expect(LabelClose);
        self.finish_node();
    }

    /// `target := value;` or `procedure_call;`
    fn parse_call_or_assignment(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::CallStmt);
        let mark = self.builder.child_count();
        self.parse_postfix_expr();
        if self.eat(Assign) {
            self.builder.retag(NodeKind::AssignmentStmt);
            self.builder.tag_since(mark, Field::Target);
            self.field(Field::Value, |p| p.parse_expr());
        } else {
            self.builder.tag_since(mark, Field::Call);
        }
        self.finish_statement();
    }

    fn parse_sql_in_statement(&mut self, cp: Checkpoint) {
        if self.parse_sql_statement(cp) && self.builder.reopen_last() {
            self.finish_statement();
        } else if !self.eof() && !self.expect_semicolon() {
            self.skip_until(STMT_RECOVERY);
        }
    }

    fn parse_if(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::IfStmt);
        let open = self.open_block("IF");
        self.bump();
        self.field(Field::Condition, |p| p.parse_expr());
        self.expect(KwThen);
        self.field(Field::ThenBody, |p| p.parse_statement_list(BLOCK_END));
        self.field(Field::ElsifClauses, |p| {
            while p.at(KwElsif) {
                p.start_node(NodeKind::ElsifClause);
                p.bump();
                p.field(Field::Condition, |p| p.parse_expr());
                p.expect(KwThen);
                p.field(Field::ThenBody, |p| p.parse_statement_list(BLOCK_END));
                p.finish_node();
            }
        });
        if self.at(KwElse) {
            self.field(Field::ElseClause, |p| {
                p.start_node(NodeKind::ElseClause);
                p.bump();
                p.field(Field::Body, |p| p.parse_statement_list(BLOCK_END));
                p.finish_node();
            });
        }
        if self.at(KwEnd) && self.nth_at(1, KwIf) {
            self.bump();
            self.bump();
        } else {
            self.error_unclosed(open, "END IF");
        }
        self.finish_statement();
    }

    fn parse_loop(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::LoopStmt);
        let open = self.open_block("LOOP");
        self.parse_loop_body(open);
        self.finish_statement();
    }

    fn parse_while(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::WhileLoopStmt);
        let open = self.open_block("WHILE");
        self.bump();
        self.field(Field::Condition, |p| p.parse_expr());
        self.parse_loop_body(open);
        self.finish_statement();
    }

    /// `FOR i IN [REVERSE] low..high LOOP`, `FOR r IN cursor(args) LOOP`, `FOR r IN (query) LOOP`
    fn parse_for(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::ForLoopStmt);
        let open = self.open_block("FOR");
        self.bump();
        self.field(Field::LoopVariable, |p| p.parse_identifier());
        self.expect(KwIn);
        if self.at(KwReverse) {
            self.field(Field::Direction, |p| p.bump_modifier(1));
        }
        if self.at_subquery() {
            self.field(Field::Query, |p| p.parse_subquery());
        } else {
            let mark = self.builder.child_count();
            self.parse_expr();
            if self.eat(DotDot) {
                self.builder.tag_since(mark, Field::Low);
                self.field(Field::High, |p| p.parse_expr());
            } else {
                self.builder.tag_since(mark, Field::Cursor);
            }
        }
        self.parse_loop_body(open);
        self.finish_statement();
    }

    /// `LOOP statements END LOOP [label]`
    fn parse_loop_body(&mut self, open: OpenBlock) {
        self.expect(KwLoop);
        self.field(Field::Body, |p| p.parse_statement_list(BLOCK_END));
        if self.at(KwEnd) && self.nth_at(1, KwLoop) {
            self.bump();
            self.bump();
            if self.at_ident_like() {
                self.field(Field::EndName, |p| p.bump_leaf(NodeKind::Identifier));
            }
        } else {
            self.error_unclosed(open, "END LOOP");
        }
    }

    /// `FORALL i IN low..high | INDICES OF c [BETWEEN a AND b] | VALUES OF c [SAVE EXCEPTIONS] dml;`
    fn parse_forall(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::ForallStmt);
        self.bump();
        self.field(Field::LoopVariable, |p| p.parse_identifier());
        self.expect(KwIn);
        if self.at_word("indices") && self.nth_at(1, KwOf) {
            self.field(Field::Modifiers, |p| p.bump_modifier(2));
            self.field(Field::Collection, |p| p.parse_postfix_expr());
            if self.eat(KwBetween) {
                self.field(Field::Low, |p| p.parse_expr_bp(COMPARISON_BP));
                self.expect(KwAnd);
                self.field(Field::High, |p| p.parse_expr_bp(COMPARISON_BP));
            }
        } else if self.at(KwValues) && self.nth_at(1, KwOf) {
            self.field(Field::Modifiers, |p| p.bump_modifier(2));
            self.field(Field::Collection, |p| p.parse_postfix_expr());
        } else {
            self.field(Field::Low, |p| p.parse_expr());
            self.expect(DotDot);
            self.field(Field::High, |p| p.parse_expr());
        }
        if self.at_word("save") && self.nth_word(1, "exceptions") {
            self.field(Field::Modifiers, |p| p.bump_modifier(2));
        }
        if self.at_any(FORALL_DML) {
            let inner = self.checkpoint();
            self.field(Field::Body, |p| p.parse_sql_statement(inner));
        } else {
            let found = self.current().describe();
            self.error_msg(
                DiagnosticKind::ExpectedStatement,
                format!("FORALL needs a DML statement, found {found}"),
            );
        }
        self.finish_statement();
    }

    fn parse_return(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::ReturnStmt);
        self.bump();
        if !self.at(Semicolon) && !self.at_any(BLOCK_END) {
            self.field(Field::Value, |p| p.parse_expr());
        }
        self.finish_statement();
    }

    fn parse_raise(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::RaiseStmt);
        self.bump();
        if self.at_ident_like() {
            self.field(Field::Name, |p| p.parse_qualified_name());
        }
        self.finish_statement();
    }

    /// `EXIT [label] [WHEN cond];` and the same for `CONTINUE`.
    fn parse_exit(&mut self, cp: Checkpoint, kind: NodeKind) {
        self.start_statement(cp, kind);
        self.bump();
        if self.at_ident_like() {
            self.field(Field::Label, |p| p.bump_leaf(NodeKind::Identifier));
        }
        if self.eat(KwWhen) {
            self.field(Field::Condition, |p| p.parse_expr());
        }
        self.finish_statement();
    }

    fn parse_goto(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::GotoStmt);
        self.bump();
        self.field(Field::Label, |p| p.parse_identifier());
        self.finish_statement();
    }

    /// `[DECLARE declarations] BEGIN statements [EXCEPTION handlers] END [label];`
    fn parse_block(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::AnonymousBlock);
        let open = self.open_block(if self.at(KwDeclare) { "DECLARE" } else { "BEGIN" });
        if self.eat(KwDeclare) {
            self.parse_declare_section();
        }
        self.parse_block_body(open, None);
        self.finish_node();
    }

    /// `BEGIN statements [EXCEPTION handlers]` followed by the closing `END [name];`.
    pub(super) fn parse_block_body(&mut self, open: OpenBlock, name: Option<&str>) {
        if self.eat(KwBegin) {
            self.field(Field::Body, |p| {
                p.parse_statement_list(BLOCK_END);
                // A stray branch keyword must not close the whole block.
                while matches!(p.current(), KwElse | KwElsif | KwWhen) {
                    p.bump_stray(DiagnosticKind::UnexpectedToken);
                    p.parse_statement_list(BLOCK_END);
                }
            });
            if self.eat(KwException) {
                self.parse_exception_handlers();
            }
        } else {
            self.expect(KwBegin);
        }
        self.parse_end(open, name);
    }

    /// `WHEN a [OR b ...] THEN statements`, repeated. A second `OTHERS` is an error.
    pub(super) fn parse_exception_handlers(&mut self) {
        let mut catch_all = None;
        self.field(Field::ExceptionHandler, |p| {
            while p.at(KwWhen) {
                p.start_node(NodeKind::ExceptionHandler);
                p.bump();
                p.field(Field::Exceptions, |p| loop {
                    if p.at_word("others") {
                        let span = p.current_span();
                        match catch_all {
                            Some(first) => {
                                if p.should_report(span.start()) {
                                    p.diagnostics
                                        .report(DiagnosticKind::DuplicateCatchAll, span)
                                        .related_to("first `WHEN OTHERS` here", first)
                                        .emit();
                                }
                            }
                            None => catch_all = Some(span),
                        }
                    }
                    if !p.parse_qualified_name() || !p.eat(KwOr) {
                        break;
                    }
                });
                p.expect(KwThen);
                p.field(Field::Body, |p| p.parse_statement_list(BLOCK_END));
                p.finish_node();
            }
        });
    }

    fn parse_case_stmt(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::CaseStmt);
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
                p.field(Field::Body, |p| p.parse_statement_list(BLOCK_END));
                p.finish_node();
            }
        });
        if self.at(KwElse) {
            self.field(Field::ElseClause, |p| {
                p.start_node(NodeKind::ElseClause);
                p.bump();
                p.field(Field::Body, |p| p.parse_statement_list(BLOCK_END));
                p.finish_node();
            });
        }
        self.parse_case_end(CaseContext::Statement, open);
        self.finish_statement();
    }

    /// `EXECUTE IMMEDIATE expr [[BULK COLLECT] INTO ...] [USING ...] [RETURNING INTO ...];`
    fn parse_execute_immediate(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::ExecuteImmediateStmt);
        self.bump();
        self.expect(KwImmediate);
        self.field(Field::Value, |p| p.parse_expr());
        self.parse_bulk_collect_into();
        if self.at(KwUsing) {
            self.parse_using_arguments();
        }
        if matches!(self.current(), KwReturning | KwReturn) && self.nth_at(1, KwInto) {
            self.field(Field::Returning, |p| {
                p.start_node(NodeKind::ReturningClause);
                p.bump();
                p.parse_into_targets();
                p.finish_node();
            });
        }
        self.finish_statement();
    }

    /// Optional `[BULK COLLECT] INTO targets [LIMIT n]`.
    fn parse_bulk_collect_into(&mut self) {
        if self.at(KwBulk) && self.nth_at(1, KwCollect) {
            self.field(Field::BulkCollect, |p| p.bump_modifier(2));
            self.parse_into_targets();
        } else if self.at(KwInto) {
            self.parse_into_targets();
        }
    }

    /// `USING [IN | OUT | IN OUT] expr, ...`
    fn parse_using_arguments(&mut self) {
        self.bump();
        loop {
            self.field(Field::Using, |p| {
                p.start_node(NodeKind::UsingArgument);
                let direction = match (p.current(), p.nth(1)) {
                    (KwIn, KwOut) => 2,
                    (KwIn | KwOut, _) => 1,
                    _ => 0,
                };
                if direction > 0 {
                    p.field(Field::Direction, |p| p.bump_modifier(direction));
                }
                p.field(Field::Value, |p| p.parse_expr());
                p.finish_node();
            });
            if !self.eat(Comma) {
                break;
            }
        }
    }

    /// `OPEN c[(args)] [FOR query | FOR expr [USING ...]];`
    fn parse_open(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::OpenCursorStmt);
        self.bump();
        self.field(Field::Cursor, |p| p.parse_postfix_expr());
        if self.eat(KwFor) {
            if matches!(self.current(), KwSelect | KwWith) {
                let query = self.checkpoint();
                self.field(Field::Query, |p| p.parse_query(query, IntoClause::Forbidden));
            } else if self.at_subquery() {
                self.field(Field::Query, |p| p.parse_subquery());
            } else {
                self.field(Field::Value, |p| p.parse_expr());
            }
            if self.at(KwUsing) {
                self.parse_using_arguments();
            }
        }
        self.finish_statement();
    }

    /// `FETCH c [BULK COLLECT] INTO targets [LIMIT n];`
    fn parse_fetch(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::FetchStmt);
        self.bump();
        self.field(Field::Cursor, |p| p.parse_postfix_expr());
        if self.at(KwBulk) && self.nth_at(1, KwCollect) {
            self.field(Field::BulkCollect, |p| p.bump_modifier(2));
        }
        self.parse_into_targets();
        self.finish_statement();
    }

    fn parse_close(&mut self, cp: Checkpoint) {
        self.start_statement(cp, NodeKind::CloseStmt);
        self.bump();
        self.field(Field::Cursor, |p| p.parse_postfix_expr());
        self.finish_statement();
    }
}
