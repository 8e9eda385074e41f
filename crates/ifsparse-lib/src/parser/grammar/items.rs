//! Top level, packages, subprograms and declaration sections.

use super::sql::IntoClause;
use crate::diagnostics::{DiagnosticKind, Severity};
use crate::parser::core::{OpenBlock, Parser};
use crate::parser::syntax_kind::SyntaxKind::*;
use crate::parser::syntax_kind::TokenSet;
use crate::parser::syntax_kind::token_sets::{BLOCK_END, DECL_RECOVERY};
use crate::parser::tree::{Checkpoint, Field, NodeId, NodeKind};

/// Tokens that end a declaration section.
const DECLARE_SECTION_END: TokenSet =
    TokenSet::new(&[KwBegin, KwEnd, DirElse, DirElsif, DirEnd, Eof]);

/// Where a broken parameter list picks up again.
const PARAMETER_RECOVERY: TokenSet =
    TokenSet::new(&[RParen, KwIs, KwAs, KwReturn, Semicolon, KwBegin]);

/// Words that may follow a subprogram signature before `IS`.
const SUBPROGRAM_TRAILERS: &[&str] = &[
    "deterministic",
    "pipelined",
    "parallel_enable",
    "result_cache",
];

impl<'src> Parser<'src, '_> {
    pub(crate) fn parse_root(&mut self) -> NodeId {
        self.start_node(NodeKind::SourceFile);
        while !self.eof() {
            let before = self.pos;
            if self.at(Slash) {
                // SQL*Plus run marker between units
                self.bump();
                continue;
            }
            if self.at_word("layer") && self.nth(1).is_ident_like() && self.nth_at(2, Semicolon) {
                self.parse_layer_directive();
                continue;
            }
            self.parse_mixed_item();
            if self.pos == before {
                self.bump_stray(DiagnosticKind::ExpectedDeclaration);
            }
        }
        self.bump_eof();
        self.finish_node()
    }

    /// An item where both declarations and statements may appear: the top level
    /// and the branches of conditional-compilation directives.
    pub(super) fn parse_mixed_item(&mut self) {
        let cp = self.checkpoint();
        self.parse_annotations();
        if self.at_declaration_start() {
            self.parse_declaration(cp);
        } else {
            self.parse_statement(cp);
        }
    }

    pub(super) fn at_declaration_start(&self) -> bool {
        match self.current() {
            KwProcedure | KwFunction | KwCursor | KwPragma | KwSubtype | KwPackage | KwCreate => true,
            KwType => {
                self.nth(1).is_ident_like() && (self.nth_at(2, KwIs) || self.nth_at(2, KwAs))
            }
            KwSavepoint => false,
            kind if kind.is_ident_like() => {
                let next = self.nth(1);
                matches!(next, KwConstant | KwException) || next.is_ident_like()
            }
            _ => false,
        }
    }

    /// `layer Core;`
    fn parse_layer_directive(&mut self) {
        self.start_node(NodeKind::LayerDirective);
        self.bump();
        self.field(Field::Name, |p| p.bump_leaf(NodeKind::Identifier));
        self.bump();
        self.finish_node();
    }

    /// Declarations up to `BEGIN`, `END` or a directive boundary.
    pub(super) fn parse_declare_section(&mut self) {
        self.field(Field::Declarations, |p| {
            while !p.at_any(DECLARE_SECTION_END) {
                let before = p.pos;
                p.parse_declaration_item();
                if p.pos == before {
                    p.bump_stray(DiagnosticKind::ExpectedDeclaration);
                }
            }
        });
    }

    fn parse_declaration_item(&mut self) {
        let cp = self.checkpoint();
        self.parse_annotations();
        match self.current() {
            DirIf => self.parse_conditional_compilation(cp),
            DirError => self.parse_error_directive(cp),
            kind if kind.is_template_marker() => self.parse_template_directive(cp),
            _ if self.at_declaration_start() => self.parse_declaration(cp),
            kind => {
                self.error_recover(
                    DiagnosticKind::ExpectedDeclaration,
                    format!("found {}", kind.describe()),
                    DECL_RECOVERY,
                );
            }
        }
    }

    fn parse_declaration(&mut self, cp: Checkpoint) {
        if !self.enter_recursion() {
            return;
        }
        match self.current() {
            KwCreate => self.parse_create(cp),
            KwPackage => self.parse_package(cp),
            KwProcedure | KwFunction => self.parse_subprogram(cp),
            KwCursor => self.parse_cursor_decl(cp),
            KwPragma => self.parse_pragma(cp),
            KwSubtype => self.parse_subtype(cp),
            KwType => self.parse_type_decl(cp),
            _ => self.parse_variable_decl(cp),
        }
        self.exit_recursion();
    }

    /// `;` after a declaration, or a skip to the next declaration.
    fn finish_declaration(&mut self) {
        if !self.expect_semicolon() {
            self.skip_until(DECL_RECOVERY);
        }
        self.finish_node();
    }

    /// Name of a unit being declared; returns its last segment for the `END` check.
    fn parse_decl_name(&mut self) -> Option<&'src str> {
        if !self.at_ident_like() {
            self.error(DiagnosticKind::ExpectedIdentifier);
            return None;
        }
        let mut last = 0;
        while self.nth_at(last + 1, Dot) && self.nth_is_word(last + 2) {
            last += 2;
        }
        let text = self.nth_text(last);
        self.field(Field::Name, |p| p.parse_qualified_name());
        Some(text)
    }

    fn expect_is_or_as(&mut self) -> bool {
        self.eat(KwIs) || self.eat(KwAs) || self.expect(KwIs)
    }

    /// `CREATE [OR REPLACE] [EDITIONABLE | NONEDITIONABLE] PACKAGE | PROCEDURE | FUNCTION ...`
    fn parse_create(&mut self, cp: Checkpoint) {
        let mut count = 1;
        if self.nth_at(1, KwOr) && self.nth_at(2, KwReplace) {
            count += 2;
        }
        if self.nth_word(count, "editionable") || self.nth_word(count, "noneditionable") {
            count += 1;
        }
        self.field(Field::Modifiers, |p| p.bump_modifier(count));
        match self.current() {
            KwPackage => self.parse_package(cp),
            KwProcedure | KwFunction => self.parse_subprogram(cp),
            kind => {
                self.start_node_at(cp, NodeKind::Error);
                let found = kind.describe();
                self.error_msg(
                    DiagnosticKind::ExpectedDeclaration,
                    format!("CREATE supports PACKAGE, PROCEDURE and FUNCTION, found {found}"),
                );
                while !self.at_any(DECL_RECOVERY) && !self.at(Slash) {
                    let semicolon = self.at(Semicolon);
                    self.bump();
                    if semicolon {
                        break;
                    }
                }
                self.finish_node();
            }
        }
    }

    /// `PACKAGE [BODY] name IS declarations [BEGIN statements] END [name];`
    fn parse_package(&mut self, cp: Checkpoint) {
        let body = self.nth_at(1, KwBody);
        let (kind, what) = if body {
            (NodeKind::PackageBody, "PACKAGE BODY")
        } else {
            (NodeKind::PackageDecl, "PACKAGE")
        };
        self.start_node_at(cp, kind);
        let open = self.open_block(what);
        self.bump();
        if body {
            self.bump();
        }
        let name = self.parse_decl_name();
        if self.at_word("authid") {
            self.field(Field::Modifiers, |p| p.bump_modifier(2));
        }
        self.expect_is_or_as();
        self.parse_declare_section();
        if body && self.eat(KwBegin) {
            self.field(Field::Body, |p| p.parse_statement_list(BLOCK_END));
            if self.eat(KwException) {
                self.parse_exception_handlers();
            }
        }
        self.parse_end(open, name);
        self.finish_node();
    }

    /// Procedure or function: declaration with body, or a forward declaration ending in `;`.
    pub(super) fn parse_subprogram(&mut self, cp: Checkpoint) {
        let function = self.at(KwFunction);
        let (kind, what) = if function {
            (NodeKind::FunctionDecl, "FUNCTION")
        } else {
            (NodeKind::ProcedureDecl, "PROCEDURE")
        };
        self.start_node_at(cp, kind);
        let open = self.open_block(what);
        self.bump();
        let name = self.parse_decl_name();
        if self.at(LParen) {
            self.parse_parameter_list();
        }
        if self.eat(KwReturn) {
            self.field(Field::ReturnType, |p| p.parse_type_spec());
        }
        self.parse_subprogram_trailers();
        if self.eat(Semicolon) {
            self.finish_node();
            return;
        }
        self.expect_is_or_as();
        self.parse_declare_section();
        self.parse_block_body(open, name);
        self.finish_node();
    }

    /// `DETERMINISTIC`, `PIPELINED`, `PARALLEL_ENABLE`, `RESULT_CACHE [RELIES_ON (...)]`, `AUTHID x`
    fn parse_subprogram_trailers(&mut self) {
        loop {
            if SUBPROGRAM_TRAILERS.iter().any(|word| self.at_word(word)) {
                self.field(Field::Modifiers, |p| p.bump_modifier(1));
                if self.at_word("relies_on") && self.nth_at(1, LParen) {
                    self.field(Field::Modifiers, |p| p.bump_modifier(1));
                    self.parse_expr_list(Field::Modifiers);
                }
            } else if self.at_word("authid") {
                self.field(Field::Modifiers, |p| p.bump_modifier(2));
            } else {
                break;
            }
        }
    }

    /// `(p1 [IN | OUT | IN OUT] [NOCOPY] type [DEFAULT expr], ...)`
    fn parse_parameter_list(&mut self) {
        let open = self.current_span();
        self.bump();
        self.field(Field::Parameters, |p| {
            while !p.at(RParen) {
                p.parse_parameter();
                if !p.eat(Comma) {
                    break;
                }
            }
        });
        if !self.at_any(PARAMETER_RECOVERY) {
            let found = self.current().describe();
            self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected `,` or `)`, found {found}"));
            self.skip_until(PARAMETER_RECOVERY);
        }
        self.expect_closing_paren(open);
    }

    fn parse_parameter(&mut self) {
        self.start_node(NodeKind::ParameterDecl);
        self.field(Field::Name, |p| p.parse_identifier());
        let mut count = match (self.current(), self.nth(1)) {
            (KwIn, KwOut) => 2,
            (KwIn | KwOut, _) => 1,
            _ => 0,
        };
        if count > 0 && self.nth_at(count, KwNocopy) {
            count += 1;
        }
        if count > 0 {
            self.field(Field::Direction, |p| p.bump_modifier(count));
        }
        self.field(Field::Type, |p| p.parse_type_spec());
        self.parse_default_value();
        self.finish_node();
    }

    /// `DEFAULT expr` or `:= expr`
    fn parse_default_value(&mut self) {
        if self.eat(KwDefault) || self.eat(Assign) {
            self.field(Field::DefaultValue, |p| p.parse_expr());
        }
    }

    /// `END [name];` closing a subprogram, package or anonymous block.
    pub(super) fn parse_end(&mut self, open: OpenBlock, name: Option<&str>) {
        if !self.eat(KwEnd) {
            self.error_unclosed(open, "END");
            return;
        }
        if self.at_ident_like() {
            let end_name = self.nth_text(0);
            let range = self.current_span();
            self.field(Field::EndName, |p| p.bump_leaf(NodeKind::Identifier));
            if let Some(name) = name
                && !end_name.trim_matches('"').eq_ignore_ascii_case(name.trim_matches('"'))
            {
                self.error_at(
                    DiagnosticKind::MismatchedEndName,
                    range,
                    format!("`{end_name}` does not match `{name}`"),
                    Severity::Warning,
                );
            }
        }
        self.expect_semicolon();
    }

    /// `name [CONSTANT] type [NOT NULL] [:= expr];` or `name EXCEPTION;`
    fn parse_variable_decl(&mut self, cp: Checkpoint) {
        if self.nth_at(1, KwException) {
            self.start_node_at(cp, NodeKind::ExceptionDecl);
            self.field(Field::Name, |p| p.parse_identifier());
            self.bump();
            self.finish_declaration();
            return;
        }
        let constant = self.nth_at(1, KwConstant);
        let kind = if constant {
            NodeKind::ConstantDecl
        } else {
            NodeKind::VariableDecl
        };
        self.start_node_at(cp, kind);
        self.field(Field::Name, |p| p.parse_identifier());
        if constant {
            self.bump();
        }
        self.field(Field::Type, |p| p.parse_type_spec());
        self.parse_not_null();
        self.parse_default_value();
        self.finish_declaration();
    }

    /// `CURSOR name [(params)] [RETURN type] IS query;`
    fn parse_cursor_decl(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::CursorDecl);
        self.bump();
        self.field(Field::Name, |p| p.parse_identifier());
        if self.at(LParen) {
            self.parse_parameter_list();
        }
        if self.eat(KwReturn) {
            self.field(Field::ReturnType, |p| p.parse_type_spec());
        }
        if self.expect(KwIs) {
            let query = self.checkpoint();
            self.field(Field::Query, |p| p.parse_query(query, IntoClause::Forbidden));
        }
        self.finish_declaration();
    }

    /// `PRAGMA name [(args)];`
    fn parse_pragma(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::PragmaDirective);
        self.bump();
        self.field(Field::Name, |p| p.parse_identifier());
        if self.at(LParen) {
            let open = self.current_span();
            self.bump();
            if !self.at(RParen) {
                loop {
                    self.field(Field::Arguments, |p| p.parse_argument());
                    if !self.eat(Comma) {
                        break;
                    }
                }
            }
            self.expect_closing_paren(open);
        }
        self.finish_declaration();
    }

    /// `SUBTYPE name IS type [RANGE low..high] [NOT NULL];`
    fn parse_subtype(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, NodeKind::SubtypeDecl);
        self.bump();
        self.field(Field::Name, |p| p.parse_identifier());
        self.expect_is_or_as();
        self.field(Field::Type, |p| p.parse_type_spec());
        if self.eat_word("range") {
            self.field(Field::Low, |p| p.parse_expr());
            self.expect(DotDot);
            self.field(Field::High, |p| p.parse_expr());
        }
        self.parse_not_null();
        self.finish_declaration();
    }

    /// `TYPE name IS RECORD | TABLE OF | VARRAY | REF CURSOR ...;`
    fn parse_type_decl(&mut self, cp: Checkpoint) {
        let kind = match self.nth(3) {
            KwRecord => NodeKind::RecordTypeDecl,
            KwTable => NodeKind::TableTypeDecl,
            KwVarray => NodeKind::VarrayTypeDecl,
            KwRef if self.nth_at(4, KwCursor) => NodeKind::RefCursorTypeDecl,
            _ if self.nth_word(3, "varying") => NodeKind::VarrayTypeDecl,
            _ => NodeKind::Error,
        };
        self.start_node_at(cp, kind);
        self.bump();
        self.field(Field::Name, |p| p.parse_identifier());
        self.expect_is_or_as();
        match kind {
            NodeKind::RecordTypeDecl => self.parse_record_fields(),
            NodeKind::TableTypeDecl => {
                self.bump();
                self.expect(KwOf);
                self.parse_element_type();
                if self.at_word("index") && self.nth_at(1, KwBy) {
                    self.bump();
                    self.bump();
                    self.field(Field::IndexType, |p| p.parse_type_spec());
                }
            }
            NodeKind::VarrayTypeDecl => {
                if self.at(KwVarray) {
                    self.bump();
                } else {
                    self.bump();
                    self.eat_word("array");
                }
                if self.at(LParen) {
                    let open = self.current_span();
                    self.bump();
                    self.field(Field::Size, |p| p.parse_expr());
                    self.expect_closing_paren(open);
                }
                self.expect(KwOf);
                self.parse_element_type();
            }
            NodeKind::RefCursorTypeDecl => {
                self.bump();
                self.bump();
                if self.eat(KwReturn) {
                    self.field(Field::ReturnType, |p| p.parse_type_spec());
                }
            }
            _ => {
                let found = self.current().describe();
                self.error_msg(
                    DiagnosticKind::ExpectedType,
                    format!("expected RECORD, TABLE, VARRAY or REF CURSOR, found {found}"),
                );
                self.skip_until(DECL_RECOVERY);
                self.finish_node();
                return;
            }
        }
        self.finish_declaration();
    }

    fn parse_element_type(&mut self) {
        self.field(Field::ElementType, |p| p.parse_type_spec());
        self.parse_not_null();
    }

    /// `RECORD (name type [NOT NULL] [:= expr], ...)`
    fn parse_record_fields(&mut self) {
        self.bump();
        let open = self.current_span();
        if !self.expect(LParen) {
            return;
        }
        self.field(Field::Fields, |p| loop {
            p.start_node(NodeKind::RecordField);
            p.field(Field::Name, |p| p.parse_identifier());
            p.field(Field::Type, |p| p.parse_type_spec());
            p.parse_not_null();
            p.parse_default_value();
            p.finish_node();
            if !p.eat(Comma) {
                break;
            }
        });
        self.expect_closing_paren(open);
    }
}
