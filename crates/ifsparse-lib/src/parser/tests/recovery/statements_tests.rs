use crate::Parse;
use crate::parser::NodeKind;
use indoc::indoc;

#[test]
fn missing_semicolon_between_words() {
    let input = "PROCEDURE P IS BEGIN X Y Z END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 22..22: missing `;`: found identifier (expected: `;`)");
}

#[test]
fn skipped_words_become_error_node() {
    let input = "PROCEDURE P IS BEGIN X Y Z END;";

    let res = crate::parse(input).dump();

    insta::assert_snapshot!(res, @r#"
    SourceFile
      ProcedureDecl
        name: Identifier "P"
        body: CallStmt
          call: Identifier "X"
          Error "Y Z"
    "#);
}

#[test]
fn missing_semicolon_after_assignment() {
    let input = "BEGIN x := 1 y := 2; END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 12..12: missing `;`: found identifier (expected: `;`)");
}

#[test]
fn garbage_is_reported_once() {
    let input = "BEGIN NULL; ? NULL; END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 12..13: invalid input `?`");
}

#[test]
fn keyword_that_cannot_start_a_statement() {
    let input = "BEGIN THEN; END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 6..10: expected a statement: found THEN");
}

#[test]
fn bad_expression_does_not_stop_following_units() {
    let input = indoc! {r#"
    PROCEDURE A IS BEGIN x := ; END;
    PROCEDURE B IS BEGIN NULL; END;
    "#};

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"error at 26..27: expected an expression: found `;`");
    let units: Vec<_> = parse.tree().root().child_nodes().map(|n| n.kind()).collect();
    assert_eq!(units, [NodeKind::ProcedureDecl, NodeKind::ProcedureDecl]);
}

#[test]
fn junk_in_declaration_section() {
    let input = indoc! {r#"
    PROCEDURE P IS
      x NUMBER;
      := 1;
    BEGIN NULL; END;
    "#};

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 29..31: expected a declaration: found `:=`");
}

#[test]
fn duplicate_catch_all_handler() {
    let input = "BEGIN NULL; EXCEPTION WHEN OTHERS THEN NULL; WHEN OTHERS THEN NULL; END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 50..56: duplicate `WHEN OTHERS` handler (related: first `WHEN OTHERS` here at 27..33)");
}

#[test]
fn mismatched_end_name_is_a_warning() {
    let input = "PROCEDURE P IS BEGIN NULL; END Q;";

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"warning at 31..32: END name `Q` does not match `P`");
    assert!(!parse.diagnostics().has_errors());
}

#[test]
fn subprogram_inside_statement_list() {
    let input = "BEGIN PROCEDURE Q IS BEGIN NULL; END; END;";

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"error at 6..15: declaration inside a statement list: subprograms belong in the declaration section");
    insta::assert_snapshot!(parse.dump(), @r#"
    SourceFile
      AnonymousBlock
        body: ProcedureDecl
          name: Identifier "Q"
          body: NullStmt
    "#);
}

#[test]
fn into_inside_subquery() {
    let input = "x := (SELECT a INTO y FROM t);";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 15..19: INTO is only allowed in a PL/SQL SELECT statement: a query used as a value cannot select INTO variables");
}

#[test]
fn unterminated_string_then_missing_semicolon() {
    let input = "x := 'abc;\nNULL;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @r"
    error at 5..6: unterminated string literal
    error at 10..10: missing `;`: found NULL (expected: `;`)
    ");
}

#[test]
fn create_of_unsupported_object() {
    let input = "CREATE TABLE t (a NUMBER);\nNULL;";

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"error at 7..12: expected a declaration: CREATE supports PACKAGE, PROCEDURE and FUNCTION, found TABLE");
    let last = parse.tree().root().child_nodes().last().unwrap();
    assert_eq!(last.kind(), NodeKind::NullStmt);
}

#[test]
fn stray_token_before_unit_keeps_the_unit() {
    let input = indoc! {r#"
    ) PROCEDURE P IS BEGIN NULL; END;
    PROCEDURE Q IS BEGIN NULL; END;
    "#};

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"error at 0..1: expected a statement: found `)`");
    insta::assert_snapshot!(parse.dump(), @r#"
    SourceFile
      Error ")"
      ProcedureDecl
        name: Identifier "P"
        body: NullStmt
      ProcedureDecl
        name: Identifier "Q"
        body: NullStmt
    "#);
}

#[test]
fn garbage_between_units_keeps_the_next_unit() {
    let input = "NULL;\n# PROCEDURE P IS BEGIN NULL; END;";

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"error at 6..7: invalid input `#`");
    let kinds: Vec<_> = parse.tree().root().child_nodes().map(|n| n.kind()).collect();
    assert_eq!(kinds, [NodeKind::NullStmt, NodeKind::Error, NodeKind::ProcedureDecl]);
}

#[test]
fn byte_order_mark_is_not_an_error() {
    let input = "\u{feff}PROCEDURE P IS BEGIN NULL; END;";

    let parse = Parse::expect_valid(input);

    insta::assert_snapshot!(parse.dump(), @r#"
    SourceFile
      ProcedureDecl
        name: Identifier "P"
        body: NullStmt
    "#);
    assert_eq!(parse.tree().reconstruct(), input);
}

#[test]
fn join_word_as_loop_label() {
    let input = "<<outer>> LOOP EXIT outer WHEN x; END LOOP outer;";

    let res = Parse::expect_valid_tree(input);

    insta::assert_snapshot!(res, @r#"
    SourceFile
      LoopStmt
        label: LabelStmt
          name: Identifier "outer"
        body: ExitStmt
          label: Identifier "outer"
          condition: Identifier "x"
        end_name: Identifier "outer"
    "#);
}
