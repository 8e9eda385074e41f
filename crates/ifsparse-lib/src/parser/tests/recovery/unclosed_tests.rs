use crate::Parse;
use indoc::indoc;

#[test]
fn procedure_without_end() {
    let input = "PROCEDURE P IS BEGIN NULL;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 26..26: block is not closed; expected END, found end of file (related: PROCEDURE opened here at 0..9)");
}

#[test]
fn if_closed_with_plain_end() {
    let input = "BEGIN IF a THEN NULL; END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 22..25: block is not closed; expected END IF, found END (related: IF opened here at 6..8)");
}

#[test]
fn loop_closed_with_plain_end() {
    let input = "BEGIN LOOP NULL; END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 17..20: block is not closed; expected END LOOP, found END (related: LOOP opened here at 6..10)");
}

#[test]
fn argument_list_without_closing_paren() {
    let input = "x := f(1, 2;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 11..12: missing closing `)`; found `;` (related: `(` opened here at 6..7)");
}

#[test]
fn conditional_without_end_directive() {
    let input = indoc! {r#"
    $IF $$a $THEN
      NULL;
    "#};

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 22..22: directive is not closed with `$END`: found end of file (related: `$IF` opened here at 0..3)");
}

#[test]
fn package_without_end() {
    let input = indoc! {r#"
    PACKAGE Demo_API IS
      x NUMBER;
    "#};

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 32..32: block is not closed; expected END, found end of file (related: PACKAGE opened here at 0..7)");
}

#[test]
fn case_expression_without_end() {
    let input = "x := CASE WHEN a THEN 1;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 23..24: block is not closed; expected END CASE, found `;` (related: CASE opened here at 5..9)");
}

#[test]
fn unclosed_input_still_reconstructs() {
    let input = "PACKAGE BODY X IS PROCEDURE P IS BEGIN IF a THEN LOOP f(1, (2";

    let parse = crate::parse(input);

    assert!(parse.diagnostics().has_errors());
    assert_eq!(parse.tree().reconstruct(), input);
}
