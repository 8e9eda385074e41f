use crate::parser::NodeKind;
use crate::{CaseTerminators, Keywords, Parse, ParseOptions};

fn parse_lenient(src: &str) -> crate::Parse {
    let options = ParseOptions::default().with_case_terminators(CaseTerminators::Lenient);
    crate::parse_with(src, "<input>", &Keywords::new(), &options)
}

#[test]
fn case_statement_closed_with_end_case() {
    let input = "CASE k WHEN 1 THEN NULL; END CASE;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 25..33: wrong CASE terminator: CASE statement must be closed with `END`, not `END CASE`");
}

#[test]
fn case_expression_closed_with_end() {
    let input = "x := CASE k WHEN 1 THEN 'a' END;";

    let res = Parse::expect_invalid(input);

    insta::assert_snapshot!(res, @"error at 28..31: wrong CASE terminator: CASE expression must be closed with `END CASE`");
}

#[test]
fn lenient_mode_downgrades_to_warning() {
    let input = "x := CASE k WHEN 1 THEN 'a' END;";

    let parse = parse_lenient(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"warning at 28..31: wrong CASE terminator: CASE expression must be closed with `END CASE`");
    assert!(!parse.diagnostics().has_errors());
}

#[test]
fn wrong_terminator_keeps_tree_shape() {
    let strict = crate::parse("CASE k WHEN 1 THEN NULL; END CASE;");
    let lenient = parse_lenient("CASE k WHEN 1 THEN NULL; END CASE;");

    assert_eq!(strict.dump(), lenient.dump());
    insta::assert_snapshot!(strict.dump(), @r#"
    SourceFile
      CaseStmt
        selector: Identifier "k"
        when_clauses: CaseWhenClause
          condition: Literal "1"
          body: NullStmt
    "#);
}

#[test]
fn case_statement_consumes_block_end() {
    let input = "BEGIN CASE WHEN a THEN NULL; END;";

    let parse = crate::parse(input);

    insta::assert_snapshot!(parse.dump_diagnostics(), @"error at 33..33: block is not closed; expected END, found end of file (related: BEGIN opened here at 0..5)");
    let block = parse.tree().root().child_nodes().next().unwrap();
    assert_eq!(block.kind(), NodeKind::AnonymousBlock);
}
