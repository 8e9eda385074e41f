use crate::diagnostics::DiagnosticKind;
use crate::{Keywords, Parse, ParseOptions};

fn parse_limited(src: &str, limit: u32) -> crate::Parse {
    let options = ParseOptions::default().with_recursion_limit(limit);
    crate::parse_with(src, "<input>", &Keywords::new(), &options)
}

fn nesting_errors(parse: &crate::Parse) -> Vec<String> {
    parse
        .diagnostics()
        .iter()
        .filter(|d| d.kind() == DiagnosticKind::NestingTooDeep)
        .map(|d| d.message().to_string())
        .collect()
}

#[test]
fn deep_parentheses_hit_the_limit() {
    let input = "x := ((((((((((1))))))))));";

    let parse = parse_limited(input, 8);

    assert_eq!(nesting_errors(&parse), ["nesting too deep; limit is 8"]);
    assert_eq!(parse.tree().reconstruct(), input);
}

#[test]
fn rest_of_input_is_swallowed() {
    let input = "x := ((((((((((1)))))))))); NULL;";

    let parse = parse_limited(input, 8);

    let last = parse.tree().root().descendants().last().unwrap();
    assert_eq!(last.kind(), crate::parser::NodeKind::Error);
    assert!(last.text().ends_with("NULL;"));
}

#[test]
fn deep_blocks_with_default_limit() {
    let depth = 300;
    let input = format!("{}NULL;{}", "BEGIN ".repeat(depth), " END;".repeat(depth));

    let parse = crate::parse(&input);

    assert_eq!(nesting_errors(&parse), ["nesting too deep; limit is 256"]);
    assert_eq!(parse.tree().reconstruct(), input);
}

#[test]
fn nesting_below_limit_is_fine() {
    let input = format!("x := {}1{};", "(".repeat(100), ")".repeat(100));

    let parse = Parse::expect_valid(&input);

    assert_eq!(parse.tree().reconstruct(), input);
}

#[test]
fn zero_limit_is_clamped() {
    let options = ParseOptions::new().with_recursion_limit(0);
    assert_eq!(options.recursion_limit(), 1);

    let parse = parse_limited("NULL;", 0);
    assert!(parse.diagnostics().is_empty());
}
