use std::path::PathBuf;

use ifsparse_lib::CaseTerminators;

use super::*;
use crate::cli::commands::{ast_command, batch_command, check_command, tokens_command};

#[test]
fn cli_definition_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn ast_extracts_flags() {
    let m = ast_command()
        .try_get_matches_from(["ast", "a.plsql", "--spans", "--raw", "--format", "json"])
        .unwrap();

    let params = AstParams::from_matches(&m);

    assert_eq!(params.source_path, Some(PathBuf::from("a.plsql")));
    assert!(params.spans);
    assert!(params.raw);
    assert_eq!(params.format, OutputFormat::Json);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn ast_inline_source_conflicts_with_file() {
    let result = ast_command().try_get_matches_from(["ast", "a.plsql", "-s", "NULL;"]);

    assert!(result.is_err());
}

#[test]
fn tokens_accepts_inline_source() {
    let m = tokens_command()
        .try_get_matches_from(["tokens", "-s", "x := 1;", "--color", "never"])
        .unwrap();

    let params = TokensParams::from_matches(&m);

    assert_eq!(params.source_path, None);
    assert_eq!(params.source_text.as_deref(), Some("x := 1;"));
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn check_takes_many_files() {
    let m = check_command()
        .try_get_matches_from(["check", "a.plsql", "b.plsql", "--strict"])
        .unwrap();

    let params = CheckParams::from_matches(&m);

    assert_eq!(
        params.source_paths,
        [PathBuf::from("a.plsql"), PathBuf::from("b.plsql")]
    );
    assert!(params.strict);
}

#[test]
fn parse_options_from_flags() {
    let m = check_command()
        .try_get_matches_from([
            "check",
            "a.plsql",
            "--lenient-case",
            "--recursion-limit",
            "64",
        ])
        .unwrap();

    let options = CheckParams::from_matches(&m).options;

    assert_eq!(options.case_terminators(), CaseTerminators::Lenient);
    assert_eq!(options.recursion_limit(), 64);
}

#[test]
fn batch_defaults() {
    let m = batch_command()
        .try_get_matches_from(["batch", "workspace"])
        .unwrap();

    let params = BatchParams::from_matches(&m);

    assert_eq!(params.root, PathBuf::from("workspace"));
    assert_eq!(params.jobs, None);
    assert!(params.extensions.is_empty());
    assert!(params.recursive);
    assert_eq!(params.format, OutputFormat::Text);
}

#[test]
fn batch_extensions_split_on_comma() {
    let m = batch_command()
        .try_get_matches_from([
            "batch",
            "workspace",
            "-j",
            "4",
            "--ext",
            "plsql,apy",
            "--ext",
            "pkb",
            "--no-recursive",
        ])
        .unwrap();

    let params = BatchParams::from_matches(&m);

    assert_eq!(params.jobs, Some(4));
    assert_eq!(params.extensions, ["plsql", "apy", "pkb"]);
    assert!(!params.recursive);
}

#[test]
fn batch_requires_root() {
    let result = batch_command().try_get_matches_from(["batch"]);

    assert!(result.is_err());
}

#[test]
fn verbose_is_global() {
    let m = build_cli()
        .try_get_matches_from(["ifsparse", "check", "a.plsql", "-vv"])
        .unwrap();

    let (name, sub) = m.subcommand().unwrap();

    assert_eq!(name, "check");
    assert_eq!(sub.get_count("verbose"), 2);
}
