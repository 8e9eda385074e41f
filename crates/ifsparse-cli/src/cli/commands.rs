//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Parse options shared by every command that parses.
fn with_parse_args(cmd: Command) -> Command {
    cmd.arg(lenient_case_arg()).arg(recursion_limit_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("ifsparse")
        .about("Parse and check IFS Cloud PL/SQL sources")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(ast_command())
        .subcommand(tokens_command())
        .subcommand(check_command())
        .subcommand(batch_command())
}

/// Print the syntax tree of one file or inline text.
pub fn ast_command() -> Command {
    let cmd = Command::new("ast")
        .about("Show the syntax tree of a source file")
        .override_usage(
            "\
  ifsparse ast <FILE>
  ifsparse ast -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  ifsparse ast CustomerOrder.plsql            # named fields, leaf text
  ifsparse ast CustomerOrder.plsql --spans    # with byte ranges
  ifsparse ast -s 'x := 1;' --raw             # include tokens
  ifsparse ast CustomerOrder.plsql --format json"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg("source_path"))
        .arg(spans_arg())
        .arg(raw_arg())
        .arg(format_arg())
        .arg(color_arg());

    with_parse_args(cmd)
}

/// Print the token stream of one file or inline text.
pub fn tokens_command() -> Command {
    Command::new("tokens")
        .about("Show the token stream of a source file")
        .override_usage(
            "\
  ifsparse tokens <FILE>
  ifsparse tokens -s <TEXT>",
        )
        .arg(source_path_arg())
        .arg(source_text_arg("source_path"))
        .arg(color_arg())
}

/// Report diagnostics for one or more files.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Report diagnostics for source files")
        .override_usage(
            "\
  ifsparse check <FILE>...
  ifsparse check -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  ifsparse check CustomerOrder.plsql          # print diagnostics
  ifsparse check *.plsql --strict             # fail on any diagnostic"#,
        )
        .arg(source_paths_arg())
        .arg(source_text_arg("source_paths"))
        .arg(strict_arg())
        .arg(color_arg());

    with_parse_args(cmd)
}

/// Parse a whole directory in parallel.
pub fn batch_command() -> Command {
    let cmd = Command::new("batch")
        .about("Parse every source file under a directory in parallel")
        .override_usage("  ifsparse batch <DIR> [-j <N>] [--ext <EXT>,...]")
        .after_help(
            r#"EXAMPLES:
  ifsparse batch workspace/                   # summary and failing files
  ifsparse batch workspace/ -j 8 --ext plsql,apy
  ifsparse batch workspace/ --format json     # full per-file report"#,
        )
        .arg(root_arg())
        .arg(jobs_arg())
        .arg(ext_arg())
        .arg(no_recursive_arg())
        .arg(format_arg());

    with_parse_args(cmd)
}
