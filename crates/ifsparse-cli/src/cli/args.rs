//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused
//! across commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Single source file (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Source file to parse (`-` reads stdin)")
}

/// One or more source files (positional).
pub fn source_paths_arg() -> Arg {
    Arg::new("source_paths")
        .value_name("FILE")
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
        .help("Source files to check")
}

/// Inline source text (-s/--source), exclusive with the positional `files`.
pub fn source_text_arg(files: &'static str) -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .conflicts_with(files)
        .help("Inline source text")
}

/// Directory or file to batch-parse (positional).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .value_name("DIR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Directory to scan (a single file is parsed as is)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Verbosity level (-v, -vv, -vvv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .global(true)
        .help("Log more (-v info, -vv debug, -vvv trace)")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Exit with failure on any error or warning")
}

/// Worker threads (-j/--jobs).
pub fn jobs_arg() -> Arg {
    Arg::new("jobs")
        .short('j')
        .long("jobs")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Worker threads (default: available cores minus one)")
}

/// File extensions to pick up (--ext).
pub fn ext_arg() -> Arg {
    Arg::new("ext")
        .long("ext")
        .value_name("EXT")
        .action(ArgAction::Append)
        .value_delimiter(',')
        .help("File extensions to parse (default: plsql,pks,pkb,sql)")
}

/// Do not descend into subdirectories (--no-recursive).
pub fn no_recursive_arg() -> Arg {
    Arg::new("no_recursive")
        .long("no-recursive")
        .action(ArgAction::SetTrue)
        .help("Only scan the top directory")
}

/// Output format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_name("FORMAT")
        .default_value("text")
        .value_parser(["text", "json"])
        .help("Output format")
}

/// Show source positions (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show source positions")
}

/// Include tokens in the tree dump (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include tokens (keywords, punctuation)")
}

/// Accept swapped CASE terminators with a warning (--lenient-case).
pub fn lenient_case_arg() -> Arg {
    Arg::new("lenient_case")
        .long("lenient-case")
        .action(ArgAction::SetTrue)
        .help("Report `END` vs `END CASE` mix-ups as warnings")
}

/// Nesting depth limit (--recursion-limit).
pub fn recursion_limit_arg() -> Arg {
    Arg::new("recursion_limit")
        .long("recursion-limit")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Maximum nesting depth before the rest of the input is skipped")
}
