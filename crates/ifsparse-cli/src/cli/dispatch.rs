//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use ifsparse_lib::{CaseTerminators, ParseOptions};

use super::{ColorChoice, OutputFormat};
use crate::commands::ast::AstArgs;
use crate::commands::batch::BatchArgs;
use crate::commands::check::CheckArgs;
use crate::commands::tokens::TokensArgs;

pub struct AstParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub spans: bool,
    pub raw: bool,
    pub format: OutputFormat,
    pub options: ParseOptions,
    pub color: ColorChoice,
}

impl AstParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            spans: m.get_flag("spans"),
            raw: m.get_flag("raw"),
            format: parse_format(m),
            options: parse_options(m),
            color: parse_color(m),
        }
    }
}

impl From<AstParams> for AstArgs {
    fn from(p: AstParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            spans: p.spans,
            raw: p.raw,
            format: p.format,
            options: p.options,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TokensParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub color: ColorChoice,
}

impl TokensParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<TokensParams> for TokensArgs {
    fn from(p: TokensParams) -> Self {
        Self {
            source_path: p.source_path,
            source_text: p.source_text,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub source_paths: Vec<PathBuf>,
    pub source_text: Option<String>,
    pub strict: bool,
    pub options: ParseOptions,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_paths: m
                .get_many::<PathBuf>("source_paths")
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default(),
            source_text: m.get_one::<String>("source_text").cloned(),
            strict: m.get_flag("strict"),
            options: parse_options(m),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            source_paths: p.source_paths,
            source_text: p.source_text,
            strict: p.strict,
            options: p.options,
            color: p.color.should_colorize(),
        }
    }
}

pub struct BatchParams {
    pub root: PathBuf,
    pub jobs: Option<usize>,
    pub extensions: Vec<String>,
    pub recursive: bool,
    pub format: OutputFormat,
    pub options: ParseOptions,
}

impl BatchParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            root: m.get_one::<PathBuf>("root").cloned().unwrap_or_default(),
            jobs: m.get_one::<usize>("jobs").copied(),
            extensions: m
                .get_many::<String>("ext")
                .map(|exts| exts.cloned().collect())
                .unwrap_or_default(),
            recursive: !m.get_flag("no_recursive"),
            format: parse_format(m),
            options: parse_options(m),
        }
    }
}

impl From<BatchParams> for BatchArgs {
    fn from(p: BatchParams) -> Self {
        Self {
            root: p.root,
            jobs: p.jobs,
            extensions: p.extensions,
            recursive: p.recursive,
            format: p.format,
            options: p.options,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_format(m: &ArgMatches) -> OutputFormat {
    match m.get_one::<String>("format").map(|s| s.as_str()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

fn parse_options(m: &ArgMatches) -> ParseOptions {
    let mut options = ParseOptions::new();
    if m.get_flag("lenient_case") {
        options = options.with_case_terminators(CaseTerminators::Lenient);
    }
    if let Some(&limit) = m.get_one::<u32>("recursion_limit") {
        options = options.with_recursion_limit(limit);
    }
    options
}
