//! Show the token stream of a source file.

use std::fmt::Write;
use std::path::PathBuf;

use ifsparse_lib::Keywords;
use ifsparse_lib::parser::LineIndex;
use ifsparse_lib::parser::SyntaxKind;
use ifsparse_lib::parser::lexer::{Lexed, lex, token_text};

use super::Outcome;
use super::input;
use crate::error::CliError;

pub struct TokensArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub color: bool,
}

pub fn run(args: TokensArgs) -> Result<Outcome, CliError> {
    let input = input::load(args.source_path.as_deref(), args.source_text.as_deref())?;
    let lexed = lex(&input.text, &Keywords::new());

    if !lexed.diagnostics.is_empty() {
        let rendered = lexed
            .diagnostics
            .printer()
            .source(&input.text)
            .path(&input.name)
            .colored(args.color)
            .render();
        eprint!("{rendered}");
    }
    print!("{}", format_tokens(&input.text, &lexed));
    Ok(Outcome::Success)
}

/// One line per token: `line:col`, kind and text. Trivia and `Eof` are left out.
pub fn format_tokens(source: &str, lexed: &Lexed) -> String {
    let index = LineIndex::new(source);
    let mut out = String::new();
    for token in lexed.tokens.iter().filter(|t| t.kind != SyntaxKind::Eof) {
        let pos = index.line_col(source, token.span.start()).to_string();
        let kind = format!("{:?}", token.kind);
        let _ = writeln!(out, "{pos:<8}{kind:<12}{:?}", token_text(source, token));
    }
    out
}
