//! Show the syntax tree of a source file.

use std::path::PathBuf;

use ifsparse_lib::parser::printer::TreePrinter;
use ifsparse_lib::{Keywords, Parse, ParseOptions};

use super::Outcome;
use super::input;
use crate::cli::OutputFormat;
use crate::error::CliError;

pub struct AstArgs {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub spans: bool,
    pub raw: bool,
    pub format: OutputFormat,
    pub options: ParseOptions,
    pub color: bool,
}

pub fn run(args: AstArgs) -> Result<Outcome, CliError> {
    let input = input::load(args.source_path.as_deref(), args.source_text.as_deref())?;
    let parse = input.parse(&Keywords::new(), &args.options);

    if !parse.diagnostics().is_empty() {
        eprint!("{}", parse.render_diagnostics(args.color));
    }
    println!("{}", render(&parse, &args)?.trim_end());
    Ok(Outcome::Success)
}

pub fn render(parse: &Parse, args: &AstArgs) -> Result<String, CliError> {
    match args.format {
        OutputFormat::Text => Ok(TreePrinter::new(parse.tree())
            .with_spans(args.spans)
            .with_tokens(args.raw)
            .dump()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&parse.tree().root())?),
    }
}
