use std::path::PathBuf;

use ifsparse_lib::{Keywords, ParseOptions};

use super::Outcome;
use super::input::{self, Input};
use crate::error::CliError;

pub struct CheckArgs {
    pub source_paths: Vec<PathBuf>,
    pub source_text: Option<String>,
    pub strict: bool,
    pub options: ParseOptions,
    pub color: bool,
}

pub fn run(args: CheckArgs) -> Result<Outcome, CliError> {
    let inputs: Vec<Result<Input, CliError>> = match &args.source_text {
        Some(text) => vec![input::load(None, Some(text.as_str()))],
        None if args.source_paths.is_empty() => return Err(CliError::NoInput),
        None => args
            .source_paths
            .iter()
            .map(|path| input::load(Some(path.as_path()), None))
            .collect(),
    };

    let keywords = Keywords::new();
    let mut outcome = Outcome::Success;
    for input in inputs {
        let input = match input {
            Ok(input) => input,
            Err(err) => {
                eprintln!("error: {err}");
                outcome = Outcome::Failure;
                continue;
            }
        };

        let parse = input.parse(&keywords, &args.options);
        let diagnostics = parse.diagnostics();
        tracing::info!(
            file = %input.name,
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "checked"
        );
        if diagnostics.is_empty() {
            continue;
        }
        eprint!("{}", parse.render_diagnostics(args.color));
        if args.strict {
            outcome = Outcome::Failure;
        }
    }

    // Silent on success (like cargo check)
    Ok(outcome)
}
