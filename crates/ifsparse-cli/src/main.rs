mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{AstParams, BatchParams, CheckParams, TokensParams, build_cli};
use commands::Outcome;

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };
    init_tracing(m.get_count("verbose"));

    let result = match name {
        "ast" => commands::ast::run(AstParams::from_matches(m).into()),
        "tokens" => commands::tokens::run(TokensParams::from_matches(m).into()),
        "check" => commands::check::run(CheckParams::from_matches(m).into()),
        "batch" => commands::batch::run(BatchParams::from_matches(m).into()),
        _ => unreachable!("clap should have caught this"),
    };

    match result {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for dumps and JSON.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
