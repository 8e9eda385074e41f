//! Parse a directory tree in parallel and summarize.

use std::fmt::Write;
use std::path::PathBuf;

use ifsparse_lib::ParseOptions;
use ifsparse_lib::batch::{self, BatchConfig, BatchReport};

use super::Outcome;
use crate::cli::OutputFormat;
use crate::error::CliError;

pub struct BatchArgs {
    pub root: PathBuf,
    pub jobs: Option<usize>,
    pub extensions: Vec<String>,
    pub recursive: bool,
    pub format: OutputFormat,
    pub options: ParseOptions,
}

impl BatchArgs {
    pub(crate) fn config(&self) -> BatchConfig {
        let mut config = BatchConfig::new()
            .with_recursive(self.recursive)
            .with_options(self.options);
        if let Some(jobs) = self.jobs {
            config = config.with_jobs(jobs);
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(self.extensions.iter().cloned());
        }
        config
    }
}

pub fn run(args: BatchArgs) -> Result<Outcome, CliError> {
    if !args.root.exists() {
        return Err(CliError::Missing(args.root));
    }
    let config = args.config();
    let files = batch::discover(&args.root, &config)?;
    let report = batch::run(&files, &config);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            print!("{}", render_failures(&report));
            print!("{}", render_summary(&report));
        }
    }
    // Broken files are the report's content, not a command failure.
    Ok(Outcome::Success)
}

pub fn render_failures(report: &BatchReport) -> String {
    let mut out = String::new();
    for file in report.failed() {
        let path = file.path.display();
        let _ = match &file.error {
            Some(err) => writeln!(out, "FAIL {path}: {err}"),
            None => writeln!(
                out,
                "FAIL {path}: {}, {}",
                plural(file.error_count, "error"),
                plural(file.warning_count, "warning")
            ),
        };
    }
    out
}

pub fn render_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "files:      {}", report.files.len());
    let _ = writeln!(
        out,
        "succeeded:  {} ({:.1}%)",
        report.succeeded(),
        report.success_rate() * 100.0
    );
    let _ = writeln!(out, "errors:     {}", report.error_count());
    let _ = writeln!(out, "warnings:   {}", report.warning_count());
    let _ = writeln!(out, "lines:      {}", report.total_lines());
    let _ = writeln!(
        out,
        "elapsed:    {:.3}s ({:.1} files/s, {} jobs)",
        report.total_elapsed.as_secs_f64(),
        report.files_per_second(),
        report.jobs
    );
    out
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
