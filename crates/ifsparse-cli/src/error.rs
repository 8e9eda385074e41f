use std::path::PathBuf;

/// Failures that stop a command. Diagnostics in the parsed source are not errors here.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Lib(#[from] ifsparse_lib::Error),

    #[error("cannot read stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("{}: no such file or directory", .0.display())]
    Missing(PathBuf),

    #[error("source file or -s <TEXT> required")]
    NoInput,

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
