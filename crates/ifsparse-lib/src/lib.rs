//! ifsparse: resilient parser for the IFS Cloud PL/SQL dialect.
//!
//! Every parse yields a complete tree plus a list of diagnostics; malformed
//! source never turns into an `Err`.
//!
//! # Example
//!
//! ```
//! use ifsparse_lib::parser::NodeKind;
//!
//! let parse = ifsparse_lib::parse("PROCEDURE P IS BEGIN NULL; END;");
//! assert!(parse.diagnostics().is_empty());
//!
//! let procedure = parse.tree().root().child_nodes().next().unwrap();
//! assert_eq!(procedure.kind(), NodeKind::ProcedureDecl);
//! ```

pub mod batch;
pub mod diagnostics;
pub mod parser;

use std::path::{Path, PathBuf};

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use parser::{CaseTerminators, Keywords, ParseOptions};

use parser::SyntaxTree;
use parser::printer::TreePrinter;

/// Operational failures. Broken source is reported through [`Diagnostics`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input is not UTF-8, so not even a token could be produced.
    #[error("{file}: invalid UTF-8 at byte {valid_up_to}")]
    InvalidUtf8 { file: String, valid_up_to: usize },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// A parsed file: tree, diagnostics and the name it was parsed under.
#[derive(Debug, Clone)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Diagnostics,
    file: String,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn source(&self) -> &str {
        self.tree.source()
    }

    pub fn into_parts(self) -> (SyntaxTree, Diagnostics) {
        (self.tree, self.diagnostics)
    }

    /// Tree dump without spans or tokens.
    pub fn dump(&self) -> String {
        TreePrinter::new(&self.tree).dump()
    }

    pub fn render_diagnostics(&self, colored: bool) -> String {
        self.diagnostics
            .printer()
            .source(self.tree.source())
            .path(&self.file)
            .colored(colored)
            .render()
    }
}

/// Parses with default options and a keyword table built for this call.
pub fn parse(source: &str) -> Parse {
    parse_with(source, "<input>", &Keywords::new(), &ParseOptions::default())
}

pub fn parse_with(source: &str, file: &str, keywords: &Keywords, options: &ParseOptions) -> Parse {
    let (tree, diagnostics) = parser::parse_source(source, keywords, options);
    tracing::debug!(
        file,
        tokens = tree.token_count(),
        nodes = tree.node_count(),
        diagnostics = diagnostics.len(),
        "parsed"
    );
    Parse {
        tree,
        diagnostics,
        file: file.to_string(),
    }
}

/// Parses raw bytes. Fails only when they are not UTF-8.
pub fn parse_bytes(
    bytes: &[u8],
    file: &str,
    keywords: &Keywords,
    options: &ParseOptions,
) -> Result<Parse> {
    let source = std::str::from_utf8(bytes).map_err(|e| Error::InvalidUtf8 {
        file: file.to_string(),
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(parse_with(source, file, keywords, options))
}

pub fn parse_file(path: &Path, keywords: &Keywords, options: &ParseOptions) -> Result<Parse> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes(&bytes, &path.display().to_string(), keywords, options)
}
