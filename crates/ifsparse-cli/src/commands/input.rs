//! Loading source text from a file, stdin or the command line.

use std::io::Read;
use std::path::Path;

use ifsparse_lib::{Keywords, Parse, ParseOptions};

use crate::error::CliError;

/// Source text plus the name diagnostics show for it.
pub struct Input {
    pub name: String,
    pub text: String,
}

impl Input {
    pub fn parse(&self, keywords: &Keywords, options: &ParseOptions) -> Parse {
        ifsparse_lib::parse_with(&self.text, &self.name, keywords, options)
    }
}

/// Inline text wins; `-` reads stdin.
pub fn load(path: Option<&Path>, text: Option<&str>) -> Result<Input, CliError> {
    if let Some(text) = text {
        return Ok(Input {
            name: "<source>".to_string(),
            text: text.to_string(),
        });
    }
    let Some(path) = path else {
        return Err(CliError::NoInput);
    };
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(CliError::Stdin)?;
        return decode("<stdin>", bytes);
    }
    if !path.exists() {
        return Err(CliError::Missing(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| ifsparse_lib::Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&path.display().to_string(), bytes)
}

fn decode(name: &str, bytes: Vec<u8>) -> Result<Input, CliError> {
    let text = String::from_utf8(bytes).map_err(|e| ifsparse_lib::Error::InvalidUtf8 {
        file: name.to_string(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })?;
    Ok(Input {
        name: name.to_string(),
        text,
    })
}
