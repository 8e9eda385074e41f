//! Diagnostic rendering.
//!
//! With a source attached, each diagnostic becomes an annotated snippet with the
//! primary span underlined and related spans marked as context. Without one,
//! the printer falls back to the one-line `Display` form used by tests and logs.

use std::fmt::{self, Write};
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::Diagnostics;
use super::message::{Diagnostic, Severity};
use crate::parser::span::TextRange;

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    /// Attach the parsed text; enables snippet output.
    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    /// File name shown in the snippet header, or as a prefix in plain output.
    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        match self.source {
            Some(source) => self.write_snippets(source, w),
            None => self.write_lines(w),
        }
    }

    fn write_snippets(&self, source: &str, w: &mut impl Write) -> fmt::Result {
        let renderer = match self.colored {
            true => Renderer::styled(),
            false => Renderer::plain(),
        };
        let mut separator = "";
        for diag in self.diagnostics {
            let report = [self.group(diag, source)];
            write!(w, "{separator}{}", renderer.render(&report))?;
            separator = "\n";
        }
        Ok(())
    }

    fn group<'a>(&'a self, diag: &'a Diagnostic, source: &'a str) -> Group<'a> {
        let primary = AnnotationKind::Primary
            .span(caret_range(diag.range, source.len()))
            .label(&diag.message);
        let mut snippet = Snippet::source(source).line_start(1).annotation(primary);
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        snippet = diag.related.iter().fold(snippet, |snippet, info| {
            snippet.annotation(
                AnnotationKind::Context
                    .span(caret_range(info.range, source.len()))
                    .label(&info.message),
            )
        });
        level(diag.severity).primary_title(&diag.message).element(snippet)
    }

    fn write_lines(&self, w: &mut impl Write) -> fmt::Result {
        let mut separator = "";
        for diag in self.diagnostics {
            w.write_str(separator)?;
            if let Some(path) = self.path {
                write!(w, "{path}: ")?;
            }
            write!(w, "{diag}")?;
            separator = "\n";
        }
        Ok(())
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Missing-token diagnostics sit on an empty range; give the caret one column,
/// clamped to the end of the text.
fn caret_range(range: TextRange, len: usize) -> Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if end > start {
        start..end
    } else {
        start..len.min(start + 1)
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}
