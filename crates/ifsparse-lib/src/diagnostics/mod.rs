//! Errors and warnings collected while lexing and parsing.
//!
//! Nothing here aborts a parse. Reporters go through [`Diagnostics::report`],
//! which hands back a builder so call sites can attach detail, related spans
//! and the expected-token set before the diagnostic is recorded.

mod message;
mod printer;


pub use message::{Category, Diagnostic, DiagnosticKind, RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

use crate::parser::span::TextRange;
use crate::parser::syntax_kind::TokenSet;

/// Ordered diagnostics list produced alongside every tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a diagnostic carrying the kind's own title; nothing is recorded
    /// until [`Report::emit`].
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> Report<'_> {
        Report {
            sink: self,
            pending: Diagnostic::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Appends `other`, keeping the list ordered by start offset.
    ///
    /// Lexical diagnostics are produced before parsing starts; merging them this
    /// way keeps them interleaved with the syntax errors they explain.
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
        self.sort();
    }

    /// Orders by start offset. Stable, so diagnostics at one position keep emission order.
    pub(crate) fn sort(&mut self) {
        self.items.sort_by_key(|d| d.range.start());
    }

    /// Snippet rendering against `source`, without color.
    pub fn render(&self, source: &str) -> String {
        self.render_colored(source, false)
    }

    pub fn render_colored(&self, source: &str, colored: bool) -> String {
        self.printer().source(source).colored(colored).render()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A diagnostic under construction.
#[must_use = "a report does nothing until `.emit()` is called"]
pub struct Report<'a> {
    sink: &'a mut Diagnostics,
    pending: Diagnostic,
}

impl Report<'_> {
    /// Replaces the title with one that includes `detail`.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.pending.message = self.pending.kind.message(Some(&detail));
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.pending.severity = severity;
        self
    }

    /// Records what the parser would have accepted at this point.
    pub fn expected(mut self, set: TokenSet) -> Self {
        self.pending.expected = set.iter().map(|kind| kind.describe()).collect();
        self
    }

    pub fn related_to(mut self, label: impl Into<String>, range: TextRange) -> Self {
        self.pending.related.push(RelatedInfo::new(range, label));
        self
    }

    pub fn emit(self) {
        self.sink.items.push(self.pending);
    }
}
