use serde::Serialize;

use crate::parser::span::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// Lexical problems come first since everything after them is built on a
/// best-effort token. Unclosed blocks follow: they explain most of what the
/// parser reports afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticKind {
    // Lexical
    UnterminatedString,
    UnterminatedComment,
    UnterminatedQuotedIdentifier,
    InvalidCharacter,

    // Structure left open
    UnclosedBlock,
    UnclosedParen,
    UnclosedDirective,
    NestingTooDeep,

    // Something required is missing
    ExpectedExpression,
    ExpectedIdentifier,
    ExpectedStatement,
    ExpectedDeclaration,
    ExpectedType,
    MissingTerminator,

    // Something present does not belong
    UnexpectedToken,
    CaseTerminatorMismatch,
    DuplicateCatchAll,
    DeclarationInStatementList,
    IntoNotAllowed,

    // Suspicious but well-formed
    MismatchedEndName,
}

/// Which stage of the pipeline produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    LexError,
    SyntaxError,
}

impl DiagnosticKind {
    /// Default severity for this kind. Can be overridden per report.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::MismatchedEndName => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::UnterminatedString
            | Self::UnterminatedComment
            | Self::UnterminatedQuotedIdentifier
            | Self::InvalidCharacter => Category::LexError,
            _ => Category::SyntaxError,
        }
    }

    /// Message used when the reporter adds no detail.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UnterminatedString => "unterminated string literal",
            Self::UnterminatedComment => "unterminated block comment",
            Self::UnterminatedQuotedIdentifier => "unterminated quoted identifier",
            Self::InvalidCharacter => "invalid character",

            Self::UnclosedBlock => "block is not closed",
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedDirective => "directive is not closed with `$END`",
            Self::NestingTooDeep => "nesting too deep",

            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedIdentifier => "expected an identifier",
            Self::ExpectedStatement => "expected a statement",
            Self::ExpectedDeclaration => "expected a declaration",
            Self::ExpectedType => "expected a type",
            Self::MissingTerminator => "missing `;`",

            Self::UnexpectedToken => "unexpected token",
            Self::CaseTerminatorMismatch => "wrong CASE terminator",
            Self::DuplicateCatchAll => "duplicate `WHEN OTHERS` handler",
            Self::DeclarationInStatementList => "declaration inside a statement list",
            Self::IntoNotAllowed => "INTO is only allowed in a PL/SQL SELECT statement",

            Self::MismatchedEndName => "END name does not match",
        }
    }

    /// Final message text, folding in the reporter's detail when there is one.
    pub fn message(&self, detail: Option<&str>) -> String {
        let Some(detail) = detail else {
            return self.title().to_string();
        };
        match self {
            Self::InvalidCharacter => format!("invalid input `{detail}`"),
            Self::UnexpectedToken => detail.to_string(),
            Self::MismatchedEndName => format!("END name {detail}"),
            Self::UnclosedBlock | Self::UnclosedParen | Self::NestingTooDeep => {
                format!("{}; {detail}", self.title())
            }
            _ => format!("{}: {detail}", self.title()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    /// Token descriptions the parser would have accepted here.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) expected: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            range,
            message: message.into(),
            expected: Vec::new(),
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.title())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expected(&self) -> &[&'static str] {
        &self.expected
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if !self.expected.is_empty() {
            write!(f, " (expected: {})", self.expected.join(", "))?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
