//! Lexer for the PL/SQL dialect.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! Trivia (whitespace and comments) never reaches the parser. It is collected into a side
//! table and every token records the run of trivia that precedes it; the final `Eof` token
//! owns whatever trails the last real token. Concatenating each token's leading trivia and
//! text in order therefore reproduces the input exactly.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. Strings, quoted identifiers and block comments
//! are scanned by hand so an unterminated one can be cut at a sensible place: end of the
//! opening line for strings and quoted identifiers, end of file for comments.

use logos::Logos;
use std::ops::Range;

use super::keywords::Keywords;
use super::span::{TextRange, text_range};
use super::syntax_kind::SyntaxKind;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
    /// Index range into [`Lexed::trivia`] of the trivia directly before this token.
    pub(crate) trivia_start: u32,
    pub(crate) trivia_end: u32,
}

impl Token {
    pub fn trivia_range(&self) -> Range<usize> {
        self.trivia_start as usize..self.trivia_end as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

/// Lexer output. `tokens` is never empty: it always ends with `Eof`.
#[derive(Debug, Clone)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub trivia: Vec<Trivia>,
    pub diagnostics: Diagnostics,
}

struct Sink<'k> {
    keywords: &'k Keywords,
    tokens: Vec<Token>,
    trivia: Vec<Trivia>,
    trivia_start: u32,
    diagnostics: Diagnostics,
}

impl Sink<'_> {
    fn push(&mut self, kind: SyntaxKind, range: Range<usize>) {
        let span = text_range(range);
        if kind.is_trivia() {
            self.trivia.push(Trivia { kind, span });
            return;
        }
        let trivia_end = self.trivia.len() as u32;
        self.tokens.push(Token {
            kind,
            span,
            trivia_start: self.trivia_start,
            trivia_end,
        });
        self.trivia_start = trivia_end;
    }

    fn garbage(&mut self, source: &str, range: Range<usize>) {
        self.diagnostics
            .report(
                DiagnosticKind::InvalidCharacter,
                text_range(range.clone()),
            )
            .message(&source[range.clone()])
            .emit();
        self.push(SyntaxKind::Garbage, range);
    }
}

/// Byte order mark some editors write at the start of a file.
const BOM: char = '\u{feff}';

/// Tokenizes source into span-based tokens plus a trivia side table.
///
/// Post-processes the Logos output:
/// - Coalesces consecutive lexer errors into single `Garbage` tokens
/// - Classifies words as keywords, and `$WORD` as directive markers
/// - Extends numbers with fraction and exponent
/// - Scans strings, quoted identifiers and block comments to their closing delimiter
pub fn lex(source: &str, keywords: &Keywords) -> Lexed {
    let mut sink = Sink {
        keywords,
        tokens: Vec::new(),
        trivia: Vec::new(),
        trivia_start: 0,
        diagnostics: Diagnostics::new(),
    };
    let mut lexer = SyntaxKind::lexer(source);
    if source.starts_with(BOM) {
        sink.push(SyntaxKind::Whitespace, 0..BOM.len_utf8());
        lexer.bump(BOM.len_utf8());
    }
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                let start = lexer.span().start;
                if let Some(error_start) = error_start.take() {
                    sink.garbage(source, error_start..start);
                }

                let end = match kind {
                    SyntaxKind::Quote
                    | SyntaxKind::DoubleQuote
                    | SyntaxKind::CommentOpen
                    | SyntaxKind::Number => scan_extent(source, kind, start, &mut sink),
                    _ => lexer.span().end,
                };
                if end > lexer.span().end {
                    lexer.bump(end - lexer.span().end);
                }

                let kind = classify(&sink, source, kind, start..end);
                if kind == SyntaxKind::Garbage {
                    sink.garbage(source, start..end);
                } else {
                    sink.push(kind, start..end);
                }
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    sink.garbage(source, start..source.len());
                }
                break;
            }
        }
    }

    sink.push(SyntaxKind::Eof, source.len()..source.len());
    tracing::trace!(tokens = sink.tokens.len(), trivia = sink.trivia.len(), "lexed");

    Lexed {
        tokens: sink.tokens,
        trivia: sink.trivia,
        diagnostics: sink.diagnostics,
    }
}

fn classify(sink: &Sink<'_>, source: &str, kind: SyntaxKind, range: Range<usize>) -> SyntaxKind {
    match kind {
        SyntaxKind::Quote => SyntaxKind::StringLit,
        SyntaxKind::DoubleQuote => SyntaxKind::QuotedIdent,
        SyntaxKind::CommentOpen => SyntaxKind::BlockComment,
        SyntaxKind::Ident => sink
            .keywords
            .lookup(&source[range])
            .unwrap_or(SyntaxKind::Ident),
        SyntaxKind::Directive => sink
            .keywords
            .lookup(&source[range])
            .unwrap_or(SyntaxKind::Garbage),
        other => other,
    }
}

/// Returns the end offset of a hand-scanned token starting at `start`.
fn scan_extent(source: &str, kind: SyntaxKind, start: usize, sink: &mut Sink<'_>) -> usize {
    let bytes = source.as_bytes();
    match kind {
        SyntaxKind::Quote => match scan_string(bytes, start) {
            Ok(end) => end,
            Err(line_end) => {
                sink.diagnostics
                    .report(
                        DiagnosticKind::UnterminatedString,
                        text_range(start..start + 1),
                    )
                    .emit();
                line_end
            }
        },
        SyntaxKind::DoubleQuote => {
            let line_end = line_end(bytes, start);
            match bytes[start + 1..line_end].iter().position(|&b| b == b'"') {
                Some(i) => start + 1 + i + 1,
                None => {
                    sink.diagnostics
                        .report(
                            DiagnosticKind::UnterminatedQuotedIdentifier,
                            text_range(start..start + 1),
                        )
                        .emit();
                    line_end
                }
            }
        }
        SyntaxKind::CommentOpen => match find(bytes, start + 2, b"*/") {
            Some(i) => i + 2,
            None => {
                sink.diagnostics
                    .report(
                        DiagnosticKind::UnterminatedComment,
                        text_range(start..start + 2),
                    )
                    .emit();
                bytes.len()
            }
        },
        SyntaxKind::Number => scan_number(bytes, start),
        _ => unreachable!("scan_extent called for {kind:?}"),
    }
}

/// `'...'` with `''` as an escaped quote. Strings may span lines; if the file ends
/// first, `Err` carries the end of the opening line.
fn scan_string(bytes: &[u8], start: usize) -> Result<usize, usize> {
    let mut pos = start + 1;
    while pos < bytes.len() {
        if bytes[pos] == b'\'' {
            if bytes.get(pos + 1) == Some(&b'\'') {
                pos += 2;
                continue;
            }
            return Ok(pos + 1);
        }
        pos += 1;
    }
    Err(line_end(bytes, start))
}

/// Digits already matched by logos; appends `.digits` and `e[+-]digits` when present.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let digits_from = |mut pos: usize| {
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        pos
    };

    let mut end = digits_from(start);
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end = digits_from(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            end = digits_from(exp);
        }
    }
    end
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| from + i)
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[Range::<usize>::from(token.span)]
}

/// Decodes a string literal's value: strips the quotes and collapses `''`.
pub fn string_value(text: &str) -> String {
    let inner = text.strip_prefix('\'').unwrap_or(text);
    let inner = inner.strip_suffix('\'').unwrap_or(inner);
    inner.replace("''", "'")
}
