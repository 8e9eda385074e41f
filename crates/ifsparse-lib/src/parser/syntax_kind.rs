//! Token kinds for the PL/SQL lexer and parser.
//!
//! `SyntaxKind` is the token vocabulary: punctuation, literals, directive markers,
//! trivia and keywords. Keywords carry no logos pattern of their own; words are
//! scanned as `Ident` and classified afterwards through [`Keywords`](super::keywords::Keywords).
//! Node kinds live in [`NodeKind`](super::tree::NodeKind).

use logos::Logos;
use serde::Serialize;

/// `#[repr(u8)]` enables the bounded transmute in `TokenSet`'s `Debug`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum SyntaxKind {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("..")]
    DotDot,

    #[token(":=")]
    Assign,

    /// Bind variable prefix (`:new`).
    #[token(":")]
    Colon,

    /// Named argument marker. Scanned as one unit so it never reads as `=` `>`.
    #[token("=>")]
    Arrow,

    #[token("=")]
    Eq,

    #[token("<>")]
    #[token("!=")]
    #[token("^=")]
    #[token("~=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("||")]
    Concat,

    #[token("<<")]
    LabelOpen,

    #[token(">>")]
    LabelClose,

    /// Oracle outer-join marker `(+)`.
    #[token("(+)")]
    OuterJoin,

    /// `@Override`, `@Overtake`, `@UncheckedAccess`, ...
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    Annotation,

    /// Fraction and exponent are appended by the lexer so that `1..10` stays a range.
    #[regex(r"[0-9]+")]
    Number,

    /// Produced by the lexer from `Quote`.
    StringLit,

    #[regex(r"[A-Za-z_][A-Za-z0-9_$#]*")]
    Ident,

    /// Produced by the lexer from `DoubleQuote`.
    QuotedIdent,

    /// Conditional-compilation inquiry `$$name`.
    #[regex(r"\$\$[A-Za-z_][A-Za-z0-9_]*")]
    Inquiry,

    /// Raw `$WORD`; the lexer classifies it into one of the `Dir*` kinds.
    #[regex(r"\$[A-Za-z_]+")]
    #[doc(hidden)]
    Directive,

    DirIf,
    DirThen,
    DirElsif,
    DirElse,
    DirEnd,
    DirError,
    DirSearch,
    DirReplace,
    DirAppend,
    DirPrepend,
    DirTextSearch,
    DirTextReplace,
    DirTextAppend,
    DirTextPrepend,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"--[^\n]*", allow_greedy = true)]
    LineComment,

    /// Produced by the lexer from `CommentOpen`.
    BlockComment,

    /// Opening delimiters that the lexer scans by hand.
    #[token("'")]
    #[doc(hidden)]
    Quote,

    #[token("\"")]
    #[doc(hidden)]
    DoubleQuote,

    #[token("/*")]
    #[doc(hidden)]
    CommentOpen,

    /// Consecutive unrecognized characters, coalesced.
    Garbage,

    /// End of input. Carries trailing trivia.
    Eof,

    // --- Keywords ---
    KwAll,
    KwAnd,
    KwApply,
    KwAs,
    KwAsc,
    KwBegin,
    KwBetween,
    KwBody,
    KwBulk,
    KwBy,
    KwCase,
    KwClose,
    KwCollect,
    KwCommit,
    KwConnect,
    KwConstant,
    KwContinue,
    KwCreate,
    KwCross,
    KwCurrent,
    KwCursor,
    KwDeclare,
    KwDefault,
    KwDelete,
    KwDesc,
    KwDistinct,
    KwElse,
    KwElsif,
    KwEnd,
    KwEscape,
    KwException,
    KwExecute,
    KwExists,
    KwExit,
    KwExtract,
    KwFalse,
    KwFetch,
    KwFor,
    KwForall,
    KwFrom,
    KwFull,
    KwFunction,
    KwGoto,
    KwGroup,
    KwHaving,
    KwIf,
    KwImmediate,
    KwIn,
    KwInner,
    KwInsert,
    KwIntersect,
    KwInto,
    KwIs,
    KwJoin,
    KwLeft,
    KwLike,
    KwLoop,
    KwMatched,
    KwMerge,
    KwMinus,
    KwMod,
    KwNocopy,
    KwNocycle,
    KwNot,
    KwNowait,
    KwNull,
    KwOf,
    KwOn,
    KwOpen,
    KwOr,
    KwOrder,
    KwOut,
    KwOuter,
    KwOver,
    KwPackage,
    KwPartition,
    KwPragma,
    KwPrior,
    KwProcedure,
    KwRaise,
    KwRecord,
    KwRef,
    KwReplace,
    KwReturn,
    KwReturning,
    KwReverse,
    KwRight,
    KwRollback,
    KwSavepoint,
    KwSelect,
    KwSet,
    KwSiblings,
    KwStart,
    KwSubtype,
    KwTable,
    KwThen,
    KwTo,
    KwTrue,
    KwType,
    KwUnion,
    KwUnique,
    KwUpdate,
    KwUsing,
    KwValues,
    KwVarray,
    KwWait,
    KwWhen,
    KwWhere,
    KwWhile,
    KwWith,

    // Must be last - used for bounds checking in `TokenSet`'s `Debug`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (KwAll as u8..=KwWith as u8).contains(&(self as u8))
    }

    /// Keywords that may also name things: columns, functions, collection methods,
    /// labels. The join words are recognized only where a join can start.
    #[inline]
    pub fn is_soft_keyword(self) -> bool {
        matches!(
            self,
            KwApply
                | KwAsc
                | KwBody
                | KwBulk
                | KwCollect
                | KwCross
                | KwCurrent
                | KwDesc
                | KwEscape
                | KwExtract
                | KwFull
                | KwImmediate
                | KwInner
                | KwJoin
                | KwLeft
                | KwMatched
                | KwMod
                | KwNocopy
                | KwNocycle
                | KwNowait
                | KwOuter
                | KwOver
                | KwPartition
                | KwRecord
                | KwRef
                | KwReplace
                | KwReverse
                | KwRight
                | KwSavepoint
                | KwSiblings
                | KwType
                | KwValues
                | KwVarray
                | KwWait
        )
    }

    #[inline]
    pub fn is_reserved(self) -> bool {
        self.is_keyword() && !self.is_soft_keyword()
    }

    /// Identifiers, quoted identifiers and soft keywords.
    #[inline]
    pub fn is_ident_like(self) -> bool {
        matches!(self, Ident | QuotedIdent) || self.is_soft_keyword()
    }

    #[inline]
    pub fn is_directive(self) -> bool {
        (DirIf as u8..=DirTextPrepend as u8).contains(&(self as u8))
    }

    /// Markers that open or continue a template patch region.
    #[inline]
    pub fn is_template_marker(self) -> bool {
        (DirSearch as u8..=DirTextPrepend as u8).contains(&(self as u8))
    }

    /// Human-readable form used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            LParen => "`(`",
            RParen => "`)`",
            Comma => "`,`",
            Semicolon => "`;`",
            Dot => "`.`",
            DotDot => "`..`",
            Assign => "`:=`",
            Colon => "`:`",
            Arrow => "`=>`",
            Eq => "`=`",
            NotEq => "`<>`",
            Lt => "`<`",
            Gt => "`>`",
            LtEq => "`<=`",
            GtEq => "`>=`",
            Plus => "`+`",
            Minus => "`-`",
            Star => "`*`",
            Slash => "`/`",
            Percent => "`%`",
            Concat => "`||`",
            LabelOpen => "`<<`",
            LabelClose => "`>>`",
            OuterJoin => "`(+)`",
            Annotation => "annotation",
            Number => "number",
            StringLit => "string literal",
            Ident => "identifier",
            QuotedIdent => "quoted identifier",
            Inquiry => "inquiry directive",
            Directive | Garbage | Quote | DoubleQuote | CommentOpen | __LAST => "invalid input",
            DirIf => "`$IF`",
            DirThen => "`$THEN`",
            DirElsif => "`$ELSIF`",
            DirElse => "`$ELSE`",
            DirEnd => "`$END`",
            DirError => "`$ERROR`",
            DirSearch => "`$SEARCH`",
            DirReplace => "`$REPLACE`",
            DirAppend => "`$APPEND`",
            DirPrepend => "`$PREPEND`",
            DirTextSearch => "`$TEXTSEARCH`",
            DirTextReplace => "`$TEXTREPLACE`",
            DirTextAppend => "`$TEXTAPPEND`",
            DirTextPrepend => "`$TEXTPREPEND`",
            Whitespace => "whitespace",
            LineComment | BlockComment => "comment",
            Eof => "end of file",
            kw => super::keywords::describe_keyword(kw),
        }
    }
}

/// 256-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet([0; 4]);

    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as usize;
            bits[kind / 64] |= 1 << (kind % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        Self::new(&[kind])
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as usize;
        self.0[kind / 64] & (1 << (kind % 64)) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    pub fn iter(self) -> impl Iterator<Item = SyntaxKind> {
        (0..__LAST as u8).filter_map(move |raw| {
            let bit = self.0[raw as usize / 64] & (1 << (raw % 64)) != 0;
            // SAFETY: `raw` is below `__LAST` and SyntaxKind is a fieldless repr(u8) enum
            bit.then(|| unsafe { std::mem::transmute::<u8, SyntaxKind>(raw) })
        })
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    /// Keywords that close or split a statement list.
    pub const BLOCK_END: TokenSet = TokenSet::new(&[
        KwEnd, KwException, KwElsif, KwElse, KwWhen, DirElse, DirElsif, DirEnd, Eof,
    ]);

    /// Statement-level synchronization points; `;` is consumed by the recovery itself.
    /// Unit headers are included so a stray token never eats the next subprogram.
    pub const STMT_RECOVERY: TokenSet = BLOCK_END.union(TokenSet::new(&[
        KwBegin, KwDeclare, KwIf, KwWhile, KwForall, KwReturn, KwRaise, KwExit, KwContinue,
        KwOpen, KwFetch, KwClose, KwExecute, KwSelect, KwInsert, KwUpdate, KwDelete, KwMerge,
        KwCommit, KwRollback, LabelOpen, DirIf, KwProcedure, KwFunction, KwPackage, KwCreate,
    ]));

    /// Declaration-section synchronization points.
    pub const DECL_RECOVERY: TokenSet = TokenSet::new(&[
        KwBegin, KwEnd, KwProcedure, KwFunction, KwCursor, KwPragma, KwSubtype, DirIf, DirElse,
        DirElsif, DirEnd, Annotation, Eof,
    ]);

    /// Words that may never be read as a select-list or table alias.
    pub const ALIAS_STOP: TokenSet = TokenSet::new(&[KwBulk, KwValues]);

    pub const SET_OPERATORS: TokenSet = TokenSet::new(&[KwUnion, KwIntersect, KwMinus]);

    /// Markers that end a template text run.
    pub const TEMPLATE_BOUNDARY: TokenSet = TokenSet::new(&[
        DirSearch,
        DirReplace,
        DirAppend,
        DirPrepend,
        DirTextSearch,
        DirTextReplace,
        DirTextAppend,
        DirTextPrepend,
        DirEnd,
        Eof,
    ]);
}
