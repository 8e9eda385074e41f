//! Case-insensitive keyword and directive table.
//!
//! Built once per process (or per batch) and passed by reference into every parse.
//! Words are looked up after maximal-munch identifier scanning, so `ENDING` is an
//! identifier and `end` is `KwEnd`.

use indexmap::IndexMap;

use super::syntax_kind::SyntaxKind::{self, *};

/// Longest entry is `$TEXTPREPEND`; anything longer is never a keyword.
const MAX_WORD_LEN: usize = 16;

const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("ALL", KwAll),
    ("AND", KwAnd),
    ("APPLY", KwApply),
    ("AS", KwAs),
    ("ASC", KwAsc),
    ("BEGIN", KwBegin),
    ("BETWEEN", KwBetween),
    ("BODY", KwBody),
    ("BULK", KwBulk),
    ("BY", KwBy),
    ("CASE", KwCase),
    ("CLOSE", KwClose),
    ("COLLECT", KwCollect),
    ("COMMIT", KwCommit),
    ("CONNECT", KwConnect),
    ("CONSTANT", KwConstant),
    ("CONTINUE", KwContinue),
    ("CREATE", KwCreate),
    ("CROSS", KwCross),
    ("CURRENT", KwCurrent),
    ("CURSOR", KwCursor),
    ("DECLARE", KwDeclare),
    ("DEFAULT", KwDefault),
    ("DELETE", KwDelete),
    ("DESC", KwDesc),
    ("DISTINCT", KwDistinct),
    ("ELSE", KwElse),
    ("ELSIF", KwElsif),
    ("END", KwEnd),
    ("ESCAPE", KwEscape),
    ("EXCEPTION", KwException),
    ("EXECUTE", KwExecute),
    ("EXISTS", KwExists),
    ("EXIT", KwExit),
    ("EXTRACT", KwExtract),
    ("FALSE", KwFalse),
    ("FETCH", KwFetch),
    ("FOR", KwFor),
    ("FORALL", KwForall),
    ("FROM", KwFrom),
    ("FULL", KwFull),
    ("FUNCTION", KwFunction),
    ("GOTO", KwGoto),
    ("GROUP", KwGroup),
    ("HAVING", KwHaving),
    ("IF", KwIf),
    ("IMMEDIATE", KwImmediate),
    ("IN", KwIn),
    ("INNER", KwInner),
    ("INSERT", KwInsert),
    ("INTERSECT", KwIntersect),
    ("INTO", KwInto),
    ("IS", KwIs),
    ("JOIN", KwJoin),
    ("LEFT", KwLeft),
    ("LIKE", KwLike),
    ("LOOP", KwLoop),
    ("MATCHED", KwMatched),
    ("MERGE", KwMerge),
    ("MINUS", KwMinus),
    ("MOD", KwMod),
    ("NOCOPY", KwNocopy),
    ("NOCYCLE", KwNocycle),
    ("NOT", KwNot),
    ("NOWAIT", KwNowait),
    ("NULL", KwNull),
    ("OF", KwOf),
    ("ON", KwOn),
    ("OPEN", KwOpen),
    ("OR", KwOr),
    ("ORDER", KwOrder),
    ("OUT", KwOut),
    ("OUTER", KwOuter),
    ("OVER", KwOver),
    ("PACKAGE", KwPackage),
    ("PARTITION", KwPartition),
    ("PRAGMA", KwPragma),
    ("PRIOR", KwPrior),
    ("PROCEDURE", KwProcedure),
    ("RAISE", KwRaise),
    ("RECORD", KwRecord),
    ("REF", KwRef),
    ("REPLACE", KwReplace),
    ("RETURN", KwReturn),
    ("RETURNING", KwReturning),
    ("REVERSE", KwReverse),
    ("RIGHT", KwRight),
    ("ROLLBACK", KwRollback),
    ("SAVEPOINT", KwSavepoint),
    ("SELECT", KwSelect),
    ("SET", KwSet),
    ("SIBLINGS", KwSiblings),
    ("START", KwStart),
    ("SUBTYPE", KwSubtype),
    ("TABLE", KwTable),
    ("THEN", KwThen),
    ("TO", KwTo),
    ("TRUE", KwTrue),
    ("TYPE", KwType),
    ("UNION", KwUnion),
    ("UNIQUE", KwUnique),
    ("UPDATE", KwUpdate),
    ("USING", KwUsing),
    ("VALUES", KwValues),
    ("VARRAY", KwVarray),
    ("WAIT", KwWait),
    ("WHEN", KwWhen),
    ("WHERE", KwWhere),
    ("WHILE", KwWhile),
    ("WITH", KwWith),
];

const DIRECTIVES: &[(&str, SyntaxKind)] = &[
    ("$IF", DirIf),
    ("$THEN", DirThen),
    ("$ELSIF", DirElsif),
    ("$ELSE", DirElse),
    ("$END", DirEnd),
    ("$ERROR", DirError),
    ("$SEARCH", DirSearch),
    ("$REPLACE", DirReplace),
    ("$APPEND", DirAppend),
    ("$PREPEND", DirPrepend),
    ("$TEXTSEARCH", DirTextSearch),
    ("$TEXTREPLACE", DirTextReplace),
    ("$TEXTAPPEND", DirTextAppend),
    ("$TEXTPREPEND", DirTextPrepend),
];

/// Uppercased word → kind, for keywords and `$` directives.
#[derive(Debug, Clone)]
pub struct Keywords {
    words: IndexMap<&'static str, SyntaxKind>,
}

impl Keywords {
    pub fn new() -> Self {
        let words = KEYWORDS
            .iter()
            .chain(DIRECTIVES)
            .map(|&(text, kind)| (text, kind))
            .collect();
        Self { words }
    }

    /// Classifies a scanned word. `None` means plain identifier (or unknown directive).
    pub fn lookup(&self, word: &str) -> Option<SyntaxKind> {
        let bytes = word.as_bytes();
        if bytes.len() > MAX_WORD_LEN {
            return None;
        }
        let mut buf = [0u8; MAX_WORD_LEN];
        let upper = &mut buf[..bytes.len()];
        upper.copy_from_slice(bytes);
        upper.make_ascii_uppercase();
        let upper = std::str::from_utf8(upper).ok()?;
        self.words.get(upper).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Entries in declaration order: keywords first, then directives.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, SyntaxKind)> + '_ {
        self.words.iter().map(|(&text, &kind)| (text, kind))
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn describe_keyword(kind: SyntaxKind) -> &'static str {
    KEYWORDS
        .iter()
        .find(|&&(_, k)| k == kind)
        .map_or("keyword", |&(text, _)| text)
}
