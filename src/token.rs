//! Lexical tokens produced by the [tokenizer](crate::tokenizer).
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// The closed set of lexeme kinds the tokenizer can emit.
///
/// There is deliberately no "none"/sentinel variant: a [Token] is only ever
/// constructed by the tokenizer once a lexeme has been fully recognized, so
/// the invariant "every emitted token has a real kind" holds by
/// construction rather than by a runtime check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Word,
    DollarIdentifier,
    AtIdentifier,
    QuotedString,
    ParenStart,
    ParenEnd,
    BracketStart,
    BracketEnd,
    CurlyStart,
    CurlyEnd,
    AngleStart,
    AngleEnd,
    Equals,
    Semicolon,
    Pipe,
    Period,
    Star,
    Plus,
    Comma,
}

/// An immutable lexeme: its kind, its source text, and its source position.
///
/// `line` starts at `1`, `column` starts at `0` (see
/// [Tokenizer](crate::tokenizer::Tokenizer) for the exact bookkeeping
/// rules). Equality is structural over all four fields, and cloning a
/// `Token` yields a structurally equal, independent value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        let text = text.into();
        debug_assert!(!text.is_empty(), "token text must not be empty");
        Self {
            kind,
            text,
            line,
            column,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}({:?}) @ {}:{}",
            self.kind, self.text, self.line, self.column
        )
    }
}

/// `([A-Za-z_]+\.)*[A-Za-z_]+`, the shape required of the text following a
/// `$`/`@` prefix (§4.1). Compiled once and reused for every identifier,
/// mirroring the teacher's per-lexeme compiled-pattern caching
/// (`lexeme::Pattern`).
static IDENTIFIER_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_]+\.)*[A-Za-z_]+$").unwrap());

pub(crate) fn is_valid_identifier_body(text: &str) -> bool {
    IDENTIFIER_BODY.is_match(text)
}
