//! Error types for lexing and compiling (§7).
use std::fmt::{Display, Formatter};

/// A source position used purely for rendering error messages, grounded on
/// the teacher's `Position` (`line`, `column`) `Display` impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("")
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

/// Raised by the tokenizer (C2) for an unrecognized character, a malformed
/// number/identifier, or an unterminated/empty quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl LexError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LexError: {} at {}", self.message, self.position())
    }
}

impl std::error::Error for LexError {}

/// Raised by the parser (C6) for a semantic violation: a malformed import
/// or rule, a duplicate/aliased-and-static package, or an invalid repeat
/// range. The originating line number is folded into `message` where
/// available, per §6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompileError: {}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// The error returned by [compile](crate::compile): either phase can fail,
/// but never both (the tokenizer completes fully before the parser runs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOrLexError {
    Lex(LexError),
    Compile(CompileError),
}

impl Display for CompileOrLexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileOrLexError::Lex(err) => write!(f, "{}", err),
            CompileOrLexError::Compile(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompileOrLexError {}

impl From<LexError> for CompileOrLexError {
    fn from(err: LexError) -> Self {
        CompileOrLexError::Lex(err)
    }
}

impl From<CompileError> for CompileOrLexError {
    fn from(err: CompileError) -> Self {
        CompileOrLexError::Compile(err)
    }
}
