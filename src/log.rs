//! Debug-only verbosity levels for tracing tokenization and compilation,
//! grounded on the teacher's `util::Log<T>` enum and `LexemeLogger` helpers.
use std::fmt::{Display, Formatter};

/// Tracing verbosity. `Default` logs entry into a phase, `Success` also
/// logs successful lexemes/rules, `Result` additionally logs failures,
/// `Verbose` logs everything including intermediate backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Log<T> {
    None,
    Default(T),
    Success(T),
    Result(T),
    Verbose(T),
}

impl<T> Log<T> {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}
