use thiserror::Error;

/// Syntactic failure: unexpected token, missing token, invalid start of a construct.
/// The parser does not attempt recovery — the first error aborts the compilation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
