use thiserror::Error;

/// Lexical failure. Carries a {message, line, column} shape, rendered through
/// `Display` instead of thrown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl LexError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn unexpected_byte(ch: char, line: usize, column: usize) -> Self {
        Self::new(format!("unexpected character '{ch}'"), line, column)
    }

    pub fn unterminated_string(line: usize, column: usize) -> Self {
        Self::new("unterminated string literal", line, column)
    }

    pub fn malformed_number(line: usize, column: usize) -> Self {
        Self::new("malformed number literal", line, column)
    }
}

pub type LexResult<T> = Result<T, LexError>;
