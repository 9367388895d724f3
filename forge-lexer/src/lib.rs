//! Forge Lexer - Tokenization
//!
//! Turns a source buffer into a stream of [`Token`]s. No behavior beyond scanning;
//! everything downstream (the parser, the type checker) consumes the token vector.

pub mod error;
pub mod operator;
pub mod scanner;
pub mod token;

pub use error::{LexError, LexResult};
pub use scanner::Lexer;
pub use token::{Token, TokenKind};
