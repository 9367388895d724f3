//! Forge Parser - Recursive-Descent Syntax Analysis
//!
//! Turns a token vector into an AST. Precedence is encoded as a ladder of methods
//! (`parse_logical_or` down to `parse_primary`), left-associative at every level.
//! The parser does not recover from errors: the first one aborts.

pub mod error;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::Parser;
