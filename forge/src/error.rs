use forge_diagnostics::Diagnostic;
use forge_lexer::LexError;
use forge_parser::ParseError;
use forge_vm::RuntimeError;
use thiserror::Error;

/// Aggregates every failure mode across the pipeline: lexing and parsing return
/// their own typed errors on the first fatal problem, type checking and borrow
/// checking accumulate into a [`Diagnostic`] list instead (best-effort, so a
/// caller sees every violation at once), and the virtual machine reports its
/// own runtime errors once a compiled program is actually executed.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("compilation failed with {} diagnostic(s)", .0.len())]
    Diagnostics(Vec<Diagnostic>),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl ForgeError {
    /// The accumulated diagnostics, if this is a [`ForgeError::Diagnostics`].
    pub fn diagnostics(&self) -> Option<&[Diagnostic]> {
        match self {
            ForgeError::Diagnostics(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

pub type ForgeResult<T> = Result<T, ForgeError>;
