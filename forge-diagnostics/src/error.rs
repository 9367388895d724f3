use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::Level;
use crate::location::SourceLocation;

/// Plain compiler error: the lexical- and syntactic-error kind from the taxonomy.
/// Fatal for the current compilation — the phase that raises one aborts.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{level}: {message}")]
pub struct CompilerError {
    pub level: Level,
    pub message: String,
    pub location: SourceLocation,
}

impl CompilerError {
    pub fn new(level: Level, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            level,
            message: message.into(),
            location,
        }
    }
}

/// Unknown identifier, type mismatch, incompatible operands, wrong argument count,
/// call of a non-function, unsupported conversion, unknown type annotation.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("type error: {message}")]
pub struct TypeError {
    pub message: String,
    pub location: SourceLocation,
}

impl TypeError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// The five borrow-rule violation kinds the memory model can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorrowErrorKind {
    UseAfterMove,
    MutableBorrowWhileImmutableBorrows,
    MultipleMutableBorrows,
    LifetimeTooShort,
    InvalidBorrow,
}

impl std::fmt::Display for BorrowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BorrowErrorKind::UseAfterMove => "use of moved value",
            BorrowErrorKind::MutableBorrowWhileImmutableBorrows => {
                "mutable borrow while immutable borrows are active"
            }
            BorrowErrorKind::MultipleMutableBorrows => "multiple mutable borrows",
            BorrowErrorKind::LifetimeTooShort => "borrower outlives target",
            BorrowErrorKind::InvalidBorrow => "invalid borrow",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("borrow error ({kind}): {message}")]
pub struct BorrowError {
    pub kind: BorrowErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl BorrowError {
    pub fn new(kind: BorrowErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

/// Unsupported AST construct for the backend, or an internal invariant violation.
/// Typically fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("codegen error: {message}")]
pub struct CodegenError {
    pub message: String,
    pub location: SourceLocation,
}

impl CodegenError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Closed sum over every diagnostic kind the pipeline can raise. Replaces the
/// original's `unique_ptr<CompilerError>` hierarchy with virtual `formatError`:
/// here dispatch is an ordinary match, and the set of kinds is closed by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    Compiler(CompilerError),
    Type(TypeError),
    Borrow(BorrowError),
    Codegen(CodegenError),
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::Compiler(e) => e.level,
            Diagnostic::Type(_) | Diagnostic::Borrow(_) | Diagnostic::Codegen(_) => Level::Error,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Diagnostic::Compiler(e) => &e.location,
            Diagnostic::Type(e) => &e.location,
            Diagnostic::Borrow(e) => &e.location,
            Diagnostic::Codegen(e) => &e.location,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Compiler(e) => &e.message,
            Diagnostic::Type(e) => &e.message,
            Diagnostic::Borrow(e) => &e.message,
            Diagnostic::Codegen(e) => &e.message,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Diagnostic::Compiler(_) => "compiler",
            Diagnostic::Type(_) => "type",
            Diagnostic::Borrow(_) => "borrow",
            Diagnostic::Codegen(_) => "codegen",
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.location(),
            self.kind_name(),
            self.message()
        )
    }
}
