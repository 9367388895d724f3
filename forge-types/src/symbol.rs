use serde::{Deserialize, Serialize};

use forge_diagnostics::SourceLocation;

use crate::type_::Type;

/// Per-variable ownership state, mutated by the borrow checker as it walks the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    Owned,
    Borrowed,
    MutBorrowed,
    Moved,
}

/// How long a value is guaranteed valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifetime {
    Static,
    Function,
    Block,
    Expression,
}

impl Lifetime {
    /// Rank on the `Expression < Block < Function < Static` outlives order, used to
    /// check that a borrower does not outlive the thing it borrows from.
    fn rank(self) -> u8 {
        match self {
            Lifetime::Expression => 0,
            Lifetime::Block => 1,
            Lifetime::Function => 2,
            Lifetime::Static => 3,
        }
    }

    /// True if `self` is guaranteed valid for at least as long as `other`.
    pub fn outlives(self, other: Lifetime) -> bool {
        self.rank() >= other.rank()
    }
}

/// A declared name: its type, where it lives in the backend, and its current
/// ownership state. `backend_slot` is an opaque handle (a bytecode local/global
/// index once compiled) rather than an LLVM `Value*` — there is no native backend
/// in this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub backend_slot: Option<u32>,
    pub ownership: Ownership,
    pub lifetime: Lifetime,
    pub declaration: SourceLocation,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: Type, lifetime: Lifetime, declaration: SourceLocation) -> Self {
        Self {
            name: name.into(),
            ty,
            backend_slot: None,
            ownership: Ownership::Owned,
            lifetime,
            declaration,
        }
    }
}
