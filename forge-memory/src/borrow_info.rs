use forge_diagnostics::SourceLocation;
use forge_types::Lifetime;

/// A single active borrow of a variable, recorded at the moment `&`/`&mut` is taken.
/// `expected_lifetime` is the borrowing binding's own lifetime, not the target's —
/// it is what [`Lifetime::outlives`] checks against the target's lifetime.
#[derive(Debug, Clone)]
pub struct BorrowInfo {
    pub borrower: String,
    pub is_mutable: bool,
    pub location: SourceLocation,
    pub expected_lifetime: Lifetime,
}

impl BorrowInfo {
    pub fn new(borrower: impl Into<String>, is_mutable: bool, location: SourceLocation, expected_lifetime: Lifetime) -> Self {
        Self {
            borrower: borrower.into(),
            is_mutable,
            location,
            expected_lifetime,
        }
    }
}
