use std::collections::HashMap;

use forge_diagnostics::{BorrowErrorKind, DiagnosticCollector, SourceLocation};
use forge_types::{Lifetime, Ownership, Type};

use crate::borrow_info::BorrowInfo;

/// A variable is identified by its declared name: names are already unique within
/// the scope that declares them, so the name doubles as the id.
pub type VariableId = str;

struct VariableInfo {
    ty: Type,
    ownership: Ownership,
    lifetime: Lifetime,
    active_borrows: Vec<BorrowInfo>,
    declaration: SourceLocation,
}

/// Tracks ownership, lifetime, and active-borrow state for every variable the borrow
/// checker has seen. A flat table, not a scope stack: the [`crate::BorrowChecker`]
/// re-registers a name on redeclaration into this single namespace.
#[derive(Default)]
pub struct MemoryModel {
    variables: HashMap<String, VariableInfo>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_variable(&mut self, id: impl Into<String>, ty: Type, lifetime: Lifetime, declaration: SourceLocation) {
        self.variables.insert(
            id.into(),
            VariableInfo {
                ty,
                ownership: Ownership::Owned,
                lifetime,
                active_borrows: Vec::new(),
                declaration,
            },
        );
    }

    pub fn ownership(&self, id: &VariableId) -> Option<Ownership> {
        self.variables.get(id).map(|info| info.ownership)
    }

    pub fn lifetime(&self, id: &VariableId) -> Option<Lifetime> {
        self.variables.get(id).map(|info| info.lifetime)
    }

    pub fn type_of(&self, id: &VariableId) -> Option<&Type> {
        self.variables.get(id).map(|info| &info.ty)
    }

    pub fn has_active_borrows(&self, id: &VariableId) -> bool {
        self.variables.get(id).map(|info| !info.active_borrows.is_empty()).unwrap_or(false)
    }

    pub fn active_borrows(&self, id: &VariableId) -> &[BorrowInfo] {
        self.variables.get(id).map(|info| info.active_borrows.as_slice()).unwrap_or(&[])
    }

    /// Registers a new borrow of `target` taken by the binding `borrower`. Enforces:
    /// target must not be moved; a mutable borrow requires zero existing borrows;
    /// an immutable borrow requires no existing mutable borrow; the borrower's
    /// lifetime must not outlive the target's.
    pub fn register_borrow(
        &mut self,
        target: &VariableId,
        borrower: impl Into<String>,
        is_mutable: bool,
        location: SourceLocation,
        diagnostics: &mut DiagnosticCollector,
    ) -> bool {
        let borrower = borrower.into();
        let borrower_lifetime = self.lifetime(&borrower).unwrap_or(Lifetime::Expression);

        let Some(info) = self.variables.get(target) else {
            diagnostics.report_borrow_error(
                BorrowErrorKind::InvalidBorrow,
                format!("cannot borrow undeclared variable '{target}'"),
                location,
            );
            return false;
        };

        if info.ownership == Ownership::Moved {
            diagnostics.report_borrow_error(
                BorrowErrorKind::UseAfterMove,
                format!("cannot borrow '{target}': value was moved"),
                location,
            );
            return false;
        }

        if is_mutable && !info.active_borrows.is_empty() {
            let kind = if info.active_borrows.iter().any(|b| b.is_mutable) {
                BorrowErrorKind::MultipleMutableBorrows
            } else {
                BorrowErrorKind::MutableBorrowWhileImmutableBorrows
            };
            diagnostics.report_borrow_error(kind, format!("cannot mutably borrow '{target}': already borrowed"), location);
            return false;
        }

        if !is_mutable && info.active_borrows.iter().any(|b| b.is_mutable) {
            diagnostics.report_borrow_error(
                BorrowErrorKind::MutableBorrowWhileImmutableBorrows,
                format!("cannot borrow '{target}': a mutable borrow is active"),
                location,
            );
            return false;
        }

        if !info.lifetime.outlives(borrower_lifetime) {
            diagnostics.report_borrow_error(
                BorrowErrorKind::LifetimeTooShort,
                format!("'{borrower}' outlives '{target}': borrow would dangle"),
                location.clone(),
            );
            return false;
        }

        let info = self.variables.get_mut(target).expect("checked above");
        info.active_borrows.push(BorrowInfo::new(borrower, is_mutable, location, borrower_lifetime));
        info.ownership = if is_mutable { Ownership::MutBorrowed } else { Ownership::Borrowed };
        true
    }

    /// Names of variables that `borrower` currently holds a borrow from. Used to find
    /// what needs releasing when `borrower` goes out of scope.
    pub fn borrowed_targets_of(&self, borrower: &str) -> Vec<String> {
        self.variables
            .iter()
            .filter(|(_, info)| info.active_borrows.iter().any(|b| b.borrower == borrower))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Ends the most recently taken borrow of `target`. Returns ownership to `Owned`
    /// once no borrows remain.
    pub fn end_borrow(&mut self, target: &VariableId, _location: SourceLocation, diagnostics: &mut DiagnosticCollector) -> bool {
        let Some(info) = self.variables.get_mut(target) else {
            diagnostics.report_borrow_error(
                BorrowErrorKind::InvalidBorrow,
                format!("cannot end borrow of undeclared variable '{target}'"),
                _location,
            );
            return false;
        };
        if info.active_borrows.pop().is_none() {
            return false;
        }
        if info.active_borrows.is_empty() {
            info.ownership = Ownership::Owned;
        }
        true
    }

    /// Registers a move out of `source`. The source must currently be owned outright
    /// and have no active borrows, matching the use-after-move invariant.
    pub fn register_move(&mut self, source: &VariableId, location: SourceLocation, diagnostics: &mut DiagnosticCollector) -> bool {
        let Some(info) = self.variables.get_mut(source) else {
            diagnostics.report_borrow_error(
                BorrowErrorKind::InvalidBorrow,
                format!("cannot move undeclared variable '{source}'"),
                location,
            );
            return false;
        };

        if info.ownership == Ownership::Moved {
            diagnostics.report_borrow_error(
                BorrowErrorKind::UseAfterMove,
                format!("'{source}' was already moved"),
                location,
            );
            return false;
        }

        if !info.active_borrows.is_empty() {
            diagnostics.report_borrow_error(
                BorrowErrorKind::InvalidBorrow,
                format!("cannot move '{source}': it is currently borrowed"),
                location,
            );
            return false;
        }

        info.ownership = Ownership::Moved;
        true
    }

    /// Checks use of an already-registered variable against the use-after-move rule,
    /// without mutating its state. Used for every read of an identifier.
    pub fn check_use(&self, id: &VariableId, location: SourceLocation, diagnostics: &mut DiagnosticCollector) -> bool {
        match self.ownership(id) {
            Some(Ownership::Moved) => {
                diagnostics.report_borrow_error(BorrowErrorKind::UseAfterMove, format!("use of moved value '{id}'"), location);
                false
            }
            _ => true,
        }
    }
}
