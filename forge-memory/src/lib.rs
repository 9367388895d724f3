//! Forge Memory - Ownership, Lifetime, and Borrow Checking
//!
//! Walks a checked program enforcing the move/borrow/lifetime rules: a moved value
//! cannot be used again, a mutable borrow cannot coexist with any other borrow, and
//! a borrower cannot outlive what it borrows from. Reuses `forge-types`'s
//! `Ownership`/`Lifetime` rather than redefining them, since `Symbol` already carries
//! both.

pub mod borrow_checker;
pub mod borrow_info;
pub mod memory_model;

pub use borrow_checker::BorrowChecker;
pub use borrow_info::BorrowInfo;
pub use memory_model::{MemoryModel, VariableId};
