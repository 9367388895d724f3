//! Forge Types - Semantic Type System and Symbol Table
//!
//! `ParsedType` (in `forge-ast`) is what was written; `Type` here is what it means.
//! The checker turns one into the other, and answers assignability/promotion/common-
//! type questions that the bytecode compiler and borrow checker both depend on.

pub mod backend_value;
pub mod checker;
pub mod kind;
pub mod pointer_kind;
pub mod primitive;
pub mod scope;
pub mod symbol;
pub mod type_;

pub use backend_value::BackendValueKind;
pub use checker::TypeChecker;
pub use kind::Kind;
pub use pointer_kind::PointerKind;
pub use primitive::PrimitiveKind;
pub use scope::{Scope, SymbolTable};
pub use symbol::{Lifetime, Ownership, Symbol};
pub use type_::{ClassField, ClassMethod, Type};
