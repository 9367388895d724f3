//! Forge AST - Syntax Tree Types
//!
//! Pure data structures with no behavior beyond pretty-printing. The parser crate
//! builds these; the type checker and bytecode compiler crates walk them.

pub mod expression;
pub mod parsed_type;
pub mod pretty_printer;
pub mod statement;

pub use expression::{Expression, ExpressionKind};
pub use parsed_type::{ParsedType, SmartPointerKind};
pub use statement::{FieldDefinition, MethodDefinition, Statement, StatementParameter};
