//! Forge Diagnostics - Source Locations and Error Taxonomy
//!
//! Pure data and a single accumulator type. All other crates in the pipeline depend
//! on this one to report what went wrong and where.

pub mod collector;
pub mod error;
pub mod level;
pub mod location;

pub use collector::DiagnosticCollector;
pub use error::{BorrowError, BorrowErrorKind, CodegenError, CompilerError, Diagnostic, TypeError};
pub use level::Level;
pub use location::SourceLocation;
