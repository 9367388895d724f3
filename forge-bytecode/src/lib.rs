//! Forge Bytecode - Compiler and Instruction Set
//!
//! Lowers a checked AST into a flat, typed instruction stream the virtual machine
//! runs directly: no generic `ADD`, only `ADD_INT`/`ADD_FLOAT`/`ADD_DOUBLE`, chosen
//! once here so the interpreter loop never re-dispatches on a runtime type tag.

pub mod compiler;
pub mod constant;
pub mod instruction;
pub mod opcode;
pub mod program;

pub use compiler::BytecodeCompiler;
pub use constant::{Constant, StackValueKind};
pub use instruction::Instruction;
pub use opcode::OpCode;
pub use program::{CompiledFunction, CompiledProgram};
