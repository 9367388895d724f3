//! Forge VM - Virtual Machine and Execution Engine
//!
//! Executes a [`forge_bytecode::CompiledProgram`] directly: a typed operand
//! stack, growable global and per-call local slot tables, and a mark-and-sweep
//! heap for values whose size isn't known until runtime. Function calls use a
//! call-frame stack rather than the host's own call stack, so a `Call`/`Return`
//! pair is just a push/pop here instead of a native function call.

pub mod call_frame;
pub mod error;
pub mod heap;
pub mod stack_value;
pub mod virtual_machine;

pub use call_frame::CallFrame;
pub use error::{RuntimeError, RuntimeResult};
pub use heap::{Heap, HeapId, HeapObject};
pub use stack_value::StackValue;
pub use virtual_machine::VirtualMachine;
