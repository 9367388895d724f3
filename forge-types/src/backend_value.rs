use serde::{Deserialize, Serialize};

/// The runtime representation a [`crate::Type`] lowers to. Stands in for the
/// "LLVM-lowering hook" against a target that, in this system, is the bytecode
/// virtual machine rather than a native backend: `forge_bytecode` and `forge_vm`
/// consume this instead of an LLVM type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendValueKind {
    Int32,
    Float32,
    Float64,
    Bool,
    /// Heap-object reference: strings, arrays, class instances, smart pointers.
    HeapRef,
    Unit,
}
