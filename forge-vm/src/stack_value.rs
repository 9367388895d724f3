use crate::error::{RuntimeError, RuntimeResult};
use crate::heap::HeapId;

/// A value the virtual machine can hold on its operand stack, in a local or
/// global slot, or pass across a call. Widens `forge_bytecode::StackValueKind`
/// with `HeapRef`: the compiler never emits an opcode that produces one today
/// (array literals are rejected at compile time), but the heap and its
/// collector are a first-class runtime capability regardless, so the value
/// representation needs a variant for it.
#[derive(Debug, Clone, PartialEq)]
pub enum StackValue {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    /// Index into the virtual machine's string table, compile-time interned
    /// literal or runtime-interned concatenation result alike.
    Str(u32),
    HeapRef(HeapId),
}

impl StackValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            StackValue::Int(_) => "int",
            StackValue::Float(_) => "float",
            StackValue::Double(_) => "double",
            StackValue::Bool(_) => "bool",
            StackValue::Str(_) => "string",
            StackValue::HeapRef(_) => "heap reference",
        }
    }

    pub fn as_int(&self) -> RuntimeResult<i32> {
        match self {
            StackValue::Int(v) => Ok(*v),
            other => Err(RuntimeError::TypeMismatch { expected: "int", found: other.type_name() }),
        }
    }

    pub fn as_float(&self) -> RuntimeResult<f32> {
        match self {
            StackValue::Float(v) => Ok(*v),
            other => Err(RuntimeError::TypeMismatch { expected: "float", found: other.type_name() }),
        }
    }

    pub fn as_double(&self) -> RuntimeResult<f64> {
        match self {
            StackValue::Double(v) => Ok(*v),
            other => Err(RuntimeError::TypeMismatch { expected: "double", found: other.type_name() }),
        }
    }

    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            StackValue::Bool(v) => Ok(*v),
            other => Err(RuntimeError::TypeMismatch { expected: "bool", found: other.type_name() }),
        }
    }

    pub fn as_str_id(&self) -> RuntimeResult<u32> {
        match self {
            StackValue::Str(v) => Ok(*v),
            other => Err(RuntimeError::TypeMismatch { expected: "string", found: other.type_name() }),
        }
    }

    pub fn as_heap_ref(&self) -> RuntimeResult<HeapId> {
        match self {
            StackValue::HeapRef(id) => Ok(*id),
            other => Err(RuntimeError::TypeMismatch { expected: "heap reference", found: other.type_name() }),
        }
    }
}
