use serde::{Deserialize, Serialize};

/// A constant-pool entry. Strings live in their own interning table instead — see
/// `CompiledProgram::strings` — so `LOAD_STRING`'s operand indexes that table
/// directly rather than going through here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
}

/// The runtime tag a stack slot, local, or constant carries. Five kinds, matching
/// the five primitive value forms the virtual machine actually operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackValueKind {
    Int,
    Float,
    Double,
    Bool,
    Str,
}
