use serde::{Deserialize, Serialize};

use crate::constant::Constant;
use crate::instruction::Instruction;

/// A compiled function body: its instructions live inline in the program's shared
/// instruction stream, starting at `entry_address`. `local_count` is the number of
/// local slots the virtual machine must allocate for a call frame before jumping in;
/// the first `param_count` of those slots are filled from the caller's arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledFunction {
    pub name: String,
    pub entry_address: u32,
    pub param_count: u32,
    pub local_count: u32,
}

/// The output of compilation: a flat instruction stream plus the three pools it
/// indexes into. Matches the external bytecode program layout — counts up front,
/// little-endian instruction records, tagged constants, length-prefixed strings —
/// so this is exactly what a serializer would write to a `.fgbc` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub instructions: Vec<Instruction>,
    pub constants: Vec<Constant>,
    pub strings: Vec<String>,
    pub functions: Vec<CompiledFunction>,
}

impl CompiledProgram {
    /// Dumps the program as JSON, for tooling that wants to inspect a compiled
    /// program without linking against `forge-vm` (a disassembler, a test fixture).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::OpCode;

    #[test]
    fn round_trips_through_json() {
        let program = CompiledProgram {
            instructions: vec![Instruction::new(OpCode::LoadInt, 0), Instruction::new(OpCode::Halt, 0)],
            constants: vec![Constant::Int(42)],
            strings: vec!["hi".to_string()],
            functions: vec![CompiledFunction {
                name: "f".to_string(),
                entry_address: 0,
                param_count: 0,
                local_count: 0,
            }],
        };

        let json = program.to_json().expect("should serialize");
        let restored = CompiledProgram::from_json(&json).expect("should deserialize");
        assert_eq!(restored.constants, program.constants);
        assert_eq!(restored.strings, program.strings);
    }
}
