use serde::{Deserialize, Serialize};

use crate::opcode::OpCode;

/// One bytecode instruction: an opcode plus a single signed operand. The operand's
/// meaning is opcode-dependent — a constant-pool index for `LOAD_*`, a local/global
/// slot for `STORE_LOCAL`/`LOAD_GLOBAL`, an absolute instruction index for `JUMP`, a
/// function-pool index for `CALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: i32,
}

impl Instruction {
    pub fn new(opcode: OpCode, operand: i32) -> Self {
        Self { opcode, operand }
    }

    pub fn bare(opcode: OpCode) -> Self {
        Self::new(opcode, 0)
    }
}
