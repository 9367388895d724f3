use serde::{Deserialize, Serialize};

/// Every instruction the compiler can emit and the virtual machine can execute.
/// Monomorphized per operand type rather than generic (`ADD_INT`/`ADD_FLOAT`/
/// `ADD_DOUBLE` instead of one `ADD`) — the compiler picks the variant once, at
/// compile time, so the interpreter never branches on a runtime type tag for
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    AddInt,
    AddFloat,
    AddDouble,
    AddString,
    SubInt,
    SubFloat,
    SubDouble,
    MultInt,
    MultFloat,
    MultDouble,
    DivInt,
    DivFloat,
    DivDouble,
    NegInt,
    NegFloat,
    NegDouble,
    BitwiseAndInt,
    BitwiseOrInt,
    BitwiseXorInt,
    BitwiseAndBool,
    BitwiseOrBool,
    BitwiseXorBool,
    NotBool,

    LoadInt,
    LoadFloat,
    LoadDouble,
    LoadString,
    LoadBool,
    StoreLocal,
    LoadLocal,
    StoreGlobal,
    LoadGlobal,

    IntToDouble,
    FloatToDouble,

    EqInt,
    EqFloat,
    EqDouble,
    EqBool,
    EqString,
    LtInt,
    LtFloat,
    LtDouble,
    GtInt,
    GtFloat,
    GtDouble,
    GeqInt,
    GeqFloat,
    GeqDouble,
    LeqInt,
    LeqFloat,
    LeqDouble,

    JumpIfFalse,
    Jump,

    Call,
    Return,

    Halt,
}
