use thiserror::Error;

/// Every way executing a compiled program can fail at runtime. Distinct from
/// `forge_diagnostics::Diagnostic`, which covers compile-time failures only —
/// by the time a program reaches the virtual machine it has already passed
/// lexing, parsing, type checking, and bytecode compilation, so what remains
/// are stack-discipline and indexing violations a correct compiler shouldn't
/// produce, plus genuine runtime conditions like division by zero.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("expected {expected} on stack, got {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },
    #[error("undefined local slot {0}")]
    UndefinedLocal(u32),
    #[error("undefined global slot {0}")]
    UndefinedGlobal(u32),
    #[error("undefined function at index {0}")]
    UndefinedFunction(u32),
    #[error("undefined string at index {0}")]
    UndefinedString(u32),
    #[error("undefined constant at index {0}")]
    UndefinedConstant(u32),
    #[error("undefined heap reference")]
    UndefinedHeapReference,
    #[error("return with no active call frame")]
    CallStackUnderflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("instruction pointer out of bounds: {0}")]
    InstructionPointerOutOfBounds(u32),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
