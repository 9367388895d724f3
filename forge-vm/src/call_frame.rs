use crate::stack_value::StackValue;

/// One activation record. `locals` grows lazily on first store past its
/// current length, scoped per call instead of global.
#[derive(Debug)]
pub struct CallFrame {
    pub return_address: usize,
    pub locals: Vec<StackValue>,
}

impl CallFrame {
    pub fn new(return_address: usize, params: Vec<StackValue>) -> Self {
        Self { return_address, locals: params }
    }
}
