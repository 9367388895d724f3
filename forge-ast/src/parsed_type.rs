use serde::{Deserialize, Serialize};

use forge_lexer::Token;

/// The smart-pointer prefix a syntactic type may carry, independent of
/// pointer/reference nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmartPointerKind {
    None,
    Unique,
    Shared,
    Weak,
}

/// A syntactic type descriptor as written in source, before semantic analysis turns it
/// into a [`forge_types::Type`]. Invariant: at most one of {is_pointer, is_reference,
/// is_mut_reference} is true for a given layer; smart-pointer kind is independent of
/// that choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedType {
    pub primary: Token,
    pub type_parameters: Vec<Token>,
    pub nesting_level: usize,
    pub is_pointer: bool,
    pub is_reference: bool,
    pub is_mut_reference: bool,
    pub is_optional: bool,
    pub smart_pointer: SmartPointerKind,
}

impl ParsedType {
    pub fn simple(primary: Token) -> Self {
        Self {
            primary,
            type_parameters: Vec::new(),
            nesting_level: 0,
            is_pointer: false,
            is_reference: false,
            is_mut_reference: false,
            is_optional: false,
            smart_pointer: SmartPointerKind::None,
        }
    }

    /// True when this is a bare primary identifier/keyword with no pointer, reference,
    /// optional, smart-pointer, or generic-parameter decoration.
    pub fn is_simple_type(&self) -> bool {
        self.type_parameters.is_empty()
            && self.nesting_level == 0
            && !self.is_pointer
            && !self.is_reference
            && !self.is_mut_reference
            && !self.is_optional
            && matches!(self.smart_pointer, SmartPointerKind::None)
    }

    pub fn to_display_string(&self) -> String {
        let mut s = String::new();
        match self.smart_pointer {
            SmartPointerKind::None => {}
            SmartPointerKind::Unique => s.push_str("unique "),
            SmartPointerKind::Shared => s.push_str("shared "),
            SmartPointerKind::Weak => s.push_str("weak "),
        }
        for _ in 0..self.nesting_level {
            s.push('*');
        }
        if self.is_mut_reference {
            s.push_str("&mut ");
        } else if self.is_reference {
            s.push('&');
        }
        s.push_str(&self.primary.lexeme);
        if !self.type_parameters.is_empty() {
            s.push('[');
            let params: Vec<&str> = self.type_parameters.iter().map(|t| t.lexeme.as_str()).collect();
            s.push_str(&params.join(", "));
            s.push(']');
        }
        if self.is_optional {
            s.push('?');
        }
        s
    }
}
