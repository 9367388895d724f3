use serde::{Deserialize, Serialize};

use forge_diagnostics::SourceLocation;
use forge_lexer::Token;

/// An expression node. Carries its own source location; the parent node owns the
/// whole subtree (children are `Box<Expression>`, never shared or cyclic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: SourceLocation,
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// Closed sum over every expression form. Dispatch over this is an ordinary `match`,
/// not a virtual `accept(Visitor&)` call — the set of forms is closed by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal(Token),
    ArrayLiteral(Vec<Expression>),
    IndexAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    MemberAccess {
        object: Box<Expression>,
        member_name: String,
        arguments: Vec<Expression>,
        is_method_call: bool,
    },
    Identifier(String),
    Binary {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    Unary {
        operator: Token,
        operand: Box<Expression>,
    },
    FunctionCall {
        name: String,
        type_arguments: Vec<Token>,
        arguments: Vec<Expression>,
    },
    ObjectInstantiation {
        class_name: Token,
        arguments: Vec<Expression>,
    },
    GenericInstantiation {
        class_name: Token,
        type_arguments: Vec<Token>,
        arguments: Vec<Expression>,
    },
    Move {
        move_token: Token,
        operand: Box<Expression>,
    },
    New {
        value: Box<Expression>,
    },
    Optional {
        kind_token: Token,
        value: Option<Box<Expression>>,
    },
}
