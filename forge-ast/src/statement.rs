use serde::{Deserialize, Serialize};

use forge_lexer::Token;

use crate::expression::Expression;
use crate::parsed_type::ParsedType;

/// A typed name used in parameter lists (`name: Type`), shared by function, method,
/// and extern declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementParameter {
    pub name: Token,
    pub parsed_type: ParsedType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: Token,
    pub parsed_type: ParsedType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub method_name: Token,
    pub parameters: Vec<StatementParameter>,
    pub return_type: ParsedType,
    pub body: Vec<Statement>,
}

/// Closed sum over every statement form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Program(Vec<Statement>),
    ExpressionStatement(Expression),
    VariableDeclaration {
        name: Token,
        parsed_type: Option<ParsedType>,
        initializer: Expression,
    },
    Assignment {
        lvalue: Expression,
        rvalue: Expression,
    },
    IndexAssignment {
        lvalue: Expression,
        rvalue: Expression,
    },
    Block(Vec<Statement>),
    If {
        condition: Expression,
        then_block: Box<Statement>,
        else_block: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    FunctionDefinition {
        name: Token,
        parameters: Vec<StatementParameter>,
        type_parameters: Vec<Token>,
        return_type: ParsedType,
        body: Box<Statement>,
    },
    MethodDefinition(MethodDefinition),
    FieldDefinition(FieldDefinition),
    ClassDefinition {
        name: Token,
        generic_parameters: Vec<Token>,
        fields: Vec<FieldDefinition>,
        methods: Vec<MethodDefinition>,
    },
    Return(Option<Expression>),
    Defer(Expression),
    Extern {
        name: Token,
        parameters: Vec<StatementParameter>,
        return_type: ParsedType,
    },
}
