use forge_ast::expression::{Expression, ExpressionKind};
use forge_ast::parsed_type::{ParsedType, SmartPointerKind};
use forge_ast::statement::{FieldDefinition, MethodDefinition, Statement, StatementParameter};
use forge_diagnostics::SourceLocation;
use forge_lexer::token::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};

/// Hand-written recursive-descent parser with Pratt-style precedence for expressions.
/// Consumes a token vector produced by the lexer; advances a cursor over it.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    file: String,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: impl Into<String>) -> Self {
        Self {
            tokens,
            pos: 0,
            file: file.into(),
        }
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!(
                "expected {context}, found '{}'",
                self.current().lexeme
            )))
        }
    }

    fn expect_identifier(&mut self, context: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Identifier, context)
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::new(message, self.current().line, self.current().column)
    }

    fn location(&self, token: &Token) -> SourceLocation {
        token.to_source_location(&self.file)
    }

    fn skip_new_lines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Each statement ends at a newline or end-of-file; constructs that already
    /// consume a closing brace (blocks, if/while/def/class) do not call this.
    fn end_statement(&mut self) -> ParseResult<()> {
        if self.is_at_end() || self.check(TokenKind::Newline) {
            self.skip_new_lines();
            Ok(())
        } else {
            Err(self.error(&format!(
                "expected end of statement, found '{}'",
                self.current().lexeme
            )))
        }
    }

    // ------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------

    pub fn parse_program(&mut self) -> ParseResult<Statement> {
        self.skip_new_lines();
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
            self.skip_new_lines();
        }
        Ok(Statement::Program(statements))
    }

    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().kind {
            TokenKind::LBrace => self.parse_block_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Def => self.parse_function_definition(),
            TokenKind::Class => self.parse_class_definition(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Defer => self.parse_defer_statement(),
            TokenKind::Extern => self.parse_extern_statement(),
            _ => self.parse_assignment_or_expression(),
        }
    }

    // ------------------------------------------------------------------
    // Statement forms
    // ------------------------------------------------------------------

    fn parse_block_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::LBrace, "'{'")?;
        self.skip_new_lines();
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
            self.skip_new_lines();
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Statement::Block(statements))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::If, "'if'")?;
        self.expect(TokenKind::LParen, "'(' after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after if condition")?;
        let then_block = Box::new(self.parse_block_statement()?);
        let saved = self.pos;
        self.skip_new_lines();
        let else_block = if self.matches(TokenKind::Else) {
            self.skip_new_lines();
            Some(Box::new(if self.check(TokenKind::If) {
                self.parse_if_statement()?
            } else {
                self.parse_block_statement()?
            }))
        } else {
            self.pos = saved;
            None
        };
        Ok(Statement::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::LParen, "'(' after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after while condition")?;
        let body = Box::new(self.parse_block_statement()?);
        Ok(Statement::While { condition, body })
    }

    fn parse_type_parameter_list(&mut self) -> ParseResult<Vec<Token>> {
        let mut params = Vec::new();
        if self.matches(TokenKind::LBracket) {
            if !self.check(TokenKind::RBracket) {
                loop {
                    params.push(self.expect_identifier("type parameter name")?);
                    if !self.matches(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RBracket, "']' after type parameters")?;
        }
        Ok(params)
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<StatementParameter>> {
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let name = self.expect_identifier("parameter name")?;
                self.expect(TokenKind::Colon, "':' after parameter name")?;
                let parsed_type = self.parse_type()?.ok_or_else(|| self.error("expected parameter type"))?;
                params.push(StatementParameter { name, parsed_type });
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(params)
    }

    fn parse_function_definition(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Def, "'def'")?;
        let name = self.expect_identifier("function name")?;
        let type_parameters = self.parse_type_parameter_list()?;
        self.expect(TokenKind::LParen, "'(' after function name")?;
        let parameters = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen, "')' after parameters")?;
        self.expect(TokenKind::Arrow, "'->' before return type")?;
        let return_type = self.parse_type()?.ok_or_else(|| self.error("expected return type"))?;
        let body = Box::new(self.parse_block_statement()?);
        Ok(Statement::FunctionDefinition {
            name,
            parameters,
            type_parameters,
            return_type,
            body,
        })
    }

    fn parse_method_definition(&mut self) -> ParseResult<MethodDefinition> {
        self.expect(TokenKind::Def, "'def'")?;
        let method_name = self.expect_identifier("method name")?;
        self.expect(TokenKind::LParen, "'(' after method name")?;
        let parameters = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen, "')' after parameters")?;
        self.expect(TokenKind::Arrow, "'->' before return type")?;
        let return_type = self.parse_type()?.ok_or_else(|| self.error("expected return type"))?;
        let block = self.parse_block_statement()?;
        let body = match block {
            Statement::Block(stmts) => stmts,
            _ => unreachable!("parse_block_statement always returns Statement::Block"),
        };
        Ok(MethodDefinition {
            method_name,
            parameters,
            return_type,
            body,
        })
    }

    fn parse_field_definition(&mut self) -> ParseResult<FieldDefinition> {
        let name = self.expect_identifier("field name")?;
        self.expect(TokenKind::Colon, "':' after field name")?;
        let parsed_type = self.parse_type()?.ok_or_else(|| self.error("expected field type"))?;
        self.end_statement()?;
        Ok(FieldDefinition { name, parsed_type })
    }

    fn parse_class_definition(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Class, "'class'")?;
        let name = self.expect_identifier("class name")?;
        let generic_parameters = self.parse_type_parameter_list()?;
        self.expect(TokenKind::LBrace, "'{' after class name")?;
        self.skip_new_lines();
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.check(TokenKind::Def) {
                methods.push(self.parse_method_definition()?);
            } else {
                fields.push(self.parse_field_definition()?);
            }
            self.skip_new_lines();
        }
        self.expect(TokenKind::RBrace, "'}' after class body")?;
        Ok(Statement::ClassDefinition {
            name,
            generic_parameters,
            fields,
            methods,
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Return, "'return'")?;
        let value = if self.is_at_end() || self.check(TokenKind::Newline) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.end_statement()?;
        Ok(Statement::Return(value))
    }

    fn parse_defer_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Defer, "'defer'")?;
        let expr = self.parse_expression()?;
        self.end_statement()?;
        Ok(Statement::Defer(expr))
    }

    fn parse_extern_statement(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Extern, "'extern'")?;
        self.expect(TokenKind::Def, "'def' after 'extern'")?;
        let name = self.expect_identifier("function name")?;
        self.expect(TokenKind::LParen, "'(' after function name")?;
        let parameters = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen, "')' after parameters")?;
        self.expect(TokenKind::Arrow, "'->' before return type")?;
        let return_type = self.parse_type()?.ok_or_else(|| self.error("expected return type"))?;
        self.end_statement()?;
        Ok(Statement::Extern {
            name,
            parameters,
            return_type,
        })
    }

    /// Dispatches between variable declaration (`name : type = expr`), inferred
    /// declaration (`name := expr`), assignment (`lvalue = rvalue`, including the
    /// indexed-lvalue form), and a bare expression statement.
    fn parse_assignment_or_expression(&mut self) -> ParseResult<Statement> {
        if self.check(TokenKind::Identifier) {
            if self.peek_kind(1) == TokenKind::Colon {
                return self.parse_variable_declaration();
            }
            if self.peek_kind(1) == TokenKind::ColonEqual {
                return self.parse_inferred_declaration();
            }
        }

        let expr = self.parse_expression()?;
        if self.matches(TokenKind::Assign) {
            let rvalue = self.parse_expression()?;
            self.end_statement()?;
            return Ok(if matches!(expr.kind, ExpressionKind::IndexAccess { .. }) {
                Statement::IndexAssignment { lvalue: expr, rvalue }
            } else {
                Statement::Assignment { lvalue: expr, rvalue }
            });
        }
        self.end_statement()?;
        Ok(Statement::ExpressionStatement(expr))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Statement> {
        let name = self.expect_identifier("variable name")?;
        self.expect(TokenKind::Colon, "':' after variable name")?;
        let parsed_type = self.parse_type()?.ok_or_else(|| self.error("expected type after ':'"))?;
        self.expect(TokenKind::Assign, "'=' after variable type")?;
        let initializer = self.parse_expression()?;
        self.end_statement()?;
        Ok(Statement::VariableDeclaration {
            name,
            parsed_type: Some(parsed_type),
            initializer,
        })
    }

    fn parse_inferred_declaration(&mut self) -> ParseResult<Statement> {
        let name = self.expect_identifier("variable name")?;
        self.expect(TokenKind::ColonEqual, "':=' after variable name")?;
        let initializer = self.parse_expression()?;
        self.end_statement()?;
        Ok(Statement::VariableDeclaration {
            name,
            parsed_type: None,
            initializer,
        })
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    pub fn parse_type(&mut self) -> ParseResult<Option<ParsedType>> {
        let smart_pointer = match self.current().kind {
            TokenKind::Unique => {
                self.advance();
                SmartPointerKind::Unique
            }
            TokenKind::Shared => {
                self.advance();
                SmartPointerKind::Shared
            }
            TokenKind::Weak => {
                self.advance();
                SmartPointerKind::Weak
            }
            _ => SmartPointerKind::None,
        };

        let mut nesting_level = 0;
        let mut is_reference = false;
        let mut is_mut_reference = false;

        if self.check(TokenKind::Star) {
            while self.matches(TokenKind::Star) {
                nesting_level += 1;
            }
        } else if self.matches(TokenKind::Amp) {
            if self.matches(TokenKind::Mut) {
                is_mut_reference = true;
            } else {
                is_reference = true;
            }
        }

        let is_type_token = matches!(
            self.current().kind,
            TokenKind::Identifier
                | TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::DoubleType
                | TokenKind::BoolType
                | TokenKind::StrType
                | TokenKind::VoidType
                | TokenKind::Maybe
        );
        if !is_type_token {
            return Ok(None);
        }
        let primary = self.advance();
        let is_optional = primary.kind == TokenKind::Maybe;

        let mut type_parameters = Vec::new();
        if self.matches(TokenKind::LBracket) {
            if !self.check(TokenKind::RBracket) {
                loop {
                    type_parameters.push(self.advance());
                    if !self.matches(TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RBracket, "']' after type parameters")?;
        }

        Ok(Some(ParsedType {
            primary,
            type_parameters,
            nesting_level,
            is_pointer: nesting_level > 0,
            is_reference,
            is_mut_reference,
            is_optional,
            smart_pointer,
        }))
    }

    // ------------------------------------------------------------------
    // Expressions — precedence ladder, low to high
    // ------------------------------------------------------------------

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_logical_or()
    }

    fn parse_binary_left_assoc(
        &mut self,
        operand: impl Fn(&mut Self) -> ParseResult<Expression>,
        kinds: &[TokenKind],
    ) -> ParseResult<Expression> {
        let mut left = operand(self)?;
        while kinds.contains(&self.current().kind) {
            let operator = self.advance();
            let right = operand(self)?;
            let location = left.location.clone();
            left = Expression::new(
                ExpressionKind::Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                },
                location,
            );
        }
        Ok(left)
    }

    fn parse_logical_or(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_logical_and, &[TokenKind::OrOr])
    }

    fn parse_logical_and(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_equality, &[TokenKind::AndAnd])
    }

    fn parse_equality(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_comparison, &[TokenKind::EqualEqual, TokenKind::NotEqual])
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(
            Self::parse_bitwise_or,
            &[
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
            ],
        )
    }

    fn parse_bitwise_or(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_bitwise_xor, &[TokenKind::Pipe])
    }

    fn parse_bitwise_xor(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_bitwise_and, &[TokenKind::Caret])
    }

    fn parse_bitwise_and(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_term, &[TokenKind::Amp])
    }

    fn parse_term(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_factor, &[TokenKind::Plus, TokenKind::Minus])
    }

    fn parse_factor(&mut self) -> ParseResult<Expression> {
        self.parse_binary_left_assoc(Self::parse_unary, &[TokenKind::Star, TokenKind::Slash])
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        match self.current().kind {
            TokenKind::Bang | TokenKind::Minus | TokenKind::Star => {
                let operator = self.advance();
                let location = self.location(&operator);
                let operand = self.parse_unary()?;
                Ok(Expression::new(
                    ExpressionKind::Unary {
                        operator,
                        operand: Box::new(operand),
                    },
                    location,
                ))
            }
            TokenKind::Amp => {
                let mut operator = self.advance();
                let location = self.location(&operator);
                if self.matches(TokenKind::Mut) {
                    operator.lexeme = "&mut".to_string();
                }
                let operand = self.parse_unary()?;
                Ok(Expression::new(
                    ExpressionKind::Unary {
                        operator,
                        operand: Box::new(operand),
                    },
                    location,
                ))
            }
            TokenKind::Move => {
                let move_token = self.advance();
                let location = self.location(&move_token);
                let operand = self.parse_unary()?;
                Ok(Expression::new(
                    ExpressionKind::Move {
                        move_token,
                        operand: Box::new(operand),
                    },
                    location,
                ))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.matches(TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "']' after index expression")?;
                let location = expr.location.clone();
                expr = Expression::new(
                    ExpressionKind::IndexAccess {
                        array: Box::new(expr),
                        index: Box::new(index),
                    },
                    location,
                );
            } else if self.matches(TokenKind::Dot) {
                let member = self.expect_identifier("member name")?;
                let location = expr.location.clone();
                let (arguments, is_method_call) = if self.matches(TokenKind::LParen) {
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RParen, "')' after call arguments")?;
                    (args, true)
                } else {
                    (Vec::new(), false)
                };
                expr = Expression::new(
                    ExpressionKind::MemberAccess {
                        object: Box::new(expr),
                        member_name: member.lexeme,
                        arguments,
                        is_method_call,
                    },
                    location,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        let open = self.expect(TokenKind::LBracket, "'['")?;
        let location = self.location(&open);
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']' after array literal")?;
        Ok(Expression::new(ExpressionKind::ArrayLiteral(elements), location))
    }

    /// One-pass lookahead: scans from the current `[` to its matching `]` and reports
    /// whether a `(` immediately follows. Used to decide generic-instantiation vs.
    /// indexed-access without backtracking the whole expression.
    fn bracket_is_generic_instantiation(&self) -> bool {
        debug_assert_eq!(self.current().kind, TokenKind::LBracket);
        let mut depth = 0usize;
        let mut i = self.pos;
        loop {
            match self.tokens.get(i).map(|t| t.kind) {
                Some(TokenKind::LBracket) => depth += 1,
                Some(TokenKind::RBracket) => {
                    depth -= 1;
                    if depth == 0 {
                        return self.tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::LParen);
                    }
                }
                Some(TokenKind::Eof) | None => return false,
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_generic_instantiation(&mut self, class_name: Token) -> ParseResult<Expression> {
        let location = self.location(&class_name);
        self.expect(TokenKind::LBracket, "'[' in generic instantiation")?;
        let mut type_arguments = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                type_arguments.push(self.advance());
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']' after type arguments")?;
        self.expect(TokenKind::LParen, "'(' after generic type arguments")?;
        let arguments = self.parse_argument_list()?;
        self.expect(TokenKind::RParen, "')' after arguments")?;
        Ok(Expression::new(
            ExpressionKind::GenericInstantiation {
                class_name,
                type_arguments,
                arguments,
            },
            location,
        ))
    }

    fn parse_identifier_expression(&mut self) -> ParseResult<Expression> {
        let name_token = self.advance();
        let location = self.location(&name_token);

        if self.check(TokenKind::LBracket) && self.bracket_is_generic_instantiation() {
            return self.parse_generic_instantiation(name_token);
        }

        if self.matches(TokenKind::LParen) {
            let arguments = self.parse_argument_list()?;
            self.expect(TokenKind::RParen, "')' after call arguments")?;
            return Ok(Expression::new(
                ExpressionKind::FunctionCall {
                    name: name_token.lexeme,
                    type_arguments: Vec::new(),
                    arguments,
                },
                location,
            ));
        }

        Ok(Expression::new(ExpressionKind::Identifier(name_token.lexeme), location))
    }

    /// `new ClassName(args)` → `New(ObjectInstantiation)`; `new ClassName[T](args)` →
    /// `New(GenericInstantiation)`.
    fn parse_new_expression(&mut self) -> ParseResult<Expression> {
        let new_token = self.expect(TokenKind::New, "'new'")?;
        let location = self.location(&new_token);
        let class_name = self.expect_identifier("class name after 'new'")?;
        let inner = if self.check(TokenKind::LBracket) {
            self.parse_generic_instantiation(class_name)?
        } else {
            let inst_location = self.location(&class_name);
            self.expect(TokenKind::LParen, "'(' after class name")?;
            let arguments = self.parse_argument_list()?;
            self.expect(TokenKind::RParen, "')' after constructor arguments")?;
            Expression::new(
                ExpressionKind::ObjectInstantiation { class_name, arguments },
                inst_location,
            )
        };
        Ok(Expression::new(ExpressionKind::New { value: Box::new(inner) }, location))
    }

    fn parse_optional(&mut self) -> ParseResult<Expression> {
        let kind_token = self.advance();
        let location = self.location(&kind_token);
        let value = if kind_token.kind == TokenKind::Some {
            self.expect(TokenKind::LParen, "'(' after 'Some'")?;
            let inner = self.parse_expression()?;
            self.expect(TokenKind::RParen, "')' after 'Some' value")?;
            Some(Box::new(inner))
        } else {
            None
        };
        Ok(Expression::new(ExpressionKind::Optional { kind_token, value }, location))
    }

    fn parse_literal(&mut self) -> ParseResult<Expression> {
        let token = self.advance();
        let location = self.location(&token);
        Ok(Expression::new(ExpressionKind::Literal(token), location))
    }

    fn parse_parenthesized_expression(&mut self) -> ParseResult<Expression> {
        self.expect(TokenKind::LParen, "'('")?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.current().kind {
            TokenKind::Number | TokenKind::StringLit | TokenKind::True | TokenKind::False | TokenKind::Null => {
                self.parse_literal()
            }
            TokenKind::LParen => self.parse_parenthesized_expression(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::New => self.parse_new_expression(),
            TokenKind::Some | TokenKind::None => self.parse_optional(),
            TokenKind::Identifier | TokenKind::SelfKw => self.parse_identifier_expression(),
            _ => Err(self.error(&format!("unexpected token '{}'", self.current().lexeme))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_ast::pretty_printer::print_statement;
    use forge_lexer::Lexer;

    fn parse(source: &str) -> Statement {
        let tokens = Lexer::new(source).tokenize().unwrap();
        Parser::new(tokens, "test.fg").parse_program().unwrap()
    }

    fn first_stmt(source: &str) -> Statement {
        match parse(source) {
            Statement::Program(mut stmts) => stmts.remove(0),
            other => other,
        }
    }

    #[test]
    fn precedence_multiplication_binds_tighter_than_addition() {
        let stmt = first_stmt("2 + 3 * 4");
        let printed = print_statement(&stmt, 0);
        assert!(printed.contains("Binary(+)"));
        // the '*' subtree must appear nested under the '+' node, i.e. after it textually
        let plus_idx = printed.find("Binary(+)").unwrap();
        let star_idx = printed.find("Binary(*)").unwrap();
        assert!(star_idx > plus_idx);
    }

    #[test]
    fn comparison_is_lower_precedence_than_arithmetic() {
        let stmt = first_stmt("a + b == c * d");
        let printed = print_statement(&stmt, 0);
        assert!(printed.starts_with("ExpressionStatement:\n  Binary(==)"));
    }

    #[test]
    fn binary_operators_are_left_associative() {
        let stmt = first_stmt("a - b - c");
        let Statement::ExpressionStatement(expr) = stmt else { panic!() };
        let ExpressionKind::Binary { left, operator, .. } = &expr.kind else { panic!() };
        assert_eq!(operator.lexeme, "-");
        assert!(matches!(left.kind, ExpressionKind::Binary { .. }));
    }

    #[test]
    fn parses_variable_declaration_with_explicit_type() {
        let stmt = first_stmt("x: int = 2 + 3");
        match stmt {
            Statement::VariableDeclaration { name, parsed_type, .. } => {
                assert_eq!(name.lexeme, "x");
                assert!(parsed_type.is_some());
            }
            other => panic!("expected VariableDeclaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_inferred_declaration() {
        let stmt = first_stmt("y := 10");
        assert!(matches!(
            stmt,
            Statement::VariableDeclaration { parsed_type: None, .. }
        ));
    }

    #[test]
    fn parses_index_assignment() {
        let stmt = first_stmt("arr[0] = 5");
        assert!(matches!(stmt, Statement::IndexAssignment { .. }));
    }

    #[test]
    fn disambiguates_generic_instantiation_from_index_access() {
        let index = first_stmt("x := arr[0]");
        let generic = first_stmt("x := Vec[int](1, 2)");
        let Statement::VariableDeclaration { initializer: idx_init, .. } = index else { panic!() };
        let Statement::VariableDeclaration { initializer: gen_init, .. } = generic else { panic!() };
        assert!(matches!(idx_init.kind, ExpressionKind::IndexAccess { .. }));
        assert!(matches!(gen_init.kind, ExpressionKind::GenericInstantiation { .. }));
    }

    #[test]
    fn parses_new_object_instantiation() {
        let stmt = first_stmt("p: unique Player = new Player()");
        let Statement::VariableDeclaration { initializer, .. } = stmt else { panic!() };
        let ExpressionKind::New { value } = initializer.kind else { panic!() };
        assert!(matches!(value.kind, ExpressionKind::ObjectInstantiation { .. }));
    }

    #[test]
    fn parses_move_expression() {
        let stmt = first_stmt("q := move p");
        let Statement::VariableDeclaration { initializer, .. } = stmt else { panic!() };
        assert!(matches!(initializer.kind, ExpressionKind::Move { .. }));
    }

    #[test]
    fn parses_mut_reference_type_and_address_of() {
        let stmt = first_stmt("r: &mut int = &mut a");
        let Statement::VariableDeclaration { parsed_type, initializer, .. } = stmt else { panic!() };
        assert!(parsed_type.unwrap().is_mut_reference);
        let ExpressionKind::Unary { operator, .. } = initializer.kind else { panic!() };
        assert_eq!(operator.lexeme, "&mut");
    }

    #[test]
    fn parses_if_else_and_while() {
        let program = parse("if (x > 0) { y := 1 } else { y := 2 }\nwhile (x > 0) { x := x - 1 }");
        let Statement::Program(stmts) = program else { panic!() };
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0], Statement::If { .. }));
        assert!(matches!(stmts[1], Statement::While { .. }));
    }

    #[test]
    fn parses_function_definition() {
        let stmt = first_stmt("def add(a: int, b: int) -> int { return a + b }");
        match stmt {
            Statement::FunctionDefinition { name, parameters, .. } => {
                assert_eq!(name.lexeme, "add");
                assert_eq!(parameters.len(), 2);
            }
            other => panic!("expected FunctionDefinition, got {other:?}"),
        }
    }

    #[test]
    fn parses_class_with_fields_and_methods() {
        let stmt = first_stmt("class Player {\n  hp: int\n  def heal(amount: int) -> void { self }\n}");
        match stmt {
            Statement::ClassDefinition { fields, methods, .. } => {
                assert_eq!(fields.len(), 1);
                assert_eq!(methods.len(), 1);
            }
            other => panic!("expected ClassDefinition, got {other:?}"),
        }
    }

    #[test]
    fn parses_defer_and_extern() {
        let program = parse("defer close(x)\nextern def puts(s: str) -> void");
        let Statement::Program(stmts) = program else { panic!() };
        assert!(matches!(stmts[0], Statement::Defer(_)));
        assert!(matches!(stmts[1], Statement::Extern { .. }));
    }

    #[test]
    fn line_comment_is_invisible_to_the_parser() {
        let stmt = first_stmt("x := 1 // trailing comment");
        assert!(matches!(stmt, Statement::VariableDeclaration { .. }));
    }
}
