use std::collections::HashMap;

use forge_ast::{Expression, ExpressionKind, ParsedType, Statement, StatementParameter};
use forge_diagnostics::DiagnosticCollector;
use forge_lexer::{Token, TokenKind};

use crate::constant::{Constant, StackValueKind};
use crate::instruction::Instruction;
use crate::opcode::OpCode;
use crate::program::{CompiledFunction, CompiledProgram};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotInfo {
    slot: u32,
    kind: StackValueKind,
}

/// Lowers a checked program into a flat [`CompiledProgram`]. One pass: expressions
/// compile depth-first, pushing their result onto an implicit operand stack;
/// statements consume what their expressions push. `if`/`while` emit a forward jump
/// first and patch its operand once the jump target is known. Top-level declarations
/// are locals of an implicit top-level frame rather than a distinct global scope:
/// `locals`/`next_local_slot` hold that frame's slots until `compile_function_definition`
/// swaps in a fresh set for the duration of a function body.
#[derive(Default)]
pub struct BytecodeCompiler {
    instructions: Vec<Instruction>,
    constants: Vec<Constant>,
    strings: Vec<String>,
    string_ids: HashMap<String, usize>,

    locals: HashMap<String, SlotInfo>,
    next_local_slot: u32,

    functions: HashMap<String, u32>,
    function_pool: Vec<CompiledFunction>,
}

impl BytecodeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&mut self, ast: &Statement, diagnostics: &mut DiagnosticCollector) -> CompiledProgram {
        self.instructions.clear();
        self.constants.clear();
        self.strings.clear();
        self.string_ids.clear();
        self.locals.clear();
        self.next_local_slot = 0;
        self.functions.clear();
        self.function_pool.clear();

        match ast {
            Statement::Program(stmts) => self.compile_program(stmts, diagnostics),
            other => {
                self.compile_statement(other, diagnostics);
                self.emit(OpCode::Halt, 0);
            }
        }

        CompiledProgram {
            instructions: std::mem::take(&mut self.instructions),
            constants: std::mem::take(&mut self.constants),
            strings: std::mem::take(&mut self.strings),
            functions: std::mem::take(&mut self.function_pool),
        }
    }

    fn compile_program(&mut self, stmts: &[Statement], diagnostics: &mut DiagnosticCollector) {
        let jump_over_functions = self.instructions.len();
        self.emit(OpCode::Jump, 0);

        for stmt in stmts {
            if let Statement::FunctionDefinition { name, parameters, body, .. } = stmt {
                self.compile_function_definition(name, parameters, body, diagnostics);
            }
        }
        self.patch(jump_over_functions, self.instructions.len() as i32);

        for stmt in stmts {
            if !matches!(stmt, Statement::FunctionDefinition { .. }) {
                self.compile_statement(stmt, diagnostics);
            }
        }
        self.emit(OpCode::Halt, 0);
    }

    // ------------------------------------------------------------------
    // Pools
    // ------------------------------------------------------------------

    fn emit(&mut self, opcode: OpCode, operand: i32) -> usize {
        self.instructions.push(Instruction::new(opcode, operand));
        self.instructions.len() - 1
    }

    fn patch(&mut self, pos: usize, operand: i32) {
        self.instructions[pos].operand = operand;
    }

    fn add_constant(&mut self, value: Constant) -> i32 {
        self.constants.push(value);
        (self.constants.len() - 1) as i32
    }

    fn intern_string(&mut self, value: &str) -> i32 {
        if let Some(&id) = self.string_ids.get(value) {
            return id as i32;
        }
        let id = self.strings.len();
        self.strings.push(value.to_string());
        self.string_ids.insert(value.to_string(), id);
        id as i32
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn compile_statement(&mut self, stmt: &Statement, diagnostics: &mut DiagnosticCollector) {
        match stmt {
            Statement::Program(stmts) | Statement::Block(stmts) => {
                for s in stmts {
                    self.compile_statement(s, diagnostics);
                }
            }
            Statement::ExpressionStatement(expr) => {
                self.compile_expression(expr, diagnostics);
            }
            Statement::VariableDeclaration { name, parsed_type, initializer } => {
                self.compile_variable_declaration(name, parsed_type.as_ref(), initializer, diagnostics);
            }
            Statement::Assignment { lvalue, rvalue } => {
                self.compile_assignment(lvalue, rvalue, diagnostics);
            }
            Statement::IndexAssignment { .. } => {
                diagnostics.report_codegen_error(
                    "indexed assignment is not yet supported in bytecode compilation",
                    stmt_location(stmt),
                );
            }
            Statement::If { condition, then_block, else_block } => {
                self.compile_if_statement(condition, then_block, else_block.as_deref(), diagnostics);
            }
            Statement::While { condition, body } => {
                self.compile_while_statement(condition, body, diagnostics);
            }
            Statement::FunctionDefinition { .. } => {
                diagnostics.report_codegen_error("nested function definitions are not supported", stmt_location(stmt));
            }
            Statement::Return(expr) => self.compile_return_statement(expr.as_ref(), diagnostics),
            Statement::Defer(expr) => {
                self.compile_expression(expr, diagnostics);
            }
            Statement::MethodDefinition(_) | Statement::FieldDefinition(_) | Statement::ClassDefinition { .. } | Statement::Extern { .. } => {
                diagnostics.report_codegen_error("classes are not yet supported in bytecode compilation", stmt_location(stmt));
            }
        }
    }

    fn compile_variable_declaration(
        &mut self,
        name: &Token,
        parsed_type: Option<&ParsedType>,
        initializer: &Expression,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let Some(kind) = self.compile_expression(initializer, diagnostics) else {
            return;
        };
        let declared_kind = parsed_type.and_then(parsed_type_to_kind).unwrap_or(kind);
        self.declare(&name.lexeme, declared_kind);
    }

    fn declare(&mut self, name: &str, kind: StackValueKind) {
        let slot = self.next_local_slot;
        self.next_local_slot += 1;
        self.locals.insert(name.to_string(), SlotInfo { slot, kind });
        self.emit(OpCode::StoreLocal, slot as i32);
    }

    fn compile_assignment(&mut self, lvalue: &Expression, rvalue: &Expression, diagnostics: &mut DiagnosticCollector) {
        let ExpressionKind::Identifier(name) = &lvalue.kind else {
            diagnostics.report_codegen_error("left-hand side of assignment must be a plain name", lvalue.location.clone());
            return;
        };
        if self.compile_expression(rvalue, diagnostics).is_none() {
            return;
        }
        if let Some(info) = self.locals.get(name).copied() {
            self.emit(OpCode::StoreLocal, info.slot as i32);
        } else {
            diagnostics.report_codegen_error(format!("undefined variable '{name}'"), lvalue.location.clone());
        }
    }

    fn compile_if_statement(
        &mut self,
        condition: &Expression,
        then_block: &Statement,
        else_block: Option<&Statement>,
        diagnostics: &mut DiagnosticCollector,
    ) {
        self.compile_expression(condition, diagnostics);
        let jump_if_false = self.emit(OpCode::JumpIfFalse, 0);
        self.compile_statement(then_block, diagnostics);

        if let Some(else_block) = else_block {
            let jump_to_end = self.emit(OpCode::Jump, 0);
            self.patch(jump_if_false, self.instructions.len() as i32);
            self.compile_statement(else_block, diagnostics);
            self.patch(jump_to_end, self.instructions.len() as i32);
        } else {
            self.patch(jump_if_false, self.instructions.len() as i32);
        }
    }

    fn compile_while_statement(&mut self, condition: &Expression, body: &Statement, diagnostics: &mut DiagnosticCollector) {
        let loop_start = self.instructions.len() as i32;
        self.compile_expression(condition, diagnostics);
        let jump_if_false = self.emit(OpCode::JumpIfFalse, 0);
        self.compile_statement(body, diagnostics);
        self.emit(OpCode::Jump, loop_start);
        self.patch(jump_if_false, self.instructions.len() as i32);
    }

    fn compile_return_statement(&mut self, expr: Option<&Expression>, diagnostics: &mut DiagnosticCollector) {
        match expr {
            Some(expr) => {
                self.compile_expression(expr, diagnostics);
            }
            None => {
                let idx = self.add_constant(Constant::Int(0));
                self.emit(OpCode::LoadInt, idx);
            }
        }
        self.emit(OpCode::Return, 0);
    }

    fn compile_function_definition(
        &mut self,
        name: &Token,
        parameters: &[StatementParameter],
        body: &Statement,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let saved_locals = std::mem::take(&mut self.locals);
        let saved_slot = self.next_local_slot;
        self.next_local_slot = 0;

        let entry_address = self.instructions.len() as u32;
        for param in parameters {
            let kind = parsed_type_to_kind(&param.parsed_type).unwrap_or(StackValueKind::Int);
            let slot = self.next_local_slot;
            self.next_local_slot += 1;
            self.locals.insert(param.name.lexeme.clone(), SlotInfo { slot, kind });
        }

        self.compile_statement(body, diagnostics);

        let fallback_zero = self.add_constant(Constant::Int(0));
        self.emit(OpCode::LoadInt, fallback_zero);
        self.emit(OpCode::Return, 0);

        let local_count = self.next_local_slot;
        self.function_pool.push(CompiledFunction {
            name: name.lexeme.clone(),
            entry_address,
            param_count: parameters.len() as u32,
            local_count,
        });
        self.functions.insert(name.lexeme.clone(), (self.function_pool.len() - 1) as u32);

        self.locals = saved_locals;
        self.next_local_slot = saved_slot;
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn compile_expression(&mut self, expr: &Expression, diagnostics: &mut DiagnosticCollector) -> Option<StackValueKind> {
        match &expr.kind {
            ExpressionKind::Literal(token) => self.compile_literal(token, diagnostics),
            ExpressionKind::Binary { left, operator, right } => self.compile_binary(left, operator, right, expr, diagnostics),
            ExpressionKind::Unary { operator, operand } => self.compile_unary(operator, operand, expr, diagnostics),
            ExpressionKind::Identifier(name) => self.compile_identifier(name, expr, diagnostics),
            ExpressionKind::FunctionCall { name, arguments, .. } => self.compile_function_call(name, arguments, expr, diagnostics),
            ExpressionKind::ArrayLiteral(_)
            | ExpressionKind::IndexAccess { .. }
            | ExpressionKind::MemberAccess { .. }
            | ExpressionKind::ObjectInstantiation { .. }
            | ExpressionKind::GenericInstantiation { .. }
            | ExpressionKind::Move { .. }
            | ExpressionKind::New { .. }
            | ExpressionKind::Optional { .. } => {
                diagnostics.report_codegen_error(
                    "this expression form is not yet supported in bytecode compilation",
                    expr.location.clone(),
                );
                None
            }
        }
    }

    fn compile_literal(&mut self, token: &Token, diagnostics: &mut DiagnosticCollector) -> Option<StackValueKind> {
        match token.kind {
            TokenKind::Number => {
                let kind = numeric_literal_kind(&token.lexeme);
                match kind {
                    StackValueKind::Int => {
                        let v: i32 = token.lexeme.parse().unwrap_or(0);
                        let idx = self.add_constant(Constant::Int(v));
                        self.emit(OpCode::LoadInt, idx);
                    }
                    StackValueKind::Float => {
                        let trimmed = token.lexeme.trim_end_matches('f');
                        let v: f32 = trimmed.parse().unwrap_or(0.0);
                        let idx = self.add_constant(Constant::Float(v));
                        self.emit(OpCode::LoadFloat, idx);
                    }
                    StackValueKind::Double => {
                        let v: f64 = token.lexeme.parse().unwrap_or(0.0);
                        let idx = self.add_constant(Constant::Double(v));
                        self.emit(OpCode::LoadDouble, idx);
                    }
                    _ => unreachable!("numeric literals only classify as Int/Float/Double"),
                }
                Some(kind)
            }
            TokenKind::True | TokenKind::False => {
                let idx = self.add_constant(Constant::Bool(token.kind == TokenKind::True));
                self.emit(OpCode::LoadBool, idx);
                Some(StackValueKind::Bool)
            }
            TokenKind::StringLit => {
                let id = self.intern_string(&token.lexeme);
                self.emit(OpCode::LoadString, id);
                Some(StackValueKind::Str)
            }
            _ => {
                diagnostics.report_codegen_error(format!("cannot compile literal '{}'", token.lexeme), token.to_source_location(""));
                None
            }
        }
    }

    fn compile_binary(
        &mut self,
        left: &Expression,
        operator: &Token,
        right: &Expression,
        expr: &Expression,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<StackValueKind> {
        let left_kind = self.compile_expression(left, diagnostics)?;
        let right_kind = self.compile_expression(right, diagnostics)?;

        if left_kind != right_kind {
            diagnostics.report_codegen_error("type mismatch in binary operation", expr.location.clone());
            return None;
        }

        if operator.kind == TokenKind::NotEqual {
            let eq = binary_opcode(TokenKind::EqualEqual, left_kind)?;
            self.emit(eq, 0);
            self.emit(OpCode::NotBool, 0);
            return Some(StackValueKind::Bool);
        }

        let opcode = binary_opcode(operator.kind, left_kind);
        let Some(opcode) = opcode else {
            diagnostics.report_codegen_error(
                format!("operator '{}' is not supported for this operand type", operator.lexeme),
                expr.location.clone(),
            );
            return None;
        };
        self.emit(opcode, 0);
        Some(result_kind(operator.kind, left_kind))
    }

    fn compile_unary(
        &mut self,
        operator: &Token,
        operand: &Expression,
        expr: &Expression,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<StackValueKind> {
        match operator.kind {
            TokenKind::Minus => {
                let kind = self.compile_expression(operand, diagnostics)?;
                let opcode = match kind {
                    StackValueKind::Int => OpCode::NegInt,
                    StackValueKind::Float => OpCode::NegFloat,
                    StackValueKind::Double => OpCode::NegDouble,
                    _ => {
                        diagnostics.report_codegen_error("unary '-' requires a numeric operand", expr.location.clone());
                        return None;
                    }
                };
                self.emit(opcode, 0);
                Some(kind)
            }
            TokenKind::Bang => {
                let kind = self.compile_expression(operand, diagnostics)?;
                if kind != StackValueKind::Bool {
                    diagnostics.report_codegen_error("unary '!' requires a bool operand", expr.location.clone());
                    return None;
                }
                self.emit(OpCode::NotBool, 0);
                Some(StackValueKind::Bool)
            }
            _ => {
                diagnostics.report_codegen_error(
                    "address-of and dereference have no bytecode representation; they are resolved at the ownership-checking stage",
                    expr.location.clone(),
                );
                None
            }
        }
    }

    fn compile_identifier(&mut self, name: &str, expr: &Expression, diagnostics: &mut DiagnosticCollector) -> Option<StackValueKind> {
        if let Some(info) = self.locals.get(name).copied() {
            self.emit(OpCode::LoadLocal, info.slot as i32);
            return Some(info.kind);
        }
        diagnostics.report_codegen_error(format!("undefined variable '{name}'"), expr.location.clone());
        None
    }

    fn compile_function_call(
        &mut self,
        name: &str,
        arguments: &[Expression],
        expr: &Expression,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<StackValueKind> {
        let Some(&index) = self.functions.get(name) else {
            diagnostics.report_codegen_error(format!("undefined function '{name}'"), expr.location.clone());
            return None;
        };
        let meta = self.function_pool[index as usize].clone();
        if arguments.len() as u32 != meta.param_count {
            diagnostics.report_codegen_error(
                format!("'{name}' expects {} argument(s), got {}", meta.param_count, arguments.len()),
                expr.location.clone(),
            );
            return None;
        }
        for arg in arguments {
            self.compile_expression(arg, diagnostics)?;
        }
        self.emit(OpCode::Call, index as i32);
        Some(StackValueKind::Int)
    }
}

fn stmt_location(stmt: &Statement) -> forge_diagnostics::SourceLocation {
    match stmt {
        Statement::ExpressionStatement(e) => e.location.clone(),
        Statement::VariableDeclaration { name, .. } => name.to_source_location(""),
        Statement::Assignment { lvalue, .. } | Statement::IndexAssignment { lvalue, .. } => lvalue.location.clone(),
        Statement::If { condition, .. } => condition.location.clone(),
        Statement::While { condition, .. } => condition.location.clone(),
        Statement::FunctionDefinition { name, .. } => name.to_source_location(""),
        Statement::MethodDefinition(m) => m.method_name.to_source_location(""),
        Statement::FieldDefinition(f) => f.name.to_source_location(""),
        Statement::ClassDefinition { name, .. } => name.to_source_location(""),
        Statement::Return(Some(e)) => e.location.clone(),
        Statement::Defer(e) => e.location.clone(),
        Statement::Extern { name, .. } => name.to_source_location(""),
        Statement::Program(_) | Statement::Block(_) | Statement::Return(None) => forge_diagnostics::SourceLocation::default(),
    }
}

fn parsed_type_to_kind(parsed: &ParsedType) -> Option<StackValueKind> {
    match parsed.primary.kind {
        TokenKind::IntType => Some(StackValueKind::Int),
        TokenKind::FloatType => Some(StackValueKind::Float),
        TokenKind::DoubleType => Some(StackValueKind::Double),
        TokenKind::BoolType => Some(StackValueKind::Bool),
        TokenKind::StrType => Some(StackValueKind::Str),
        _ => None,
    }
}

fn numeric_literal_kind(lexeme: &str) -> StackValueKind {
    if lexeme.ends_with('f') {
        StackValueKind::Float
    } else if lexeme.contains('.') || lexeme.contains('e') || lexeme.contains('E') {
        StackValueKind::Double
    } else {
        StackValueKind::Int
    }
}

fn binary_opcode(op: TokenKind, kind: StackValueKind) -> Option<OpCode> {
    use StackValueKind::*;
    use TokenKind::*;
    Some(match (op, kind) {
        (Plus, Int) => OpCode::AddInt,
        (Plus, Float) => OpCode::AddFloat,
        (Plus, Double) => OpCode::AddDouble,
        (Plus, Str) => OpCode::AddString,
        (Minus, Int) => OpCode::SubInt,
        (Minus, Float) => OpCode::SubFloat,
        (Minus, Double) => OpCode::SubDouble,
        (Star, Int) => OpCode::MultInt,
        (Star, Float) => OpCode::MultFloat,
        (Star, Double) => OpCode::MultDouble,
        (Slash, Int) => OpCode::DivInt,
        (Slash, Float) => OpCode::DivFloat,
        (Slash, Double) => OpCode::DivDouble,
        (EqualEqual, Int) => OpCode::EqInt,
        (EqualEqual, Float) => OpCode::EqFloat,
        (EqualEqual, Double) => OpCode::EqDouble,
        (EqualEqual, Bool) => OpCode::EqBool,
        (EqualEqual, Str) => OpCode::EqString,
        (Less, Int) => OpCode::LtInt,
        (Less, Float) => OpCode::LtFloat,
        (Less, Double) => OpCode::LtDouble,
        (Greater, Int) => OpCode::GtInt,
        (Greater, Float) => OpCode::GtFloat,
        (Greater, Double) => OpCode::GtDouble,
        (GreaterEqual, Int) => OpCode::GeqInt,
        (GreaterEqual, Float) => OpCode::GeqFloat,
        (GreaterEqual, Double) => OpCode::GeqDouble,
        (LessEqual, Int) => OpCode::LeqInt,
        (LessEqual, Float) => OpCode::LeqFloat,
        (LessEqual, Double) => OpCode::LeqDouble,
        (Amp, Int) => OpCode::BitwiseAndInt,
        (Amp, Bool) => OpCode::BitwiseAndBool,
        (Pipe, Int) => OpCode::BitwiseOrInt,
        (Pipe, Bool) => OpCode::BitwiseOrBool,
        (Caret, Int) => OpCode::BitwiseXorInt,
        (Caret, Bool) => OpCode::BitwiseXorBool,
        (AndAnd, Bool) => OpCode::BitwiseAndBool,
        (OrOr, Bool) => OpCode::BitwiseOrBool,
        _ => return None,
    })
}

fn result_kind(op: TokenKind, operand_kind: StackValueKind) -> StackValueKind {
    use TokenKind::*;
    match op {
        EqualEqual | Less | Greater | GreaterEqual | LessEqual | AndAnd | OrOr => StackValueKind::Bool,
        _ => operand_kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_diagnostics::DiagnosticCollector;
    use forge_lexer::Lexer;
    use forge_parser::Parser;

    fn compile(source: &str) -> (CompiledProgram, DiagnosticCollector) {
        let tokens = Lexer::new(source).tokenize().expect("lex failure");
        let program = Parser::new(tokens, "test.fg").parse_program().expect("parse failure");
        let mut diagnostics = DiagnosticCollector::new();
        let compiled = BytecodeCompiler::new().compile(&program, &mut diagnostics);
        (compiled, diagnostics)
    }

    #[test]
    fn compiles_arithmetic_to_typed_opcodes() {
        let (program, mut diagnostics) = compile("x := 1 + 2");
        assert!(!diagnostics.has_errors());
        assert!(program.instructions.iter().any(|i| i.opcode == OpCode::AddInt));
        assert_eq!(program.instructions.last().unwrap().opcode, OpCode::Halt);
    }

    #[test]
    fn if_without_else_patches_jump_to_fallthrough() {
        let (program, mut diagnostics) = compile("x := 1\nif (x > 0) { y := 2 }");
        assert!(!diagnostics.has_errors());
        let jump_if_false = program
            .instructions
            .iter()
            .find(|i| i.opcode == OpCode::JumpIfFalse)
            .expect("a JumpIfFalse was emitted");
        assert!((jump_if_false.operand as usize) <= program.instructions.len());
    }

    #[test]
    fn while_loop_jumps_backward_to_condition() {
        let (program, mut diagnostics) = compile("x := 0\nwhile (x < 3) { x := x + 1 }");
        assert!(!diagnostics.has_errors());
        let back_jump = program.instructions.iter().find(|i| i.opcode == OpCode::Jump).unwrap();
        assert!(back_jump.operand >= 0);
    }

    #[test]
    fn string_literals_intern_idempotently() {
        let (program, mut diagnostics) = compile("a := \"hi\"\nb := \"hi\"");
        assert!(!diagnostics.has_errors());
        assert_eq!(program.strings.len(), 1);
    }

    #[test]
    fn function_definition_and_call_compile_with_frame_metadata() {
        let (program, mut diagnostics) = compile("def add(a: int, b: int) -> int { return a + b }\nr := add(1, 2)");
        assert!(!diagnostics.has_errors());
        assert_eq!(program.functions.len(), 1);
        assert_eq!(program.functions[0].param_count, 2);
        assert!(program.instructions.iter().any(|i| i.opcode == OpCode::Call));
    }
}
