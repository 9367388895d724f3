use forge_ast::{Expression, ExpressionKind, Statement, StatementParameter};
use forge_diagnostics::{BorrowErrorKind, DiagnosticCollector};
use forge_types::{Lifetime, PointerKind, Symbol, SymbolTable, Type, TypeChecker};

use crate::memory_model::MemoryModel;

/// Walks a program's AST enforcing ownership, borrow, and move rules. Declares each
/// binding into both a [`SymbolTable`] (for type lookups) and a [`MemoryModel`] (for
/// ownership/borrow state) as it goes, the way the checker pairs type inference with
/// borrow enforcement in a single pass rather than two separate tree walks.
pub struct BorrowChecker {
    memory: MemoryModel,
    file: String,
}

impl BorrowChecker {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            memory: MemoryModel::new(),
            file: file.into(),
        }
    }

    pub fn memory_model(&self) -> &MemoryModel {
        &self.memory
    }

    pub fn analyze_program(
        &mut self,
        program: &Statement,
        symbols: &mut SymbolTable,
        types: &TypeChecker,
        diagnostics: &mut DiagnosticCollector,
    ) {
        self.analyze_statement(program, symbols, types, diagnostics);
    }

    fn analyze_statement(
        &mut self,
        stmt: &Statement,
        symbols: &mut SymbolTable,
        types: &TypeChecker,
        diagnostics: &mut DiagnosticCollector,
    ) {
        match stmt {
            Statement::Program(stmts) | Statement::Block(stmts) => {
                for s in stmts {
                    self.analyze_statement(s, symbols, types, diagnostics);
                }
            }
            Statement::ExpressionStatement(expr) => self.analyze_expression(expr, symbols, diagnostics),
            Statement::VariableDeclaration { name, parsed_type, initializer } => {
                self.analyze_variable_declaration(name, parsed_type.as_ref(), initializer, symbols, types, diagnostics);
            }
            Statement::Assignment { lvalue, rvalue } | Statement::IndexAssignment { lvalue, rvalue } => {
                self.analyze_assignment(lvalue, rvalue, symbols, diagnostics);
            }
            Statement::If { condition, then_block, else_block } => {
                self.analyze_expression(condition, symbols, diagnostics);
                self.analyze_statement(then_block, symbols, types, diagnostics);
                if let Some(else_block) = else_block {
                    self.analyze_statement(else_block, symbols, types, diagnostics);
                }
            }
            Statement::While { condition, body } => {
                self.analyze_expression(condition, symbols, diagnostics);
                self.analyze_statement(body, symbols, types, diagnostics);
            }
            Statement::FunctionDefinition { name, parameters, return_type, body, .. } => {
                self.declare_function(name, parameters, return_type, symbols, types, diagnostics);
                self.analyze_function_body(parameters, body, symbols, types, diagnostics);
            }
            Statement::MethodDefinition(method) => {
                symbols.enter_scope();
                self.declare_parameters(&method.parameters, symbols, types, diagnostics);
                for s in &method.body {
                    self.analyze_statement(s, symbols, types, diagnostics);
                }
                self.release_scope_borrows(symbols, diagnostics);
                symbols.exit_scope();
            }
            Statement::ClassDefinition { methods, .. } => {
                for method in methods {
                    self.analyze_statement(&Statement::MethodDefinition(method.clone()), symbols, types, diagnostics);
                }
            }
            Statement::Return(Some(expr)) => self.analyze_expression(expr, symbols, diagnostics),
            Statement::Return(None) => {}
            Statement::Defer(expr) => self.analyze_expression(expr, symbols, diagnostics),
            Statement::FieldDefinition(_) | Statement::Extern { .. } => {}
        }
    }

    fn analyze_function_body(
        &mut self,
        parameters: &[StatementParameter],
        body: &Statement,
        symbols: &mut SymbolTable,
        types: &TypeChecker,
        diagnostics: &mut DiagnosticCollector,
    ) {
        symbols.enter_scope();
        self.declare_parameters(parameters, symbols, types, diagnostics);
        self.analyze_statement(body, symbols, types, diagnostics);
        self.release_scope_borrows(symbols, diagnostics);
        symbols.exit_scope();
    }

    /// Releases every borrow taken by a binding declared in the current scope, before
    /// that scope is popped.
    fn release_scope_borrows(&mut self, symbols: &SymbolTable, diagnostics: &mut DiagnosticCollector) {
        for symbol in symbols.symbols_in_current_scope() {
            for target in self.memory.borrowed_targets_of(&symbol.name) {
                self.memory.end_borrow(&target, symbol.declaration.clone(), diagnostics);
            }
        }
    }

    /// Declares a function's own name into the enclosing scope as a `Type::Function`,
    /// so later calls to it can be looked up the same way a variable is. Declared
    /// before the body is walked so the function can call itself.
    fn declare_function(
        &mut self,
        name: &forge_lexer::Token,
        parameters: &[StatementParameter],
        return_type: &forge_ast::ParsedType,
        symbols: &mut SymbolTable,
        types: &TypeChecker,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let parameter_types: Vec<Type> = parameters
            .iter()
            .filter_map(|param| types.analyze_type(&param.parsed_type, diagnostics))
            .collect();
        if parameter_types.len() != parameters.len() {
            return;
        }
        let Some(return_type) = types.analyze_type(return_type, diagnostics) else {
            return;
        };
        let location = name.to_source_location(&self.file);
        let ty = Type::Function {
            return_type: Box::new(return_type),
            parameters: parameter_types,
            is_variadic: false,
        };
        let symbol = Symbol::new(name.lexeme.clone(), ty, Lifetime::Static, location.clone());
        if symbols.declare(symbol).is_err() {
            diagnostics.report_type_error(format!("redeclaration of function '{}'", name.lexeme), location);
        }
    }

    fn declare_parameters(
        &mut self,
        parameters: &[StatementParameter],
        symbols: &mut SymbolTable,
        types: &TypeChecker,
        diagnostics: &mut DiagnosticCollector,
    ) {
        for param in parameters {
            let Some(ty) = types.analyze_type(&param.parsed_type, diagnostics) else {
                continue;
            };
            let location = param.name.to_source_location(&self.file);
            let symbol = Symbol::new(param.name.lexeme.clone(), ty.clone(), Lifetime::Function, location.clone());
            if symbols.declare(symbol).is_err() {
                diagnostics.report_type_error(format!("redeclaration of parameter '{}'", param.name.lexeme), location.clone());
            }
            self.memory.register_variable(param.name.lexeme.clone(), ty, Lifetime::Function, location);
        }
    }

    fn analyze_variable_declaration(
        &mut self,
        name: &forge_lexer::Token,
        parsed_type: Option<&forge_ast::ParsedType>,
        initializer: &Expression,
        symbols: &mut SymbolTable,
        types: &TypeChecker,
        diagnostics: &mut DiagnosticCollector,
    ) {
        self.analyze_expression(initializer, symbols, diagnostics);

        let ty = match parsed_type {
            Some(parsed) => types.analyze_type(parsed, diagnostics),
            None => types.infer_expression_type(initializer, symbols, diagnostics),
        };
        let Some(ty) = ty else {
            return;
        };

        let location = name.to_source_location(&self.file);
        let symbol = Symbol::new(name.lexeme.clone(), ty.clone(), Lifetime::Block, location.clone());
        if symbols.declare(symbol).is_err() {
            diagnostics.report_type_error(format!("redeclaration of '{}'", name.lexeme), location.clone());
        }
        self.memory.register_variable(name.lexeme.clone(), ty, Lifetime::Block, location.clone());

        if let ExpressionKind::Unary { operator, operand } = &initializer.kind {
            if operator.lexeme.starts_with('&') {
                if let ExpressionKind::Identifier(target) = &operand.kind {
                    let is_mutable = operator.lexeme == "&mut";
                    self.memory
                        .register_borrow(target, name.lexeme.clone(), is_mutable, location, diagnostics);
                }
            }
        }
    }

    fn analyze_assignment(&mut self, lvalue: &Expression, rvalue: &Expression, symbols: &SymbolTable, diagnostics: &mut DiagnosticCollector) {
        self.analyze_expression(rvalue, symbols, diagnostics);
        self.analyze_expression(lvalue, symbols, diagnostics);

        if let ExpressionKind::Identifier(lhs_name) = &lvalue.kind {
            if let ExpressionKind::Unary { operator, operand } = &rvalue.kind {
                if operator.lexeme.starts_with('&') {
                    if let ExpressionKind::Identifier(target) = &operand.kind {
                        let is_mutable = operator.lexeme == "&mut";
                        self.memory.register_borrow(
                            target,
                            lhs_name.clone(),
                            is_mutable,
                            lvalue.location.clone(),
                            diagnostics,
                        );
                    }
                }
            }
        }
    }

    fn analyze_expression(&mut self, expr: &Expression, symbols: &SymbolTable, diagnostics: &mut DiagnosticCollector) {
        match &expr.kind {
            ExpressionKind::Literal(_) => {}
            ExpressionKind::Identifier(name) => {
                self.memory.check_use(name, expr.location.clone(), diagnostics);
            }
            ExpressionKind::ArrayLiteral(elements) => {
                for element in elements {
                    self.analyze_expression(element, symbols, diagnostics);
                }
            }
            ExpressionKind::IndexAccess { array, index } => {
                self.analyze_expression(array, symbols, diagnostics);
                self.analyze_expression(index, symbols, diagnostics);
            }
            ExpressionKind::MemberAccess { object, arguments, .. } => {
                self.analyze_expression(object, symbols, diagnostics);
                for arg in arguments {
                    self.analyze_expression(arg, symbols, diagnostics);
                }
            }
            ExpressionKind::Binary { left, right, .. } => {
                self.analyze_expression(left, symbols, diagnostics);
                self.analyze_expression(right, symbols, diagnostics);
            }
            ExpressionKind::Unary { operand, .. } => {
                self.analyze_expression(operand, symbols, diagnostics);
            }
            ExpressionKind::FunctionCall { name, arguments, .. } => {
                self.validate_call_argument_ownership(name, arguments, symbols, diagnostics);
                for arg in arguments {
                    self.analyze_expression(arg, symbols, diagnostics);
                }
            }
            ExpressionKind::ObjectInstantiation { arguments, .. } | ExpressionKind::GenericInstantiation { arguments, .. } => {
                for arg in arguments {
                    self.analyze_expression(arg, symbols, diagnostics);
                }
            }
            ExpressionKind::Move { operand, .. } => match &operand.kind {
                ExpressionKind::Identifier(name) => {
                    self.memory.register_move(name, expr.location.clone(), diagnostics);
                }
                _ => self.analyze_expression(operand, symbols, diagnostics),
            },
            ExpressionKind::New { value } => self.analyze_expression(value, symbols, diagnostics),
            ExpressionKind::Optional { value, .. } => {
                if let Some(value) = value {
                    self.analyze_expression(value, symbols, diagnostics);
                }
            }
        }
    }

    /// Matches each argument's ownership characteristics against the callee's
    /// declared parameter: a `unique` parameter takes ownership, so the argument
    /// must hand it off with `move`, not pass the binding by its bare name.
    fn validate_call_argument_ownership(
        &mut self,
        name: &str,
        arguments: &[Expression],
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) {
        let Some(symbol) = symbols.lookup(name) else {
            return;
        };
        let Type::Function { parameters, .. } = &symbol.ty else {
            return;
        };

        for (param, arg) in parameters.iter().zip(arguments) {
            let Type::SmartPointer { kind: PointerKind::Unique, .. } = param else {
                continue;
            };
            let ExpressionKind::Identifier(arg_name) = &arg.kind else {
                continue;
            };
            diagnostics.report_borrow_error(
                BorrowErrorKind::InvalidBorrow,
                format!("'{arg_name}' must be moved into '{name}': the parameter takes unique ownership"),
                arg.location.clone(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_diagnostics::BorrowErrorKind;
    use forge_lexer::Lexer;
    use forge_parser::Parser;

    fn check(source: &str) -> (BorrowChecker, DiagnosticCollector) {
        let tokens = Lexer::new(source).tokenize().expect("lex failure");
        let program = Parser::new(tokens, "test.fg").parse_program().expect("parse failure");
        let mut symbols = SymbolTable::new();
        let types = TypeChecker::new();
        let mut diagnostics = DiagnosticCollector::new();
        let mut checker = BorrowChecker::new("test.fg");
        checker.analyze_program(&program, &mut symbols, &types, &mut diagnostics);
        (checker, diagnostics)
    }

    #[test]
    fn move_then_use_reports_use_after_move() {
        let (_, mut diagnostics) = check("p: unique Player = new Player()\nq := move p\nuse(p)");
        assert!(diagnostics.has_errors());
        let found = diagnostics
            .diagnostics()
            .iter()
            .any(|d| matches!(d, forge_diagnostics::Diagnostic::Borrow(e) if e.kind == BorrowErrorKind::UseAfterMove));
        assert!(found);
    }

    #[test]
    fn mutable_borrow_while_immutable_borrow_active_fails() {
        let (_, mut diagnostics) = check("a := 1\nr: &int = &a\nm: &mut int = &mut a");
        assert!(diagnostics.has_errors());
        let found = diagnostics.diagnostics().iter().any(|d| {
            matches!(d, forge_diagnostics::Diagnostic::Borrow(e) if e.kind == BorrowErrorKind::MutableBorrowWhileImmutableBorrows)
        });
        assert!(found);
    }

    #[test]
    fn two_mutable_borrows_report_multiple_mutable_borrows() {
        let (_, mut diagnostics) = check("a := 1\nm: &mut int = &mut a\nn: &mut int = &mut a");
        assert!(diagnostics.has_errors());
        let found = diagnostics
            .diagnostics()
            .iter()
            .any(|d| matches!(d, forge_diagnostics::Diagnostic::Borrow(e) if e.kind == BorrowErrorKind::MultipleMutableBorrows));
        assert!(found);
    }

    #[test]
    fn ordinary_move_without_reuse_is_clean() {
        let (checker, mut diagnostics) = check("p: unique Player = new Player()\nq := move p");
        assert!(!diagnostics.has_errors());
        assert_eq!(checker.memory_model().ownership("p"), Some(forge_types::Ownership::Moved));
    }

    #[test]
    fn single_immutable_borrow_is_accepted() {
        let (checker, mut diagnostics) = check("a := 1\nr: &int = &a");
        assert!(!diagnostics.has_errors());
        assert!(checker.memory_model().has_active_borrows("a"));
    }

    #[test]
    fn borrow_of_a_function_parameter_by_a_block_local_is_accepted() {
        let (_, mut diagnostics) = check("def use_it(a: int) { r: &int = &a }");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn borrows_taken_inside_a_function_body_are_released_on_return() {
        let (checker, mut diagnostics) = check("def use_it(a: int) { r: &int = &a }");
        assert!(!diagnostics.has_errors());
        assert!(!checker.memory_model().has_active_borrows("a"));
    }

    #[test]
    fn passing_a_unique_parameter_by_bare_name_is_rejected_but_move_is_accepted() {
        let (_, mut diagnostics) = check(
            "def adopt(p: unique Player) { }\np: unique Player = new Player()\nadopt(p)",
        );
        assert!(diagnostics.has_errors());
        let found = diagnostics
            .diagnostics()
            .iter()
            .any(|d| matches!(d, forge_diagnostics::Diagnostic::Borrow(e) if e.kind == BorrowErrorKind::InvalidBorrow));
        assert!(found);

        let (_, mut diagnostics) = check(
            "def adopt(p: unique Player) { }\np: unique Player = new Player()\nadopt(move p)",
        );
        assert!(!diagnostics.has_errors());
    }
}
