use forge_ast::Statement;
use forge_bytecode::{BytecodeCompiler, CompiledProgram};
use forge_diagnostics::DiagnosticCollector;
use forge_lexer::Lexer;
use forge_memory::BorrowChecker;
use forge_parser::Parser;
use forge_types::{SymbolTable, TypeChecker};
use forge_vm::{StackValue, VirtualMachine};

use crate::error::{ForgeError, ForgeResult};

/// A source program carried through checking, its diagnostics preserved
/// alongside the parsed tree. `diagnostics` may hold warnings even when
/// `program()`/`into_compiled()` succeed.
pub struct CheckedProgram {
    ast: Statement,
    diagnostics: DiagnosticCollector,
}

impl CheckedProgram {
    pub fn ast(&self) -> &Statement {
        &self.ast
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }
}

/// Lexes, parses, and runs type and borrow checking over `source`. Fails fast
/// on the first lexical or syntactic error; type and borrow violations are
/// instead collected so a caller sees every one reported against `file` at
/// once rather than stopping at the first.
pub fn check(source: &str, file: &str) -> ForgeResult<CheckedProgram> {
    let tokens = Lexer::new(source).tokenize()?;
    let ast = Parser::new(tokens, file).parse_program()?;

    let mut symbols = SymbolTable::new();
    let types = TypeChecker::new();
    let mut diagnostics = DiagnosticCollector::new();

    BorrowChecker::new(file).analyze_program(&ast, &mut symbols, &types, &mut diagnostics);

    if diagnostics.has_errors() {
        return Err(ForgeError::Diagnostics(diagnostics.diagnostics().to_vec()));
    }

    Ok(CheckedProgram { ast, diagnostics })
}

/// Checks `source`, then lowers it to bytecode. The bytecode compiler reuses
/// the checked program's diagnostic collector so a codegen failure is
/// reported alongside any warnings type/borrow checking already produced.
pub fn compile(source: &str, file: &str) -> ForgeResult<CompiledProgram> {
    let mut checked = check(source, file)?;
    let program = BytecodeCompiler::new().compile(&checked.ast, &mut checked.diagnostics);

    if checked.diagnostics.has_errors() {
        return Err(ForgeError::Diagnostics(checked.diagnostics.diagnostics().to_vec()));
    }

    Ok(program)
}

/// Checks, compiles, and executes `source` end to end. Returns whatever value
/// the virtual machine leaves on top of the stack at `Halt`, if any.
pub fn run(source: &str, file: &str) -> ForgeResult<Option<StackValue>> {
    let program = compile(source, file)?;
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    Ok(vm.run()?)
}
