use forge::{check, compile, run};
use forge_bytecode::{Constant, OpCode};
use forge_diagnostics::{BorrowErrorKind, Diagnostic};
use forge_lexer::{Lexer, TokenKind};
use forge_vm::{HeapObject, StackValue, VirtualMachine};

fn token_kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source).tokenize().expect("lex failure").into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexing_arithmetic_with_a_float_literal_and_an_identifier() {
    let kinds = token_kinds("3 + 4.5f * x");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Number,
            TokenKind::Plus,
            TokenKind::Number,
            TokenKind::Star,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn parsing_respects_multiplication_precedence_over_addition() {
    use forge_ast::{ExpressionKind, Statement};
    use forge_lexer::Lexer;
    use forge_parser::Parser;

    let tokens = Lexer::new("2 + 3 * 4").tokenize().expect("lex failure");
    let ast = Parser::new(tokens, "test.fg").parse_program().expect("parse failure");

    let Statement::Program(stmts) = ast else { panic!("expected a program") };
    let [Statement::ExpressionStatement(expr)] = stmts.as_slice() else {
        panic!("expected a single expression statement")
    };

    let ExpressionKind::Binary { left, operator, right } = &expr.kind else {
        panic!("expected a binary expression at the top level")
    };
    assert_eq!(operator.kind, TokenKind::Plus);
    assert!(matches!(&left.kind, ExpressionKind::Literal(t) if t.lexeme == "2"));

    let ExpressionKind::Binary { operator: inner_op, .. } = &right.kind else {
        panic!("expected 3 * 4 nested on the right")
    };
    assert_eq!(inner_op.kind, TokenKind::Star);
}

#[test]
fn int_widens_to_float_on_assignment_but_not_the_reverse() {
    check("x: int = 2 + 3\ny: float = x", "test.fg").expect("int to float should be accepted");

    let err = check("y: float = 2.0\nx: int = y", "test.fg").expect_err("float to int should be rejected");
    assert!(err.diagnostics().is_some());
}

#[test]
fn second_borrow_conflicting_with_an_active_mutable_borrow_is_rejected() {
    let err = check("a: int = 5\nr: &mut int = &mut a\nr2: &int = &a", "test.fg").expect_err("should be rejected");
    let diagnostics = err.diagnostics().expect("a diagnostics error");
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::Borrow(e)
            if e.kind == BorrowErrorKind::MutableBorrowWhileImmutableBorrows
                || e.kind == BorrowErrorKind::MultipleMutableBorrows
    )));
}

#[test]
fn using_a_moved_binding_is_rejected_as_use_after_move() {
    let err = check("p: unique Player = new Player()\nq := move p\nuse(p)", "test.fg").expect_err("should be rejected");
    let diagnostics = err.diagnostics().expect("a diagnostics error");
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::Borrow(e) if e.kind == BorrowErrorKind::UseAfterMove)));
}

#[test]
fn compiling_a_sum_of_two_locals_ends_with_the_expected_local_instructions() {
    let program = compile("x: int = 10\ny: int = 20\nz: int = x + y", "test.fg").expect("should compile");

    assert_eq!(program.constants, vec![Constant::Int(10), Constant::Int(20)]);

    let tail: Vec<OpCode> = program.instructions.iter().rev().take(5).rev().map(|i| i.opcode).collect();
    assert_eq!(
        tail,
        vec![OpCode::LoadLocal, OpCode::LoadLocal, OpCode::AddInt, OpCode::StoreLocal, OpCode::Halt]
    );
}

#[test]
fn executing_the_compiled_sum_leaves_all_three_globals_populated() {
    let result = run("x: int = 10\ny: int = 20\nz: int = x + y", "test.fg").expect("should execute");
    assert_eq!(result, None);

    let program = compile("x: int = 10\ny: int = 20\nz: int = x + y", "test.fg").expect("should compile");
    let mut vm = VirtualMachine::new();
    vm.load(&program);
    vm.run().expect("should execute");
    assert_eq!(vm.globals(), &[StackValue::Int(10), StackValue::Int(20), StackValue::Int(30)]);
}

#[test]
fn heap_collection_keeps_exactly_the_one_rooted_string() {
    let mut vm = VirtualMachine::new();
    let mut last = None;
    for i in 0..101 {
        last = Some(vm.allocate_string(format!("string-{i}")));
    }
    let kept = last.expect("at least one allocation");
    let StackValue::HeapRef(kept_id) = kept else { panic!("expected a heap reference") };

    vm.push_stack(kept.clone());
    vm.collect_garbage();

    assert_eq!(vm.heap().live_count(), 1);
    match vm.heap().get(kept_id).unwrap() {
        HeapObject::Str(s) => assert_eq!(s, "string-100"),
        other => panic!("expected a string, got {other:?}"),
    }
}

mod universal_properties {
    use forge_ast::{ExpressionKind, Statement};
    use forge_lexer::Lexer;
    use forge_parser::Parser;
    use proptest::prelude::*;

    fn parse_sum(source: &str) -> Statement {
        let tokens = Lexer::new(source).tokenize().expect("lex failure");
        Parser::new(tokens, "prop.fg").parse_program().expect("parse failure")
    }

    fn single_expression(program: &Statement) -> &forge_ast::Expression {
        let Statement::Program(stmts) = program else { panic!("expected a program") };
        let [Statement::ExpressionStatement(expr)] = stmts.as_slice() else {
            panic!("expected a single expression statement")
        };
        expr
    }

    proptest! {
        #[test]
        fn addition_is_left_associative(a in 1i32..100, b in 1i32..100, c in 1i32..100) {
            let source = format!("{a} + {b} + {c}");
            let program = parse_sum(&source);
            let expr = single_expression(&program);

            let ExpressionKind::Binary { left, operator, .. } = &expr.kind else {
                prop_assert!(false, "expected a top-level binary expression");
                return Ok(());
            };
            prop_assert_eq!(operator.lexeme.as_str(), "+");
            prop_assert!(matches!(&left.kind, ExpressionKind::Binary { .. }));
        }

        #[test]
        fn multiplication_binds_tighter_than_addition_regardless_of_operand_values(
            a in 1i32..50, b in 1i32..50, c in 1i32..50
        ) {
            let source = format!("{a} + {b} * {c}");
            let program = parse_sum(&source);
            let expr = single_expression(&program);

            let ExpressionKind::Binary { operator, right, .. } = &expr.kind else {
                prop_assert!(false, "expected a top-level binary expression");
                return Ok(());
            };
            prop_assert_eq!(operator.lexeme.as_str(), "+");
            prop_assert!(matches!(&right.kind, ExpressionKind::Binary { .. }));
        }

        #[test]
        fn tokenizing_an_integer_literal_round_trips_through_its_lexeme(n in 0i64..1_000_000) {
            let source = n.to_string();
            let tokens = Lexer::new(&source).tokenize().expect("lex failure");
            prop_assert_eq!(tokens.len(), 2); // the number, then EOF
            prop_assert_eq!(&tokens[0].lexeme, &source);
        }

        #[test]
        fn int_plus_double_promotes_commutatively_to_double(a in 1i32..1000, b in 0f64..1000.0) {
            use forge_diagnostics::DiagnosticCollector;
            use forge_types::{SymbolTable, TypeChecker};

            let forward = format!("{a} + {b}");
            let backward = format!("{b} + {a}");

            let checker = TypeChecker::new();
            let symbols = SymbolTable::new();

            for source in [forward, backward] {
                let program = parse_sum(&source);
                let expr = single_expression(&program);
                let mut diagnostics = DiagnosticCollector::new();
                let ty = checker.infer_expression_type(expr, &symbols, &mut diagnostics);
                prop_assert_eq!(ty, Some(forge_types::Type::Primitive(forge_types::PrimitiveKind::Double)));
            }
        }
    }
}
