//! Renders an AST back to an indented, human-readable tree. Used by tests to assert
//! on parse shape without hand-walking the tree, and as a debugging aid.

use crate::expression::{Expression, ExpressionKind};
use crate::statement::Statement;

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

pub fn print_expression(expr: &Expression, level: usize) -> String {
    let pad = indent(level);
    match &expr.kind {
        ExpressionKind::Literal(token) => format!("{pad}Literal({})", token.lexeme),
        ExpressionKind::ArrayLiteral(items) => {
            let mut s = format!("{pad}ArrayLiteral:\n");
            for item in items {
                s.push_str(&print_expression(item, level + 1));
                s.push('\n');
            }
            s.trim_end().to_string()
        }
        ExpressionKind::IndexAccess { array, index } => format!(
            "{pad}IndexAccess:\n{}\n{}",
            print_expression(array, level + 1),
            print_expression(index, level + 1)
        ),
        ExpressionKind::MemberAccess {
            object,
            member_name,
            arguments,
            is_method_call,
        } => {
            let mut s = format!(
                "{pad}MemberAccess({member_name}, call={is_method_call}):\n{}",
                print_expression(object, level + 1)
            );
            for arg in arguments {
                s.push('\n');
                s.push_str(&print_expression(arg, level + 1));
            }
            s
        }
        ExpressionKind::Identifier(name) => format!("{pad}Identifier({name})"),
        ExpressionKind::Binary { left, operator, right } => format!(
            "{pad}Binary({}):\n{}\n{}",
            operator.lexeme,
            print_expression(left, level + 1),
            print_expression(right, level + 1)
        ),
        ExpressionKind::Unary { operator, operand } => format!(
            "{pad}Unary({}):\n{}",
            operator.lexeme,
            print_expression(operand, level + 1)
        ),
        ExpressionKind::FunctionCall { name, arguments, .. } => {
            let mut s = format!("{pad}FunctionCall({name}):");
            for arg in arguments {
                s.push('\n');
                s.push_str(&print_expression(arg, level + 1));
            }
            s
        }
        ExpressionKind::ObjectInstantiation { class_name, arguments } => {
            let mut s = format!("{pad}ObjectInstantiation({}):", class_name.lexeme);
            for arg in arguments {
                s.push('\n');
                s.push_str(&print_expression(arg, level + 1));
            }
            s
        }
        ExpressionKind::GenericInstantiation { class_name, arguments, .. } => {
            let mut s = format!("{pad}GenericInstantiation({}):", class_name.lexeme);
            for arg in arguments {
                s.push('\n');
                s.push_str(&print_expression(arg, level + 1));
            }
            s
        }
        ExpressionKind::Move { operand, .. } => {
            format!("{pad}Move:\n{}", print_expression(operand, level + 1))
        }
        ExpressionKind::New { value } => format!("{pad}New:\n{}", print_expression(value, level + 1)),
        ExpressionKind::Optional { kind_token, value } => match value {
            Some(v) => format!("{pad}Optional({}):\n{}", kind_token.lexeme, print_expression(v, level + 1)),
            None => format!("{pad}Optional({})", kind_token.lexeme),
        },
    }
}

pub fn print_statement(stmt: &Statement, level: usize) -> String {
    let pad = indent(level);
    match stmt {
        Statement::Program(stmts) => stmts
            .iter()
            .map(|s| print_statement(s, level))
            .collect::<Vec<_>>()
            .join("\n"),
        Statement::ExpressionStatement(expr) => {
            format!("{pad}ExpressionStatement:\n{}", print_expression(expr, level + 1))
        }
        Statement::VariableDeclaration {
            name,
            parsed_type,
            initializer,
        } => {
            let ty = parsed_type
                .as_ref()
                .map(|t| t.to_display_string())
                .unwrap_or_else(|| "<inferred>".to_string());
            format!(
                "{pad}VariableDeclaration({}: {ty}):\n{}",
                name.lexeme,
                print_expression(initializer, level + 1)
            )
        }
        Statement::Assignment { lvalue, rvalue } => format!(
            "{pad}Assignment:\n{}\n{}",
            print_expression(lvalue, level + 1),
            print_expression(rvalue, level + 1)
        ),
        Statement::IndexAssignment { lvalue, rvalue } => format!(
            "{pad}IndexAssignment:\n{}\n{}",
            print_expression(lvalue, level + 1),
            print_expression(rvalue, level + 1)
        ),
        Statement::Block(stmts) => {
            let mut s = format!("{pad}Block:");
            for st in stmts {
                s.push('\n');
                s.push_str(&print_statement(st, level + 1));
            }
            s
        }
        Statement::If {
            condition,
            then_block,
            else_block,
        } => {
            let mut s = format!(
                "{pad}If:\n{}\n{}",
                print_expression(condition, level + 1),
                print_statement(then_block, level + 1)
            );
            if let Some(else_block) = else_block {
                s.push('\n');
                s.push_str(&print_statement(else_block, level + 1));
            }
            s
        }
        Statement::While { condition, body } => format!(
            "{pad}While:\n{}\n{}",
            print_expression(condition, level + 1),
            print_statement(body, level + 1)
        ),
        Statement::FunctionDefinition {
            name,
            return_type,
            body,
            ..
        } => format!(
            "{pad}FunctionDefinition({} -> {}):\n{}",
            name.lexeme,
            return_type.to_display_string(),
            print_statement(body, level + 1)
        ),
        Statement::MethodDefinition(m) => format!(
            "{pad}MethodDefinition({} -> {})",
            m.method_name.lexeme,
            m.return_type.to_display_string()
        ),
        Statement::FieldDefinition(f) => {
            format!("{pad}FieldDefinition({}: {})", f.name.lexeme, f.parsed_type.to_display_string())
        }
        Statement::ClassDefinition {
            name,
            fields,
            methods,
            ..
        } => {
            let mut s = format!("{pad}ClassDefinition({}):", name.lexeme);
            for field in fields {
                s.push_str(&format!("\n{}  Field({}: {})", pad, field.name.lexeme, field.parsed_type.to_display_string()));
            }
            for method in methods {
                s.push_str(&format!("\n{}  Method({})", pad, method.method_name.lexeme));
            }
            s
        }
        Statement::Return(value) => match value {
            Some(expr) => format!("{pad}Return:\n{}", print_expression(expr, level + 1)),
            None => format!("{pad}Return"),
        },
        Statement::Defer(expr) => format!("{pad}Defer:\n{}", print_expression(expr, level + 1)),
        Statement::Extern { name, return_type, .. } => format!(
            "{pad}Extern({} -> {})",
            name.lexeme,
            return_type.to_display_string()
        ),
    }
}
