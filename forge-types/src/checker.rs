use forge_ast::expression::{Expression, ExpressionKind};
use forge_ast::parsed_type::{ParsedType, SmartPointerKind as ParsedSmartPointerKind};
use forge_diagnostics::{DiagnosticCollector, SourceLocation, TypeError};
use forge_lexer::TokenKind;

use crate::pointer_kind::PointerKind;
use crate::primitive::PrimitiveKind;
use crate::scope::SymbolTable;
use crate::type_::Type;

/// Infers expression types, analyzes syntactic type annotations into semantic types,
/// and validates assignments and calls. Stateless beyond what it's handed per call;
/// failures are reported into the caller's [`DiagnosticCollector`] and surfaced as
/// `None`/`false` rather than a dedicated error enum, mirroring how the borrow
/// checker reports.
#[derive(Debug, Default)]
pub struct TypeChecker;

impl TypeChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn infer_expression_type(
        &self,
        expr: &Expression,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        match &expr.kind {
            ExpressionKind::Literal(token) => Some(self.infer_literal_type(token)),
            ExpressionKind::ArrayLiteral(elements) => self.infer_array_literal_type(elements, &expr.location, symbols, diagnostics),
            ExpressionKind::IndexAccess { array, index } => {
                self.infer_index_access_type(array, index, &expr.location, symbols, diagnostics)
            }
            ExpressionKind::MemberAccess {
                object,
                member_name,
                arguments,
                is_method_call,
            } => self.infer_member_access_type(object, member_name, arguments, *is_method_call, &expr.location, symbols, diagnostics),
            ExpressionKind::Identifier(name) => self.infer_identifier_type(name, &expr.location, symbols, diagnostics),
            ExpressionKind::Binary { left, operator, right } => {
                self.infer_binary_type(left, operator.kind, right, &expr.location, symbols, diagnostics)
            }
            ExpressionKind::Unary { operator, operand } => {
                self.infer_unary_type(&operator.kind, &operator.lexeme, operand, &expr.location, symbols, diagnostics)
            }
            ExpressionKind::FunctionCall { name, arguments, .. } => {
                self.infer_function_call_type(name, arguments, &expr.location, symbols, diagnostics)
            }
            ExpressionKind::ObjectInstantiation { .. } => {
                diagnostics.report_type_error(
                    "object instantiation is not yet supported in type inference",
                    expr.location.clone(),
                );
                None
            }
            ExpressionKind::GenericInstantiation { .. } => {
                diagnostics.report_type_error(
                    "generic instantiation is not yet supported in type inference",
                    expr.location.clone(),
                );
                None
            }
            ExpressionKind::Move { operand, .. } => {
                let operand_type = self.infer_expression_type(operand, symbols, diagnostics)?;
                if !operand_type.is_movable() {
                    diagnostics.report_type_error(
                        format!("type is not movable: {operand_type}"),
                        expr.location.clone(),
                    );
                    return None;
                }
                Some(operand_type)
            }
            ExpressionKind::New { value } => {
                let inner = self.infer_expression_type(value, symbols, diagnostics)?;
                Some(Type::SmartPointer {
                    element: Box::new(inner),
                    kind: PointerKind::Unique,
                })
            }
            ExpressionKind::Optional { value, .. } => match value {
                Some(inner) => {
                    let inner_ty = self.infer_expression_type(inner, symbols, diagnostics)?;
                    Some(Type::Class {
                        name: "Optional".to_string(),
                        fields: vec![crate::type_::ClassField {
                            name: "value".to_string(),
                            ty: Box::new(inner_ty),
                        }],
                        methods: Vec::new(),
                    })
                }
                None => Some(Type::Generic("Optional::None".to_string())),
            },
        }
    }

    fn infer_literal_type(&self, token: &forge_lexer::Token) -> Type {
        match token.kind {
            TokenKind::Number => Type::Primitive(self.infer_numeric_kind(&token.lexeme)),
            TokenKind::StringLit => Type::Primitive(PrimitiveKind::Str),
            TokenKind::True | TokenKind::False => Type::Primitive(PrimitiveKind::Bool),
            _ => Type::Primitive(PrimitiveKind::Void),
        }
    }

    /// Trailing `f` -> float; a decimal point or exponent marker -> double; else int.
    fn infer_numeric_kind(&self, lexeme: &str) -> PrimitiveKind {
        if lexeme.ends_with('f') {
            return PrimitiveKind::Float;
        }
        if lexeme.contains('.') || lexeme.contains('e') || lexeme.contains('E') {
            return PrimitiveKind::Double;
        }
        PrimitiveKind::Int
    }

    fn infer_identifier_type(
        &self,
        name: &str,
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        match symbols.lookup(name) {
            Some(symbol) => Some(symbol.ty.clone()),
            None => {
                diagnostics.report_type_error(format!("undefined variable: {name}"), location.clone());
                None
            }
        }
    }

    fn infer_array_literal_type(
        &self,
        elements: &[Expression],
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        if elements.is_empty() {
            diagnostics.report_type_error("cannot infer type of an empty array literal", location.clone());
            return None;
        }
        let mut element_types = Vec::with_capacity(elements.len());
        for element in elements {
            element_types.push(self.infer_expression_type(element, symbols, diagnostics)?);
        }
        let mut common = element_types[0].clone();
        for next in &element_types[1..] {
            common = match common.promote_with(next) {
                Some(joined) => joined,
                None => {
                    diagnostics.report_type_error(
                        format!("array literal elements of incompatible types {common} and {next}"),
                        location.clone(),
                    );
                    return None;
                }
            };
        }
        Some(Type::Array {
            element: Box::new(common),
            size: Some(elements.len()),
        })
    }

    fn infer_index_access_type(
        &self,
        array: &Expression,
        index: &Expression,
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        let array_type = self.infer_expression_type(array, symbols, diagnostics)?;
        let index_type = self.infer_expression_type(index, symbols, diagnostics)?;
        if !matches!(index_type, Type::Primitive(PrimitiveKind::Int)) {
            diagnostics.report_type_error(format!("array index must be int, got {index_type}"), location.clone());
            return None;
        }
        match array_type {
            Type::Array { element, .. } => Some(*element),
            other => {
                diagnostics.report_type_error(format!("cannot index into non-array type {other}"), location.clone());
                None
            }
        }
    }

    fn infer_member_access_type(
        &self,
        object: &Expression,
        member_name: &str,
        arguments: &[Expression],
        is_method_call: bool,
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        let object_type = self.infer_expression_type(object, symbols, diagnostics)?;
        let Type::Class { name, fields, methods } = &object_type else {
            diagnostics.report_type_error(format!("cannot access member '{member_name}' on non-class type {object_type}"), location.clone());
            return None;
        };

        if is_method_call {
            let Some(method) = methods.iter().find(|m| m.name == member_name) else {
                diagnostics.report_type_error(format!("class '{name}' has no method '{member_name}'"), location.clone());
                return None;
            };
            let argument_types: Vec<Type> = arguments
                .iter()
                .map(|arg| self.infer_expression_type(arg, symbols, diagnostics))
                .collect::<Option<_>>()?;
            let function_type = Type::Function {
                return_type: method.return_type.clone(),
                parameters: method.parameters.clone(),
                is_variadic: false,
            };
            if !self.validate_function_call(&function_type, &argument_types, location.clone(), diagnostics) {
                return None;
            }
            return Some(*method.return_type.clone());
        }

        match fields.iter().find(|f| f.name == member_name) {
            Some(field) => Some(*field.ty.clone()),
            None => {
                diagnostics.report_type_error(format!("class '{name}' has no field '{member_name}'"), location.clone());
                None
            }
        }
    }

    fn infer_binary_type(
        &self,
        left: &Expression,
        operator: TokenKind,
        right: &Expression,
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        let lhs = self.infer_expression_type(left, symbols, diagnostics)?;
        let rhs = self.infer_expression_type(right, symbols, diagnostics)?;

        match operator {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash => {
                match lhs.promote_with(&rhs) {
                    Some(promoted) => Some(promoted),
                    None => {
                        diagnostics.report_type_error(
                            format!("incompatible types for arithmetic operation: {lhs} and {rhs}"),
                            location.clone(),
                        );
                        None
                    }
                }
            }
            TokenKind::EqualEqual
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => {
                if self.are_types_compatible(&lhs, &rhs) {
                    Some(Type::Primitive(PrimitiveKind::Bool))
                } else {
                    diagnostics.report_type_error(
                        format!("incompatible types for comparison: {lhs} and {rhs}"),
                        location.clone(),
                    );
                    None
                }
            }
            TokenKind::AndAnd | TokenKind::OrOr => {
                if matches!(lhs, Type::Primitive(PrimitiveKind::Bool)) && matches!(rhs, Type::Primitive(PrimitiveKind::Bool)) {
                    Some(Type::Primitive(PrimitiveKind::Bool))
                } else {
                    diagnostics.report_type_error("logical operators require bool operands".to_string(), location.clone());
                    None
                }
            }
            other => {
                diagnostics.report_type_error(format!("unsupported binary operator: {other:?}"), location.clone());
                None
            }
        }
    }

    fn infer_unary_type(
        &self,
        operator: &TokenKind,
        operator_lexeme: &str,
        operand: &Expression,
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        let operand_type = self.infer_expression_type(operand, symbols, diagnostics)?;

        match operator {
            TokenKind::Minus => match &operand_type {
                Type::Primitive(p) if p.is_numeric() => Some(operand_type.clone()),
                _ => {
                    diagnostics.report_type_error(format!("unary '-' requires a numeric operand, got {operand_type}"), location.clone());
                    None
                }
            },
            TokenKind::Bang => match &operand_type {
                Type::Primitive(PrimitiveKind::Bool) => Some(operand_type.clone()),
                _ => {
                    diagnostics.report_type_error(format!("unary '!' requires a bool operand, got {operand_type}"), location.clone());
                    None
                }
            },
            TokenKind::Amp => match &operand_type {
                Type::Primitive(_) | Type::Pointer(_) | Type::Class { .. } | Type::Array { .. } => Some(Type::Reference {
                    pointee: Box::new(operand_type),
                    is_mutable: operator_lexeme == "&mut",
                }),
                _ => {
                    diagnostics.report_type_error(format!("unary '&' requires an addressable operand, got {operand_type}"), location.clone());
                    None
                }
            },
            TokenKind::Star => match operand_type {
                Type::Pointer(pointee) => Some(*pointee),
                Type::Reference { pointee, .. } => Some(*pointee),
                other => {
                    diagnostics.report_type_error(format!("unary '*' requires a pointer or reference operand, got {other}"), location.clone());
                    None
                }
            },
            other => {
                diagnostics.report_type_error(format!("unsupported unary operator: {other:?}"), location.clone());
                None
            }
        }
    }

    fn infer_function_call_type(
        &self,
        name: &str,
        arguments: &[Expression],
        location: &SourceLocation,
        symbols: &SymbolTable,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        let Some(symbol) = symbols.lookup(name) else {
            diagnostics.report_type_error(format!("undefined function: {name}"), location.clone());
            return None;
        };
        let function_type = symbol.ty.clone();
        let argument_types: Vec<Type> = arguments
            .iter()
            .map(|arg| self.infer_expression_type(arg, symbols, diagnostics))
            .collect::<Option<_>>()?;
        if !self.validate_function_call(&function_type, &argument_types, location.clone(), diagnostics) {
            return None;
        }
        match function_type {
            Type::Function { return_type, .. } => Some(*return_type),
            _ => unreachable!("validate_function_call rejects non-function types"),
        }
    }

    /// Turns a syntactic [`ParsedType`] into a semantic [`Type`]. Smart-pointer and
    /// generic-parameter annotations on a class are not yet resolvable without a
    /// class registry, matching the inference-side not-yet-supported stance on
    /// generic/object instantiation.
    pub fn analyze_type(&self, parsed: &ParsedType, diagnostics: &mut DiagnosticCollector) -> Option<Type> {
        if !matches!(parsed.smart_pointer, ParsedSmartPointerKind::None) {
            let pointer_kind = match parsed.smart_pointer {
                ParsedSmartPointerKind::Unique => PointerKind::Unique,
                ParsedSmartPointerKind::Shared => PointerKind::Shared,
                ParsedSmartPointerKind::Weak => PointerKind::Weak,
                ParsedSmartPointerKind::None => unreachable!(),
            };
            let base = ParsedType {
                smart_pointer: ParsedSmartPointerKind::None,
                ..parsed.clone()
            };
            let element = self.analyze_type(&base, diagnostics)?;
            return Some(Type::SmartPointer {
                element: Box::new(element),
                kind: pointer_kind,
            });
        }

        if parsed.is_pointer {
            let base = ParsedType {
                nesting_level: parsed.nesting_level - 1,
                is_pointer: parsed.nesting_level > 1,
                ..parsed.clone()
            };
            let pointee = self.analyze_type(&base, diagnostics)?;
            return Some(Type::Pointer(Box::new(pointee)));
        }

        if parsed.is_reference || parsed.is_mut_reference {
            let is_mutable = parsed.is_mut_reference;
            let base = ParsedType {
                is_reference: false,
                is_mut_reference: false,
                ..parsed.clone()
            };
            let pointee = self.analyze_type(&base, diagnostics)?;
            return Some(Type::Reference {
                pointee: Box::new(pointee),
                is_mutable,
            });
        }

        if parsed.is_optional {
            diagnostics.report_type_error("optional types are not yet supported in type analysis", SourceLocation::default());
            return None;
        }

        if parsed.is_simple_type() {
            return match parsed.primary.kind {
                TokenKind::IntType => Some(Type::Primitive(PrimitiveKind::Int)),
                TokenKind::FloatType => Some(Type::Primitive(PrimitiveKind::Float)),
                TokenKind::DoubleType => Some(Type::Primitive(PrimitiveKind::Double)),
                TokenKind::BoolType => Some(Type::Primitive(PrimitiveKind::Bool)),
                TokenKind::StrType => Some(Type::Primitive(PrimitiveKind::Str)),
                TokenKind::VoidType => Some(Type::Primitive(PrimitiveKind::Void)),
                TokenKind::Identifier => Some(Type::Class {
                    name: parsed.primary.lexeme.clone(),
                    fields: Vec::new(),
                    methods: Vec::new(),
                }),
                _ => {
                    diagnostics.report_type_error(format!("unknown primitive type: {}", parsed.primary.lexeme), SourceLocation::default());
                    None
                }
            };
        }

        if !parsed.type_parameters.is_empty() {
            diagnostics.report_type_error("generic type analysis is not yet implemented", SourceLocation::default());
            return None;
        }

        diagnostics.report_type_error("unsupported type annotation", SourceLocation::default());
        None
    }

    pub fn are_types_compatible(&self, declared: &Type, actual: &Type) -> bool {
        declared.is_assignable_from(actual) || actual.can_implicitly_convert_to(declared)
    }

    pub fn find_common_type(
        &self,
        left: &Type,
        right: &Type,
        location: SourceLocation,
        diagnostics: &mut DiagnosticCollector,
    ) -> Option<Type> {
        match left.promote_with(right) {
            Some(promoted) => Some(promoted),
            None => {
                diagnostics.report_type_error(format!("no common type found between {left} and {right}"), location);
                None
            }
        }
    }

    pub fn validate_assignment(
        &self,
        target: &Type,
        source: &Type,
        location: SourceLocation,
        diagnostics: &mut DiagnosticCollector,
    ) -> bool {
        if self.are_types_compatible(target, source) {
            true
        } else {
            diagnostics.report_type_error(
                format!("type mismatch in assignment: cannot assign {source} to {target}"),
                location,
            );
            false
        }
    }

    pub fn validate_function_call(
        &self,
        function: &Type,
        arguments: &[Type],
        location: SourceLocation,
        diagnostics: &mut DiagnosticCollector,
    ) -> bool {
        let Type::Function {
            parameters, is_variadic, ..
        } = function
        else {
            diagnostics.report_type_error(format!("attempted to call a non-function type: {function}"), location);
            return false;
        };

        if *is_variadic {
            if arguments.len() < parameters.len() {
                diagnostics.report_type_error(
                    format!(
                        "argument count mismatch in function call: expected at least {}, got {}",
                        parameters.len(),
                        arguments.len()
                    ),
                    location,
                );
                return false;
            }
        } else if arguments.len() != parameters.len() {
            diagnostics.report_type_error(
                format!(
                    "argument count mismatch in function call: expected {}, got {}",
                    parameters.len(),
                    arguments.len()
                ),
                location,
            );
            return false;
        }

        for (i, (param, arg)) in parameters.iter().zip(arguments).enumerate() {
            if !self.are_types_compatible(param, arg) {
                diagnostics.report_type_error(
                    format!("type mismatch for argument {}: expected {param}, got {arg}", i + 1),
                    location.clone(),
                );
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_ast::parsed_type::ParsedType;
    use forge_lexer::Token;

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme.to_string(), 1, 1)
    }

    #[test]
    fn infers_int_float_and_double_literals_by_suffix_and_dot() {
        let checker = TypeChecker::new();
        assert_eq!(checker.infer_literal_type(&token(TokenKind::Number, "3")), Type::Primitive(PrimitiveKind::Int));
        assert_eq!(checker.infer_literal_type(&token(TokenKind::Number, "3f")), Type::Primitive(PrimitiveKind::Float));
        assert_eq!(checker.infer_literal_type(&token(TokenKind::Number, "3.5")), Type::Primitive(PrimitiveKind::Double));
    }

    #[test]
    fn analyzes_simple_primitive_type() {
        let checker = TypeChecker::new();
        let mut diagnostics = DiagnosticCollector::new();
        let parsed = ParsedType::simple(token(TokenKind::IntType, "int"));
        let ty = checker.analyze_type(&parsed, &mut diagnostics).unwrap();
        assert_eq!(ty, Type::Primitive(PrimitiveKind::Int));
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn int_to_float_assignment_is_accepted() {
        let checker = TypeChecker::new();
        let mut diagnostics = DiagnosticCollector::new();
        let ok = checker.validate_assignment(
            &Type::Primitive(PrimitiveKind::Float),
            &Type::Primitive(PrimitiveKind::Int),
            SourceLocation::default(),
            &mut diagnostics,
        );
        assert!(ok);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn float_to_int_assignment_is_rejected() {
        let checker = TypeChecker::new();
        let mut diagnostics = DiagnosticCollector::new();
        let ok = checker.validate_assignment(
            &Type::Primitive(PrimitiveKind::Int),
            &Type::Primitive(PrimitiveKind::Float),
            SourceLocation::default(),
            &mut diagnostics,
        );
        assert!(!ok);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn variadic_function_call_allows_extra_untyped_arguments() {
        let checker = TypeChecker::new();
        let mut diagnostics = DiagnosticCollector::new();
        let function = Type::Function {
            return_type: Box::new(Type::Primitive(PrimitiveKind::Void)),
            parameters: vec![Type::Primitive(PrimitiveKind::Str)],
            is_variadic: true,
        };
        let args = vec![
            Type::Primitive(PrimitiveKind::Str),
            Type::Primitive(PrimitiveKind::Int),
            Type::Primitive(PrimitiveKind::Bool),
        ];
        assert!(checker.validate_function_call(&function, &args, SourceLocation::default(), &mut diagnostics));
    }
}
