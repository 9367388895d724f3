use serde::{Deserialize, Serialize};

use forge_diagnostics::{SourceLocation, TypeError};

use crate::backend_value::BackendValueKind;
use crate::kind::Kind;
use crate::pointer_kind::PointerKind;
use crate::primitive::PrimitiveKind;

/// A field slot on a [`Type::Class`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassField {
    pub name: String,
    pub ty: Box<Type>,
}

/// A method signature on a [`Type::Class`]; bodies are compiled separately, the type
/// system only needs shape for call validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMethod {
    pub name: String,
    pub parameters: Vec<Type>,
    pub return_type: Box<Type>,
}

/// The semantic type of an expression or declaration, as opposed to [`forge_ast::ParsedType`]
/// which is merely what was written. A closed sum over every type shape the checker
/// can produce; dispatch is an ordinary `match`, never a `dynamic_cast`-style tree walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveKind),
    Pointer(Box<Type>),
    Reference {
        pointee: Box<Type>,
        is_mutable: bool,
    },
    SmartPointer {
        element: Box<Type>,
        kind: PointerKind,
    },
    /// `size: None` is a dynamic array — a fat {data pointer, length} descriptor.
    Array {
        element: Box<Type>,
        size: Option<usize>,
    },
    Function {
        return_type: Box<Type>,
        parameters: Vec<Type>,
        is_variadic: bool,
    },
    Class {
        name: String,
        fields: Vec<ClassField>,
        methods: Vec<ClassMethod>,
    },
    /// Unsubstituted template parameter. No size, no backend lowering, until a
    /// generic-instantiation subsystem resolves it (see the type checker's
    /// not-yet-supported handling of `GenericInstantiation`/`ObjectInstantiation`).
    Generic(String),
}

impl Type {
    pub fn kind(&self) -> Kind {
        match self {
            Type::Primitive(_) => Kind::Primitive,
            Type::Pointer(_) => Kind::Pointer,
            Type::Reference { .. } => Kind::Reference,
            Type::SmartPointer { .. } => Kind::SmartPointer,
            Type::Array { .. } => Kind::Array,
            Type::Function { .. } => Kind::Function,
            Type::Class { .. } => Kind::Class,
            Type::Generic(_) => Kind::Generic,
        }
    }

    pub fn size_bytes(&self) -> Result<usize, TypeError> {
        match self {
            Type::Primitive(p) => Ok(p.size_bytes()),
            Type::Pointer(_) | Type::Reference { .. } | Type::SmartPointer { .. } | Type::Class { .. } => Ok(8),
            Type::Array { element, size } => match size {
                Some(n) => Ok(element.size_bytes()? * n),
                None => Ok(8 + 8), // data pointer + length
            },
            Type::Function { .. } => Ok(0),
            Type::Generic(name) => Err(TypeError::new(
                format!("size of generic type '{name}' is undefined until instantiated"),
                SourceLocation::default(),
            )),
        }
    }

    pub fn backend_kind(&self) -> Result<BackendValueKind, TypeError> {
        match self {
            Type::Primitive(PrimitiveKind::Int) => Ok(BackendValueKind::Int32),
            Type::Primitive(PrimitiveKind::Float) => Ok(BackendValueKind::Float32),
            Type::Primitive(PrimitiveKind::Double) => Ok(BackendValueKind::Float64),
            Type::Primitive(PrimitiveKind::Bool) => Ok(BackendValueKind::Bool),
            Type::Primitive(PrimitiveKind::Str) => Ok(BackendValueKind::HeapRef),
            Type::Primitive(PrimitiveKind::Void) => Ok(BackendValueKind::Unit),
            Type::Pointer(_)
            | Type::Reference { .. }
            | Type::SmartPointer { .. }
            | Type::Array { .. }
            | Type::Class { .. } => Ok(BackendValueKind::HeapRef),
            Type::Function { .. } => Ok(BackendValueKind::HeapRef),
            Type::Generic(name) => Err(TypeError::new(
                format!("generic type '{name}' cannot be lowered before instantiation"),
                SourceLocation::default(),
            )),
        }
    }

    pub fn is_assignable_from(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b || b.can_implicitly_convert_to(*a),
            (Type::Pointer(a), Type::Pointer(b)) => a.is_assignable_from(b),
            (
                Type::Reference { pointee: a, is_mutable: a_mut },
                Type::Reference { pointee: b, is_mutable: b_mut },
            ) => {
                if *a_mut && !*b_mut {
                    return false;
                }
                a.is_assignable_from(b)
            }
            (
                Type::SmartPointer { element: a, kind: a_kind },
                Type::SmartPointer { element: b, kind: b_kind },
            ) => a.is_assignable_from(b) && a_kind.accepts(*b_kind),
            (Type::Array { element: a, size: a_size }, Type::Array { element: b, size: b_size }) => {
                a_size == b_size && a.is_assignable_from(b)
            }
            (
                Type::Function { return_type: a_ret, parameters: a_params, is_variadic: a_var },
                Type::Function { return_type: b_ret, parameters: b_params, is_variadic: b_var },
            ) => {
                a_ret.is_assignable_from(b_ret)
                    && a_params.len() == b_params.len()
                    && a_params.iter().zip(b_params).all(|(p, q)| p.is_assignable_from(q))
                    && a_var == b_var
            }
            (Type::Class { name: a, .. }, Type::Class { name: b, .. }) => a == b,
            (Type::Generic(_), _) | (_, Type::Generic(_)) => false,
            _ => false,
        }
    }

    pub fn can_implicitly_convert_to(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a.can_implicitly_convert_to(*b),
            (Type::Pointer(a), Type::Pointer(b)) => a.can_implicitly_convert_to(b),
            (
                Type::Reference { pointee: a, is_mutable: a_mut },
                Type::Reference { pointee: b, is_mutable: b_mut },
            ) => {
                if *a_mut && !*b_mut {
                    return false;
                }
                a.can_implicitly_convert_to(b)
            }
            (Type::SmartPointer { .. }, Type::SmartPointer { .. }) => other.is_assignable_from(self),
            (Type::Function { .. }, Type::Function { .. }) => other.is_assignable_from(self),
            (Type::Class { .. }, Type::Class { .. }) => other.is_assignable_from(self),
            _ => false,
        }
    }

    pub fn promote_with(&self, other: &Type) -> Option<Type> {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a.promote_with(*b).map(Type::Primitive),
            (Type::Pointer(a), Type::Pointer(b)) => a.promote_with(b).map(|t| Type::Pointer(Box::new(t))),
            (
                Type::Reference { pointee: a, is_mutable: a_mut },
                Type::Reference { pointee: b, is_mutable: b_mut },
            ) => {
                if a_mut != b_mut {
                    return None;
                }
                a.promote_with(b).map(|t| Type::Reference {
                    pointee: Box::new(t),
                    is_mutable: *a_mut,
                })
            }
            (
                Type::SmartPointer { element: a, kind: a_kind },
                Type::SmartPointer { element: b, kind: b_kind },
            ) => {
                let element = a.promote_with(b)?;
                let kind = if a_kind == b_kind {
                    *a_kind
                } else if matches!(
                    (a_kind, b_kind),
                    (PointerKind::Unique, PointerKind::Shared) | (PointerKind::Shared, PointerKind::Unique)
                ) {
                    PointerKind::Shared
                } else if matches!(
                    (a_kind, b_kind),
                    (PointerKind::Shared, PointerKind::Weak) | (PointerKind::Weak, PointerKind::Shared)
                ) {
                    PointerKind::Weak
                } else {
                    return None;
                };
                Some(Type::SmartPointer {
                    element: Box::new(element),
                    kind,
                })
            }
            (Type::Array { element: a, size: a_size }, Type::Array { element: b, size: b_size }) => {
                if a_size != b_size {
                    return None;
                }
                a.promote_with(b).map(|t| Type::Array {
                    element: Box::new(t),
                    size: *a_size,
                })
            }
            (Type::Function { .. }, Type::Function { .. }) | (Type::Class { .. }, Type::Class { .. }) => {
                if self.is_assignable_from(other) {
                    Some(self.clone())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn requires_cleanup(&self) -> bool {
        match self {
            Type::Primitive(_) => false,
            Type::Pointer(_) => true,
            Type::Reference { .. } => false,
            Type::SmartPointer { .. } => true,
            Type::Array { .. } => true,
            Type::Function { .. } => false,
            Type::Class { .. } => true,
            Type::Generic(_) => false,
        }
    }

    pub fn is_copyable(&self) -> bool {
        match self {
            Type::Primitive(_) => true,
            Type::Pointer(_) => true,
            Type::Reference { .. } => true,
            Type::SmartPointer { kind, .. } => kind.is_copyable(),
            Type::Array { .. } => true,
            Type::Function { .. } => true,
            Type::Class { .. } => false,
            Type::Generic(_) => true,
        }
    }

    pub fn is_movable(&self) -> bool {
        // Every type in this system is movable; only copyability varies.
        true
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Pointer(inner) => write!(f, "*{inner}"),
            Type::Reference { pointee, is_mutable } => {
                write!(f, "{}{pointee}", if *is_mutable { "&mut " } else { "&" })
            }
            Type::SmartPointer { element, kind } => write!(f, "{kind}<{element}>"),
            Type::Array { element, size } => match size {
                Some(n) => write!(f, "Array[{element}; {n}]"),
                None => write!(f, "Array[{element}]"),
            },
            Type::Function {
                return_type,
                parameters,
                is_variadic,
            } => {
                let params: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
                let mut joined = params.join(", ");
                if *is_variadic {
                    if !joined.is_empty() {
                        joined.push_str(", ");
                    }
                    joined.push_str("...");
                }
                write!(f, "fn({joined}) -> {return_type}")
            }
            Type::Class { name, .. } => write!(f, "Class<{name}>"),
            Type::Generic(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Type {
        Type::Primitive(PrimitiveKind::Int)
    }
    fn float() -> Type {
        Type::Primitive(PrimitiveKind::Float)
    }
    fn double() -> Type {
        Type::Primitive(PrimitiveKind::Double)
    }

    #[test]
    fn int_is_assignable_to_float_but_not_vice_versa() {
        assert!(float().is_assignable_from(&int()));
        assert!(!int().is_assignable_from(&float()));
    }

    #[test]
    fn promotion_associativity_holds_across_primitive_chain() {
        let left = int().promote_with(&float()).unwrap().promote_with(&double());
        let right = int().promote_with(&float().promote_with(&double()).unwrap());
        assert_eq!(left, right);
    }

    #[test]
    fn unique_pointer_only_accepts_unique() {
        let unique_int = Type::SmartPointer {
            element: Box::new(int()),
            kind: PointerKind::Unique,
        };
        let shared_int = Type::SmartPointer {
            element: Box::new(int()),
            kind: PointerKind::Shared,
        };
        assert!(unique_int.is_assignable_from(&unique_int));
        assert!(!unique_int.is_assignable_from(&shared_int));
        assert!(shared_int.is_assignable_from(&unique_int));
    }

    #[test]
    fn mutable_reference_rejects_immutable_source() {
        let mut_ref = Type::Reference {
            pointee: Box::new(int()),
            is_mutable: true,
        };
        let imm_ref = Type::Reference {
            pointee: Box::new(int()),
            is_mutable: false,
        };
        assert!(!mut_ref.is_assignable_from(&imm_ref));
        assert!(imm_ref.is_assignable_from(&mut_ref));
    }

    #[test]
    fn class_types_are_not_copyable_but_are_movable() {
        let class = Type::Class {
            name: "Player".into(),
            fields: vec![],
            methods: vec![],
        };
        assert!(!class.is_copyable());
        assert!(class.is_movable());
        assert!(class.requires_cleanup());
    }

    #[test]
    fn generic_type_has_no_defined_size() {
        assert!(Type::Generic("T".into()).size_bytes().is_err());
    }
}
