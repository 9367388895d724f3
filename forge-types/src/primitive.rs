use serde::{Deserialize, Serialize};

/// The primitive scalar kinds. `Str` is a fat pointer at runtime (length + bytes,
/// see the VM's StringObject) but a scalar for assignability purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Int,
    Float,
    Double,
    Bool,
    Str,
    Void,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Str => "string",
            PrimitiveKind::Void => "void",
        }
    }

    pub fn size_bytes(self) -> usize {
        match self {
            PrimitiveKind::Int => 4,
            PrimitiveKind::Float => 4,
            PrimitiveKind::Double => 8,
            PrimitiveKind::Bool => 1,
            PrimitiveKind::Str => 8,
            PrimitiveKind::Void => 0,
        }
    }

    /// Rank on the `int <= float <= double` widening chain; `None` for non-numeric kinds.
    fn numeric_rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Int => Some(0),
            PrimitiveKind::Float => Some(1),
            PrimitiveKind::Double => Some(2),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Monotonic widening only: int -> float, int -> double, float -> double.
    pub fn can_implicitly_convert_to(self, other: PrimitiveKind) -> bool {
        if self == other {
            return true;
        }
        match (self.numeric_rank(), other.numeric_rank()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// Join on the numeric lattice; `None` when either side is non-numeric and they
    /// are not identical.
    pub fn promote_with(self, other: PrimitiveKind) -> Option<PrimitiveKind> {
        if self == other {
            return Some(self);
        }
        match (self.numeric_rank(), other.numeric_rank()) {
            (Some(a), Some(b)) => Some(if a >= b { self } else { other }),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_conversions_only() {
        assert!(PrimitiveKind::Int.can_implicitly_convert_to(PrimitiveKind::Float));
        assert!(PrimitiveKind::Int.can_implicitly_convert_to(PrimitiveKind::Double));
        assert!(PrimitiveKind::Float.can_implicitly_convert_to(PrimitiveKind::Double));
        assert!(!PrimitiveKind::Double.can_implicitly_convert_to(PrimitiveKind::Int));
        assert!(!PrimitiveKind::Bool.can_implicitly_convert_to(PrimitiveKind::Int));
    }

    #[test]
    fn promotion_is_commutative_and_associative() {
        assert_eq!(
            PrimitiveKind::Int.promote_with(PrimitiveKind::Float),
            PrimitiveKind::Float.promote_with(PrimitiveKind::Int)
        );
        let a = PrimitiveKind::Int;
        let b = PrimitiveKind::Float;
        let c = PrimitiveKind::Double;
        let left = a.promote_with(b).unwrap().promote_with(c);
        let right = a.promote_with(b.promote_with(c).unwrap());
        assert_eq!(left, right);
    }

    #[test]
    fn string_and_bool_do_not_promote_with_numerics() {
        assert_eq!(PrimitiveKind::Str.promote_with(PrimitiveKind::Int), None);
        assert_eq!(PrimitiveKind::Bool.promote_with(PrimitiveKind::Float), None);
    }
}
