use serde::{Deserialize, Serialize};

/// The discriminant of a semantic [`crate::Type`]. Kept as a standalone enum so
/// callers can branch on "what shape of type is this" without matching the whole
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Primitive,
    Pointer,
    Reference,
    SmartPointer,
    Array,
    Function,
    Class,
    Generic,
}
