use serde::{Deserialize, Serialize};

/// The ownership discipline of a [`crate::Type::SmartPointer`]. Distinct from
/// `forge_ast::SmartPointerKind`, which also has a `None` variant for bare syntactic
/// types; a semantic `Type::SmartPointer` only exists when one of these three applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Unique,
    Shared,
    Weak,
}

impl PointerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PointerKind::Unique => "Unique",
            PointerKind::Shared => "Shared",
            PointerKind::Weak => "Weak",
        }
    }

    /// Unique accepts only Unique; Shared accepts Shared or Unique; Weak accepts Weak
    /// or Shared. (Open question resolved: Unique does not accept assignment from a
    /// differently-owned pointer even of the same element type.)
    pub fn accepts(self, other: PointerKind) -> bool {
        match self {
            PointerKind::Unique => other == PointerKind::Unique,
            PointerKind::Shared => matches!(other, PointerKind::Shared | PointerKind::Unique),
            PointerKind::Weak => matches!(other, PointerKind::Weak | PointerKind::Shared),
        }
    }

    pub fn is_copyable(self) -> bool {
        matches!(self, PointerKind::Shared | PointerKind::Weak)
    }
}

impl std::fmt::Display for PointerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
