use std::fmt;

use serde::{Deserialize, Serialize};

/// A single point (well, span) in a source file. Attached to every token, AST node,
/// and diagnostic; immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize, length: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            length,
        }
    }

    /// A location with no real file backing it, for synthetic/test diagnostics.
    pub fn synthetic(line: usize, column: usize) -> Self {
        Self::new(String::new(), line, column, 0)
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self {
            file: String::new(),
            line: 1,
            column: 1,
            length: 0,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl PartialOrd for SourceLocation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceLocation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.file, self.line, self.column).cmp(&(&other.file, other.line, other.column))
    }
}
