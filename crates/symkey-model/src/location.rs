//! Declaration locations
//!
//! Provides [`Location`] for pointing at where a symbol was declared, either
//! a span in a source file or a metadata module.

use crate::id::SymbolId;
use std::fmt::{self, Display, Formatter};

/// Half-open character range within a source file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize,
    serde::Deserialize,
)]
pub struct TextSpan {
    /// First character offset
    pub start: u32,
    /// Number of characters
    pub length: u32,
}

impl TextSpan {
    /// Create span from start and length
    #[inline]
    #[must_use]
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// Offset one past the last character
    #[inline]
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Check if `other` lies completely within this span
    #[inline]
    #[must_use]
    pub const fn contains(&self, other: &TextSpan) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }
}

/// Span inside a named source file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SourceLocation {
    /// File path as known to the compilation
    pub path: String,
    /// Span inside the file
    pub span: TextSpan,
}

/// Where a symbol was declared
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Location {
    /// No location (synthesized symbols)
    #[default]
    None,
    /// Declared in source
    Source(SourceLocation),
    /// Imported from metadata of the given module
    Metadata {
        /// Module symbol the declaration was read from
        module: SymbolId,
    },
}

impl Location {
    /// Source location shorthand
    #[inline]
    #[must_use]
    pub fn source(path: impl Into<String>, start: u32, length: u32) -> Self {
        Self::Source(SourceLocation {
            path: path.into(),
            span: TextSpan::new(start, length),
        })
    }

    /// Check if location points into source
    #[inline]
    #[must_use]
    pub const fn is_in_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }

    /// Source part, if any
    #[inline]
    #[must_use]
    pub const fn as_source(&self) -> Option<&SourceLocation> {
        match self {
            Self::Source(source) => Some(source),
            _ => None,
        }
    }

    /// File path, if the location is in source
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.as_source().map(|s| s.path.as_str())
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "<none>"),
            Self::Source(s) => write!(f, "{}[{}..{}]", s.path, s.span.start, s.span.end()),
            Self::Metadata { module } => write!(f, "<metadata {module}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_span_end_and_contains() {
        let outer = TextSpan::new(10, 20);
        assert_eq!(outer.end(), 30);
        assert!(outer.contains(&TextSpan::new(12, 3)));
        assert!(!outer.contains(&TextSpan::new(25, 10)));
    }

    #[test]
    fn location_source_accessors() {
        let loc = Location::source("a.cs", 4, 2);
        assert!(loc.is_in_source());
        assert_eq!(loc.path(), Some("a.cs"));
        assert_eq!(loc.to_string(), "a.cs[4..6]");
    }

    #[test]
    fn location_default_is_none() {
        let loc = Location::default();
        assert!(!loc.is_in_source());
        assert_eq!(loc.path(), None);
    }
}
