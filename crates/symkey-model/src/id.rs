//! Symbol handles
//!
//! Provides [`SymbolId`], the opaque handle a compilation hands out for each
//! of its symbols.

use std::fmt::{self, Display, Formatter};

/// Handle to a symbol inside one compilation snapshot
///
/// Handles are only meaningful for the compilation that produced them. Two
/// handles from the same compilation are equal iff they denote the same
/// symbol; the compilation is expected to intern constructed symbols so
/// that structurally identical constructions share a handle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Create handle from raw index
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value of the handle
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Handle as a slice index
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for SymbolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for SymbolId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_id_round_trips_raw() {
        let id = SymbolId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(SymbolId::from(42), id);
    }

    #[test]
    fn symbol_id_display() {
        assert_eq!(SymbolId::new(3).to_string(), "#3");
    }

    #[test]
    fn symbol_id_serde_is_transparent() {
        let json = serde_json::to_string(&SymbolId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: SymbolId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SymbolId::new(9));
    }
}
