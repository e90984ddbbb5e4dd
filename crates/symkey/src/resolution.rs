//! Resolution results
//!
//! Provides [`SymbolKeyResolution`], the outcome of evaluating a key against
//! a compilation: one symbol, several equally good candidates, or nothing
//! with a breadcrumb explaining which record failed.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use symkey_model::SymbolId;

/// Why a resolution produced several candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateReason {
    /// More than one symbol matched every recorded field
    Ambiguous,
}

/// Outcome of resolving a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SymbolKeyResolution {
    /// Exactly one match
    Symbol {
        /// Matched symbol
        symbol: SymbolId,
    },
    /// Two or more matches, in compilation enumeration order
    Candidates {
        /// Matched symbols
        symbols: Vec<SymbolId>,
        /// Why no single symbol was chosen
        reason: CandidateReason,
    },
    /// No match
    Unresolved {
        /// Breadcrumb, `None` for an explicit null key
        reason: Option<String>,
    },
}

impl SymbolKeyResolution {
    /// Single-symbol resolution
    #[inline]
    #[must_use]
    pub const fn symbol(symbol: SymbolId) -> Self {
        Self::Symbol { symbol }
    }

    /// Empty resolution without a reason (the null key)
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self::Unresolved { reason: None }
    }

    /// Failed resolution with breadcrumb
    #[inline]
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Unresolved {
            reason: Some(reason.into()),
        }
    }

    /// Build from matched symbols, dropping duplicates
    ///
    /// Zero symbols produce `Unresolved` with `reason`, one produces
    /// `Symbol`, more produce ambiguous `Candidates`.
    #[must_use]
    pub fn from_symbols(
        symbols: impl IntoIterator<Item = SymbolId>,
        reason: impl FnOnce() -> String,
    ) -> Self {
        let mut unique: Vec<SymbolId> = Vec::new();
        for symbol in symbols {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        match unique.len() {
            0 => Self::failed(reason()),
            1 => Self::Symbol { symbol: unique[0] },
            _ => Self::Candidates {
                symbols: unique,
                reason: CandidateReason::Ambiguous,
            },
        }
    }

    /// The single resolved symbol
    #[inline]
    #[must_use]
    pub fn resolved(&self) -> Option<SymbolId> {
        match self {
            Self::Symbol { symbol } => Some(*symbol),
            _ => None,
        }
    }

    /// Ambiguous candidates
    #[inline]
    #[must_use]
    pub fn candidates(&self) -> &[SymbolId] {
        match self {
            Self::Candidates { symbols, .. } => symbols,
            _ => &[],
        }
    }

    /// Resolved symbol or first candidate
    #[inline]
    #[must_use]
    pub fn first_symbol(&self) -> Option<SymbolId> {
        match self {
            Self::Symbol { symbol } => Some(*symbol),
            Self::Candidates { symbols, .. } => symbols.first().copied(),
            Self::Unresolved { .. } => None,
        }
    }

    /// Every symbol carried by the resolution
    #[must_use]
    pub fn all_symbols(&self) -> Vec<SymbolId> {
        match self {
            Self::Symbol { symbol } => vec![*symbol],
            Self::Candidates { symbols, .. } => symbols.clone(),
            Self::Unresolved { .. } => Vec::new(),
        }
    }

    /// Check if at least one symbol was found
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::Unresolved { .. })
    }

    /// Check if this is the resolution of an explicit null key
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Unresolved { reason: None })
    }

    /// Failure breadcrumb
    #[inline]
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Unresolved { reason } => reason.as_deref(),
            _ => None,
        }
    }

    /// Narrow an ambiguous resolution to `contextual` when it is a candidate
    #[must_use]
    pub fn narrowed_to(self, contextual: Option<SymbolId>) -> Self {
        match (self, contextual) {
            (Self::Candidates { symbols, reason }, Some(preferred)) => {
                if symbols.contains(&preferred) {
                    Self::Symbol { symbol: preferred }
                } else {
                    Self::Candidates { symbols, reason }
                }
            }
            (other, _) => other,
        }
    }
}

impl Display for SymbolKeyResolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol { symbol } => write!(f, "{symbol}"),
            Self::Candidates { symbols, .. } => {
                let list: Vec<String> = symbols.iter().map(ToString::to_string).collect();
                write!(f, "ambiguous [{}]", list.join(", "))
            }
            Self::Unresolved { reason: Some(reason) } => write!(f, "unresolved {reason}"),
            Self::Unresolved { reason: None } => write!(f, "null"),
        }
    }
}

/// Breadcrumb for a failed field: `(<Kind> <field> failed -> <inner>)`
#[must_use]
pub fn breadcrumb(kind: &str, field: &str, inner: Option<&str>) -> String {
    match inner {
        Some(inner) => format!("({kind} {field} failed -> {inner})"),
        None => format!("({kind} {field} failed)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> SymbolId {
        SymbolId::new(raw)
    }

    #[test]
    fn from_symbols_picks_variant_by_count() {
        let none = SymbolKeyResolution::from_symbols(Vec::new(), || "nothing".to_string());
        assert_eq!(none.failure_reason(), Some("nothing"));

        let one = SymbolKeyResolution::from_symbols([id(1), id(1)], String::new);
        assert_eq!(one.resolved(), Some(id(1)));

        let many = SymbolKeyResolution::from_symbols([id(2), id(1), id(2)], String::new);
        assert_eq!(many.candidates(), &[id(2), id(1)]);
        assert_eq!(many.first_symbol(), Some(id(2)));
        assert_eq!(many.resolved(), None);
    }

    #[test]
    fn candidates_never_carry_failure_reason() {
        let many = SymbolKeyResolution::from_symbols([id(1), id(2)], || "unused".into());
        assert!(many.is_found());
        assert_eq!(many.failure_reason(), None);
    }

    #[test]
    fn narrowing_prefers_contextual_candidate() {
        let many = SymbolKeyResolution::from_symbols([id(1), id(2)], String::new);
        assert_eq!(many.clone().narrowed_to(Some(id(2))).resolved(), Some(id(2)));
        assert_eq!(many.clone().narrowed_to(Some(id(3))), many);
        assert_eq!(many.clone().narrowed_to(None), many);
    }

    #[test]
    fn breadcrumb_format() {
        assert_eq!(
            breadcrumb("Field", "containingType", Some("(NamedType name failed)")),
            "(Field containingType failed -> (NamedType name failed))"
        );
        assert_eq!(breadcrumb("Alias", "target", None), "(Alias target failed)");
    }

    #[test]
    fn serde_shape_is_tagged() {
        let json = serde_json::to_string(&SymbolKeyResolution::symbol(id(4))).unwrap();
        assert_eq!(json, r#"{"outcome":"symbol","symbol":4}"#);
    }
}
