//! Model errors

use crate::id::SymbolId;
use thiserror::Error;

/// Errors raised by a compilation when handed an invalid request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Handle does not belong to this compilation
    #[error("unknown symbol {0}")]
    UnknownSymbol(SymbolId),

    /// Symbol exists but is the wrong kind for the operation
    #[error("symbol {id} is not a {expected}")]
    WrongKind {
        /// Offending symbol
        id: SymbolId,
        /// Kind the operation needed
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            ModelError::UnknownSymbol(SymbolId::new(5)).to_string(),
            "unknown symbol #5"
        );
        let err = ModelError::WrongKind {
            id: SymbolId::new(2),
            expected: "named type",
        };
        assert_eq!(err.to_string(), "symbol #2 is not a named type");
    }
}
