//! Error types for symbol keys
//!
//! Only protocol and contract violations are errors. A well-formed key that
//! simply does not match anything in the target compilation resolves to
//! [`crate::SymbolKeyResolution::Unresolved`] instead.

use symkey_model::{ModelError, SymbolId};

/// Symbol key error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolKeyError {
    /// Key was written by an incompatible format version
    #[error("format version mismatch: expected {expected}, found {found}")]
    FormatVersionMismatch {
        /// Version this build reads
        expected: i32,
        /// Version found in the key
        found: i32,
    },

    /// Key text does not follow the grammar
    #[error("malformed key at offset {position}: {message}")]
    Malformed {
        /// Byte offset of the problem
        position: usize,
        /// What was wrong
        message: String,
    },

    /// Records nest deeper than the configured limit
    #[error("key nesting exceeds limit of {limit}")]
    NestingTooDeep {
        /// Configured limit
        limit: usize,
    },

    /// Compilation handed out a handle it cannot describe
    #[error("unknown symbol {0}")]
    UnknownSymbol(SymbolId),

    /// Compilation rejected a request
    #[error("compilation error: {0}")]
    Model(ModelError),

    /// Caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl SymbolKeyError {
    /// Malformed-key error at `position`
    #[inline]
    pub fn malformed(position: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            message: message.into(),
        }
    }

    /// Check if the key came from another format version
    ///
    /// Such keys should be recomputed rather than repaired.
    #[inline]
    #[must_use]
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::FormatVersionMismatch { .. })
    }

    /// Check if retrying with a fresh key or a new call can succeed
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FormatVersionMismatch { .. } | Self::Cancelled | Self::NestingTooDeep { .. }
        )
    }
}

impl From<ModelError> for SymbolKeyError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnknownSymbol(id) => Self::UnknownSymbol(id),
            other => Self::Model(other),
        }
    }
}

/// Result alias for symbol key operations
pub type Result<T> = std::result::Result<T, SymbolKeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_is_recoverable() {
        let err = SymbolKeyError::FormatVersionMismatch {
            expected: 5,
            found: 4,
        };
        assert!(err.is_version_mismatch());
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "format version mismatch: expected 5, found 4"
        );
    }

    #[test]
    fn malformed_is_not_recoverable() {
        let err = SymbolKeyError::malformed(12, "expected ')'");
        assert!(!err.is_recoverable());
        assert!(!err.is_version_mismatch());
        assert_eq!(err.to_string(), "malformed key at offset 12: expected ')'");
    }

    #[test]
    fn model_error_unknown_symbol_maps_directly() {
        let err: SymbolKeyError = ModelError::UnknownSymbol(SymbolId::new(3)).into();
        assert_eq!(err, SymbolKeyError::UnknownSymbol(SymbolId::new(3)));
    }
}
