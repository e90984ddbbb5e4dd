//! Configuration
//!
//! [`SymbolKeyConfig`] sizes the state pools and sets reader limits and the
//! default comparison mode. [`ResolveOptions`] carries per-call settings.

use crate::cancellation::CancellationToken;
use crate::error::{Result, SymbolKeyError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use symkey_model::SymbolId;

/// Default number of idle writer (and reader) states kept per pool
pub const DEFAULT_POOL_CAPACITY: usize = 16;

/// Default limit on record nesting while reading
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 512;

/// How two keys are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Compare records case-insensitively
    pub ignore_case: bool,
    /// Erase assembly names before comparing
    pub ignore_assembly_keys: bool,
}

impl ComparisonOptions {
    /// Create options
    #[inline]
    #[must_use]
    pub const fn new(ignore_case: bool, ignore_assembly_keys: bool) -> Self {
        Self {
            ignore_case,
            ignore_assembly_keys,
        }
    }
}

/// Service configuration
///
/// # Example
/// ```
/// use symkey::SymbolKeyConfig;
///
/// let config = SymbolKeyConfig::from_toml_str("max_nesting_depth = 64").unwrap();
/// assert_eq!(config.max_nesting_depth, 64);
/// assert_eq!(config.pool_capacity, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolKeyConfig {
    /// Idle states kept per pool
    pub pool_capacity: usize,
    /// Reader nesting limit
    pub max_nesting_depth: usize,
    /// Comparison used by [`crate::SymbolKeyService::default_comparer`]
    pub default_comparison: ComparisonOptions,
}

impl SymbolKeyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With pool capacity
    #[inline]
    #[must_use]
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// With nesting limit
    #[inline]
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// With default comparison
    #[inline]
    #[must_use]
    pub fn with_default_comparison(mut self, comparison: ComparisonOptions) -> Self {
        self.default_comparison = comparison;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// - `SymbolKeyError::Config` if the text is not valid TOML for this
    ///   structure or the values are out of range
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SymbolKeyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - `SymbolKeyError::Config` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SymbolKeyError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// - `SymbolKeyError::Config` if the nesting limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_nesting_depth == 0 {
            return Err(SymbolKeyError::Config(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SymbolKeyConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            default_comparison: ComparisonOptions::default(),
        }
    }
}

/// Per-call resolve settings
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Accept every assembly regardless of name
    pub ignore_assembly_key: bool,
    /// Best-guess symbol used to narrow an ambiguous top-level result
    pub contextual_symbol: Option<SymbolId>,
    /// Cooperative cancellation
    pub cancellation: Option<CancellationToken>,
    /// Reader nesting limit
    pub max_nesting_depth: usize,
}

impl ResolveOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With assembly-agnostic matching
    #[inline]
    #[must_use]
    pub fn with_ignore_assembly_key(mut self, ignore: bool) -> Self {
        self.ignore_assembly_key = ignore;
        self
    }

    /// With contextual symbol
    #[inline]
    #[must_use]
    pub fn with_contextual_symbol(mut self, symbol: SymbolId) -> Self {
        self.contextual_symbol = Some(symbol);
        self
    }

    /// With cancellation token
    #[inline]
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// With nesting limit
    #[inline]
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Check if cancellation was requested
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            ignore_assembly_key: false,
            contextual_symbol: None,
            cancellation: None,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = SymbolKeyConfig::new();
        assert_eq!(config.pool_capacity, 16);
        assert_eq!(config.max_nesting_depth, 512);
        assert_eq!(config.default_comparison, ComparisonOptions::default());
    }

    #[test]
    fn toml_overrides_nested_comparison() {
        let config = SymbolKeyConfig::from_toml_str(
            r"
            pool_capacity = 4

            [default_comparison]
            ignore_assembly_keys = true
            ",
        )
        .unwrap();
        assert_eq!(config.pool_capacity, 4);
        assert!(config.default_comparison.ignore_assembly_keys);
        assert!(!config.default_comparison.ignore_case);
    }

    #[test]
    fn zero_nesting_depth_is_rejected() {
        let err = SymbolKeyConfig::from_toml_str("max_nesting_depth = 0").unwrap_err();
        assert!(matches!(err, SymbolKeyError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = SymbolKeyConfig::from_toml_str("pool_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, SymbolKeyError::Config(_)));
    }

    #[test]
    fn resolve_options_builder() {
        let token = CancellationToken::new();
        let options = ResolveOptions::new()
            .with_ignore_assembly_key(true)
            .with_contextual_symbol(SymbolId::new(1))
            .with_cancellation(token.clone())
            .with_max_nesting_depth(8);
        assert!(options.ignore_assembly_key);
        assert_eq!(options.contextual_symbol, Some(SymbolId::new(1)));
        assert!(!options.is_cancelled());
        token.cancel();
        assert!(options.is_cancelled());
        assert_eq!(options.max_nesting_depth, 8);
    }

    #[test]
    fn builder_methods_chain() {
        let config = SymbolKeyConfig::new()
            .with_pool_capacity(2)
            .with_max_nesting_depth(10)
            .with_default_comparison(ComparisonOptions::new(true, false));
        assert_eq!(config.pool_capacity, 2);
        assert!(config.default_comparison.ignore_case);
        assert!(config.validate().is_ok());
    }
}
