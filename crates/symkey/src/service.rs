//! Key service
//!
//! [`SymbolKeyService`] owns the pooled writer and reader states and the
//! configuration. A process-wide instance backs the [`crate::SymbolKey`]
//! entry points; embedders that need other limits build their own.

use crate::comparer::SymbolKeyComparer;
use crate::config::{ComparisonOptions, ResolveOptions, SymbolKeyConfig};
use crate::error::Result;
use crate::pool::{ObjectPool, PoolStats};
use crate::reader::{ReaderState, SymbolKeyReader};
use crate::resolution::SymbolKeyResolution;
use crate::writer::{SymbolKeyWriter, WriterState};
use once_cell::sync::Lazy;
use symkey_model::{Compilation, SymbolId};

static GLOBAL: Lazy<SymbolKeyService> = Lazy::new(SymbolKeyService::default);

/// Encoder and resolver with pooled state
#[derive(Debug)]
pub struct SymbolKeyService {
    config: SymbolKeyConfig,
    writers: ObjectPool<WriterState>,
    readers: ObjectPool<ReaderState>,
}

impl SymbolKeyService {
    /// Create service
    ///
    /// # Errors
    /// - `SymbolKeyError::Config` if the configuration is out of range
    pub fn new(config: SymbolKeyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            writers: ObjectPool::new(config.pool_capacity),
            readers: ObjectPool::new(config.pool_capacity),
            config,
        })
    }

    /// Process-wide service with default configuration
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SymbolKeyConfig {
        &self.config
    }

    /// Encode `symbol` as key text
    ///
    /// # Errors
    /// - `SymbolKeyError::UnknownSymbol` if the compilation cannot describe
    ///   `symbol` or a symbol it depends on
    pub fn create_string(&self, symbol: SymbolId, compilation: &dyn Compilation) -> Result<String> {
        let mut state = self.writers.acquire();
        let key = SymbolKeyWriter::new(&mut state, compilation).write_key(symbol)?;
        tracing::debug!(%symbol, key_len = key.len(), "created symbol key");
        Ok(key)
    }

    /// Resolve key text against `compilation`
    ///
    /// # Errors
    /// - `SymbolKeyError::FormatVersionMismatch` for keys of another version
    /// - `SymbolKeyError::Malformed` for text that is not a key
    /// - `SymbolKeyError::NestingTooDeep` past the nesting limit
    /// - `SymbolKeyError::Cancelled` when the token fires
    pub fn resolve_string(
        &self,
        key: &str,
        compilation: &dyn Compilation,
        options: &ResolveOptions,
    ) -> Result<SymbolKeyResolution> {
        let limit = options.max_nesting_depth.min(self.config.max_nesting_depth);
        let limited;
        let options = if limit == options.max_nesting_depth {
            options
        } else {
            limited = options.clone().with_max_nesting_depth(limit);
            &limited
        };

        let mut state = self.readers.acquire();
        let resolution = {
            let mut reader = SymbolKeyReader::new(key, &mut state, compilation, options);
            reader.read_header()?;
            let resolution = reader.read_symbol_key(options.contextual_symbol)?;
            reader.expect_end()?;
            resolution
        };
        debug_assert!(state.is_balanced(), "reader stacks not empty after resolve");
        tracing::debug!(outcome = %resolution, "resolved symbol key");
        Ok(resolution)
    }

    /// Comparer with explicit options
    #[inline]
    #[must_use]
    pub fn comparer(&self, ignore_case: bool, ignore_assembly_keys: bool) -> SymbolKeyComparer {
        SymbolKeyComparer::new(ComparisonOptions::new(ignore_case, ignore_assembly_keys))
    }

    /// Comparer configured by `default_comparison`
    #[inline]
    #[must_use]
    pub fn default_comparer(&self) -> SymbolKeyComparer {
        SymbolKeyComparer::new(self.config.default_comparison)
    }

    /// Writer pool statistics
    #[inline]
    #[must_use]
    pub fn writer_stats(&self) -> PoolStats {
        self.writers.stats()
    }

    /// Reader pool statistics
    #[inline]
    #[must_use]
    pub fn reader_stats(&self) -> PoolStats {
        self.readers.stats()
    }
}

impl Default for SymbolKeyService {
    fn default() -> Self {
        let config = SymbolKeyConfig::default();
        Self {
            writers: ObjectPool::new(config.pool_capacity),
            readers: ObjectPool::new(config.pool_capacity),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolKeyError;

    #[test]
    fn invalid_config_is_rejected() {
        let err = SymbolKeyService::new(SymbolKeyConfig::new().with_max_nesting_depth(0)).unwrap_err();
        assert!(matches!(err, SymbolKeyError::Config(_)));
    }

    #[test]
    fn default_comparer_follows_config() {
        let service = SymbolKeyService::new(
            SymbolKeyConfig::new().with_default_comparison(ComparisonOptions::new(true, true)),
        )
        .unwrap();
        assert_eq!(
            service.default_comparer().options(),
            ComparisonOptions::new(true, true)
        );
        assert_eq!(service.comparer(false, false).options(), ComparisonOptions::default());
    }

    #[test]
    fn global_instance_is_shared() {
        assert!(std::ptr::eq(SymbolKeyService::global(), SymbolKeyService::global()));
        assert_eq!(SymbolKeyService::global().config(), &SymbolKeyConfig::default());
    }
}
