//! Snapshot-independent symbol keys
//!
//! A [`SymbolKey`] is a compact textual encoding of a semantic program
//! element (type, method, field, parameter, local, ...). It is written
//! against one compilation and can later be resolved against another,
//! possibly edited, compilation of the same program.
//!
//! # Architecture
//!
//! ```text
//!            create                          resolve
//! Symbol ──▶ SymbolKeyWriter ──▶ "5 \"C#\" (...)" ──▶ SymbolKeyReader ──▶ SymbolKeyResolution
//!               │   per-kind schema (kinds::*)   │
//!               └──────── Compilation (symkey-model) ────────┘
//! ```
//!
//! - Records are written post-order and every repeated symbol becomes a
//!   back-reference, so keys stay linear in the size of the symbol graph.
//! - Method type parameters are written as an ordinal against the method
//!   being written, which breaks the method / signature cycle.
//! - Writer and reader state is pooled by [`SymbolKeyService`].
//!
//! # Example
//! ```no_run
//! use symkey::{ResolveOptions, SymbolKey};
//! # fn demo(compilation: &dyn symkey_model::Compilation, symbol: symkey_model::SymbolId) -> symkey::Result<()> {
//! let key = SymbolKey::create(symbol, compilation)?;
//! let resolution = key.resolve(compilation, &ResolveOptions::new())?;
//! assert_eq!(resolution.resolved(), Some(symbol));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cancellation;
pub mod comparer;
pub mod config;
pub mod error;
pub mod grammar;
pub mod inspect;
pub mod pool;
pub mod resolution;
pub mod service;

mod kinds;
mod reader;
mod signature;
mod writer;

pub use cancellation::CancellationToken;
pub use comparer::{scrub_assembly_names, SymbolKeyComparer};
pub use config::{ComparisonOptions, ResolveOptions, SymbolKeyConfig};
pub use error::{Result, SymbolKeyError};
pub use grammar::{SymbolKeyType, FORMAT_VERSION};
pub use inspect::{KeyDocument, KeyNode};
pub use pool::{ObjectPool, PoolStats, Pooled, Reset};
pub use resolution::{CandidateReason, SymbolKeyResolution};
pub use service::SymbolKeyService;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use symkey_model::{Compilation, Location, MethodKind, SymbolId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encoded symbol identity
///
/// Equality and hashing look at the record only, so keys written by
/// different front ends for the same symbol compare equal. Use
/// [`SymbolKey::comparer`] for case- or assembly-insensitive comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolKey {
    text: String,
}

impl SymbolKey {
    /// Encode `symbol`
    ///
    /// # Errors
    /// - `SymbolKeyError::UnknownSymbol` if the compilation cannot describe
    ///   `symbol` or a symbol it depends on
    pub fn create(symbol: SymbolId, compilation: &dyn Compilation) -> Result<Self> {
        Ok(Self {
            text: Self::create_string(symbol, compilation)?,
        })
    }

    /// Encode `symbol` as plain text
    ///
    /// # Errors
    /// See [`SymbolKey::create`].
    pub fn create_string(symbol: SymbolId, compilation: &dyn Compilation) -> Result<String> {
        SymbolKeyService::global().create_string(symbol, compilation)
    }

    /// Resolve against `compilation`
    ///
    /// # Errors
    /// - `SymbolKeyError::FormatVersionMismatch` for keys of another version
    /// - `SymbolKeyError::Malformed` for text that is not a key
    /// - `SymbolKeyError::Cancelled` when the token fires
    pub fn resolve(
        &self,
        compilation: &dyn Compilation,
        options: &ResolveOptions,
    ) -> Result<SymbolKeyResolution> {
        SymbolKeyService::global().resolve_string(&self.text, compilation, options)
    }

    /// Resolve key text against `compilation`
    ///
    /// # Errors
    /// See [`SymbolKey::resolve`].
    pub fn resolve_string(
        key: &str,
        compilation: &dyn Compilation,
        ignore_assembly_key: bool,
    ) -> Result<SymbolKeyResolution> {
        let options = ResolveOptions::new().with_ignore_assembly_key(ignore_assembly_key);
        SymbolKeyService::global().resolve_string(key, compilation, &options)
    }

    /// Comparer over key text
    #[inline]
    #[must_use]
    pub fn comparer(ignore_case: bool, ignore_assembly_keys: bool) -> SymbolKeyComparer {
        SymbolKeyComparer::new(ComparisonOptions::new(ignore_case, ignore_assembly_keys))
    }

    /// Check if a key for `symbol` could ever resolve
    ///
    /// Body-level symbols and lambdas are only found again through their
    /// source location, so they need one in a file of this compilation.
    #[must_use]
    pub fn can_create(symbol: SymbolId, compilation: &dyn Compilation) -> bool {
        let Some(view) = compilation.symbol(symbol) else {
            return false;
        };
        let is_lambda = view
            .as_method()
            .is_some_and(|m| m.method_kind == MethodKind::AnonymousFunction);
        if !view.is_body_level() && !is_lambda {
            return true;
        }
        view.locations.iter().any(|location| match location {
            Location::Source(source) => compilation.contains_syntax_tree(&source.path),
            _ => false,
        })
    }

    /// Format version of key text, `None` if there is no readable header
    #[must_use]
    pub fn format_version(key: &str) -> Option<i32> {
        grammar::split_header(key).map(|header| header.version)
    }

    /// Language tag recorded in the header
    #[must_use]
    pub fn language(&self) -> Option<String> {
        grammar::split_header(&self.text).map(|header| header.language)
    }

    /// Record text after the header
    #[must_use]
    pub fn record(&self) -> &str {
        grammar::split_header(&self.text).map_or(self.text.as_str(), |header| header.record)
    }

    /// Full key text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Decode the key structure for diagnostics
    ///
    /// # Errors
    /// - `SymbolKeyError::Malformed` for text that is not a key
    pub fn inspect(&self) -> Result<KeyDocument> {
        inspect::parse(&self.text)
    }
}

impl PartialEq for SymbolKey {
    fn eq(&self, other: &Self) -> bool {
        self.record() == other.record()
    }
}

impl Eq for SymbolKey {}

impl Hash for SymbolKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        SymbolKeyComparer::default().hash_key(&self.text, state);
    }
}

impl Display for SymbolKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for SymbolKey {
    type Err = SymbolKeyError;

    /// Accept any text with a readable header; the record is checked when
    /// the key is resolved.
    fn from_str(s: &str) -> Result<Self> {
        if grammar::split_header(s).is_none() {
            return Err(SymbolKeyError::malformed(0, "expected `<version> \"<language>\"`"));
        }
        Ok(Self { text: s.to_string() })
    }
}

impl AsRef<str> for SymbolKey {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Common imports
pub mod prelude {
    pub use crate::{
        CancellationToken, ComparisonOptions, ResolveOptions, SymbolKey, SymbolKeyComparer,
        SymbolKeyConfig, SymbolKeyError, SymbolKeyResolution, SymbolKeyService,
    };
}
