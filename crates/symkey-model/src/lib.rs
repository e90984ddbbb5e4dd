//! Symbol model for snapshot-independent symbol keys
//!
//! The types in this crate describe the *compilation* collaborator that the
//! `symkey` core encodes symbols from and resolves keys against. The core
//! never owns program state; it only calls into a [`Compilation`].
//!
//! # Core Concepts
//!
//! - [`SymbolId`]: Stable, hashable handle into one compilation snapshot
//! - [`Symbol`]: View of one program element, with a closed [`SymbolData`] payload
//! - [`Location`]: Source span or metadata module a symbol was declared in
//! - [`Compilation`]: Query and factory surface of an analyzed program
//!
//! # Example
//!
//! ```rust
//! use symkey_model::{SymbolId, SymbolKind, RefKind};
//!
//! let id = SymbolId::new(7);
//! assert_eq!(id.index(), 7);
//! assert_eq!(SymbolKind::from_code(SymbolKind::Local.code()), Some(SymbolKind::Local));
//! assert_eq!(RefKind::from_code(2), Some(RefKind::Out));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod compilation;
mod error;
mod id;
mod kind;
mod location;
mod symbol;
mod syntax;

pub use compilation::Compilation;
pub use error::ModelError;
pub use id::SymbolId;
pub use kind::{
    CallingConvention, MethodKind, NamespaceKind, RefKind, SymbolKind, TypeKind,
    TypeParameterKind,
};
pub use location::{Location, SourceLocation, TextSpan};
pub use symbol::{
    AliasData, AnonymousProperty, AssemblyData, EventData, FieldData, FunctionPointerParameter,
    FunctionPointerSignature, LocalData, MethodData, ModuleData, NamedTypeData, NamespaceData,
    ParameterData, PropertyData, Symbol, SymbolData, TupleElement, TupleShape, TypeParameterData,
    TypeShape,
};
pub use syntax::DeclarationNode;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
