//! Compilation query and factory surface
//!
//! The key writer and reader never own program state. Everything they know
//! about a program comes through this trait, so any front end that can answer
//! these queries can produce and consume keys.

use crate::error::ModelError;
use crate::id::SymbolId;
use crate::location::{Location, SourceLocation};
use crate::symbol::{AnonymousProperty, FunctionPointerSignature, Symbol};
use crate::syntax::DeclarationNode;
use std::sync::Arc;

/// An analyzed program snapshot
///
/// Implementations must be safe for concurrent read-only use: several
/// encode and resolve calls may query the same compilation from different
/// threads.
///
/// Factories return `None` when the language does not support the requested
/// construct; callers report that as a resolution failure.
pub trait Compilation: Send + Sync {
    /// Source language name (diagnostic only)
    fn language(&self) -> &str;

    /// Whether names compare case-sensitively
    fn is_case_sensitive(&self) -> bool {
        true
    }

    /// View of a symbol
    fn symbol(&self, id: SymbolId) -> Option<Arc<Symbol>>;

    /// View of a symbol, or [`ModelError::UnknownSymbol`]
    fn require(&self, id: SymbolId) -> Result<Arc<Symbol>, ModelError> {
        self.symbol(id).ok_or(ModelError::UnknownSymbol(id))
    }

    /// The assembly being compiled
    fn assembly(&self) -> SymbolId;

    /// Assemblies referenced by the compilation
    fn referenced_assemblies(&self) -> Vec<SymbolId>;

    /// Global namespace merged across the whole compilation
    fn global_namespace(&self) -> SymbolId;

    /// Members of a namespace or type with the given name, in declaration order
    fn members(&self, container: SymbolId, name: &str) -> Vec<SymbolId>;

    /// Type members of a namespace or type with the given name and arity
    fn type_members(&self, container: SymbolId, name: &str, arity: usize) -> Vec<SymbolId>;

    /// Whether a source file with this path is part of the compilation
    fn contains_syntax_tree(&self, path: &str) -> bool;

    /// Declaration tree of a source file
    fn syntax_tree(&self, path: &str) -> Option<DeclarationNode>;

    /// Symbols declared exactly at `location`
    fn symbols_at(&self, location: &SourceLocation) -> Vec<SymbolId>;

    /// Body-level symbols declared anywhere inside `member`, in declaration order
    fn body_declarations(&self, member: SymbolId) -> Vec<SymbolId>;

    /// Structural equivalence as the language defines it
    fn symbols_equivalent(&self, a: SymbolId, b: SymbolId) -> bool {
        a == b
    }

    /// Construct a generic type or method with type arguments
    fn construct(&self, definition: SymbolId, type_arguments: &[SymbolId]) -> Option<SymbolId>;

    /// Open construction (`List<>`) of a generic type
    fn construct_unbound_generic(&self, definition: SymbolId) -> Option<SymbolId>;

    /// Array type
    fn create_array_type(&self, element: SymbolId, rank: u32) -> Option<SymbolId>;

    /// Pointer type
    fn create_pointer_type(&self, pointed_at: SymbolId) -> Option<SymbolId>;

    /// Function pointer type
    fn create_function_pointer_type(&self, signature: FunctionPointerSignature)
        -> Option<SymbolId>;

    /// Tuple type from element types
    fn create_tuple_type(
        &self,
        element_types: &[SymbolId],
        names: &[Option<String>],
        locations: &[Location],
    ) -> Option<SymbolId>;

    /// Tuple type over an existing `ValueTuple` construction
    fn create_tuple_type_from_underlying(
        &self,
        underlying: SymbolId,
        names: &[Option<String>],
        locations: &[Location],
    ) -> Option<SymbolId>;

    /// Anonymous type
    fn create_anonymous_type(&self, properties: Vec<AnonymousProperty>) -> Option<SymbolId>;

    /// Namespace named `name` under `parent`, synthesized when it does not exist
    fn create_error_namespace(&self, parent: SymbolId, name: &str) -> SymbolId;

    /// Placeholder type for a name that does not bind
    fn create_error_type(&self, container: Option<SymbolId>, name: &str, arity: usize)
        -> SymbolId;

    /// Operator the language defines on built-in types
    fn create_builtin_operator(
        &self,
        name: &str,
        return_type: SymbolId,
        parameter_types: &[SymbolId],
    ) -> Option<SymbolId>;

    /// Conditional-compilation symbol
    fn create_preprocessing_symbol(&self, name: &str) -> Option<SymbolId>;

    /// The `dynamic` type
    fn dynamic_type(&self) -> Option<SymbolId>;

    /// Extension method reduced onto a receiver type
    fn reduce_extension_method(&self, method: SymbolId, receiver: SymbolId) -> Option<SymbolId>;
}
