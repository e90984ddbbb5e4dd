//! Symbol views
//!
//! Provides [`Symbol`], the read-only view a [`crate::Compilation`] returns
//! for a [`SymbolId`], and [`SymbolData`], the closed per-kind payload.
//!
//! Tuple types, anonymous types and anonymous delegates are named types with
//! a non-ordinary [`TypeShape`]. Local functions, lambdas, reduced extension
//! methods and built-in operators are methods told apart by [`MethodKind`].

use crate::id::SymbolId;
use crate::kind::{
    CallingConvention, MethodKind, NamespaceKind, RefKind, SymbolKind, TypeKind,
    TypeParameterKind,
};
use crate::location::Location;

/// Read-only view of one program element
///
/// # Structure
/// - `name`: Metadata-visible name (empty for unnamed symbols)
/// - `container`: Containing symbol, `None` at the top of the tree
/// - `locations`: Declaration sites, in declaration order
/// - `original_definition`: Definition this symbol was constructed or
///   substituted from, `None` when the symbol is its own definition
/// - `data`: Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Metadata-visible name
    pub name: String,

    /// Containing symbol
    pub container: Option<SymbolId>,

    /// Declaration sites
    pub locations: Vec<Location>,

    /// Synthesized by the compiler rather than written by the user
    pub is_implicitly_declared: bool,

    /// Definition this symbol was derived from
    pub original_definition: Option<SymbolId>,

    /// Kind-specific payload
    pub data: SymbolData,
}

impl Symbol {
    /// Create a symbol with no locations that is its own definition
    #[must_use]
    pub fn new(name: impl Into<String>, container: Option<SymbolId>, data: SymbolData) -> Self {
        Self {
            name: name.into(),
            container,
            locations: Vec::new(),
            is_implicitly_declared: false,
            original_definition: None,
            data,
        }
    }

    /// Add a declaration location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Kind of the symbol
    #[must_use]
    pub fn kind(&self) -> SymbolKind {
        match &self.data {
            SymbolData::Assembly(_) => SymbolKind::Assembly,
            SymbolData::Module(_) => SymbolKind::Module,
            SymbolData::Namespace(_) => SymbolKind::Namespace,
            SymbolData::NamedType(_) => SymbolKind::NamedType,
            SymbolData::ErrorType(_) => SymbolKind::ErrorType,
            SymbolData::ArrayType { .. } => SymbolKind::ArrayType,
            SymbolData::PointerType { .. } => SymbolKind::PointerType,
            SymbolData::FunctionPointerType(_) => SymbolKind::FunctionPointerType,
            SymbolData::DynamicType => SymbolKind::DynamicType,
            SymbolData::TypeParameter(_) => SymbolKind::TypeParameter,
            SymbolData::Method(_) => SymbolKind::Method,
            SymbolData::Field(_) => SymbolKind::Field,
            SymbolData::Property(_) => SymbolKind::Property,
            SymbolData::Event(_) => SymbolKind::Event,
            SymbolData::Parameter(_) => SymbolKind::Parameter,
            SymbolData::Local(_) => SymbolKind::Local,
            SymbolData::Label => SymbolKind::Label,
            SymbolData::RangeVariable => SymbolKind::RangeVariable,
            SymbolData::Alias(_) => SymbolKind::Alias,
            SymbolData::Preprocessing => SymbolKind::Preprocessing,
        }
    }

    /// Check if the symbol only exists inside a member body
    ///
    /// Locals, labels, range variables and local functions.
    #[must_use]
    pub fn is_body_level(&self) -> bool {
        match &self.data {
            SymbolData::Local(_) | SymbolData::Label | SymbolData::RangeVariable => true,
            SymbolData::Method(method) => method.method_kind == MethodKind::LocalFunction,
            _ => false,
        }
    }

    /// Named-type payload (also for error types)
    #[inline]
    #[must_use]
    pub fn as_named_type(&self) -> Option<&NamedTypeData> {
        match &self.data {
            SymbolData::NamedType(data) | SymbolData::ErrorType(data) => Some(data),
            _ => None,
        }
    }

    /// Method payload
    #[inline]
    #[must_use]
    pub fn as_method(&self) -> Option<&MethodData> {
        match &self.data {
            SymbolData::Method(data) => Some(data),
            _ => None,
        }
    }

    /// Namespace payload
    #[inline]
    #[must_use]
    pub fn as_namespace(&self) -> Option<&NamespaceData> {
        match &self.data {
            SymbolData::Namespace(data) => Some(data),
            _ => None,
        }
    }

    /// Type-parameter payload
    #[inline]
    #[must_use]
    pub fn as_type_parameter(&self) -> Option<&TypeParameterData> {
        match &self.data {
            SymbolData::TypeParameter(data) => Some(data),
            _ => None,
        }
    }

    /// Type parameters declared by a named type or method
    #[must_use]
    pub fn type_parameters(&self) -> &[SymbolId] {
        match &self.data {
            SymbolData::NamedType(data) | SymbolData::ErrorType(data) => &data.type_parameters,
            SymbolData::Method(data) => &data.type_parameters,
            _ => &[],
        }
    }

    /// Type arguments of a named type or method
    ///
    /// Equal to [`Symbol::type_parameters`] for definitions.
    #[must_use]
    pub fn type_arguments(&self) -> &[SymbolId] {
        match &self.data {
            SymbolData::NamedType(data) | SymbolData::ErrorType(data) => &data.type_arguments,
            SymbolData::Method(data) => &data.type_arguments,
            _ => &[],
        }
    }

    /// Number of type parameters
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_parameters().len()
    }

    /// Parameters of a method or property
    #[must_use]
    pub fn parameters(&self) -> &[SymbolId] {
        match &self.data {
            SymbolData::Method(data) => &data.parameters,
            SymbolData::Property(data) => &data.parameters,
            _ => &[],
        }
    }

    /// First declaration location, or [`Location::None`]
    #[must_use]
    pub fn first_location(&self) -> &Location {
        const NONE: &Location = &Location::None;
        self.locations.first().unwrap_or(NONE)
    }

    /// Check if any location lies in source
    #[inline]
    #[must_use]
    pub fn has_source_location(&self) -> bool {
        self.locations.iter().any(Location::is_in_source)
    }

    /// Original definition of the symbol, `this` when it is its own
    #[inline]
    #[must_use]
    pub fn definition_or(&self, this: SymbolId) -> SymbolId {
        self.original_definition.unwrap_or(this)
    }
}

/// Kind-specific payload of a [`Symbol`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolData {
    /// Assembly
    Assembly(AssemblyData),
    /// Module
    Module(ModuleData),
    /// Namespace
    Namespace(NamespaceData),
    /// Class, struct, interface, enum, delegate, tuple or anonymous type
    NamedType(NamedTypeData),
    /// Type that could not be bound
    ErrorType(NamedTypeData),
    /// Array type
    ArrayType {
        /// Element type
        element: SymbolId,
        /// Number of dimensions
        rank: u32,
    },
    /// Pointer type
    PointerType {
        /// Pointed-at type
        pointed_at: SymbolId,
    },
    /// Function pointer type
    FunctionPointerType(FunctionPointerSignature),
    /// `dynamic`
    DynamicType,
    /// Type parameter
    TypeParameter(TypeParameterData),
    /// Method of any flavour
    Method(MethodData),
    /// Field
    Field(FieldData),
    /// Property or indexer
    Property(PropertyData),
    /// Event
    Event(EventData),
    /// Parameter
    Parameter(ParameterData),
    /// Local variable
    Local(LocalData),
    /// Statement label
    Label,
    /// Query range variable
    RangeVariable,
    /// Alias
    Alias(AliasData),
    /// Conditional-compilation symbol
    Preprocessing,
}

/// Assembly payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyData {
    /// Modules in declaration order
    pub modules: Vec<SymbolId>,
    /// Global namespace merged across the modules
    pub global_namespace: SymbolId,
}

/// Module payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleData {
    /// Global namespace of this module
    pub global_namespace: SymbolId,
}

/// Namespace payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamespaceData {
    /// Whether this is a global namespace
    pub is_global: bool,
    /// Extent the namespace belongs to
    pub extent: NamespaceKind,
}

/// Named type payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamedTypeData {
    /// Class, struct, ...
    pub type_kind: TypeKind,
    /// Declared type parameters (shared by all constructions)
    pub type_parameters: Vec<SymbolId>,
    /// Type arguments; the type parameters for a definition
    pub type_arguments: Vec<SymbolId>,
    /// Generic definition for a constructed type
    pub constructed_from: Option<SymbolId>,
    /// `List<>` style open construction
    pub is_unbound_generic: bool,
    /// Path of the file a file-local type is scoped to
    pub file_local_path: Option<String>,
    /// Special shape (tuple, anonymous type, anonymous delegate)
    pub shape: TypeShape,
    /// `Invoke` method for delegate types
    pub delegate_invoke_method: Option<SymbolId>,
}

impl NamedTypeData {
    /// Check if the type is a construction of another type
    #[inline]
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        self.constructed_from.is_some()
    }
}

/// Structural shape of a named type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeShape {
    /// Plain declared type
    #[default]
    Ordinary,
    /// `(int a, string b)`
    Tuple(TupleShape),
    /// `new { A = 1 }`
    AnonymousType(Vec<AnonymousProperty>),
    /// Delegate type invented for a lambda with no natural delegate type
    AnonymousDelegate {
        /// Lambda the delegate was invented for
        lambda: SymbolId,
    },
}

/// Tuple payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleShape {
    /// Underlying `ValueTuple` (possibly an error type)
    pub underlying: SymbolId,
    /// Elements in order
    pub elements: Vec<TupleElement>,
}

/// One tuple element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleElement {
    /// Friendly name, `None` for implicit `ItemN` names
    pub name: Option<String>,
    /// Element type
    pub ty: SymbolId,
    /// Where the name was written
    pub location: Location,
}

/// One anonymous-type property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymousProperty {
    /// Property name
    pub name: String,
    /// Property type
    pub ty: SymbolId,
    /// No setter
    pub is_read_only: bool,
    /// Where the property was declared
    pub location: Location,
}

/// Function pointer signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionPointerSignature {
    /// Calling convention
    pub calling_convention: CallingConvention,
    /// Extra convention types for [`CallingConvention::Unmanaged`]
    pub unmanaged_convention_types: Vec<SymbolId>,
    /// Return ref kind
    pub return_ref_kind: RefKind,
    /// Return type
    pub return_type: SymbolId,
    /// Parameters in order
    pub parameters: Vec<FunctionPointerParameter>,
}

/// Function pointer parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionPointerParameter {
    /// Passing mode
    pub ref_kind: RefKind,
    /// Parameter type
    pub ty: SymbolId,
}

/// Type parameter payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeParameterData {
    /// Declaration site
    pub kind: TypeParameterKind,
    /// Position in the declaring symbol's type parameter list
    pub ordinal: u32,
}

/// Method payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodData {
    /// Flavour
    pub method_kind: MethodKind,
    /// Declared type parameters (shared by all constructions)
    pub type_parameters: Vec<SymbolId>,
    /// Type arguments; the type parameters for a definition
    pub type_arguments: Vec<SymbolId>,
    /// Generic method this was constructed from
    pub constructed_from: Option<SymbolId>,
    /// Parameters in order
    pub parameters: Vec<SymbolId>,
    /// Return type, `None` for `void`
    pub return_type: Option<SymbolId>,
    /// Set on the implementation part of a partial method
    pub partial_definition_part: Option<SymbolId>,
    /// Set on the definition part of a partial method
    pub partial_implementation_part: Option<SymbolId>,
    /// Extension method a reduced extension was derived from
    pub reduced_from: Option<SymbolId>,
    /// Receiver of a reduced extension
    pub receiver_type: Option<SymbolId>,
    /// Anonymous delegate a lambda converts to
    pub associated_anonymous_delegate: Option<SymbolId>,
    /// Static method callable with instance syntax
    pub is_extension_method: bool,
}

impl MethodData {
    /// Check if the method is a construction of a generic method
    #[inline]
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        self.constructed_from.is_some()
    }
}

/// Field payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldData {
    /// Field type
    pub ty: SymbolId,
}

/// Property payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyData {
    /// Property type
    pub ty: SymbolId,
    /// Indexer parameters
    pub parameters: Vec<SymbolId>,
    /// `this[...]`
    pub is_indexer: bool,
}

/// Event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventData {
    /// Delegate type of the event
    pub ty: SymbolId,
}

/// Parameter payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterData {
    /// Position in the owner's parameter list
    pub ordinal: u32,
    /// Passing mode
    pub ref_kind: RefKind,
    /// Parameter type
    pub ty: SymbolId,
}

/// Local variable payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalData {
    /// Declared or inferred type
    pub ty: Option<SymbolId>,
}

/// Alias payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasData {
    /// Aliased namespace or type
    pub target: SymbolId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_function_is_body_level() {
        let method = Symbol::new(
            "Helper",
            Some(SymbolId::new(1)),
            SymbolData::Method(MethodData {
                method_kind: MethodKind::LocalFunction,
                ..MethodData::default()
            }),
        );
        assert!(method.is_body_level());
        assert_eq!(method.kind(), SymbolKind::Method);
    }

    #[test]
    fn ordinary_method_is_not_body_level() {
        let method = Symbol::new("M", None, SymbolData::Method(MethodData::default()));
        assert!(!method.is_body_level());
    }

    #[test]
    fn error_type_exposes_named_type_payload() {
        let data = NamedTypeData {
            type_kind: TypeKind::Error,
            type_parameters: vec![SymbolId::new(4)],
            type_arguments: vec![SymbolId::new(4)],
            ..NamedTypeData::default()
        };
        let symbol = Symbol::new("Missing", None, SymbolData::ErrorType(data));
        assert_eq!(symbol.kind(), SymbolKind::ErrorType);
        assert_eq!(symbol.arity(), 1);
        assert!(!symbol.as_named_type().unwrap().is_constructed());
    }

    #[test]
    fn first_location_defaults_to_none() {
        let symbol = Symbol::new("x", None, SymbolData::Label);
        assert_eq!(symbol.first_location(), &Location::None);
        let symbol = symbol.with_location(Location::source("a.cs", 1, 1));
        assert!(symbol.has_source_location());
    }

    #[test]
    fn definition_or_falls_back_to_self() {
        let id = SymbolId::new(10);
        let symbol = Symbol::new("T", None, SymbolData::DynamicType);
        assert_eq!(symbol.definition_or(id), id);
    }
}
