//! Symbol classification enums
//!
//! Several of these enums are written into keys as integers, so every
//! variant that crosses the wire has an explicit, stable code.

/// Symbol kind classification
///
/// Codes are part of the key format (body-level records store the kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SymbolKind {
    /// `using X = ...;` style alias
    Alias,
    /// `T[]`, `T[,]`
    ArrayType,
    /// Assembly (unit of deployment)
    Assembly,
    /// The `dynamic` pseudo-type
    DynamicType,
    /// Type that failed to bind
    ErrorType,
    /// Event member
    Event,
    /// Field member
    Field,
    /// `delegate*<...>`
    FunctionPointerType,
    /// Statement label
    Label,
    /// Local variable
    Local,
    /// Method of any flavour, including local functions and lambdas
    Method,
    /// Module within an assembly
    Module,
    /// Class, struct, interface, enum or delegate
    NamedType,
    /// Namespace
    Namespace,
    /// Method, indexer or delegate parameter
    Parameter,
    /// `T*`
    PointerType,
    /// Conditional-compilation symbol
    Preprocessing,
    /// Property or indexer
    Property,
    /// Query range variable
    RangeVariable,
    /// Type or method type parameter
    TypeParameter,
}

impl SymbolKind {
    /// Stable integer code used in keys
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Alias => 0,
            Self::ArrayType => 1,
            Self::Assembly => 2,
            Self::DynamicType => 3,
            Self::ErrorType => 4,
            Self::Event => 5,
            Self::Field => 6,
            Self::FunctionPointerType => 7,
            Self::Label => 8,
            Self::Local => 9,
            Self::Method => 10,
            Self::Module => 11,
            Self::NamedType => 12,
            Self::Namespace => 13,
            Self::Parameter => 14,
            Self::PointerType => 15,
            Self::Preprocessing => 16,
            Self::Property => 17,
            Self::RangeVariable => 18,
            Self::TypeParameter => 19,
        }
    }

    /// Decode a kind written with [`SymbolKind::code`]
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Alias,
            1 => Self::ArrayType,
            2 => Self::Assembly,
            3 => Self::DynamicType,
            4 => Self::ErrorType,
            5 => Self::Event,
            6 => Self::Field,
            7 => Self::FunctionPointerType,
            8 => Self::Label,
            9 => Self::Local,
            10 => Self::Method,
            11 => Self::Module,
            12 => Self::NamedType,
            13 => Self::Namespace,
            14 => Self::Parameter,
            15 => Self::PointerType,
            16 => Self::Preprocessing,
            17 => Self::Property,
            18 => Self::RangeVariable,
            19 => Self::TypeParameter,
            _ => return None,
        })
    }

    /// Human-readable description used in diagnostics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::ArrayType => "array type",
            Self::Assembly => "assembly",
            Self::DynamicType => "dynamic type",
            Self::ErrorType => "error type",
            Self::Event => "event",
            Self::Field => "field",
            Self::FunctionPointerType => "function pointer type",
            Self::Label => "label",
            Self::Local => "local",
            Self::Method => "method",
            Self::Module => "module",
            Self::NamedType => "named type",
            Self::Namespace => "namespace",
            Self::Parameter => "parameter",
            Self::PointerType => "pointer type",
            Self::Preprocessing => "preprocessing symbol",
            Self::Property => "property",
            Self::RangeVariable => "range variable",
            Self::TypeParameter => "type parameter",
        }
    }
}

/// Flavour of a method symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum MethodKind {
    /// Plain named method
    #[default]
    Ordinary,
    /// Instance constructor
    Constructor,
    /// Type initializer
    StaticConstructor,
    /// Finalizer
    Destructor,
    /// Property getter
    PropertyGet,
    /// Property setter
    PropertySet,
    /// Event adder
    EventAdd,
    /// Event remover
    EventRemove,
    /// User-defined operator
    UserDefinedOperator,
    /// User-defined conversion (the return type is part of its identity)
    Conversion,
    /// Explicit interface implementation
    ExplicitInterfaceImplementation,
    /// `Invoke` method of a delegate type
    DelegateInvoke,
    /// Extension method viewed as an instance method of its receiver
    ReducedExtension,
    /// Operator synthesized by the language for built-in types
    BuiltinOperator,
    /// Lambda or anonymous method
    AnonymousFunction,
    /// Function declared inside another member's body
    LocalFunction,
}

/// Kind of a named type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TypeKind {
    /// Reference type
    #[default]
    Class,
    /// Value type
    Struct,
    /// Interface
    Interface,
    /// Enumeration
    Enum,
    /// Delegate
    Delegate,
    /// Unresolvable type
    Error,
}

/// How a parameter is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum RefKind {
    /// By value
    #[default]
    None,
    /// `ref`
    Ref,
    /// `out`
    Out,
    /// `in`
    In,
    /// `ref readonly`
    RefReadOnlyParameter,
}

impl RefKind {
    /// Stable integer code used in keys
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Ref => 1,
            Self::Out => 2,
            Self::In => 3,
            Self::RefReadOnlyParameter => 4,
        }
    }

    /// Decode a ref kind written with [`RefKind::code`]
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            1 => Self::Ref,
            2 => Self::Out,
            3 => Self::In,
            4 => Self::RefReadOnlyParameter,
            _ => return None,
        })
    }
}

/// Declaration site of a type parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TypeParameterKind {
    /// Declared by a named type
    #[default]
    Type,
    /// Declared by a method
    Method,
    /// Introduced by a documentation-comment reference (`cref`)
    Cref,
}

/// Which global namespace a namespace belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum NamespaceKind {
    /// Namespace of a single module
    Module,
    /// Namespace merged across an assembly's modules
    Assembly,
    /// Namespace merged across the whole compilation
    #[default]
    Compilation,
}

/// Calling convention of a function pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum CallingConvention {
    /// Managed default
    #[default]
    Default,
    /// `cdecl`
    CDecl,
    /// `stdcall`
    StdCall,
    /// `thiscall`
    ThisCall,
    /// `fastcall`
    FastCall,
    /// Variable arguments
    VarArgs,
    /// Unmanaged, with explicit convention types
    Unmanaged,
}

impl CallingConvention {
    /// Stable integer code used in keys
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Default => 0,
            Self::CDecl => 1,
            Self::StdCall => 2,
            Self::ThisCall => 3,
            Self::FastCall => 4,
            Self::VarArgs => 5,
            Self::Unmanaged => 9,
        }
    }

    /// Decode a calling convention written with [`CallingConvention::code`]
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Default,
            1 => Self::CDecl,
            2 => Self::StdCall,
            3 => Self::ThisCall,
            4 => Self::FastCall,
            5 => Self::VarArgs,
            9 => Self::Unmanaged,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [SymbolKind; 20] = [
        SymbolKind::Alias,
        SymbolKind::ArrayType,
        SymbolKind::Assembly,
        SymbolKind::DynamicType,
        SymbolKind::ErrorType,
        SymbolKind::Event,
        SymbolKind::Field,
        SymbolKind::FunctionPointerType,
        SymbolKind::Label,
        SymbolKind::Local,
        SymbolKind::Method,
        SymbolKind::Module,
        SymbolKind::NamedType,
        SymbolKind::Namespace,
        SymbolKind::Parameter,
        SymbolKind::PointerType,
        SymbolKind::Preprocessing,
        SymbolKind::Property,
        SymbolKind::RangeVariable,
        SymbolKind::TypeParameter,
    ];

    #[test]
    fn symbol_kind_codes_are_unique_and_decodable() {
        let mut seen = std::collections::HashSet::new();
        for kind in ALL_KINDS {
            assert!(seen.insert(kind.code()));
            assert_eq!(SymbolKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SymbolKind::from_code(99), None);
    }

    #[test]
    fn ref_kind_codes() {
        for kind in [
            RefKind::None,
            RefKind::Ref,
            RefKind::Out,
            RefKind::In,
            RefKind::RefReadOnlyParameter,
        ] {
            assert_eq!(RefKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(RefKind::from_code(-1), None);
    }

    #[test]
    fn calling_convention_unmanaged_code() {
        assert_eq!(CallingConvention::Unmanaged.code(), 9);
        assert_eq!(CallingConvention::from_code(6), None);
    }
}
