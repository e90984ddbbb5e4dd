//! Symbol storage with interning
//!
//! Every symbol the in-memory compilation hands out lives in one arena.
//! Constructed, substituted and synthesized symbols are interned so that
//! two requests for the same construction return the same handle.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use symkey_model::{
    AnonymousProperty, FunctionPointerSignature, Location, MethodKind, NamedTypeData,
    NamespaceData, NamespaceKind, ParameterData, RefKind, Symbol, SymbolData, SymbolId,
    SymbolKind, TupleElement, TupleShape, TypeKind, TypeParameterData, TypeParameterKind,
    TypeShape,
};

/// Interning key for synthesized symbols
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Interned {
    Constructed(SymbolId, Vec<SymbolId>),
    Unbound(SymbolId),
    Substituted(SymbolId, SymbolId),
    Array(SymbolId, u32),
    Pointer(SymbolId),
    FunctionPointer(FunctionPointerSignature),
    Tuple(SymbolId, Vec<Option<String>>, Vec<Location>),
    ErrorNamespace(SymbolId, String),
    ErrorType(Option<SymbolId>, String, usize),
    BuiltinOperator(String, SymbolId, Vec<SymbolId>),
    Preprocessing(String),
    Dynamic,
    Reduced(SymbolId, SymbolId),
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    symbols: Vec<Arc<Symbol>>,
    members: HashMap<SymbolId, Vec<SymbolId>>,
    interned: HashMap<Interned, SymbolId>,
    anonymous_types: Vec<(Vec<AnonymousProperty>, SymbolId)>,
    pub(crate) files: BTreeSet<String>,
    pub(crate) case_sensitive: bool,
    pub(crate) compilation_global: Option<SymbolId>,
    pub(crate) module_globals: Vec<SymbolId>,
}

impl Arena {
    pub(crate) fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }

    pub(crate) fn get(&self, id: SymbolId) -> Option<&Arc<Symbol>> {
        self.symbols.get(id.index())
    }

    pub(crate) fn all(&self) -> impl Iterator<Item = (SymbolId, &Arc<Symbol>)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId::new(u32::try_from(i).unwrap_or(u32::MAX)), s))
    }

    /// Store a symbol without registering it as a member
    pub(crate) fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX));
        for location in &symbol.locations {
            if let Location::Source(source) = location {
                self.files.insert(source.path.clone());
            }
        }
        self.symbols.push(Arc::new(symbol));
        id
    }

    /// Store a declared symbol and register it with its container
    pub(crate) fn declare(&mut self, symbol: Symbol) -> SymbolId {
        let container = symbol.container;
        let is_member = is_lookup_member(&symbol);
        let id = self.push(symbol);
        if let (Some(container), true) = (container, is_member) {
            self.members.entry(container).or_default().push(id);
        }
        id
    }

    pub(crate) fn update(&mut self, id: SymbolId, edit: impl FnOnce(&mut Symbol)) {
        if let Some(slot) = self.symbols.get_mut(id.index()) {
            edit(Arc::make_mut(slot));
            for location in &slot.locations {
                if let Location::Source(source) = location {
                    self.files.insert(source.path.clone());
                }
            }
        }
    }

    fn names_equal(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    /// Members named `name`, substituting members of constructed types
    pub(crate) fn members(&mut self, container: SymbolId, name: &str) -> Vec<SymbolId> {
        if Some(container) == self.compilation_global {
            let globals = self.module_globals.clone();
            return globals
                .into_iter()
                .flat_map(|global| self.members(global, name))
                .collect();
        }

        let Some(view) = self.get(container).cloned() else {
            return Vec::new();
        };
        if let Some(data) = view.as_named_type() {
            if let Some(definition) = data.constructed_from {
                if !data.is_unbound_generic {
                    let originals = self.members(definition, name);
                    return originals
                        .into_iter()
                        .map(|member| self.substituted_member(member, container))
                        .collect();
                }
            }
        }

        let found: Vec<SymbolId> = self
            .members
            .get(&container)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|m| self.get(*m).is_some_and(|s| self.names_equal(&s.name, name)))
                    .collect()
            })
            .unwrap_or_default();
        found
    }

    fn intern(&mut self, key: Interned, build: impl FnOnce(&mut Self) -> SymbolId) -> SymbolId {
        if let Some(existing) = self.interned.get(&key) {
            return *existing;
        }
        let id = build(self);
        self.interned.insert(key, id);
        id
    }

    /// Type-parameter substitution in force inside `constructed`
    fn substitution_of(&self, constructed: SymbolId) -> HashMap<SymbolId, SymbolId> {
        let mut map = HashMap::new();
        let mut current = Some(constructed);
        while let Some(id) = current {
            let Some(view) = self.get(id) else { break };
            if let Some(data) = view.as_named_type() {
                if data.constructed_from.is_some() && !data.is_unbound_generic {
                    for (parameter, argument) in data.type_parameters.iter().zip(&data.type_arguments) {
                        map.entry(*parameter).or_insert(*argument);
                    }
                }
            }
            current = view.container;
        }
        map
    }

    /// Apply a type-parameter substitution to a type
    pub(crate) fn substitute(&mut self, ty: SymbolId, map: &HashMap<SymbolId, SymbolId>) -> SymbolId {
        if map.is_empty() {
            return ty;
        }
        if let Some(replacement) = map.get(&ty) {
            return *replacement;
        }
        let Some(view) = self.get(ty).cloned() else {
            return ty;
        };
        match &view.data {
            SymbolData::ArrayType { element, rank } => {
                let element = self.substitute(*element, map);
                self.array_type(element, *rank).unwrap_or(ty)
            }
            SymbolData::PointerType { pointed_at } => {
                let pointed_at = self.substitute(*pointed_at, map);
                self.pointer_type(pointed_at)
            }
            SymbolData::NamedType(data) | SymbolData::ErrorType(data)
                if !data.type_arguments.is_empty() && !data.is_unbound_generic =>
            {
                let arguments: Vec<SymbolId> = data
                    .type_arguments
                    .iter()
                    .map(|argument| self.substitute(*argument, map))
                    .collect();
                if arguments == data.type_arguments {
                    return ty;
                }
                let definition = data.constructed_from.unwrap_or(ty);
                self.construct(definition, &arguments).unwrap_or(ty)
            }
            _ => ty,
        }
    }

    /// Member of a generic definition as seen through a construction of it
    fn substituted_member(&mut self, member: SymbolId, constructed: SymbolId) -> SymbolId {
        self.intern(Interned::Substituted(member, constructed), |arena| {
            let map = arena.substitution_of(constructed);
            let Some(original) = arena.get(member).cloned() else {
                return member;
            };
            let mut symbol = (*original).clone();
            symbol.container = Some(constructed);
            symbol.original_definition = Some(original.definition_or(member));
            let id = arena.push(symbol);

            let data = match &original.data {
                SymbolData::Method(method) => {
                    let mut method = method.clone();
                    method.parameters = arena.substitute_parameters(id, &method.parameters, &map);
                    method.return_type = method.return_type.map(|ty| arena.substitute(ty, &map));
                    SymbolData::Method(method)
                }
                SymbolData::Property(property) => {
                    let mut property = property.clone();
                    property.parameters = arena.substitute_parameters(id, &property.parameters, &map);
                    property.ty = arena.substitute(property.ty, &map);
                    SymbolData::Property(property)
                }
                SymbolData::Field(field) => {
                    let mut field = *field;
                    field.ty = arena.substitute(field.ty, &map);
                    SymbolData::Field(field)
                }
                SymbolData::Event(event) => {
                    let mut event = *event;
                    event.ty = arena.substitute(event.ty, &map);
                    SymbolData::Event(event)
                }
                SymbolData::NamedType(named) => {
                    let mut named = named.clone();
                    named.constructed_from = Some(member);
                    SymbolData::NamedType(named)
                }
                other => other.clone(),
            };
            arena.update(id, |symbol| symbol.data = data);
            id
        })
    }

    fn substitute_parameters(
        &mut self,
        owner: SymbolId,
        parameters: &[SymbolId],
        map: &HashMap<SymbolId, SymbolId>,
    ) -> Vec<SymbolId> {
        let mut substituted = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let Some(original) = self.get(*parameter).cloned() else {
                continue;
            };
            let mut symbol = (*original).clone();
            symbol.container = Some(owner);
            symbol.original_definition = Some(original.definition_or(*parameter));
            if let SymbolData::Parameter(data) = &mut symbol.data {
                data.ty = self.substitute(data.ty, map);
            }
            substituted.push(self.push(symbol));
        }
        substituted
    }

    /// Construct a generic type or method
    pub(crate) fn construct(&mut self, definition: SymbolId, arguments: &[SymbolId]) -> Option<SymbolId> {
        let view = self.get(definition)?.clone();
        let definition = match &view.data {
            // A member type seen through a construction of its container is
            // itself the definition to construct from.
            SymbolData::NamedType(data) | SymbolData::ErrorType(data) => {
                if data.type_arguments == data.type_parameters && !data.is_unbound_generic {
                    definition
                } else {
                    data.constructed_from.unwrap_or(definition)
                }
            }
            SymbolData::Method(data) => data.constructed_from.unwrap_or(definition),
            _ => return None,
        };
        let view = self.get(definition)?.clone();
        if view.arity() != arguments.len() || view.arity() == 0 {
            return None;
        }
        if view.type_parameters() == arguments {
            return Some(definition);
        }

        let key = Interned::Constructed(definition, arguments.to_vec());
        Some(self.intern(key, |arena| {
            let mut symbol = (*view).clone();
            symbol.original_definition = Some(view.definition_or(definition));
            let id = arena.push(symbol);
            let data = match &view.data {
                SymbolData::NamedType(data) | SymbolData::ErrorType(data) => {
                    let mut data = data.clone();
                    data.type_arguments = arguments.to_vec();
                    data.constructed_from = Some(definition);
                    data.is_unbound_generic = false;
                    if matches!(view.data, SymbolData::ErrorType(_)) {
                        SymbolData::ErrorType(data)
                    } else {
                        SymbolData::NamedType(data)
                    }
                }
                SymbolData::Method(method) => {
                    let map: HashMap<SymbolId, SymbolId> = method
                        .type_parameters
                        .iter()
                        .copied()
                        .zip(arguments.iter().copied())
                        .collect();
                    let mut method = method.clone();
                    method.parameters = arena.substitute_parameters(id, &method.parameters, &map);
                    method.return_type = method.return_type.map(|ty| arena.substitute(ty, &map));
                    method.type_arguments = arguments.to_vec();
                    method.constructed_from = Some(definition);
                    SymbolData::Method(method)
                }
                other => other.clone(),
            };
            arena.update(id, |symbol| symbol.data = data);
            id
        }))
    }

    pub(crate) fn unbound_generic(&mut self, definition: SymbolId) -> Option<SymbolId> {
        let view = self.get(definition)?.clone();
        let data = view.as_named_type()?.clone();
        if data.type_parameters.is_empty() {
            return None;
        }
        Some(self.intern(Interned::Unbound(definition), |arena| {
            let mut symbol = (*view).clone();
            symbol.original_definition = Some(definition);
            let mut data = data;
            data.constructed_from = Some(definition);
            data.is_unbound_generic = true;
            symbol.data = SymbolData::NamedType(data);
            arena.push(symbol)
        }))
    }

    pub(crate) fn array_type(&mut self, element: SymbolId, rank: u32) -> Option<SymbolId> {
        if rank == 0 {
            return None;
        }
        Some(self.intern(Interned::Array(element, rank), |arena| {
            arena.push(Symbol::new("", None, SymbolData::ArrayType { element, rank }))
        }))
    }

    pub(crate) fn pointer_type(&mut self, pointed_at: SymbolId) -> SymbolId {
        self.intern(Interned::Pointer(pointed_at), |arena| {
            arena.push(Symbol::new("", None, SymbolData::PointerType { pointed_at }))
        })
    }

    pub(crate) fn function_pointer_type(&mut self, signature: FunctionPointerSignature) -> SymbolId {
        self.intern(Interned::FunctionPointer(signature.clone()), |arena| {
            arena.push(Symbol::new("", None, SymbolData::FunctionPointerType(signature)))
        })
    }

    pub(crate) fn error_namespace(&mut self, parent: SymbolId, name: &str) -> SymbolId {
        let existing = self
            .members(parent, name)
            .into_iter()
            .find(|m| self.get(*m).is_some_and(|s| s.kind() == SymbolKind::Namespace));
        if let Some(existing) = existing {
            return existing;
        }
        self.intern(Interned::ErrorNamespace(parent, name.to_string()), |arena| {
            arena.push(Symbol::new(
                name,
                Some(parent),
                SymbolData::Namespace(NamespaceData {
                    is_global: false,
                    extent: NamespaceKind::Compilation,
                }),
            ))
        })
    }

    pub(crate) fn error_type(&mut self, container: Option<SymbolId>, name: &str, arity: usize) -> SymbolId {
        self.intern(Interned::ErrorType(container, name.to_string(), arity), |arena| {
            let id = arena.push(Symbol::new(
                name,
                container,
                SymbolData::ErrorType(NamedTypeData {
                    type_kind: TypeKind::Error,
                    ..NamedTypeData::default()
                }),
            ));
            let parameters = arena.type_parameters_for(id, TypeParameterKind::Type, arity, None);
            arena.update(id, |symbol| {
                if let SymbolData::ErrorType(data) = &mut symbol.data {
                    data.type_arguments.clone_from(&parameters);
                    data.type_parameters = parameters;
                }
            });
            id
        })
    }

    /// Create `count` type parameters owned by `owner`
    pub(crate) fn type_parameters_for(
        &mut self,
        owner: SymbolId,
        kind: TypeParameterKind,
        count: usize,
        names: Option<&[&str]>,
    ) -> Vec<SymbolId> {
        (0..count)
            .map(|ordinal| {
                let name = names
                    .and_then(|names| names.get(ordinal).map(ToString::to_string))
                    .unwrap_or_else(|| format!("T{ordinal}"));
                self.push(Symbol::new(
                    name,
                    Some(owner),
                    SymbolData::TypeParameter(TypeParameterData {
                        kind,
                        ordinal: u32::try_from(ordinal).unwrap_or(u32::MAX),
                    }),
                ))
            })
            .collect()
    }

    pub(crate) fn tuple_from_underlying(
        &mut self,
        underlying: SymbolId,
        names: &[Option<String>],
        locations: &[Location],
    ) -> Option<SymbolId> {
        let view = self.get(underlying)?.clone();
        let data = view.as_named_type()?.clone();
        let count = data.type_arguments.len();
        if count == 0 || names.len() != count || (!locations.is_empty() && locations.len() != count) {
            return None;
        }
        // Elements without a declaration site intern like a tuple given no locations.
        let locations: &[Location] = if locations.iter().all(|l| *l == Location::None) {
            &[]
        } else {
            locations
        };
        let key = Interned::Tuple(underlying, names.to_vec(), locations.to_vec());
        Some(self.intern(key, |arena| {
            let elements = data
                .type_arguments
                .iter()
                .enumerate()
                .map(|(i, ty)| TupleElement {
                    name: names[i].clone(),
                    ty: *ty,
                    location: locations.get(i).cloned().unwrap_or_default(),
                })
                .collect();
            arena.push(Symbol::new(
                view.name.clone(),
                view.container,
                SymbolData::NamedType(NamedTypeData {
                    type_kind: TypeKind::Struct,
                    type_arguments: data.type_arguments.clone(),
                    shape: TypeShape::Tuple(TupleShape {
                        underlying,
                        elements,
                    }),
                    ..NamedTypeData::default()
                }),
            ))
        }))
    }

    pub(crate) fn anonymous_type(&mut self, properties: Vec<AnonymousProperty>) -> SymbolId {
        if let Some((_, existing)) = self.anonymous_types.iter().find(|(p, _)| *p == properties) {
            return *existing;
        }
        let id = self.push(Symbol::new(
            "",
            None,
            SymbolData::NamedType(NamedTypeData {
                shape: TypeShape::AnonymousType(properties.clone()),
                ..NamedTypeData::default()
            }),
        ));
        self.anonymous_types.push((properties, id));
        id
    }

    pub(crate) fn builtin_operator(
        &mut self,
        name: &str,
        return_type: SymbolId,
        parameter_types: &[SymbolId],
    ) -> SymbolId {
        let key = Interned::BuiltinOperator(name.to_string(), return_type, parameter_types.to_vec());
        self.intern(key, |arena| {
            let id = arena.push(Symbol::new(
                name,
                None,
                SymbolData::Method(symkey_model::MethodData {
                    method_kind: MethodKind::BuiltinOperator,
                    return_type: Some(return_type),
                    ..Default::default()
                }),
            ));
            let parameters = parameter_types
                .iter()
                .enumerate()
                .map(|(ordinal, ty)| {
                    arena.push(Symbol::new(
                        if ordinal == 0 { "left" } else { "right" },
                        Some(id),
                        SymbolData::Parameter(ParameterData {
                            ordinal: u32::try_from(ordinal).unwrap_or(u32::MAX),
                            ref_kind: RefKind::None,
                            ty: *ty,
                        }),
                    ))
                })
                .collect();
            arena.update(id, |symbol| {
                if let SymbolData::Method(method) = &mut symbol.data {
                    method.parameters = parameters;
                }
            });
            id
        })
    }

    pub(crate) fn preprocessing(&mut self, name: &str) -> SymbolId {
        self.intern(Interned::Preprocessing(name.to_string()), |arena| {
            arena.push(Symbol::new(name, None, SymbolData::Preprocessing))
        })
    }

    pub(crate) fn dynamic(&mut self) -> SymbolId {
        self.intern(Interned::Dynamic, |arena| {
            arena.push(Symbol::new("dynamic", None, SymbolData::DynamicType))
        })
    }

    pub(crate) fn reduced_extension(&mut self, method: SymbolId, receiver: SymbolId) -> Option<SymbolId> {
        let view = self.get(method)?.clone();
        let data = view.as_method()?.clone();
        if !data.is_extension_method || data.parameters.is_empty() {
            return None;
        }
        Some(self.intern(Interned::Reduced(method, receiver), |arena| {
            let mut symbol = (*view).clone();
            symbol.original_definition = None;
            let mut reduced = data.clone();
            reduced.method_kind = MethodKind::ReducedExtension;
            reduced.reduced_from = Some(method);
            reduced.receiver_type = Some(receiver);
            reduced.is_extension_method = false;
            reduced.parameters = data.parameters[1..].to_vec();
            symbol.data = SymbolData::Method(reduced);
            arena.push(symbol)
        }))
    }
}

/// Symbols found by member lookup on their container
fn is_lookup_member(symbol: &Symbol) -> bool {
    match &symbol.data {
        SymbolData::Namespace(data) => !data.is_global,
        SymbolData::NamedType(_) | SymbolData::Field(_) | SymbolData::Property(_) | SymbolData::Event(_) => true,
        SymbolData::Method(method) => matches!(
            method.method_kind,
            MethodKind::Ordinary
                | MethodKind::Constructor
                | MethodKind::StaticConstructor
                | MethodKind::Destructor
                | MethodKind::PropertyGet
                | MethodKind::PropertySet
                | MethodKind::EventAdd
                | MethodKind::EventRemove
                | MethodKind::UserDefinedOperator
                | MethodKind::Conversion
                | MethodKind::ExplicitInterfaceImplementation
                | MethodKind::DelegateInvoke
        ),
        _ => false,
    }
}
