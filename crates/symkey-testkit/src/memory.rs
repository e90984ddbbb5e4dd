//! In-memory compilation
//!
//! [`MemoryCompilation`] implements [`Compilation`] over an arena of
//! declared symbols. Declaration helpers build programs by hand; the
//! factory methods of the trait synthesize and intern derived symbols on
//! demand.

use crate::arena::Arena;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use symkey_model::{
    AliasData, AnonymousProperty, AssemblyData, Compilation, DeclarationNode, EventData,
    FieldData, FunctionPointerSignature, LocalData, Location, MethodData, MethodKind, ModuleData,
    NamedTypeData, NamespaceData, NamespaceKind, ParameterData, PropertyData, RefKind,
    SourceLocation, Symbol, SymbolData, SymbolId, SymbolKind, TypeKind, TypeParameterKind,
    TypeShape,
};

/// Compilation backed by an in-memory symbol arena
#[derive(Debug)]
pub struct MemoryCompilation {
    language: String,
    assembly: SymbolId,
    references: RwLock<Vec<SymbolId>>,
    arena: RwLock<Arena>,
}

impl MemoryCompilation {
    /// Create a compilation of assembly `assembly_name`
    #[must_use]
    pub fn new(language: &str, assembly_name: &str) -> Self {
        let mut arena = Arena::new(true);
        let global = arena.push(Symbol::new(
            "",
            None,
            SymbolData::Namespace(NamespaceData {
                is_global: true,
                extent: NamespaceKind::Compilation,
            }),
        ));
        arena.compilation_global = Some(global);
        let assembly = add_assembly(&mut arena, assembly_name);
        Self {
            language: language.to_string(),
            assembly,
            references: RwLock::new(Vec::new()),
            arena: RwLock::new(arena),
        }
    }

    /// Compare names case-insensitively
    #[must_use]
    pub fn case_insensitive(self) -> Self {
        self.arena.write().case_sensitive = false;
        self
    }

    /// Add a referenced assembly
    pub fn add_reference(&self, name: &str) -> SymbolId {
        let assembly = add_assembly(&mut self.arena.write(), name);
        self.references.write().push(assembly);
        assembly
    }

    /// The assembly being compiled
    #[must_use]
    pub fn source_assembly(&self) -> SymbolId {
        self.assembly
    }

    /// Global namespace of the source assembly's module
    #[must_use]
    pub fn source_global(&self) -> SymbolId {
        self.global_of(self.assembly)
    }

    /// Global namespace of an assembly's module
    #[must_use]
    pub fn global_of(&self, assembly: SymbolId) -> SymbolId {
        match self.view(assembly).data {
            SymbolData::Assembly(ref data) => data.global_namespace,
            _ => assembly,
        }
    }

    /// The single module of an assembly
    #[must_use]
    pub fn module_of(&self, assembly: SymbolId) -> SymbolId {
        match self.view(assembly).data {
            SymbolData::Assembly(ref data) => data.modules.first().copied().unwrap_or(assembly),
            _ => assembly,
        }
    }

    /// View of a declared symbol
    ///
    /// # Panics
    /// If `id` was not handed out by this compilation.
    #[must_use]
    pub fn view(&self, id: SymbolId) -> Arc<Symbol> {
        match self.arena.read().get(id) {
            Some(symbol) => Arc::clone(symbol),
            None => panic!("{id} is not a symbol of this compilation"),
        }
    }

    /// Number of symbols, including synthesized ones
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.read().all().count()
    }

    /// Check if the arena is empty (never true after construction)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declare an arbitrary symbol
    pub fn declare(&self, symbol: Symbol) -> SymbolId {
        self.arena.write().declare(symbol)
    }

    /// Edit a declared symbol in place
    pub fn update(&self, id: SymbolId, edit: impl FnOnce(&mut Symbol)) {
        self.arena.write().update(id, edit);
    }

    /// Add a declaration site
    pub fn add_location(&self, id: SymbolId, location: Location) {
        self.update(id, |symbol| symbol.locations.push(location));
    }

    /// Register an empty source file
    pub fn add_source_file(&self, path: &str) {
        self.arena.write().files.insert(path.to_string());
    }

    /// Drop a source file from the compilation; symbols keep their locations
    pub fn remove_source_file(&self, path: &str) {
        self.arena.write().files.remove(path);
    }

    /// Declare a namespace
    pub fn add_namespace(&self, parent: SymbolId, name: &str) -> SymbolId {
        let extent = self
            .view(parent)
            .as_namespace()
            .map_or(NamespaceKind::Module, |data| data.extent);
        self.declare(Symbol::new(
            name,
            Some(parent),
            SymbolData::Namespace(NamespaceData {
                is_global: false,
                extent,
            }),
        ))
    }

    /// Declare a named type with type parameters
    pub fn add_type(
        &self,
        container: SymbolId,
        name: &str,
        type_kind: TypeKind,
        type_parameters: &[&str],
    ) -> SymbolId {
        let mut arena = self.arena.write();
        let id = arena.declare(Symbol::new(
            name,
            Some(container),
            SymbolData::NamedType(NamedTypeData {
                type_kind,
                ..NamedTypeData::default()
            }),
        ));
        let parameters = arena.type_parameters_for(
            id,
            TypeParameterKind::Type,
            type_parameters.len(),
            Some(type_parameters),
        );
        arena.update(id, |symbol| {
            if let SymbolData::NamedType(data) = &mut symbol.data {
                data.type_arguments.clone_from(&parameters);
                data.type_parameters = parameters;
            }
        });
        id
    }

    /// Declare a non-generic class
    pub fn add_class(&self, container: SymbolId, name: &str) -> SymbolId {
        self.add_type(container, name, TypeKind::Class, &[])
    }

    /// Declare a type in `System` of the source assembly, creating the
    /// namespace on first use
    pub fn system_type(&self, name: &str) -> SymbolId {
        let global = self.source_global();
        let system = self
            .members(global, "System")
            .into_iter()
            .find(|id| self.view(*id).kind() == SymbolKind::Namespace)
            .unwrap_or_else(|| self.add_namespace(global, "System"));
        self.type_members(system, name, 0)
            .first()
            .copied()
            .unwrap_or_else(|| self.add_type(system, name, TypeKind::Struct, &[]))
    }

    /// Make a file-local type
    pub fn set_file_local(&self, ty: SymbolId, path: &str) {
        self.update(ty, |symbol| {
            if let SymbolData::NamedType(data) = &mut symbol.data {
                data.file_local_path = Some(path.to_string());
            }
        });
    }

    /// Type parameter `ordinal` of a type or method
    ///
    /// # Panics
    /// If the owner has fewer type parameters.
    #[must_use]
    pub fn type_parameter(&self, owner: SymbolId, ordinal: usize) -> SymbolId {
        self.view(owner).type_parameters()[ordinal]
    }

    /// Declare a method with type parameters and no parameters
    pub fn add_method(&self, container: SymbolId, name: &str, type_parameters: &[&str]) -> SymbolId {
        self.add_method_of_kind(container, name, MethodKind::Ordinary, type_parameters)
    }

    /// Declare a method of a specific kind
    pub fn add_method_of_kind(
        &self,
        container: SymbolId,
        name: &str,
        method_kind: MethodKind,
        type_parameters: &[&str],
    ) -> SymbolId {
        let mut arena = self.arena.write();
        let id = arena.declare(Symbol::new(
            name,
            Some(container),
            SymbolData::Method(MethodData {
                method_kind,
                ..MethodData::default()
            }),
        ));
        let parameters = arena.type_parameters_for(
            id,
            TypeParameterKind::Method,
            type_parameters.len(),
            Some(type_parameters),
        );
        arena.update(id, |symbol| {
            if let SymbolData::Method(data) = &mut symbol.data {
                data.type_arguments.clone_from(&parameters);
                data.type_parameters = parameters;
            }
        });
        id
    }

    /// Append a by-value parameter to a method or indexer
    pub fn add_parameter(&self, owner: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        self.add_ref_parameter(owner, name, ty, RefKind::None)
    }

    /// Append a parameter with a passing mode
    pub fn add_ref_parameter(
        &self,
        owner: SymbolId,
        name: &str,
        ty: SymbolId,
        ref_kind: RefKind,
    ) -> SymbolId {
        let ordinal = u32::try_from(self.view(owner).parameters().len()).unwrap_or(u32::MAX);
        let id = self.declare(Symbol::new(
            name,
            Some(owner),
            SymbolData::Parameter(ParameterData {
                ordinal,
                ref_kind,
                ty,
            }),
        ));
        self.update(owner, |symbol| match &mut symbol.data {
            SymbolData::Method(data) => data.parameters.push(id),
            SymbolData::Property(data) => data.parameters.push(id),
            _ => {}
        });
        id
    }

    /// Rename a parameter
    pub fn rename(&self, id: SymbolId, name: &str) {
        self.update(id, |symbol| symbol.name = name.to_string());
    }

    /// Set a method's return type
    pub fn set_return_type(&self, method: SymbolId, ty: SymbolId) {
        self.update(method, |symbol| {
            if let SymbolData::Method(data) = &mut symbol.data {
                data.return_type = Some(ty);
            }
        });
    }

    /// Mark a static method as an extension method
    pub fn set_extension(&self, method: SymbolId) {
        self.update(method, |symbol| {
            if let SymbolData::Method(data) = &mut symbol.data {
                data.is_extension_method = true;
            }
        });
    }

    /// Link the definition and implementation parts of a partial method
    pub fn link_partial(&self, definition: SymbolId, implementation: SymbolId) {
        self.update(definition, |symbol| {
            if let SymbolData::Method(data) = &mut symbol.data {
                data.partial_implementation_part = Some(implementation);
            }
        });
        self.update(implementation, |symbol| {
            if let SymbolData::Method(data) = &mut symbol.data {
                data.partial_definition_part = Some(definition);
            }
        });
    }

    /// Declare a partial method implementation part
    ///
    /// Implementation parts are not found by member lookup; keys for them
    /// resolve through their definition part.
    pub fn add_partial_implementation(&self, definition: SymbolId) -> SymbolId {
        let view = self.view(definition);
        let mut symbol = (*view).clone();
        if let SymbolData::Method(data) = &mut symbol.data {
            data.parameters.clear();
        }
        let implementation = self.arena.write().push(symbol);
        for parameter in view.parameters() {
            let parameter = self.view(*parameter);
            if let SymbolData::Parameter(data) = parameter.data {
                self.add_ref_parameter(implementation, &parameter.name, data.ty, data.ref_kind);
            }
        }
        self.link_partial(definition, implementation);
        implementation
    }

    /// Declare a field
    pub fn add_field(&self, container: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        self.declare(Symbol::new(name, Some(container), SymbolData::Field(FieldData { ty })))
    }

    /// Declare a property
    pub fn add_property(&self, container: SymbolId, name: &str, ty: SymbolId) -> SymbolId {
        self.declare(Symbol::new(
            name,
            Some(container),
            SymbolData::Property(PropertyData {
                ty,
                parameters: Vec::new(),
                is_indexer: false,
            }),
        ))
    }

    /// Declare an indexer; add its parameters with [`Self::add_parameter`]
    pub fn add_indexer(&self, container: SymbolId, ty: SymbolId) -> SymbolId {
        self.declare(Symbol::new(
            "this[]",
            Some(container),
            SymbolData::Property(PropertyData {
                ty,
                parameters: Vec::new(),
                is_indexer: true,
            }),
        ))
    }

    /// Declare an event
    pub fn add_event(&self, container: SymbolId, name: &str, delegate: SymbolId) -> SymbolId {
        self.declare(Symbol::new(name, Some(container), SymbolData::Event(EventData { ty: delegate })))
    }

    /// Declare a delegate type with an `Invoke` method
    pub fn add_delegate(
        &self,
        container: SymbolId,
        name: &str,
        parameters: &[(&str, SymbolId)],
        return_type: Option<SymbolId>,
    ) -> SymbolId {
        let delegate = self.add_type(container, name, TypeKind::Delegate, &[]);
        let invoke = self.add_method_of_kind(delegate, "Invoke", MethodKind::DelegateInvoke, &[]);
        for (name, ty) in parameters {
            self.add_parameter(invoke, name, *ty);
        }
        if let Some(ty) = return_type {
            self.set_return_type(invoke, ty);
        }
        self.update(delegate, |symbol| {
            if let SymbolData::NamedType(data) = &mut symbol.data {
                data.delegate_invoke_method = Some(invoke);
            }
        });
        delegate
    }

    /// Declare a local variable inside `owner`
    pub fn add_local(
        &self,
        owner: SymbolId,
        name: &str,
        ty: Option<SymbolId>,
        location: Location,
    ) -> SymbolId {
        self.add_body_symbol(owner, name, SymbolData::Local(LocalData { ty }), location)
    }

    /// Declare a local function inside `owner`
    pub fn add_local_function(&self, owner: SymbolId, name: &str, location: Location) -> SymbolId {
        let data = SymbolData::Method(MethodData {
            method_kind: MethodKind::LocalFunction,
            ..MethodData::default()
        });
        self.add_body_symbol(owner, name, data, location)
    }

    /// Declare a label, range variable or other body-level symbol
    pub fn add_body_symbol(
        &self,
        owner: SymbolId,
        name: &str,
        data: SymbolData,
        location: Location,
    ) -> SymbolId {
        self.declare(Symbol::new(name, Some(owner), data).with_location(location))
    }

    /// Declare a lambda inside `owner`
    pub fn add_lambda(&self, owner: SymbolId, location: Location) -> SymbolId {
        let data = SymbolData::Method(MethodData {
            method_kind: MethodKind::AnonymousFunction,
            ..MethodData::default()
        });
        self.declare(Symbol::new("", Some(owner), data).with_location(location))
    }

    /// Invent the anonymous delegate type of a lambda
    pub fn add_anonymous_delegate(&self, lambda: SymbolId) -> SymbolId {
        let delegate = self.arena.write().push(Symbol::new(
            "",
            None,
            SymbolData::NamedType(NamedTypeData {
                type_kind: TypeKind::Delegate,
                shape: TypeShape::AnonymousDelegate { lambda },
                ..NamedTypeData::default()
            }),
        ));
        self.update(lambda, |symbol| {
            if let SymbolData::Method(data) = &mut symbol.data {
                data.associated_anonymous_delegate = Some(delegate);
            }
        });
        delegate
    }

    /// Declare an alias inside a namespace (or the file root for a global)
    pub fn add_alias(
        &self,
        container: SymbolId,
        name: &str,
        target: SymbolId,
        location: Location,
    ) -> SymbolId {
        self.declare(
            Symbol::new(name, Some(container), SymbolData::Alias(AliasData { target }))
                .with_location(location),
        )
    }

    /// Declare a type parameter introduced by a documentation reference
    pub fn add_cref_type_parameter(&self, name: &str, location: Location) -> SymbolId {
        self.declare(
            Symbol::new(
                name,
                None,
                SymbolData::TypeParameter(symkey_model::TypeParameterData {
                    kind: TypeParameterKind::Cref,
                    ordinal: 0,
                }),
            )
            .with_location(location),
        )
    }

    /// Nearest container that is neither body-level nor a lambda
    fn enclosing_member(arena: &Arena, symbol: &Symbol) -> Option<SymbolId> {
        let mut current = symbol.container;
        while let Some(id) = current {
            let view = arena.get(id)?;
            let is_lambda = view
                .as_method()
                .is_some_and(|m| m.method_kind == MethodKind::AnonymousFunction);
            if !view.is_body_level() && !is_lambda {
                return Some(id);
            }
            current = view.container;
        }
        None
    }
}

fn add_assembly(arena: &mut Arena, name: &str) -> SymbolId {
    let assembly = arena.push(Symbol::new(
        name,
        None,
        SymbolData::Assembly(AssemblyData {
            modules: Vec::new(),
            global_namespace: SymbolId::new(0),
        }),
    ));
    let module = arena.push(Symbol::new(
        format!("{name}.dll"),
        Some(assembly),
        SymbolData::Module(ModuleData {
            global_namespace: SymbolId::new(0),
        }),
    ));
    let global = arena.push(Symbol::new(
        "",
        Some(module),
        SymbolData::Namespace(NamespaceData {
            is_global: true,
            extent: NamespaceKind::Module,
        }),
    ));
    arena.update(assembly, |symbol| {
        symbol.data = SymbolData::Assembly(AssemblyData {
            modules: vec![module],
            global_namespace: global,
        });
    });
    arena.update(module, |symbol| {
        symbol.data = SymbolData::Module(ModuleData {
            global_namespace: global,
        });
    });
    arena.module_globals.push(global);
    assembly
}

fn declaration_node(
    id: SymbolId,
    children: &HashMap<Option<SymbolId>, Vec<SymbolId>>,
) -> DeclarationNode {
    let nested = children
        .get(&Some(id))
        .map(|ids| ids.iter().map(|child| declaration_node(*child, children)).collect())
        .unwrap_or_default();
    DeclarationNode::node(id, nested)
}

impl Compilation for MemoryCompilation {
    fn language(&self) -> &str {
        &self.language
    }

    fn is_case_sensitive(&self) -> bool {
        self.arena.read().case_sensitive
    }

    fn symbol(&self, id: SymbolId) -> Option<Arc<Symbol>> {
        self.arena.read().get(id).cloned()
    }

    fn assembly(&self) -> SymbolId {
        self.assembly
    }

    fn referenced_assemblies(&self) -> Vec<SymbolId> {
        self.references.read().clone()
    }

    fn global_namespace(&self) -> SymbolId {
        let global = self.arena.read().compilation_global;
        global.unwrap_or_else(|| self.source_global())
    }

    fn members(&self, container: SymbolId, name: &str) -> Vec<SymbolId> {
        self.arena.write().members(container, name)
    }

    fn type_members(&self, container: SymbolId, name: &str, arity: usize) -> Vec<SymbolId> {
        let mut arena = self.arena.write();
        arena
            .members(container, name)
            .into_iter()
            .filter(|id| {
                arena
                    .get(*id)
                    .is_some_and(|s| s.as_named_type().is_some() && s.arity() == arity)
            })
            .collect()
    }

    fn contains_syntax_tree(&self, path: &str) -> bool {
        self.arena.read().files.contains(path)
    }

    fn syntax_tree(&self, path: &str) -> Option<DeclarationNode> {
        let arena = self.arena.read();
        if !arena.files.contains(path) {
            return None;
        }

        let mut declared: Vec<(u32, SymbolId, Option<SymbolId>)> = Vec::new();
        for (id, symbol) in arena.all() {
            let skip = symbol.is_body_level()
                || matches!(
                    symbol.data,
                    SymbolData::Parameter(_) | SymbolData::TypeParameter(_)
                );
            if skip {
                continue;
            }
            let start = symbol.locations.iter().find_map(|location| match location {
                Location::Source(source) if source.path == path => Some(source.span.start),
                _ => None,
            });
            if let Some(start) = start {
                declared.push((start, id, symbol.container));
            }
        }
        declared.sort_unstable();

        let in_file: HashSet<SymbolId> =
            declared.iter().map(|(_, id, _)| *id).collect();
        let mut children: HashMap<Option<SymbolId>, Vec<SymbolId>> = HashMap::new();
        for (_, id, container) in &declared {
            let mut parent = *container;
            while let Some(candidate) = parent {
                if in_file.contains(&candidate) {
                    break;
                }
                parent = arena.get(candidate).and_then(|s| s.container);
            }
            children.entry(parent).or_default().push(*id);
        }

        let roots = children
            .get(&None)
            .map(|ids| ids.iter().map(|id| declaration_node(*id, &children)).collect())
            .unwrap_or_default();
        Some(DeclarationNode::root(roots))
    }

    fn symbols_at(&self, location: &SourceLocation) -> Vec<SymbolId> {
        let arena = self.arena.read();
        arena
            .all()
            .filter(|(_, symbol)| {
                symbol
                    .locations
                    .iter()
                    .any(|l| l.as_source() == Some(location))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn body_declarations(&self, member: SymbolId) -> Vec<SymbolId> {
        let arena = self.arena.read();
        let mut found: Vec<(Option<SourceLocation>, SymbolId)> = arena
            .all()
            .filter(|(_, symbol)| symbol.is_body_level())
            .filter(|(_, symbol)| Self::enclosing_member(&arena, symbol) == Some(member))
            .map(|(id, symbol)| (symbol.first_location().as_source().cloned(), id))
            .collect();
        found.sort();
        found.into_iter().map(|(_, id)| id).collect()
    }

    fn construct(&self, definition: SymbolId, type_arguments: &[SymbolId]) -> Option<SymbolId> {
        self.arena.write().construct(definition, type_arguments)
    }

    fn construct_unbound_generic(&self, definition: SymbolId) -> Option<SymbolId> {
        self.arena.write().unbound_generic(definition)
    }

    fn create_array_type(&self, element: SymbolId, rank: u32) -> Option<SymbolId> {
        self.arena.write().array_type(element, rank)
    }

    fn create_pointer_type(&self, pointed_at: SymbolId) -> Option<SymbolId> {
        Some(self.arena.write().pointer_type(pointed_at))
    }

    fn create_function_pointer_type(&self, signature: FunctionPointerSignature) -> Option<SymbolId> {
        Some(self.arena.write().function_pointer_type(signature))
    }

    fn create_tuple_type(
        &self,
        element_types: &[SymbolId],
        names: &[Option<String>],
        locations: &[Location],
    ) -> Option<SymbolId> {
        let arity = element_types.len();
        let value_tuple = self
            .members(self.global_namespace(), "System")
            .into_iter()
            .flat_map(|system| self.type_members(system, "ValueTuple", arity))
            .next();
        let underlying = match value_tuple {
            Some(definition) => self.construct(definition, element_types)?,
            None => {
                let error = self.create_error_type(None, "ValueTuple", arity);
                self.construct(error, element_types)?
            }
        };
        self.create_tuple_type_from_underlying(underlying, names, locations)
    }

    fn create_tuple_type_from_underlying(
        &self,
        underlying: SymbolId,
        names: &[Option<String>],
        locations: &[Location],
    ) -> Option<SymbolId> {
        self.arena
            .write()
            .tuple_from_underlying(underlying, names, locations)
    }

    fn create_anonymous_type(&self, properties: Vec<AnonymousProperty>) -> Option<SymbolId> {
        Some(self.arena.write().anonymous_type(properties))
    }

    fn create_error_namespace(&self, parent: SymbolId, name: &str) -> SymbolId {
        self.arena.write().error_namespace(parent, name)
    }

    fn create_error_type(&self, container: Option<SymbolId>, name: &str, arity: usize) -> SymbolId {
        self.arena.write().error_type(container, name, arity)
    }

    fn create_builtin_operator(
        &self,
        name: &str,
        return_type: SymbolId,
        parameter_types: &[SymbolId],
    ) -> Option<SymbolId> {
        Some(self.arena.write().builtin_operator(name, return_type, parameter_types))
    }

    fn create_preprocessing_symbol(&self, name: &str) -> Option<SymbolId> {
        Some(self.arena.write().preprocessing(name))
    }

    fn dynamic_type(&self) -> Option<SymbolId> {
        Some(self.arena.write().dynamic())
    }

    fn reduce_extension_method(&self, method: SymbolId, receiver: SymbolId) -> Option<SymbolId> {
        self.arena.write().reduced_extension(method, receiver)
    }
}
