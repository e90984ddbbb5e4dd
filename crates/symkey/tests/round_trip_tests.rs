use pretty_assertions::assert_eq;
use symkey::prelude::*;
use symkey::KeyNode;
use symkey_model::{
    AnonymousProperty, CallingConvention, Compilation, FunctionPointerParameter,
    FunctionPointerSignature, RefKind, SymbolData, SymbolId,
};
use symkey_testkit::{library, span, MemoryCompilation, WIDGET_FILE};

fn assert_round_trip(compilation: &MemoryCompilation, symbol: SymbolId) -> SymbolKey {
    let key = SymbolKey::create(symbol, compilation).unwrap();
    let resolution = key.resolve(compilation, &ResolveOptions::new()).unwrap();
    assert_eq!(resolution.resolved(), Some(symbol), "key {key} gave {resolution}");
    key
}

#[test]
fn test_containers_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    assert_round_trip(c, c.source_assembly());
    assert_round_trip(c, c.module_of(c.source_assembly()));
    assert_round_trip(c, c.source_global());
    assert_round_trip(c, c.global_namespace());
    assert_round_trip(c, lib.system);
    assert_round_trip(c, lib.acme);
}

#[test]
fn test_compilation_global_namespace_has_no_container() {
    let lib = library("Acme.Core");
    let key = SymbolKey::create(lib.compilation.global_namespace(), &lib.compilation).unwrap();
    assert_eq!(key.record(), r#" (N "" 1 ! 0)"#);
}

#[test]
fn test_named_types_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    for ty in [lib.int32, lib.widget, lib.part, lib.boxed, lib.handler] {
        assert_round_trip(c, ty);
    }

    let box_of_int = c.construct(lib.boxed, &[lib.int32]).unwrap();
    assert_round_trip(c, box_of_int);
    let nested = c.construct(lib.boxed, &[box_of_int]).unwrap();
    assert_round_trip(c, nested);
    let unbound = c.construct_unbound_generic(lib.boxed).unwrap();
    let key = assert_round_trip(c, unbound);
    assert_ne!(key, SymbolKey::create(lib.boxed, c).unwrap());
}

#[test]
fn test_file_local_types_need_matching_path() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let hidden = c.add_class(lib.acme, "Hidden");
    c.set_file_local(hidden, WIDGET_FILE);
    let other = c.add_class(lib.acme, "Hidden");
    c.set_file_local(other, "Other.cs");

    assert_round_trip(c, hidden);
    assert_round_trip(c, other);
}

#[test]
fn test_members_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    for member in [
        lib.widget_count,
        lib.widget_title,
        lib.widget_indexer,
        lib.widget_changed,
        lib.render_int,
        lib.render_string,
        lib.swap,
        lib.box_value,
        lib.box_map,
    ] {
        assert_round_trip(c, member);
    }
}

#[test]
fn test_members_of_constructed_types_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let box_of_string = c.construct(lib.boxed, &[lib.string]).unwrap();
    let value = c.members(box_of_string, "Value")[0];
    let map = c.members(box_of_string, "Map")[0];
    assert_round_trip(c, value);
    assert_round_trip(c, map);

    let map_of_int = c.construct(map, &[lib.int32]).unwrap();
    assert_round_trip(c, map_of_int);
}

#[test]
fn test_constructed_method_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let swap_int = c.construct(lib.swap, &[lib.int32]).unwrap();
    let key = assert_round_trip(c, swap_int);
    assert!(key.record().starts_with(" (C"), "{key}");
}

#[test]
fn test_parameters_and_type_parameters_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    for parameter in c.view(lib.box_map).parameters().to_vec() {
        assert_round_trip(c, parameter);
    }
    let index = c.view(lib.widget_indexer).parameters()[0];
    assert_round_trip(c, index);
    assert_round_trip(c, c.type_parameter(lib.boxed, 0));
    assert_round_trip(c, c.type_parameter(lib.swap, 0));
    assert_round_trip(c, c.type_parameter(lib.box_map, 0));
}

#[test]
fn test_structural_types_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let vector = c.create_array_type(lib.int32, 1).unwrap();
    let matrix = c.create_array_type(lib.widget, 2).unwrap();
    let pointer = c.create_pointer_type(lib.int32).unwrap();
    let pointer_to_pointer = c.create_pointer_type(pointer).unwrap();
    let function_pointer = c
        .create_function_pointer_type(FunctionPointerSignature {
            calling_convention: CallingConvention::Unmanaged,
            unmanaged_convention_types: vec![lib.widget],
            return_ref_kind: RefKind::Ref,
            return_type: lib.int32,
            parameters: vec![
                FunctionPointerParameter { ref_kind: RefKind::In, ty: lib.string },
                FunctionPointerParameter { ref_kind: RefKind::None, ty: vector },
            ],
        })
        .unwrap();
    let dynamic = c.dynamic_type().unwrap();

    for ty in [vector, matrix, pointer, pointer_to_pointer, function_pointer, dynamic] {
        assert_round_trip(c, ty);
    }
}

#[test]
fn test_tuples_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let names = [Some("count".to_string()), None];
    let over_error = c
        .create_tuple_type(&[lib.int32, lib.string], &names, &[])
        .unwrap();
    let key = assert_round_trip(c, over_error);
    assert!(key.record().starts_with(" (T 1"), "{key}");

    c.add_type(lib.system, "ValueTuple", symkey_model::TypeKind::Struct, &["T1", "T2"]);
    let locations = [span(WIDGET_FILE, 5, 5), span(WIDGET_FILE, 12, 4)];
    let over_value_tuple = c
        .create_tuple_type(&[lib.widget, lib.int32], &names, &locations)
        .unwrap();
    let key = assert_round_trip(c, over_value_tuple);
    assert!(key.record().starts_with(" (T 0"), "{key}");
}

#[test]
fn test_anonymous_types_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let anonymous = c
        .create_anonymous_type(vec![
            AnonymousProperty {
                name: "Id".into(),
                ty: lib.int32,
                is_read_only: true,
                location: span(WIDGET_FILE, 400, 2),
            },
            AnonymousProperty {
                name: "Label".into(),
                ty: lib.string,
                is_read_only: false,
                location: span(WIDGET_FILE, 404, 5),
            },
        ])
        .unwrap();
    assert_round_trip(c, anonymous);
}

#[test]
fn test_error_types_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let loose = c.create_error_type(None, "Missing", 0);
    let in_namespace = c.create_error_type(Some(lib.acme), "Gone", 1);
    let in_type = c.create_error_type(Some(lib.widget), "Inner", 0);
    let constructed = c.construct(in_namespace, &[lib.int32]).unwrap();

    for ty in [loose, in_namespace, in_type, constructed] {
        assert_round_trip(c, ty);
    }
}

#[test]
fn test_error_type_resolves_without_real_type() {
    let lib = library("Acme.Core");
    let key = SymbolKey::create(lib.compilation.create_error_type(None, "Missing", 0), &lib.compilation)
        .unwrap();
    let fresh = symkey_testkit::compilation("Elsewhere");
    let resolution = key.resolve(&fresh, &ResolveOptions::new()).unwrap();
    let found = resolution.resolved().unwrap();
    assert!(matches!(fresh.view(found).data, SymbolData::ErrorType(_)));
    assert_eq!(fresh.view(found).name, "Missing");
}

#[test]
fn test_error_type_keeps_unconstructed_form_when_arguments_are_missing() {
    let lib = library("Acme.Core");
    let gone = lib.compilation.create_error_type(Some(lib.acme), "Gone", 1);
    let constructed = lib.compilation.construct(gone, &[lib.widget]).unwrap();
    let key = SymbolKey::create(constructed, &lib.compilation).unwrap();

    let fresh = symkey_testkit::compilation("Elsewhere");
    let resolution = key.resolve(&fresh, &ResolveOptions::new()).unwrap();
    let found = fresh.view(resolution.resolved().unwrap());
    assert!(matches!(found.data, SymbolData::ErrorType(_)));
    assert_eq!(found.name, "Gone");
    assert_eq!(found.arity(), 1);
    assert!(!found.as_named_type().unwrap().is_constructed());
}

#[test]
fn test_synthesized_symbols_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let plus = c
        .create_builtin_operator("op_Addition", lib.int32, &[lib.int32, lib.int32])
        .unwrap();
    let define = c.create_preprocessing_symbol("DEBUG").unwrap();
    assert_round_trip(c, plus);
    assert_round_trip(c, define);

    let extensions = c.add_class(lib.acme, "WidgetExtensions");
    let shout = c.add_method(extensions, "Shout", &[]);
    c.add_parameter(shout, "widget", lib.widget);
    c.add_parameter(shout, "volume", lib.int32);
    c.set_extension(shout);
    let reduced = c.reduce_extension_method(shout, lib.widget).unwrap();
    let key = assert_round_trip(c, reduced);
    assert!(key.record().starts_with(" (X"), "{key}");
}

#[test]
fn test_source_only_symbols_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let alias = c.add_alias(lib.acme, "W", lib.widget, span(WIDGET_FILE, 10, 8));
    let cref = c.add_cref_type_parameter("TItem", span(WIDGET_FILE, 190, 5));
    let lambda = c.add_lambda(lib.render_int, span(WIDGET_FILE, 380, 30));
    let delegate = c.add_anonymous_delegate(lambda);
    let local = c.add_local(lib.render_int, "total", Some(lib.int32), span(WIDGET_FILE, 350, 5));
    let label = c.add_body_symbol(
        lib.render_int,
        "done",
        SymbolData::Label,
        span(WIDGET_FILE, 430, 4),
    );
    let range = c.add_body_symbol(
        lib.render_int,
        "x",
        SymbolData::RangeVariable,
        span(WIDGET_FILE, 440, 1),
    );
    let helper = c.add_local_function(lib.render_int, "Helper", span(WIDGET_FILE, 412, 20));
    let in_lambda = c.add_local(lambda, "item", None, span(WIDGET_FILE, 390, 4));

    for symbol in [alias, cref, lambda, delegate, local, label, range, helper, in_lambda] {
        assert_round_trip(c, symbol);
    }
}

#[test]
fn test_partial_method_parts_round_trip() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let definition = c.add_method(lib.widget, "OnRendered", &[]);
    c.add_parameter(definition, "frames", lib.int32);
    let implementation = c.add_partial_implementation(definition);

    assert_round_trip(c, definition);
    let key = assert_round_trip(c, implementation);
    assert_ne!(key, SymbolKey::create(definition, c).unwrap());
}

#[test]
fn test_repeated_symbols_are_back_references() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let merge = c.add_method(lib.widget, "Merge", &[]);
    c.add_parameter(merge, "first", lib.widget);
    c.add_parameter(merge, "second", lib.widget);
    let key = assert_round_trip(c, merge);

    let doc = key.inspect().unwrap();
    let KeyNode::Record { tag, fields, .. } = &doc.root else {
        panic!("expected record, got {:?}", doc.root);
    };
    assert_eq!(*tag, 'M');
    let parameters = fields
        .iter()
        .rev()
        .find_map(|field| match field {
            KeyNode::Array { items } if items.len() == 2 => Some(items),
            _ => None,
        })
        .unwrap();
    assert!(parameters.iter().all(|p| matches!(p, KeyNode::Reference { .. })));
}

#[test]
fn test_keys_are_deterministic() {
    let first = library("Acme.Core");
    let second = library("Acme.Core");
    let a = SymbolKey::create(first.swap, &first.compilation).unwrap();
    let b = SymbolKey::create(second.swap, &second.compilation).unwrap();
    assert_eq!(a.as_str(), b.as_str());
    assert_eq!(a.language().as_deref(), Some("C#"));
}
