use pretty_assertions::assert_eq;
use symkey::prelude::*;
use symkey::CandidateReason;
use symkey_model::{Compilation, SymbolId};
use symkey_testkit::{add_conversions, library, span, Library, WIDGET_FILE};

fn resolve(key: &SymbolKey, compilation: &dyn Compilation) -> SymbolKeyResolution {
    key.resolve(compilation, &ResolveOptions::new()).unwrap()
}

fn key_of(lib: &Library, symbol: SymbolId) -> SymbolKey {
    SymbolKey::create(symbol, &lib.compilation).unwrap()
}

#[test]
fn test_keys_move_between_compilations() {
    let old = library("Acme.Core");
    let new = library("Acme.Core");
    // Unrelated edit in the new compilation.
    new.compilation.add_class(new.acme, "Padding");

    let pairs = [
        (old.widget, new.widget),
        (old.render_string, new.render_string),
        (old.widget_indexer, new.widget_indexer),
        (old.swap, new.swap),
        (old.box_map, new.box_map),
    ];
    for (before, after) in pairs {
        assert_eq!(resolve(&key_of(&old, before), &new.compilation).resolved(), Some(after));
    }
}

#[test]
fn test_overloads_are_told_apart_by_parameter_types() {
    let lib = library("Acme.Core");
    assert_eq!(resolve(&key_of(&lib, lib.render_int), &lib.compilation).resolved(), Some(lib.render_int));
    assert_eq!(
        resolve(&key_of(&lib, lib.render_string), &lib.compilation).resolved(),
        Some(lib.render_string)
    );
}

#[test]
fn test_ref_kinds_take_part_in_matching() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let by_value = c.add_method(lib.widget, "Fill", &[]);
    c.add_parameter(by_value, "buffer", lib.int32);
    let by_ref = c.add_method(lib.widget, "Fill", &[]);
    c.add_ref_parameter(by_ref, "buffer", lib.int32, symkey_model::RefKind::Out);

    assert_eq!(resolve(&key_of(&lib, by_value), c).resolved(), Some(by_value));
    assert_eq!(resolve(&key_of(&lib, by_ref), c).resolved(), Some(by_ref));
}

#[test]
fn test_conversions_differ_by_return_type() {
    let lib = library("Acme.Core");
    let (to_int, to_string) = add_conversions(&lib);
    let int_key = key_of(&lib, to_int);
    let string_key = key_of(&lib, to_string);
    assert_ne!(int_key, string_key);
    assert_eq!(resolve(&int_key, &lib.compilation).resolved(), Some(to_int));
    assert_eq!(resolve(&string_key, &lib.compilation).resolved(), Some(to_string));
}

#[test]
fn test_return_type_only_overloads_are_ambiguous() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let parse_int = c.add_method(lib.widget, "Parse", &[]);
    c.add_parameter(parse_int, "text", lib.string);
    c.set_return_type(parse_int, lib.int32);
    let parse_string = c.add_method(lib.widget, "Parse", &[]);
    c.add_parameter(parse_string, "text", lib.string);
    c.set_return_type(parse_string, lib.string);

    let key = key_of(&lib, parse_int);
    assert_eq!(key.as_str(), key_of(&lib, parse_string).as_str());
    let resolution = resolve(&key, c);
    assert_eq!(resolution.resolved(), None);
    assert_eq!(resolution.candidates(), &[parse_int, parse_string]);
    assert!(matches!(
        resolution,
        SymbolKeyResolution::Candidates { reason: CandidateReason::Ambiguous, .. }
    ));
}

#[test]
fn test_ordinary_methods_ignore_return_type() {
    let old = library("Acme.Core");
    let new = library("Acme.Core");
    new.compilation.set_return_type(new.render_int, new.string);
    assert_eq!(
        resolve(&key_of(&old, old.render_int), &new.compilation).resolved(),
        Some(new.render_int)
    );
}

#[test]
fn test_renamed_parameter_falls_back_to_ordinal() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let seed = c.view(lib.box_map).parameters()[1];
    let key = key_of(&lib, seed);

    c.rename(seed, "initial");
    assert_eq!(resolve(&key, c).resolved(), Some(seed));
}

#[test]
fn test_parameter_name_wins_over_ordinal() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let method = c.add_method(lib.widget, "Move", &[]);
    let x = c.add_parameter(method, "x", lib.int32);
    let y = c.add_parameter(method, "y", lib.int32);
    let key = key_of(&lib, y);

    c.rename(x, "y");
    c.rename(y, "x");
    assert_eq!(resolve(&key, c).resolved(), Some(x));
}

#[test]
fn test_event_parameters_come_from_the_delegate() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let invoke = c.view(lib.handler).as_named_type().unwrap().delegate_invoke_method.unwrap();
    let value = c.view(invoke).parameters()[0];
    let event = key_of(&lib, lib.widget_changed);
    let key = format!(r#"5 "C#" (P "value" 0{} 99)"#, event.record());
    let resolution = SymbolKey::resolve_string(&key, c, false).unwrap();
    assert_eq!(resolution.resolved(), Some(value));
}

#[test]
fn test_missing_member_reports_breadcrumb() {
    let old = library("Acme.Core");
    let new = symkey_testkit::compilation("Acme.Core");
    let global = new.source_global();
    new.add_namespace(global, "Acme");

    let resolution = resolve(&key_of(&old, old.widget_count), &new);
    let reason = resolution.failure_reason().unwrap();
    assert!(reason.starts_with("(Field containingType failed -> (NamedType name failed)"), "{reason}");
}

#[test]
fn test_method_signature_mismatch_reports_signature() {
    let old = library("Acme.Core");
    let new = library("Acme.Core");
    let param = new.compilation.view(new.render_int).parameters()[0];
    new.compilation.update(param, |symbol| {
        if let symkey_model::SymbolData::Parameter(data) = &mut symbol.data {
            data.ty = new.widget;
        }
    });

    let resolution = resolve(&key_of(&old, old.render_int), &new.compilation);
    assert_eq!(resolution.failure_reason(), Some("(Method signature failed)"));
}

#[test]
fn test_assembly_names_are_ignored_on_request() {
    let old = library("Acme.Core");
    let renamed = library("Acme.Core.V2");
    let key = key_of(&old, old.swap);

    let strict = resolve(&key, &renamed.compilation);
    assert!(!strict.is_found());
    assert!(strict.failure_reason().unwrap().contains("(Assembly name failed)"));

    let relaxed = key
        .resolve(&renamed.compilation, &ResolveOptions::new().with_ignore_assembly_key(true))
        .unwrap();
    assert_eq!(relaxed.resolved(), Some(renamed.swap));

    let other = key_of(&renamed, renamed.swap);
    assert_ne!(key, other);
    assert!(SymbolKey::comparer(false, true).equals(key.as_str(), other.as_str()));
    assert_eq!(
        SymbolKey::comparer(false, true).hash_of(key.as_str()),
        SymbolKey::comparer(false, true).hash_of(other.as_str())
    );
}

#[test]
fn test_duplicate_declarations_are_ambiguous() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let vendor = c.add_reference("Vendor");
    let vendor_acme = c.add_namespace(c.global_of(vendor), "Acme");
    let vendor_widget = c.add_class(vendor_acme, "Widget");
    let key = key_of(&lib, lib.widget);

    let options = ResolveOptions::new().with_ignore_assembly_key(true);
    let resolution = key.resolve(c, &options).unwrap();
    assert_eq!(resolution.candidates(), &[lib.widget, vendor_widget]);
    assert!(matches!(
        resolution,
        SymbolKeyResolution::Candidates { reason: CandidateReason::Ambiguous, .. }
    ));

    let preferred = key
        .resolve(c, &options.clone().with_contextual_symbol(vendor_widget))
        .unwrap();
    assert_eq!(preferred.resolved(), Some(vendor_widget));
}

#[test]
fn test_local_survives_body_edits() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let first = c.add_local(lib.render_int, "item", None, span(WIDGET_FILE, 350, 4));
    let second = c.add_local(lib.render_int, "item", None, span(WIDGET_FILE, 370, 4));
    let key = key_of(&lib, second);

    // Text inserted above both declarations.
    c.update(first, |s| s.locations = vec![span(WIDGET_FILE, 355, 4)]);
    c.update(second, |s| s.locations = vec![span(WIDGET_FILE, 375, 4)]);
    assert_eq!(resolve(&key, c).resolved(), Some(second));
}

#[test]
fn test_local_ordinal_out_of_range_fails() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let local = c.add_local(lib.render_int, "item", None, span(WIDGET_FILE, 350, 4));
    let key = key_of(&lib, local);

    let fresh = library("Acme.Core");
    let resolution = resolve(&key, &fresh.compilation);
    assert_eq!(resolution.failure_reason(), Some("(BodyLevel ordinal failed)"));
}

#[test]
fn test_lambda_needs_its_file() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let lambda = c.add_lambda(lib.render_int, span(WIDGET_FILE, 380, 30));
    assert!(SymbolKey::can_create(lambda, c));
    let key = key_of(&lib, lambda);

    c.remove_source_file(WIDGET_FILE);
    assert!(!SymbolKey::can_create(lambda, c));
    assert!(SymbolKey::can_create(lib.widget, c));
    let resolution = resolve(&key, c);
    assert_eq!(
        resolution.failure_reason(),
        Some("(AnonymousFunctionOrDelegate syntaxTree failed)")
    );
}

#[test]
fn test_alias_is_found_in_its_file_only() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let alias = c.add_alias(lib.acme, "W", lib.widget, span(WIDGET_FILE, 10, 8));
    let elsewhere = c.add_alias(lib.acme, "W", lib.widget, span("Other.cs", 10, 8));

    assert_eq!(resolve(&key_of(&lib, alias), c).resolved(), Some(alias));
    assert_eq!(resolve(&key_of(&lib, elsewhere), c).resolved(), Some(elsewhere));
}

#[test]
fn test_case_insensitive_compilation_matches_names() {
    let old = library("Acme.Core");
    let key = key_of(&old, old.widget_count).to_string().replace("\"Count\"", "\"COUNT\"");

    let strict = SymbolKey::resolve_string(&key, &old.compilation, false).unwrap();
    assert!(!strict.is_found());

    let relaxed = library("Acme.Core");
    let compilation = relaxed.compilation.case_insensitive();
    let resolution = SymbolKey::resolve_string(&key, &compilation, false).unwrap();
    assert_eq!(resolution.resolved(), Some(relaxed.widget_count));
}

#[test]
fn test_null_key_resolves_to_nothing() {
    let lib = library("Acme.Core");
    let resolution = SymbolKey::resolve_string(r#"5 "C#" !"#, &lib.compilation, false).unwrap();
    assert!(resolution.is_null());
    assert_eq!(resolution.failure_reason(), None);
}
