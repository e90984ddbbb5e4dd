use pretty_assertions::assert_eq;
use symkey::prelude::*;
use symkey_model::{Compilation, SymbolId};
use symkey_testkit::{library, Library};

fn generic_method_with_arity(lib: &Library, name: &str, parameter_count: usize) -> SymbolId {
    let c = &lib.compilation;
    let method = c.add_method(lib.widget, name, &["T"]);
    let t = c.type_parameter(method, 0);
    for index in 0..parameter_count {
        c.add_parameter(method, &format!("p{index}"), t);
    }
    method
}

#[test]
fn test_version_mismatch_is_an_error() {
    let lib = library("Acme.Core");
    let key = SymbolKey::create(lib.widget, &lib.compilation).unwrap();
    let old = key.as_str().replacen('5', "4", 1);
    assert_eq!(SymbolKey::format_version(&old), Some(4));

    let err = SymbolKey::resolve_string(&old, &lib.compilation, false).unwrap_err();
    assert_eq!(err, SymbolKeyError::FormatVersionMismatch { expected: 5, found: 4 });
    assert!(err.is_version_mismatch());
}

#[test]
fn test_malformed_keys_are_errors() {
    let lib = library("Acme.Core");
    for text in ["", "5", r#"5 "C#""#, r#"5 "C#" (D"#, r#"5 "C#" (Q 1 2)"#, r#"5 "C#" ! trailing"#] {
        let err = SymbolKey::resolve_string(text, &lib.compilation, false).unwrap_err();
        assert!(matches!(err, SymbolKeyError::Malformed { .. }), "{text:?} gave {err}");
    }
    assert!("not a key".parse::<SymbolKey>().is_err());
}

#[test]
fn test_tuple_element_arrays_must_agree() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let names = [Some("count".to_string()), None];
    let tuple = c.create_tuple_type(&[lib.int32, lib.string], &names, &[]).unwrap();
    let key = SymbolKey::create(tuple, c).unwrap();

    let short_names = key.as_str().replacen(r#"(% 2 "count" !)"#, r#"(% 1 "count")"#, 1);
    let short_both = short_names.replacen("(% 2 0 0)", "(% 1 0)", 1);
    for text in [short_names, short_both] {
        assert_ne!(text, key.as_str());
        let err = SymbolKey::resolve_string(&text, c, false).unwrap_err();
        assert!(matches!(err, SymbolKeyError::Malformed { .. }), "{text} gave {err}");
    }
}

#[test]
fn test_cancelled_resolution_stops() {
    let lib = library("Acme.Core");
    let key = SymbolKey::create(lib.swap, &lib.compilation).unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let options = ResolveOptions::new().with_cancellation(token);
    let err = key.resolve(&lib.compilation, &options).unwrap_err();
    assert_eq!(err, SymbolKeyError::Cancelled);
}

#[test]
fn test_nesting_limit_is_enforced() {
    let lib = library("Acme.Core");
    let c = &lib.compilation;
    let mut ty = lib.int32;
    for _ in 0..6 {
        ty = c.construct(lib.boxed, &[ty]).unwrap();
    }
    let key = SymbolKey::create(ty, c).unwrap();

    let shallow = ResolveOptions::new().with_max_nesting_depth(4);
    let err = key.resolve(c, &shallow).unwrap_err();
    assert_eq!(err, SymbolKeyError::NestingTooDeep { limit: 4 });
    assert_eq!(key.resolve(c, &ResolveOptions::new()).unwrap().resolved(), Some(ty));
}

#[test]
fn test_service_limit_caps_caller_limit() {
    let lib = library("Acme.Core");
    let service = SymbolKeyService::new(SymbolKeyConfig::new().with_max_nesting_depth(3)).unwrap();
    let key = service.create_string(lib.widget_count, &lib.compilation).unwrap();
    let err = service
        .resolve_string(&key, &lib.compilation, &ResolveOptions::new())
        .unwrap_err();
    assert_eq!(err, SymbolKeyError::NestingTooDeep { limit: 3 });
}

#[test]
fn test_method_type_parameters_do_not_recurse() {
    let lib = library("Acme.Core");
    let method = generic_method_with_arity(&lib, "Many", 8);
    let key = SymbolKey::create(method, &lib.compilation).unwrap();
    assert_eq!(key.as_str().matches("(@ 0 0)").count(), 8);
    assert_eq!(
        key.resolve(&lib.compilation, &ResolveOptions::new()).unwrap().resolved(),
        Some(method)
    );
}

#[test]
fn test_key_size_grows_linearly_with_parameters() {
    let lib = library("Acme.Core");
    let lengths: Vec<usize> = [10, 20, 30]
        .iter()
        .map(|count| {
            let method = generic_method_with_arity(&lib, &format!("Many{count}"), *count);
            SymbolKey::create_string(method, &lib.compilation).unwrap().len()
        })
        .collect();
    assert_eq!(lengths[1] - lengths[0], lengths[2] - lengths[1]);
}

#[test]
fn test_unknown_symbol_is_a_create_error() {
    let lib = library("Acme.Core");
    let missing = SymbolId::new(u32::MAX - 1);
    assert!(SymbolKey::create(missing, &lib.compilation).is_err());
    assert!(!SymbolKey::can_create(missing, &lib.compilation));
}

#[test]
fn test_pools_are_reused() {
    let lib = library("Acme.Core");
    let service = SymbolKeyService::new(SymbolKeyConfig::new().with_pool_capacity(2)).unwrap();
    for symbol in [lib.widget, lib.swap, lib.widget_title] {
        let key = service.create_string(symbol, &lib.compilation).unwrap();
        let resolution = service
            .resolve_string(&key, &lib.compilation, &ResolveOptions::new())
            .unwrap();
        assert_eq!(resolution.resolved(), Some(symbol));
    }
    assert!(service.writer_stats().total_reused >= 2);
    assert!(service.reader_stats().total_reused >= 2);
    assert_eq!(lib.compilation.language(), "C#");
}
