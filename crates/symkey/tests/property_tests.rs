use proptest::prelude::*;
use symkey::prelude::*;
use symkey::FORMAT_VERSION;
use symkey_model::{Compilation, TypeKind};
use symkey_testkit::library;

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_\"]{0,10}"
}

proptest! {
    #[test]
    fn prop_declared_types_round_trip(
        namespaces in proptest::collection::vec(identifier(), 1..4),
        name in identifier(),
        arity in 0usize..3,
    ) {
        let lib = library("Acme.Core");
        let c = &lib.compilation;
        let mut container = c.source_global();
        for namespace in &namespaces {
            container = c.add_namespace(container, namespace);
        }
        let parameters: Vec<String> = (0..arity).map(|i| format!("T{i}")).collect();
        let parameters: Vec<&str> = parameters.iter().map(String::as_str).collect();
        let ty = c.add_type(container, &name, TypeKind::Class, &parameters);

        let key = SymbolKey::create(ty, c).unwrap();
        let resolution = key.resolve(c, &ResolveOptions::new()).unwrap();
        prop_assert_eq!(resolution.first_symbol(), Some(ty));
        prop_assert_eq!(key.inspect().unwrap().record_count(), namespaces.len() + 4);
    }

    #[test]
    fn prop_parsed_keys_keep_their_text(index in 0usize..6) {
        let lib = library("Acme.Core");
        let symbols = [lib.widget, lib.swap, lib.box_map, lib.widget_indexer, lib.render_string, lib.part];
        let key = SymbolKey::create(symbols[index], &lib.compilation).unwrap();
        let parsed: SymbolKey = key.as_str().parse().unwrap();
        prop_assert_eq!(parsed.as_str(), key.as_str());
        prop_assert_eq!(&parsed, &key);
        prop_assert_eq!(SymbolKey::format_version(key.as_str()), Some(FORMAT_VERSION));
    }

    #[test]
    fn prop_case_insensitive_comparer_matches_case_variants(upper in proptest::bool::ANY) {
        let lib = library("Acme.Core");
        let key = SymbolKey::create_string(lib.widget_title, &lib.compilation).unwrap();
        let variant = if upper { key.to_uppercase() } else { key.to_lowercase() };
        let comparer = SymbolKey::comparer(true, false);
        prop_assert!(comparer.equals(&key, &variant));
        prop_assert_eq!(comparer.hash_of(&key), comparer.hash_of(&variant));
        prop_assert!(!SymbolKey::comparer(false, false).equals(&key, &variant));
    }
}

#[test]
fn test_keys_hash_by_record() {
    use std::collections::HashSet;

    let lib = library("Acme.Core");
    let set: HashSet<SymbolKey> = [lib.widget, lib.widget, lib.part]
        .into_iter()
        .map(|symbol| SymbolKey::create(symbol, &lib.compilation).unwrap())
        .collect();
    assert_eq!(set.len(), 2);
    assert!(lib.compilation.is_case_sensitive());
}
