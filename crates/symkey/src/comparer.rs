//! Key comparison
//!
//! Keys compare by their record text; the version and language header is
//! ignored. Two relaxations are optional: case-insensitive comparison of the
//! whole record, and erasing every assembly name so a key written against
//! one build of a library equals a key written against another.

use crate::config::ComparisonOptions;
use crate::grammar::{self, SymbolKeyType};
use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// Equality and hashing over key strings
///
/// `equals(a, b)` implies `hash_of(a) == hash_of(b)` for the same comparer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolKeyComparer {
    options: ComparisonOptions,
}

impl SymbolKeyComparer {
    /// Create comparer
    #[inline]
    #[must_use]
    pub const fn new(options: ComparisonOptions) -> Self {
        Self { options }
    }

    /// Comparison options
    #[inline]
    #[must_use]
    pub const fn options(&self) -> ComparisonOptions {
        self.options
    }

    /// Check if two keys identify the same symbol under this comparer
    #[must_use]
    pub fn equals(&self, a: &str, b: &str) -> bool {
        let a = self.normalize(a);
        let b = self.normalize(b);
        if self.options.ignore_case {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        } else {
            a == b
        }
    }

    /// Feed the comparable part of `key` into `state`
    pub fn hash_key<H: Hasher>(&self, key: &str, state: &mut H) {
        let normalized = self.normalize(key);
        if self.options.ignore_case {
            for c in normalized.chars().flat_map(char::to_lowercase) {
                c.hash(state);
            }
        } else {
            for c in normalized.chars() {
                c.hash(state);
            }
        }
    }

    /// Hash of `key` consistent with [`Self::equals`]
    #[must_use]
    pub fn hash_of(&self, key: &str) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash_key(key, &mut hasher);
        hasher.finish()
    }

    /// Record text with assembly names erased when requested
    fn normalize<'k>(&self, key: &'k str) -> Cow<'k, str> {
        let record = grammar::split_header(key).map_or(key, |header| header.record);
        if self.options.ignore_assembly_keys {
            scrub_assembly_names(record)
        } else {
            Cow::Borrowed(record)
        }
    }
}

/// Remove the name string of every assembly record
///
/// `(S "Lib" 3)` becomes `(S 3)`. Tag characters inside string literals
/// are left alone. Runs in one pass over the text.
#[must_use]
pub fn scrub_assembly_names(record: &str) -> Cow<'_, str> {
    let assembly = SymbolKeyType::Assembly.as_char();
    let bytes = record.as_bytes();
    let mut scrubbed: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i = grammar::parse_quoted(record, i).map_or(bytes.len(), |(_, end)| end);
            }
            b'(' if record[i + 1..].starts_with(assembly) => {
                let name_start = i + 2;
                if record[name_start..].starts_with(" \"") {
                    let name_end = grammar::parse_quoted(record, name_start + 1)
                        .map_or(bytes.len(), |(_, end)| end);
                    let out = scrubbed.get_or_insert_with(|| String::with_capacity(record.len()));
                    out.push_str(&record[copied..name_start]);
                    copied = name_end;
                    i = name_end;
                } else {
                    i = name_start;
                }
            }
            _ => i += 1,
        }
    }
    match scrubbed {
        Some(mut out) => {
            out.push_str(&record[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LIB_V1: &str = r#"5 "C#" (D (N "" 1 (U (S "Lib, Version=1.0" 0) 1) 2) "List" 1 ! 0 (% 0) 3)"#;
    const LIB_V2: &str = r#"5 "C#" (D (N "" 1 (U (S "Lib, Version=2.0" 0) 1) 2) "List" 1 ! 0 (% 0) 3)"#;

    #[test]
    fn scrub_erases_assembly_names_only() {
        assert_eq!(
            scrub_assembly_names(r#" (U (S "Lib" 0) 1)"#),
            r#" (U (S 0) 1)"#
        );
        let plain = r#" (F "(S ""x"" 0)" ! 0)"#;
        assert!(matches!(scrub_assembly_names(plain), Cow::Borrowed(_)));
    }

    #[test]
    fn assembly_agnostic_equality() {
        let strict = SymbolKeyComparer::new(ComparisonOptions::new(false, false));
        let relaxed = SymbolKeyComparer::new(ComparisonOptions::new(false, true));
        assert!(!strict.equals(LIB_V1, LIB_V2));
        assert!(relaxed.equals(LIB_V1, LIB_V2));
        assert_eq!(relaxed.hash_of(LIB_V1), relaxed.hash_of(LIB_V2));
    }

    #[test]
    fn header_is_not_compared() {
        let comparer = SymbolKeyComparer::default();
        assert!(comparer.equals(r#"5 "C#" (p "DEBUG" 0)"#, r#"5 "VB" (p "DEBUG" 0)"#));
    }

    #[test]
    fn case_insensitive_equality() {
        let comparer = SymbolKeyComparer::new(ComparisonOptions::new(true, false));
        let a = r#"5 "VB" (p "Debug" 0)"#;
        let b = r#"5 "VB" (p "DEBUG" 0)"#;
        assert!(comparer.equals(a, b));
        assert_eq!(comparer.hash_of(a), comparer.hash_of(b));
        assert!(!SymbolKeyComparer::default().equals(a, b));
    }

    proptest! {
        #[test]
        fn scrubbing_is_idempotent(names in prop::collection::vec("[a-zA-Z\" (]{0,8}", 1..4)) {
            let mut record = String::new();
            for (i, name) in names.iter().enumerate() {
                record.push_str(" (S ");
                grammar::push_quoted(&mut record, name);
                record.push_str(&format!(" {i})"));
            }
            let once = scrub_assembly_names(&record).into_owned();
            let twice = scrub_assembly_names(&once).into_owned();
            prop_assert_eq!(&once, &twice);
            prop_assert!(!once.contains('"'));
        }

        #[test]
        fn equal_keys_hash_equal(name in "[a-zA-Z]{1,12}", upper in any::<bool>()) {
            let comparer = SymbolKeyComparer::new(ComparisonOptions::new(true, true));
            let a = format!(r#"5 "C#" (p "{name}" 0)"#);
            let shifted = if upper { name.to_uppercase() } else { name.to_lowercase() };
            let b = format!(r#"5 "C#" (p "{shifted}" 0)"#);
            prop_assert!(comparer.equals(&a, &b));
            prop_assert_eq!(comparer.hash_of(&a), comparer.hash_of(&b));
        }
    }
}
