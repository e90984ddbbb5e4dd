//! In-memory compilations for symbol key tests
//!
//! [`MemoryCompilation`] is a hand-built [`Compilation`](symkey_model::Compilation):
//! declare namespaces, types and members, then create and resolve keys
//! against it. [`library`] builds the same small program into any number of
//! independent compilations so tests can move keys between them.

#![allow(missing_docs)]

mod arena;
mod memory;

pub use memory::MemoryCompilation;

use symkey_model::{Location, MethodKind, RefKind, SymbolId, TypeKind};

pub const LANGUAGE: &str = "C#";
pub const WIDGET_FILE: &str = "Widget.cs";

/// Empty C# compilation
pub fn compilation(assembly_name: &str) -> MemoryCompilation {
    MemoryCompilation::new(LANGUAGE, assembly_name)
}

/// Source location shorthand
pub fn span(path: &str, start: u32, length: u32) -> Location {
    Location::source(path, start, length)
}

/// Handles into the program built by [`library`]
#[derive(Debug)]
pub struct Library {
    pub compilation: MemoryCompilation,
    pub system: SymbolId,
    pub int32: SymbolId,
    pub string: SymbolId,
    pub acme: SymbolId,
    /// `Acme.Box<T>` with field `Value` and method `Map<U>(T, U)`
    pub boxed: SymbolId,
    pub box_value: SymbolId,
    pub box_map: SymbolId,
    /// `Acme.Widget`
    pub widget: SymbolId,
    pub widget_count: SymbolId,
    pub widget_title: SymbolId,
    pub widget_indexer: SymbolId,
    pub widget_changed: SymbolId,
    /// `Render(int)` and its overload `Render(string)`
    pub render_int: SymbolId,
    pub render_string: SymbolId,
    /// `Swap<T>(ref T, ref T)`
    pub swap: SymbolId,
    /// `Acme.Handler(int value)` delegate
    pub handler: SymbolId,
    /// `Acme.Widget.Part` nested class
    pub part: SymbolId,
}

/// Build the sample program into a fresh compilation
///
/// ```text
/// namespace System { struct Int32; struct String; }
/// namespace Acme {
///     delegate void Handler(int value);
///     class Box<T> { T Value; U Map<U>(T item, U seed); }
///     class Widget {
///         int Count; string Title { get; } int this[int index];
///         event Handler Changed;
///         void Render(int depth); void Render(string label);
///         void Swap<T>(ref T left, ref T right);
///         class Part { }
///     }
/// }
/// ```
pub fn library(assembly_name: &str) -> Library {
    let compilation = compilation(assembly_name);
    let global = compilation.source_global();
    let int32 = compilation.system_type("Int32");
    let string = compilation.system_type("String");
    let system = compilation.view(int32).container.unwrap_or(global);

    let acme = compilation.add_namespace(global, "Acme");
    compilation.add_location(acme, span(WIDGET_FILE, 0, 900));
    let handler = compilation.add_delegate(acme, "Handler", &[("value", int32)], None);
    compilation.add_location(handler, span(WIDGET_FILE, 20, 30));

    let boxed = compilation.add_type(acme, "Box", TypeKind::Class, &["T"]);
    compilation.add_location(boxed, span(WIDGET_FILE, 60, 120));
    let box_t = compilation.type_parameter(boxed, 0);
    let box_value = compilation.add_field(boxed, "Value", box_t);
    compilation.add_location(box_value, span(WIDGET_FILE, 80, 10));
    let box_map = compilation.add_method(boxed, "Map", &["U"]);
    let map_u = compilation.type_parameter(box_map, 0);
    compilation.add_parameter(box_map, "item", box_t);
    compilation.add_parameter(box_map, "seed", map_u);
    compilation.set_return_type(box_map, map_u);
    compilation.add_location(box_map, span(WIDGET_FILE, 100, 60));

    let widget = compilation.add_class(acme, "Widget");
    compilation.add_location(widget, span(WIDGET_FILE, 200, 600));
    let widget_count = compilation.add_field(widget, "Count", int32);
    compilation.add_location(widget_count, span(WIDGET_FILE, 220, 10));
    let widget_title = compilation.add_property(widget, "Title", string);
    compilation.add_location(widget_title, span(WIDGET_FILE, 240, 20));
    let widget_indexer = compilation.add_indexer(widget, int32);
    compilation.add_parameter(widget_indexer, "index", int32);
    compilation.add_location(widget_indexer, span(WIDGET_FILE, 270, 30));
    let widget_changed = compilation.add_event(widget, "Changed", handler);
    compilation.add_location(widget_changed, span(WIDGET_FILE, 310, 20));

    let render_int = compilation.add_method(widget, "Render", &[]);
    compilation.add_parameter(render_int, "depth", int32);
    compilation.add_location(render_int, span(WIDGET_FILE, 340, 100));
    let render_string = compilation.add_method(widget, "Render", &[]);
    compilation.add_parameter(render_string, "label", string);
    compilation.add_location(render_string, span(WIDGET_FILE, 450, 100));

    let swap = compilation.add_method(widget, "Swap", &["T"]);
    let swap_t = compilation.type_parameter(swap, 0);
    compilation.add_ref_parameter(swap, "left", swap_t, RefKind::Ref);
    compilation.add_ref_parameter(swap, "right", swap_t, RefKind::Ref);
    compilation.add_location(swap, span(WIDGET_FILE, 560, 80));

    let part = compilation.add_class(widget, "Part");
    compilation.add_location(part, span(WIDGET_FILE, 700, 40));

    Library {
        compilation,
        system,
        int32,
        string,
        acme,
        boxed,
        box_value,
        box_map,
        widget,
        widget_count,
        widget_title,
        widget_indexer,
        widget_changed,
        render_int,
        render_string,
        swap,
        handler,
        part,
    }
}

/// Declare `Widget.op_Implicit(Widget) -> int` and `-> string`, two
/// conversions told apart only by return type
pub fn add_conversions(library: &Library) -> (SymbolId, SymbolId) {
    let compilation = &library.compilation;
    let declare = |ret: SymbolId| {
        let method = compilation.add_method_of_kind(
            library.widget,
            "op_Implicit",
            MethodKind::Conversion,
            &[],
        );
        compilation.add_parameter(method, "value", library.widget);
        compilation.set_return_type(method, ret);
        method
    };
    (declare(library.int32), declare(library.string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use symkey_model::{Compilation, SymbolData, SymbolKind};

    #[test]
    fn lookup_goes_through_the_compilation_global() {
        let lib = library("Acme.Core");
        let global = lib.compilation.global_namespace();
        let acme = lib.compilation.members(global, "Acme");
        assert_eq!(acme, vec![lib.acme]);
        assert_eq!(
            lib.compilation.members(lib.widget, "Render"),
            vec![lib.render_int, lib.render_string]
        );
        assert_eq!(lib.compilation.type_members(lib.acme, "Box", 1), vec![lib.boxed]);
        assert!(lib.compilation.type_members(lib.acme, "Box", 0).is_empty());
    }

    #[test]
    fn referenced_assemblies_contribute_members() {
        let lib = library("Acme.Core");
        let other = lib.compilation.add_reference("Vendor");
        let vendor_global = lib.compilation.global_of(other);
        let vendor = lib.compilation.add_namespace(vendor_global, "Vendor");

        let global = lib.compilation.global_namespace();
        assert_eq!(lib.compilation.members(global, "Vendor"), vec![vendor]);
        assert_eq!(lib.compilation.referenced_assemblies(), vec![other]);
    }

    #[test]
    fn construction_is_interned_and_substitutes_members() {
        let lib = library("Acme.Core");
        let c = &lib.compilation;
        let first = c.construct(lib.boxed, &[lib.int32]).unwrap();
        let second = c.construct(lib.boxed, &[lib.int32]).unwrap();
        assert_eq!(first, second);
        assert!(c.construct(lib.boxed, &[]).is_none());

        let value = c.members(first, "Value");
        assert_eq!(value.len(), 1);
        match &c.view(value[0]).data {
            SymbolData::Field(field) => assert_eq!(field.ty, lib.int32),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(c.view(value[0]).original_definition, Some(lib.box_value));
    }

    #[test]
    fn case_insensitive_lookup() {
        let c = compilation("Acme").case_insensitive();
        let global = c.source_global();
        let ns = c.add_namespace(global, "Acme");
        assert_eq!(c.members(c.global_namespace(), "ACME"), vec![ns]);
        assert!(!c.is_case_sensitive());
    }

    #[test]
    fn syntax_tree_nests_declarations_by_container() {
        let lib = library("Acme.Core");
        let tree = lib.compilation.syntax_tree(WIDGET_FILE).unwrap();
        assert_eq!(tree.children.len(), 1);
        let acme = &tree.children[0];
        assert_eq!(acme.declared, Some(lib.acme));
        let declared: Vec<_> = acme.children.iter().filter_map(|n| n.declared).collect();
        assert_eq!(declared, vec![lib.handler, lib.boxed, lib.widget]);
        assert!(lib.compilation.syntax_tree("Missing.cs").is_none());
    }

    #[test]
    fn body_declarations_follow_source_order() {
        let lib = library("Acme.Core");
        let c = &lib.compilation;
        let second = c.add_local(lib.render_int, "b", Some(lib.int32), span(WIDGET_FILE, 400, 1));
        let first = c.add_local(lib.render_int, "a", Some(lib.int32), span(WIDGET_FILE, 360, 1));
        let lambda = c.add_lambda(lib.render_int, span(WIDGET_FILE, 410, 20));
        let nested = c.add_local(lambda, "x", None, span(WIDGET_FILE, 420, 1));

        assert_eq!(c.body_declarations(lib.render_int), vec![first, second, nested]);
        assert_eq!(c.view(nested).kind(), SymbolKind::Local);
        let at = c.symbols_at(c.view(first).first_location().as_source().unwrap());
        assert_eq!(at, vec![first]);
    }

    #[test]
    fn removing_a_file_hides_its_tree() {
        let lib = library("Acme.Core");
        assert!(lib.compilation.contains_syntax_tree(WIDGET_FILE));
        lib.compilation.remove_source_file(WIDGET_FILE);
        assert!(!lib.compilation.contains_syntax_tree(WIDGET_FILE));
    }

    #[test]
    fn conversions_differ_only_by_return_type() {
        let lib = library("Acme.Core");
        let (to_int, to_string) = add_conversions(&lib);
        let c = &lib.compilation;
        assert_eq!(c.members(lib.widget, "op_Implicit"), vec![to_int, to_string]);
        assert_eq!(c.view(to_int).as_method().unwrap().return_type, Some(lib.int32));
    }
}
