//! Symbol writer
//!
//! Walks a symbol and its structural dependencies depth-first and emits the
//! key grammar. Each record gets an id after its children are written; a
//! symbol reached again in the same call is emitted as a back-reference.

use crate::error::Result;
use crate::grammar::{self, location_kind, SymbolKeyType, FORMAT_VERSION};
use crate::kinds;
use crate::pool::Reset;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use symkey_model::{Compilation, Location, RefKind, Symbol, SymbolId, TypeParameterKind};

/// Reusable writer state
#[derive(Debug, Default)]
pub(crate) struct WriterState {
    /// Key text being produced
    buffer: String,
    /// Symbol → record id for this call
    references: HashMap<SymbolId, u32>,
    /// Definitions of methods whose signature is being written
    method_stack: SmallVec<[SymbolId; 4]>,
    /// Next record id
    next_id: u32,
}

impl Reset for WriterState {
    fn reset(&mut self) {
        debug_assert!(
            self.method_stack.is_empty(),
            "writer returned with methods still pushed"
        );
        self.buffer.clear();
        self.references.clear();
        self.method_stack.clear();
        self.next_id = 0;
    }
}

/// Writer over a checked-out state
pub(crate) struct SymbolKeyWriter<'a> {
    state: &'a mut WriterState,
    compilation: &'a dyn Compilation,
}

impl<'a> SymbolKeyWriter<'a> {
    /// Create writer
    pub(crate) fn new(state: &'a mut WriterState, compilation: &'a dyn Compilation) -> Self {
        Self { state, compilation }
    }

    /// Compilation the symbols belong to
    #[inline]
    pub(crate) fn compilation(&self) -> &'a dyn Compilation {
        self.compilation
    }

    /// View of a symbol
    #[inline]
    pub(crate) fn require(&self, id: SymbolId) -> Result<Arc<Symbol>> {
        Ok(self.compilation.require(id)?)
    }

    /// Write a complete key for `symbol`
    pub(crate) fn write_key(&mut self, symbol: SymbolId) -> Result<String> {
        let _ = write!(self.state.buffer, "{FORMAT_VERSION} ");
        grammar::push_quoted(&mut self.state.buffer, self.compilation.language());
        self.write_symbol_key(Some(symbol))?;
        Ok(self.state.buffer.clone())
    }

    /// Write a symbol key field
    pub(crate) fn write_symbol_key(&mut self, symbol: Option<SymbolId>) -> Result<()> {
        let Some(id) = symbol else {
            self.state.buffer.push_str(" !");
            return Ok(());
        };

        let view = self.require(id)?;
        if let Some(ordinal) = self.method_type_parameter(&view) {
            let _ = write!(self.state.buffer, " (@ {} {})", ordinal.0, ordinal.1);
            return Ok(());
        }

        if let Some(existing) = self.state.references.get(&id) {
            let _ = write!(self.state.buffer, " (# {existing})");
            return Ok(());
        }

        let tag = kinds::key_type_of(&view);
        tracing::trace!(symbol = %id, tag = tag.name(), "writing record");
        self.state.buffer.push_str(" (");
        self.state.buffer.push(tag.as_char());
        kinds::create(tag, self, id, &view)?;

        let record_id = self.state.next_id;
        self.state.next_id += 1;
        self.state.references.insert(id, record_id);
        let _ = write!(self.state.buffer, " {record_id})");
        Ok(())
    }

    /// `(stack index, ordinal)` when `view` is a type parameter of a method
    /// currently on the stack
    fn method_type_parameter(&self, view: &Symbol) -> Option<(usize, u32)> {
        let data = view.as_type_parameter()?;
        if data.kind != TypeParameterKind::Method {
            return None;
        }
        let declaring = view.container?;
        let index = self.state.method_stack.iter().position(|m| *m == declaring)?;
        Some((index, data.ordinal))
    }

    /// Write a string field, `!` for `None`
    pub(crate) fn write_string(&mut self, value: Option<&str>) {
        match value {
            Some(value) => {
                self.state.buffer.push(' ');
                grammar::push_quoted(&mut self.state.buffer, value);
            }
            None => self.state.buffer.push_str(" !"),
        }
    }

    /// Write an integer field
    pub(crate) fn write_integer(&mut self, value: i64) {
        let _ = write!(self.state.buffer, " {value}");
    }

    /// Write a count or ordinal
    pub(crate) fn write_count(&mut self, value: usize) {
        let _ = write!(self.state.buffer, " {value}");
    }

    /// Write a boolean field as `0`/`1`
    pub(crate) fn write_boolean(&mut self, value: bool) {
        self.write_integer(i64::from(value));
    }

    /// Write an array of symbol keys
    pub(crate) fn write_symbol_key_array(&mut self, symbols: &[SymbolId]) -> Result<()> {
        self.begin_array(symbols.len());
        for symbol in symbols {
            self.write_symbol_key(Some(*symbol))?;
        }
        self.end_array();
        Ok(())
    }

    /// Write an array of optional strings
    pub(crate) fn write_string_array<'s>(
        &mut self,
        values: impl ExactSizeIterator<Item = Option<&'s str>>,
    ) {
        self.begin_array(values.len());
        for value in values {
            self.write_string(value);
        }
        self.end_array();
    }

    /// Write an array of booleans
    pub(crate) fn write_boolean_array(&mut self, values: impl ExactSizeIterator<Item = bool>) {
        self.begin_array(values.len());
        for value in values {
            self.write_boolean(value);
        }
        self.end_array();
    }

    /// Write an array of ref kinds
    pub(crate) fn write_ref_kind_array(&mut self, values: impl ExactSizeIterator<Item = RefKind>) {
        self.begin_array(values.len());
        for value in values {
            self.write_integer(i64::from(value.code()));
        }
        self.end_array();
    }

    /// Write an inline location
    pub(crate) fn write_location(&mut self, location: &Location) -> Result<()> {
        match location {
            Location::None => self.write_integer(location_kind::NONE),
            Location::Source(source) => {
                self.write_integer(location_kind::SOURCE);
                self.write_string(Some(&source.path));
                self.write_integer(i64::from(source.span.start));
                self.write_integer(i64::from(source.span.length));
            }
            Location::Metadata { module } => {
                self.write_integer(location_kind::METADATA);
                self.write_symbol_key(Some(*module))?;
            }
        }
        Ok(())
    }

    /// Write an array of locations
    pub(crate) fn write_location_array(&mut self, locations: &[Location]) -> Result<()> {
        self.begin_array(locations.len());
        for location in locations {
            self.write_location(location)?;
        }
        self.end_array();
        Ok(())
    }

    /// Push a method whose signature is about to be written
    pub(crate) fn push_method(&mut self, method: SymbolId) {
        self.state.method_stack.push(method);
    }

    /// Pop the method pushed last
    pub(crate) fn pop_method(&mut self, method: SymbolId) {
        let popped = self.state.method_stack.pop();
        debug_assert_eq!(popped, Some(method), "unbalanced method stack");
    }

    fn begin_array(&mut self, count: usize) {
        let _ = write!(
            self.state.buffer,
            " ({} {count}",
            SymbolKeyType::Array.as_char()
        );
    }

    fn end_array(&mut self) {
        self.state.buffer.push(')');
    }
}
