//! Symbol reader
//!
//! Recursive-descent parser over the key grammar. Each record is handed to
//! the resolver for its tag, which queries the target compilation and calls
//! back into the reader for nested keys. Resolutions are cached by record id
//! so back-references never re-run a resolver.

use crate::config::ResolveOptions;
use crate::error::{Result, SymbolKeyError};
use crate::grammar::{self, location_kind, SymbolKeyType, FORMAT_VERSION};
use crate::kinds;
use crate::pool::Reset;
use crate::resolution::{breadcrumb, SymbolKeyResolution};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use symkey_model::{Compilation, Location, RefKind, SourceLocation, Symbol, SymbolId, TextSpan};

/// Outcome of reading a field that can fail to resolve
///
/// `Err` carries the breadcrumb. Protocol faults use the outer [`Result`].
pub(crate) type Attempt<T> = std::result::Result<T, String>;

/// Reusable reader state
#[derive(Debug, Default)]
pub(crate) struct ReaderState {
    /// Record id → resolution
    resolutions: HashMap<u32, SymbolKeyResolution>,
    /// Methods whose signature is being read; `None` while skipping
    method_stack: SmallVec<[Option<SymbolId>; 4]>,
    /// Contextual symbol of every open record
    contextual_stack: SmallVec<[Option<SymbolId>; 8]>,
}

impl ReaderState {
    /// Check that every push was matched by a pop
    pub(crate) fn is_balanced(&self) -> bool {
        self.method_stack.is_empty() && self.contextual_stack.is_empty()
    }
}

impl Reset for ReaderState {
    fn reset(&mut self) {
        self.resolutions.clear();
        self.method_stack.clear();
        self.contextual_stack.clear();
    }
}

/// Reader over one key text and a checked-out state
pub(crate) struct SymbolKeyReader<'a> {
    text: &'a str,
    position: usize,
    depth: usize,
    state: &'a mut ReaderState,
    compilation: &'a dyn Compilation,
    options: &'a ResolveOptions,
}

impl<'a> SymbolKeyReader<'a> {
    /// Create reader positioned at the start of `text`
    pub(crate) fn new(
        text: &'a str,
        state: &'a mut ReaderState,
        compilation: &'a dyn Compilation,
        options: &'a ResolveOptions,
    ) -> Self {
        Self {
            text,
            position: 0,
            depth: 0,
            state,
            compilation,
            options,
        }
    }

    /// Compilation being resolved against
    #[inline]
    pub(crate) fn compilation(&self) -> &'a dyn Compilation {
        self.compilation
    }

    /// Whether assembly names are ignored
    #[inline]
    pub(crate) fn ignore_assembly_key(&self) -> bool {
        self.options.ignore_assembly_key
    }

    /// View of a symbol
    #[inline]
    pub(crate) fn require(&self, id: SymbolId) -> Result<Arc<Symbol>> {
        Ok(self.compilation.require(id)?)
    }

    /// Compare names with the compilation's case sensitivity
    pub(crate) fn names_equal(&self, a: &str, b: &str) -> bool {
        if self.compilation.is_case_sensitive() {
            a == b
        } else {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        }
    }

    /// Current byte offset
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Rewind (or advance) to an offset previously returned by [`Self::position`]
    #[inline]
    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Read and check `<version> "<language>"`
    pub(crate) fn read_header(&mut self) -> Result<()> {
        let found = self.read_raw_integer()?;
        if found != i64::from(FORMAT_VERSION) {
            let found = i32::try_from(found).unwrap_or(i32::MAX);
            tracing::warn!(expected = FORMAT_VERSION, found, "symbol key format version mismatch");
            return Err(SymbolKeyError::FormatVersionMismatch {
                expected: FORMAT_VERSION,
                found,
            });
        }
        let _language = self.read_string()?;
        Ok(())
    }

    /// Require that the whole text was consumed
    pub(crate) fn expect_end(&self) -> Result<()> {
        if self.position == self.text.len() {
            Ok(())
        } else {
            Err(self.malformed("trailing text after key"))
        }
    }

    /// Read a symbol key field
    pub(crate) fn read_symbol_key(
        &mut self,
        contextual: Option<SymbolId>,
    ) -> Result<SymbolKeyResolution> {
        self.check_cancelled()?;
        self.expect_byte(b' ')?;
        match self.next_byte()? {
            b'!' => return Ok(SymbolKeyResolution::none()),
            b'(' => {}
            _ => return Err(self.malformed_before("expected '(' or '!'")),
        }

        let tag = self.read_tag()?;
        match tag {
            SymbolKeyType::Reference => return self.read_reference(),
            SymbolKeyType::TypeParameterOrdinal => return self.read_type_parameter_ordinal(),
            SymbolKeyType::Array | SymbolKeyType::Null => {
                return Err(self.malformed_before("expected a symbol record"));
            }
            _ => {}
        }

        if self.depth >= self.options.max_nesting_depth {
            return Err(SymbolKeyError::NestingTooDeep {
                limit: self.options.max_nesting_depth,
            });
        }
        self.depth += 1;
        self.state.contextual_stack.push(contextual);
        let resolved = kinds::resolve(tag, self);
        self.state.contextual_stack.pop();
        self.depth -= 1;
        let resolution = resolved?.narrowed_to(contextual);

        let id = self.read_record_id()?;
        self.expect_byte(b')')?;
        tracing::trace!(tag = tag.name(), id, outcome = %resolution, "resolved record");
        self.state.resolutions.insert(id, resolution.clone());
        Ok(resolution)
    }

    /// Contextual symbol of the record being resolved
    #[inline]
    pub(crate) fn contextual(&self) -> Option<SymbolId> {
        self.state.contextual_stack.last().copied().flatten()
    }

    fn read_reference(&mut self) -> Result<SymbolKeyResolution> {
        let id = self.read_record_id()?;
        self.expect_byte(b')')?;
        match self.state.resolutions.get(&id) {
            Some(resolution) => Ok(resolution.clone()),
            None => Err(self.malformed(format!("reference to unknown record {id}"))),
        }
    }

    fn read_type_parameter_ordinal(&mut self) -> Result<SymbolKeyResolution> {
        let index = self.read_count()?;
        let ordinal = self.read_count()?;
        self.expect_byte(b')')?;
        let Some(entry) = self.state.method_stack.get(index).copied() else {
            return Err(self.malformed(format!(
                "method type parameter refers to stack index {index} of {}",
                self.state.method_stack.len()
            )));
        };
        let Some(method) = entry else {
            return Ok(SymbolKeyResolution::failed(breadcrumb(
                "TypeParameterOrdinal",
                "method",
                None,
            )));
        };
        let view = self.require(method)?;
        Ok(match view.type_parameters().get(ordinal) {
            Some(parameter) => SymbolKeyResolution::symbol(*parameter),
            None => SymbolKeyResolution::failed(breadcrumb("TypeParameterOrdinal", "ordinal", None)),
        })
    }

    /// Push a method whose signature is about to be read
    pub(crate) fn push_method(&mut self, method: Option<SymbolId>) {
        self.state.method_stack.push(method);
    }

    /// Pop the method pushed last
    pub(crate) fn pop_method(&mut self, method: Option<SymbolId>) {
        let popped = self.state.method_stack.pop();
        debug_assert_eq!(popped, Some(method), "unbalanced method stack");
    }

    /// Read an array of symbol keys
    ///
    /// Every element is read even after one fails, so the cursor always ends
    /// after the array. Candidates contribute their first symbol.
    pub(crate) fn read_symbol_key_array(
        &mut self,
        contextual: &[SymbolId],
    ) -> Result<Attempt<Vec<SymbolId>>> {
        let resolutions =
            self.read_array(|reader, index| reader.read_symbol_key(contextual.get(index).copied()))?;
        let mut symbols = Vec::with_capacity(resolutions.len());
        for (index, resolution) in resolutions.iter().enumerate() {
            match resolution.first_symbol() {
                Some(symbol) => symbols.push(symbol),
                None => {
                    return Ok(Err(breadcrumb(
                        "Array",
                        &format!("element {index}"),
                        resolution.failure_reason(),
                    )));
                }
            }
        }
        Ok(Ok(symbols))
    }

    /// Read an array of optional strings
    pub(crate) fn read_string_array(&mut self) -> Result<Vec<Option<String>>> {
        self.read_array(|reader, _| reader.read_string())
    }

    /// Read an array of booleans
    pub(crate) fn read_boolean_array(&mut self) -> Result<Vec<bool>> {
        self.read_array(|reader, _| reader.read_boolean())
    }

    /// Read an array of ref kinds
    pub(crate) fn read_ref_kind_array(&mut self) -> Result<Vec<RefKind>> {
        self.read_array(|reader, _| reader.read_ref_kind())
    }

    /// Read an array of locations
    pub(crate) fn read_location_array(&mut self) -> Result<Vec<Location>> {
        self.read_array(|reader, _| reader.read_location())
    }

    /// Read an array with an element reader
    pub(crate) fn read_array<T>(
        &mut self,
        mut element: impl FnMut(&mut Self, usize) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.expect_byte(b' ')?;
        self.expect_byte(b'(')?;
        if self.read_tag()? != SymbolKeyType::Array {
            return Err(self.malformed_before("expected an array"));
        }
        let count = self.read_count()?;
        let mut items = Vec::with_capacity(count.min(64));
        for index in 0..count {
            self.check_cancelled()?;
            items.push(element(self, index)?);
        }
        self.expect_byte(b')')?;
        Ok(items)
    }

    /// Read an inline location
    ///
    /// A metadata location whose module does not resolve reads as
    /// [`Location::None`].
    pub(crate) fn read_location(&mut self) -> Result<Location> {
        match self.read_integer()? {
            location_kind::NONE => Ok(Location::None),
            location_kind::SOURCE => {
                let path = self.read_string()?.unwrap_or_default();
                let start = self.read_u32()?;
                let length = self.read_u32()?;
                Ok(Location::Source(SourceLocation {
                    path,
                    span: TextSpan::new(start, length),
                }))
            }
            location_kind::METADATA => {
                let module = self.read_symbol_key(None)?;
                Ok(module
                    .first_symbol()
                    .map_or(Location::None, |module| Location::Metadata { module }))
            }
            other => Err(self.malformed(format!("unknown location kind {other}"))),
        }
    }

    /// Read a ref kind code
    pub(crate) fn read_ref_kind(&mut self) -> Result<RefKind> {
        let code = self.read_integer()?;
        i32::try_from(code)
            .ok()
            .and_then(RefKind::from_code)
            .ok_or_else(|| self.malformed(format!("unknown ref kind {code}")))
    }

    /// Read a string field, `None` for `!`
    pub(crate) fn read_string(&mut self) -> Result<Option<String>> {
        self.expect_byte(b' ')?;
        if self.peek_byte() == Some(b'!') {
            self.position += 1;
            return Ok(None);
        }
        match grammar::parse_quoted(self.text, self.position) {
            Some((value, end)) => {
                self.position = end;
                Ok(Some(value))
            }
            None => Err(self.malformed("expected a quoted string")),
        }
    }

    /// Read a string field, mapping `!` to the empty string
    pub(crate) fn read_name(&mut self) -> Result<String> {
        Ok(self.read_string()?.unwrap_or_default())
    }

    /// Read an integer field
    pub(crate) fn read_integer(&mut self) -> Result<i64> {
        self.expect_byte(b' ')?;
        self.read_raw_integer()
    }

    /// Read a non-negative integer field
    pub(crate) fn read_count(&mut self) -> Result<usize> {
        let value = self.read_integer()?;
        usize::try_from(value).map_err(|_| self.malformed(format!("expected a count, found {value}")))
    }

    /// Read a non-negative 32-bit integer field
    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let value = self.read_integer()?;
        u32::try_from(value).map_err(|_| self.malformed(format!("value {value} out of range")))
    }

    /// Read a `0`/`1` field
    pub(crate) fn read_boolean(&mut self) -> Result<bool> {
        match self.read_integer()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.malformed(format!("expected 0 or 1, found {other}"))),
        }
    }

    fn read_record_id(&mut self) -> Result<u32> {
        self.read_u32()
    }

    fn read_raw_integer(&mut self) -> Result<i64> {
        let start = self.position;
        let bytes = self.text.as_bytes();
        let mut end = start;
        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        let digits = &self.text[start..end];
        match digits.parse::<i64>() {
            Ok(value) => {
                self.position = end;
                Ok(value)
            }
            Err(_) => Err(self.malformed("expected an integer")),
        }
    }

    fn read_tag(&mut self) -> Result<SymbolKeyType> {
        let Some(c) = self.text[self.position..].chars().next() else {
            return Err(self.malformed("unexpected end of key"));
        };
        match SymbolKeyType::from_char(c) {
            Some(tag) => {
                self.position += c.len_utf8();
                Ok(tag)
            }
            None => Err(self.malformed(format!("unknown tag {c:?}"))),
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.options.is_cancelled() {
            Err(SymbolKeyError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn next_byte(&mut self) -> Result<u8> {
        match self.peek_byte() {
            Some(b) => {
                self.position += 1;
                Ok(b)
            }
            None => Err(self.malformed("unexpected end of key")),
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.peek_byte() {
            Some(b) if b == expected => {
                self.position += 1;
                Ok(())
            }
            _ => Err(self.malformed(format!("expected {:?}", char::from(expected)))),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> SymbolKeyError {
        SymbolKeyError::malformed(self.position, message)
    }

    fn malformed_before(&self, message: impl Into<String>) -> SymbolKeyError {
        SymbolKeyError::malformed(self.position.saturating_sub(1), message)
    }
}
