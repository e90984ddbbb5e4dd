//! `B` body-level records: locals, labels, range variables, local functions
//!
//! Fields: name, symbol kind, declaration locations, enclosing member,
//! ordinal among the member's body declarations of the same kind and name.
//!
//! The resolver first looks at the exact recorded locations. When the body
//! has been edited and the locations drifted, it falls back to the ordinal
//! within the enclosing member.

use super::{fail, fail_with, reason};
use crate::error::{Result, SymbolKeyError};
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Compilation, Location, MethodKind, Symbol, SymbolId, SymbolKind};

/// Nearest container that is neither body-level nor a lambda
fn enclosing_member(
    compilation: &dyn Compilation,
    symbol: &Symbol,
) -> Result<Option<SymbolId>> {
    let mut current = symbol.container;
    while let Some(id) = current {
        let view = compilation.require(id)?;
        let is_lambda = view
            .as_method()
            .is_some_and(|m| m.method_kind == MethodKind::AnonymousFunction);
        if !view.is_body_level() && !is_lambda {
            return Ok(Some(id));
        }
        current = view.container;
    }
    Ok(None)
}

/// Position of `id` among the same-kind same-name declarations of `member`
fn ordinal_in(
    compilation: &dyn Compilation,
    member: SymbolId,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<Option<usize>> {
    let mut index = 0;
    for declared in compilation.body_declarations(member) {
        if declared == id {
            return Ok(Some(index));
        }
        let view = compilation.require(declared)?;
        if view.kind() == symbol.kind() && view.name == symbol.name {
            index += 1;
        }
    }
    Ok(None)
}

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let compilation = writer.compilation();
    let enclosing = enclosing_member(compilation, symbol)?;
    let ordinal = match enclosing {
        Some(member) => ordinal_in(compilation, member, id, symbol)?,
        None => None,
    };

    writer.write_string(Some(&symbol.name));
    writer.write_integer(i64::from(symbol.kind().code()));
    writer.write_location_array(&symbol.locations)?;
    writer.write_symbol_key(enclosing)?;
    writer.write_integer(ordinal.map_or(-1, |o| i64::try_from(o).unwrap_or(i64::MAX)));
    Ok(())
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let code = reader.read_integer()?;
    let kind = i32::try_from(code)
        .ok()
        .and_then(SymbolKind::from_code)
        .ok_or_else(|| SymbolKeyError::malformed(reader.position(), format!("unknown symbol kind {code}")))?;
    let locations = reader.read_location_array()?;
    let enclosing = reader.read_symbol_key(None)?;
    let ordinal = reader.read_integer()?;
    let compilation = reader.compilation();

    let mut matches = Vec::new();
    for location in &locations {
        let Location::Source(source) = location else {
            continue;
        };
        if !compilation.contains_syntax_tree(&source.path) {
            continue;
        }
        for candidate in compilation.symbols_at(source) {
            let view = reader.require(candidate)?;
            if view.kind() == kind && reader.names_equal(&view.name, &name) {
                matches.push(candidate);
            }
        }
    }
    if !matches.is_empty() {
        return Ok(SymbolKeyResolution::from_symbols(matches, String::new));
    }

    if !enclosing.is_found() {
        return Ok(fail(SymbolKeyType::BodyLevel, "enclosingMember", &enclosing));
    }
    let Ok(ordinal) = usize::try_from(ordinal) else {
        return Ok(fail_with(SymbolKeyType::BodyLevel, "ordinal", None));
    };
    for member in enclosing.all_symbols() {
        let mut same = Vec::new();
        for declared in compilation.body_declarations(member) {
            let view = reader.require(declared)?;
            if view.kind() == kind && reader.names_equal(&view.name, &name) {
                same.push(declared);
            }
        }
        matches.extend(same.get(ordinal).copied());
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::BodyLevel, "ordinal", None)
    }))
}
