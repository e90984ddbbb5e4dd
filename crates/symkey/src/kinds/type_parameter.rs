//! `Y` type parameter records
//!
//! A type parameter declared in a documentation reference has no container
//! to look it up in and is found by location. Every other type parameter is
//! found by name among its container's type parameters.

use super::{contextual_container, fail, fail_with, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Location, Symbol, SymbolId, SymbolKind, TypeParameterKind};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let Some(data) = symbol.as_type_parameter() else {
        return Err(wrong_kind(id, "type parameter"));
    };
    if data.kind == TypeParameterKind::Cref {
        writer.write_boolean(true);
        writer.write_location(symbol.first_location())
    } else {
        writer.write_boolean(false);
        writer.write_string(Some(&symbol.name));
        writer.write_symbol_key(symbol.container)
    }
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    if reader.read_boolean()? {
        let location = reader.read_location()?;
        let Location::Source(source) = &location else {
            return Ok(fail_with(SymbolKeyType::TypeParameter, "location", None));
        };
        let compilation = reader.compilation();
        let mut matches = Vec::new();
        for candidate in compilation.symbols_at(source) {
            if reader.require(candidate)?.kind() == SymbolKind::TypeParameter {
                matches.push(candidate);
            }
        }
        return Ok(SymbolKeyResolution::from_symbols(matches, || {
            reason(SymbolKeyType::TypeParameter, "location", None)
        }));
    }

    let name = reader.read_name()?;
    let contextual = contextual_container(reader);
    let containers = reader.read_symbol_key(contextual)?;
    if !containers.is_found() {
        return Ok(fail(SymbolKeyType::TypeParameter, "containingSymbol", &containers));
    }

    let mut matches = Vec::new();
    for container in containers.all_symbols() {
        for parameter in reader.require(container)?.type_parameters() {
            if reader.names_equal(&reader.require(*parameter)?.name, &name) {
                matches.push(*parameter);
            }
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::TypeParameter, "name", None)
    }))
}
