//! `D` named type records
//!
//! Fields: container, name, arity, file-local path, unbound flag, type
//! arguments (empty unless the type is a bound construction).

use super::{contextual_view, fail, fail_with, reason};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::Symbol;

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, symbol: &Symbol) -> Result<()> {
    let data = symbol.as_named_type().cloned().unwrap_or_default();
    writer.write_symbol_key(symbol.container)?;
    writer.write_string(Some(&symbol.name));
    writer.write_count(symbol.arity());
    writer.write_string(data.file_local_path.as_deref());
    writer.write_boolean(data.is_unbound_generic);
    if data.is_constructed() && !data.is_unbound_generic {
        writer.write_symbol_key_array(&data.type_arguments)
    } else {
        writer.write_symbol_key_array(&[])
    }
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader);
    let containers = reader.read_symbol_key(contextual.as_ref().and_then(|c| c.container))?;
    let name = reader.read_name()?;
    let arity = reader.read_count()?;
    let file_local_path = reader.read_string()?;
    let is_unbound = reader.read_boolean()?;
    let contextual_arguments = contextual
        .as_ref()
        .map(|c| c.type_arguments().to_vec())
        .unwrap_or_default();
    let type_arguments = reader.read_symbol_key_array(&contextual_arguments)?;

    if !containers.is_found() {
        return Ok(fail(SymbolKeyType::NamedType, "containingSymbol", &containers));
    }
    let type_arguments = match type_arguments {
        Ok(arguments) => arguments,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::NamedType, "typeArguments", Some(&inner)));
        }
    };

    let compilation = reader.compilation();
    let mut matches = Vec::new();
    for container in containers.all_symbols() {
        for candidate in compilation.type_members(container, &name, arity) {
            let view = reader.require(candidate)?;
            let candidate_path = view.as_named_type().and_then(|d| d.file_local_path.as_deref());
            if candidate_path != file_local_path.as_deref() {
                continue;
            }
            let resolved = if !type_arguments.is_empty() {
                compilation.construct(candidate, &type_arguments)
            } else if is_unbound {
                compilation.construct_unbound_generic(candidate)
            } else {
                Some(candidate)
            };
            matches.extend(resolved);
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::NamedType, "name", None)
    }))
}
