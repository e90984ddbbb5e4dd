//! `N` namespace records: name, global flag, container
//!
//! A global namespace records the module or assembly it belongs to, or `!`
//! for the namespace merged across the whole compilation.

use super::{contextual_container, fail, reason};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{NamespaceKind, Symbol, SymbolData, SymbolKind};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, symbol: &Symbol) -> Result<()> {
    let data = symbol.as_namespace().copied().unwrap_or_default();
    writer.write_string(Some(&symbol.name));
    writer.write_boolean(data.is_global);
    if data.is_global && data.extent == NamespaceKind::Compilation {
        writer.write_symbol_key(None)
    } else {
        writer.write_symbol_key(symbol.container)
    }
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let is_global = reader.read_boolean()?;
    let contextual = contextual_container(reader);
    let containers = reader.read_symbol_key(contextual)?;
    let compilation = reader.compilation();

    if is_global && containers.is_null() {
        return Ok(SymbolKeyResolution::symbol(compilation.global_namespace()));
    }
    if !containers.is_found() {
        return Ok(fail(SymbolKeyType::Namespace, "containingSymbol", &containers));
    }

    let mut matches = Vec::new();
    for container in containers.all_symbols() {
        let view = reader.require(container)?;
        if is_global {
            match &view.data {
                SymbolData::Assembly(data) => matches.push(data.global_namespace),
                SymbolData::Module(data) => matches.push(data.global_namespace),
                _ => {}
            }
        } else {
            for member in compilation.members(container, &name) {
                if reader.require(member)?.kind() == SymbolKind::Namespace {
                    matches.push(member);
                }
            }
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::Namespace, "name", None)
    }))
}
