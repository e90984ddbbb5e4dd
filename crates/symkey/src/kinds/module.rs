//! `U` module records: containing assembly
//!
//! Module names are not part of the key; every module of a matching
//! assembly is a candidate.

use super::{contextual_container, fail, reason};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolData};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, symbol: &Symbol) -> Result<()> {
    writer.write_symbol_key(symbol.container)
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_container(reader);
    let assemblies = reader.read_symbol_key(contextual)?;
    if !assemblies.is_found() {
        return Ok(fail(SymbolKeyType::Module, "containingAssembly", &assemblies));
    }

    let mut modules = Vec::new();
    for assembly in assemblies.all_symbols() {
        if let SymbolData::Assembly(data) = &reader.require(assembly)?.data {
            modules.extend(data.modules.iter().copied());
        }
    }
    Ok(SymbolKeyResolution::from_symbols(modules, || {
        reason(SymbolKeyType::Module, "modules", None)
    }))
}
