//! `S` assembly records: identity name

use super::reason;
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::Symbol;

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, symbol: &Symbol) {
    writer.write_string(Some(&symbol.name));
}

/// Matches the compilation's own assembly and its references by name, or
/// all of them when assembly keys are ignored.
pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let compilation = reader.compilation();

    let mut assemblies = vec![compilation.assembly()];
    assemblies.extend(compilation.referenced_assemblies());

    let mut matches = Vec::new();
    for assembly in assemblies {
        if reader.ignore_assembly_key() || reader.require(assembly)?.name == name {
            matches.push(assembly);
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::Assembly, "name", None)
    }))
}
