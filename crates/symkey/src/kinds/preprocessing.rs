//! `p` preprocessing symbol records: name

use super::fail_with;
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::Symbol;

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, symbol: &Symbol) {
    writer.write_string(Some(&symbol.name));
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    Ok(match reader.compilation().create_preprocessing_symbol(&name) {
        Some(symbol) => SymbolKeyResolution::symbol(symbol),
        None => fail_with(SymbolKeyType::Preprocessing, "create", None),
    })
}
