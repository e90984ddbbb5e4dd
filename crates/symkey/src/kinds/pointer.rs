//! `O` pointer type records: pointed-at type

use super::{contextual_view, fail, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolData, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let SymbolData::PointerType { pointed_at } = symbol.data else {
        return Err(wrong_kind(id, "pointer type"));
    };
    writer.write_symbol_key(Some(pointed_at))
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader).and_then(|view| match view.data {
        SymbolData::PointerType { pointed_at } => Some(pointed_at),
        _ => None,
    });
    let pointed_at = reader.read_symbol_key(contextual)?;
    if !pointed_at.is_found() {
        return Ok(fail(SymbolKeyType::PointerType, "pointedAtType", &pointed_at));
    }

    let compilation = reader.compilation();
    let matches: Vec<_> = pointed_at
        .all_symbols()
        .into_iter()
        .filter_map(|target| compilation.create_pointer_type(target))
        .collect();
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::PointerType, "create", None)
    }))
}
