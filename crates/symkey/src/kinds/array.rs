//! `R` array type records: element type, rank

use super::{contextual_view, fail, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolData, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let SymbolData::ArrayType { element, rank } = symbol.data else {
        return Err(wrong_kind(id, "array type"));
    };
    writer.write_symbol_key(Some(element))?;
    writer.write_integer(i64::from(rank));
    Ok(())
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader).and_then(|view| match view.data {
        SymbolData::ArrayType { element, .. } => Some(element),
        _ => None,
    });
    let elements = reader.read_symbol_key(contextual)?;
    let rank = reader.read_u32()?;
    if !elements.is_found() {
        return Ok(fail(SymbolKeyType::ArrayType, "elementType", &elements));
    }

    let compilation = reader.compilation();
    let matches: Vec<_> = elements
        .all_symbols()
        .into_iter()
        .filter_map(|element| compilation.create_array_type(element, rank))
        .collect();
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::ArrayType, "create", None)
    }))
}
