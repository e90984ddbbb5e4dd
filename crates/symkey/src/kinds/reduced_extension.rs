//! `X` reduced extension method records: reduced-from key, receiver type

use super::{contextual_view, fail, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let Some(method) = symbol.as_method().filter(|m| m.reduced_from.is_some()) else {
        return Err(wrong_kind(id, "reduced extension method"));
    };
    writer.write_symbol_key(method.reduced_from)?;
    writer.write_symbol_key(method.receiver_type)
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader);
    let contextual_method = contextual.as_ref().and_then(|c| c.as_method());
    let reduced_from = reader.read_symbol_key(contextual_method.and_then(|m| m.reduced_from))?;
    let receivers = reader.read_symbol_key(contextual_method.and_then(|m| m.receiver_type))?;

    if !reduced_from.is_found() {
        return Ok(fail(SymbolKeyType::ReducedExtensionMethod, "reducedFrom", &reduced_from));
    }
    if !receivers.is_found() {
        return Ok(fail(SymbolKeyType::ReducedExtensionMethod, "receiverType", &receivers));
    }

    let compilation = reader.compilation();
    let mut matches = Vec::new();
    for method in reduced_from.all_symbols() {
        for receiver in receivers.all_symbols() {
            matches.extend(compilation.reduce_extension_method(method, receiver));
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::ReducedExtensionMethod, "reduce", None)
    }))
}
