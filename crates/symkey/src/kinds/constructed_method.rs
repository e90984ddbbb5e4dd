//! `C` constructed method records: constructed-from key, type arguments

use super::{contextual_view, fail, fail_with, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let Some(constructed_from) = symbol.as_method().and_then(|m| m.constructed_from) else {
        return Err(wrong_kind(id, "constructed method"));
    };
    writer.write_symbol_key(Some(constructed_from))?;
    writer.write_symbol_key_array(symbol.type_arguments())
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader);
    let definitions = reader.read_symbol_key(
        contextual
            .as_ref()
            .and_then(|c| c.as_method())
            .and_then(|m| m.constructed_from),
    )?;
    let contextual_arguments = contextual
        .as_ref()
        .map(|c| c.type_arguments().to_vec())
        .unwrap_or_default();
    let type_arguments = reader.read_symbol_key_array(&contextual_arguments)?;

    if !definitions.is_found() {
        return Ok(fail(SymbolKeyType::ConstructedMethod, "constructedFrom", &definitions));
    }
    let type_arguments = match type_arguments {
        Ok(arguments) => arguments,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::ConstructedMethod, "typeArguments", Some(&inner)));
        }
    };

    let compilation = reader.compilation();
    let mut matches = Vec::new();
    for definition in definitions.all_symbols() {
        if reader.require(definition)?.arity() == type_arguments.len() {
            matches.extend(compilation.construct(definition, &type_arguments));
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::ConstructedMethod, "construct", None)
    }))
}
