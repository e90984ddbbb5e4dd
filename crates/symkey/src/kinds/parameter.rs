//! `P` parameter records: name, ordinal, owner
//!
//! Parameters are matched by name first so a key survives reordering. When
//! no parameter of an owner carries the recorded name (it was renamed), the
//! recorded ordinal is used instead.

use super::{contextual_container, fail, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolData, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let SymbolData::Parameter(parameter) = &symbol.data else {
        return Err(wrong_kind(id, "parameter"));
    };
    writer.write_string(Some(&symbol.name));
    writer.write_integer(i64::from(parameter.ordinal));
    writer.write_symbol_key(symbol.container)
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let ordinal = reader.read_count()?;
    let contextual = contextual_container(reader);
    let owners = reader.read_symbol_key(contextual)?;
    if !owners.is_found() {
        return Ok(fail(SymbolKeyType::Parameter, "containingSymbol", &owners));
    }

    let mut matches = Vec::new();
    for owner in owners.all_symbols() {
        let parameters = owner_parameters(reader, owner)?;
        let mut by_name = Vec::new();
        for parameter in &parameters {
            if reader.names_equal(&reader.require(*parameter)?.name, &name) {
                by_name.push(*parameter);
            }
        }
        if by_name.is_empty() {
            matches.extend(parameters.get(ordinal).copied());
        } else {
            matches.extend(by_name);
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::Parameter, "name", None)
    }))
}

/// Parameters of a method, property or event owner
///
/// Event parameters are those of the event type's delegate `Invoke` method.
fn owner_parameters(reader: &SymbolKeyReader<'_>, owner: SymbolId) -> Result<Vec<SymbolId>> {
    let view = reader.require(owner)?;
    match &view.data {
        SymbolData::Method(method) => Ok(method.parameters.clone()),
        SymbolData::Property(property) => Ok(property.parameters.clone()),
        SymbolData::Event(event) => {
            let delegate = reader.require(event.ty)?;
            match delegate.as_named_type().and_then(|d| d.delegate_invoke_method) {
                Some(invoke) => Ok(reader.require(invoke)?.parameters().to_vec()),
                None => Ok(Vec::new()),
            }
        }
        _ => Ok(Vec::new()),
    }
}
