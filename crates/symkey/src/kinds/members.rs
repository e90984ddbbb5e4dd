//! `F` field, `V` event and `Q` property records
//!
//! Fields and events are identified by name and container. Properties add
//! the indexer flag and the indexer signature.

use super::{
    contextual_container, contextual_view, definition_parameter_types, fail, fail_with,
    parameter_ref_kinds, reason, wrong_kind,
};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::signature;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolData, SymbolId, SymbolKind};

pub(super) fn create_field_or_event(
    writer: &mut SymbolKeyWriter<'_>,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<()> {
    if !matches!(symbol.data, SymbolData::Field(_) | SymbolData::Event(_)) {
        return Err(wrong_kind(id, "field or event"));
    }
    writer.write_string(Some(&symbol.name));
    writer.write_symbol_key(symbol.container)
}

pub(super) fn resolve_field(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    resolve_named_member(reader, SymbolKeyType::Field, SymbolKind::Field)
}

pub(super) fn resolve_event(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    resolve_named_member(reader, SymbolKeyType::Event, SymbolKind::Event)
}

fn resolve_named_member(
    reader: &mut SymbolKeyReader<'_>,
    tag: SymbolKeyType,
    kind: SymbolKind,
) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let contextual = contextual_container(reader);
    let containers = reader.read_symbol_key(contextual)?;
    if !containers.is_found() {
        return Ok(fail(tag, "containingType", &containers));
    }

    let compilation = reader.compilation();
    let mut matches = Vec::new();
    for container in containers.all_symbols() {
        for member in compilation.members(container, &name) {
            if reader.require(member)?.kind() == kind {
                matches.push(member);
            }
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || reason(tag, "name", None)))
}

pub(super) fn create_property(
    writer: &mut SymbolKeyWriter<'_>,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<()> {
    let SymbolData::Property(property) = &symbol.data else {
        return Err(wrong_kind(id, "property"));
    };
    let compilation = writer.compilation();
    writer.write_string(Some(&symbol.name));
    writer.write_symbol_key(symbol.container)?;
    writer.write_boolean(property.is_indexer);
    writer.write_ref_kind_array(parameter_ref_kinds(compilation, &property.parameters)?.into_iter());
    let types = definition_parameter_types(compilation, id, symbol)?;
    writer.write_symbol_key_array(&types)
}

pub(super) fn resolve_property(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader);
    let name = reader.read_name()?;
    let containers = reader.read_symbol_key(contextual.as_ref().and_then(|c| c.container))?;
    let is_indexer = reader.read_boolean()?;
    let ref_kinds = reader.read_ref_kind_array()?;
    let compilation = reader.compilation();
    let contextual_types = match (&contextual, reader.contextual()) {
        (Some(view), Some(id)) if view.kind() == SymbolKind::Property => {
            definition_parameter_types(compilation, id, view)?
        }
        _ => Vec::new(),
    };
    let parameter_types = reader.read_symbol_key_array(&contextual_types)?;

    if !containers.is_found() {
        return Ok(fail(SymbolKeyType::Property, "containingType", &containers));
    }
    let parameter_types = match parameter_types {
        Ok(types) => types,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::Property, "parameterTypes", Some(&inner)));
        }
    };

    let mut matches = Vec::new();
    for container in containers.all_symbols() {
        for member in compilation.members(container, &name) {
            let view = reader.require(member)?;
            let SymbolData::Property(property) = &view.data else {
                continue;
            };
            if property.is_indexer != is_indexer
                || property.parameters.len() != ref_kinds.len()
                || parameter_ref_kinds(compilation, &property.parameters)? != ref_kinds
            {
                continue;
            }
            let expected = definition_parameter_types(compilation, member, &view)?;
            if signature::parameter_types_match(compilation, &parameter_types, &expected)? {
                matches.push(member);
            }
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::Property, "signature", None)
    }))
}
