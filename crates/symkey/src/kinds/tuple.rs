//! `T` tuple type records
//!
//! Fields: underlying-is-error flag, element names, element locations, then
//! either the element types (error underlying) or the underlying type key.

use super::{contextual_view, fail, fail_with, reason, wrong_kind};
use crate::error::{Result, SymbolKeyError};
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Location, Symbol, SymbolData, SymbolId, TupleShape, TypeShape};

fn shape(symbol: &Symbol) -> Option<&TupleShape> {
    match &symbol.as_named_type()?.shape {
        TypeShape::Tuple(shape) => Some(shape),
        _ => None,
    }
}

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let Some(tuple) = shape(symbol) else {
        return Err(wrong_kind(id, "tuple type"));
    };
    let underlying = writer.require(tuple.underlying)?;
    let is_error = matches!(underlying.data, SymbolData::ErrorType(_));

    writer.write_boolean(is_error);
    writer.write_string_array(tuple.elements.iter().map(|e| e.name.as_deref()));
    let locations: Vec<Location> = tuple.elements.iter().map(|e| e.location.clone()).collect();
    writer.write_location_array(&locations)?;
    if is_error {
        let types: Vec<SymbolId> = tuple.elements.iter().map(|e| e.ty).collect();
        writer.write_symbol_key_array(&types)
    } else {
        writer.write_symbol_key(Some(tuple.underlying))
    }
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader).and_then(|view| shape(&view).cloned());
    let is_error = reader.read_boolean()?;
    let names = reader.read_string_array()?;
    let locations = reader.read_location_array()?;
    let compilation = reader.compilation();
    if locations.len() != names.len() {
        return Err(element_count_mismatch(reader));
    }

    if is_error {
        let contextual_types: Vec<SymbolId> = contextual
            .as_ref()
            .map(|c| c.elements.iter().map(|e| e.ty).collect())
            .unwrap_or_default();
        let element_types = match reader.read_symbol_key_array(&contextual_types)? {
            Ok(types) => types,
            Err(inner) => {
                return Ok(fail_with(SymbolKeyType::TupleType, "elementTypes", Some(&inner)));
            }
        };
        if element_types.len() != names.len() {
            return Err(element_count_mismatch(reader));
        }
        return Ok(match compilation.create_tuple_type(&element_types, &names, &locations) {
            Some(tuple) => SymbolKeyResolution::symbol(tuple),
            None => SymbolKeyResolution::failed(reason(SymbolKeyType::TupleType, "create", None)),
        });
    }

    let underlying = reader.read_symbol_key(contextual.map(|c| c.underlying))?;
    if !underlying.is_found() {
        return Ok(fail(SymbolKeyType::TupleType, "underlyingType", &underlying));
    }
    let matches: Vec<_> = underlying
        .all_symbols()
        .into_iter()
        .filter_map(|u| compilation.create_tuple_type_from_underlying(u, &names, &locations))
        .collect();
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::TupleType, "create", None)
    }))
}

fn element_count_mismatch(reader: &SymbolKeyReader<'_>) -> SymbolKeyError {
    SymbolKeyError::malformed(reader.position(), "tuple element arrays differ in length")
}

