//! `W` anonymous type and `Z` anonymous function/delegate records
//!
//! Anonymous types are rebuilt structurally. Lambdas and the delegate types
//! invented for them have no name, so they are found again by location.

use super::{contextual_view, fail_with, reason, wrong_kind};
use crate::error::{Result, SymbolKeyError};
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{AnonymousProperty, Location, MethodKind, Symbol, SymbolData, SymbolId, TypeShape};

fn properties(symbol: &Symbol) -> Option<&[AnonymousProperty]> {
    match &symbol.as_named_type()?.shape {
        TypeShape::AnonymousType(properties) => Some(properties),
        _ => None,
    }
}

pub(super) fn create_type(
    writer: &mut SymbolKeyWriter<'_>,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<()> {
    let Some(properties) = properties(symbol) else {
        return Err(wrong_kind(id, "anonymous type"));
    };
    let types: Vec<SymbolId> = properties.iter().map(|p| p.ty).collect();
    writer.write_symbol_key_array(&types)?;
    writer.write_string_array(properties.iter().map(|p| Some(p.name.as_str())));
    writer.write_boolean_array(properties.iter().map(|p| p.is_read_only));
    let locations: Vec<Location> = properties.iter().map(|p| p.location.clone()).collect();
    writer.write_location_array(&locations)
}

pub(super) fn resolve_type(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual_types: Vec<SymbolId> = contextual_view(reader)
        .and_then(|view| properties(&view).map(|p| p.iter().map(|p| p.ty).collect()))
        .unwrap_or_default();
    let types = reader.read_symbol_key_array(&contextual_types)?;
    let names = reader.read_string_array()?;
    let read_only = reader.read_boolean_array()?;
    let locations = reader.read_location_array()?;

    let types = match types {
        Ok(types) => types,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::AnonymousType, "propertyTypes", Some(&inner)));
        }
    };
    if names.len() != types.len() || read_only.len() != types.len() || locations.len() != types.len()
    {
        return Err(SymbolKeyError::malformed(
            reader.position(),
            "anonymous type property arrays differ in length",
        ));
    }

    let properties = types
        .into_iter()
        .zip(names)
        .zip(read_only)
        .zip(locations)
        .map(|(((ty, name), is_read_only), location)| AnonymousProperty {
            name: name.unwrap_or_default(),
            ty,
            is_read_only,
            location,
        })
        .collect();
    Ok(match reader.compilation().create_anonymous_type(properties) {
        Some(symbol) => SymbolKeyResolution::symbol(symbol),
        None => SymbolKeyResolution::failed(reason(SymbolKeyType::AnonymousType, "create", None)),
    })
}

pub(super) fn create_function_or_delegate(
    writer: &mut SymbolKeyWriter<'_>,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<()> {
    let lambda = match symbol.as_named_type().map(|d| &d.shape) {
        Some(TypeShape::AnonymousDelegate { lambda }) => Some(writer.require(*lambda)?),
        Some(_) => return Err(wrong_kind(id, "anonymous function or delegate")),
        None => None,
    };
    writer.write_boolean(lambda.is_some());
    let location = lambda.as_deref().unwrap_or(symbol).first_location().clone();
    writer.write_location(&location)
}

pub(super) fn resolve_function_or_delegate(
    reader: &mut SymbolKeyReader<'_>,
) -> Result<SymbolKeyResolution> {
    let is_delegate = reader.read_boolean()?;
    let location = reader.read_location()?;
    let compilation = reader.compilation();

    let Location::Source(source) = &location else {
        return Ok(fail_with(SymbolKeyType::AnonymousFunctionOrDelegate, "location", None));
    };
    if !compilation.contains_syntax_tree(&source.path) {
        return Ok(fail_with(SymbolKeyType::AnonymousFunctionOrDelegate, "syntaxTree", None));
    }

    let mut matches = Vec::new();
    for candidate in compilation.symbols_at(source) {
        let view = reader.require(candidate)?;
        let SymbolData::Method(method) = &view.data else {
            continue;
        };
        if method.method_kind != MethodKind::AnonymousFunction {
            continue;
        }
        if is_delegate {
            matches.extend(method.associated_anonymous_delegate);
        } else {
            matches.push(candidate);
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::AnonymousFunctionOrDelegate, "location", None)
    }))
}
