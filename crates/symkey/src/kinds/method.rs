//! `M` method records
//!
//! Fields: name, container, arity, partial-implementation flag, parameter ref
//! kinds, then (with the method pushed) the definition's parameter types and
//! the return type of conversion operators.
//!
//! Parameter types may mention the method's own type parameters, which are
//! written as `(@ index ordinal)` against the method stack. The resolver
//! therefore re-reads the signature once per candidate with that candidate
//! pushed, and finally once more with the chosen match so the record cache
//! holds the chosen reading.

use super::{
    contextual_view, definition_parameter_types, fail, parameter_ref_kinds, reason, wrong_kind,
};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::{Attempt, SymbolKeyReader};
use crate::resolution::SymbolKeyResolution;
use crate::signature;
use crate::writer::SymbolKeyWriter;
use symkey_model::{MethodKind, Symbol, SymbolData, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let Some(method) = symbol.as_method() else {
        return Err(wrong_kind(id, "method"));
    };
    let compilation = writer.compilation();
    writer.write_string(Some(&symbol.name));
    writer.write_symbol_key(symbol.container)?;
    writer.write_count(symbol.arity());
    writer.write_boolean(method.partial_definition_part.is_some());
    writer.write_ref_kind_array(parameter_ref_kinds(compilation, &method.parameters)?.into_iter());

    let definition = symbol.definition_or(id);
    let parameter_types = definition_parameter_types(compilation, id, symbol)?;
    let return_type = if method.method_kind == MethodKind::Conversion {
        writer.require(definition)?.as_method().and_then(|m| m.return_type)
    } else {
        None
    };

    writer.push_method(definition);
    let written = write_signature(writer, &parameter_types, return_type);
    writer.pop_method(definition);
    written
}

fn write_signature(
    writer: &mut SymbolKeyWriter<'_>,
    parameter_types: &[SymbolId],
    return_type: Option<SymbolId>,
) -> Result<()> {
    writer.write_symbol_key_array(parameter_types)?;
    writer.write_symbol_key(return_type)
}

/// Signature as read with one candidate pushed
struct ReadSignature {
    parameter_types: Attempt<Vec<SymbolId>>,
    return_type: SymbolKeyResolution,
}

fn read_signature(
    reader: &mut SymbolKeyReader<'_>,
    method: Option<SymbolId>,
    contextual_parameters: &[SymbolId],
    contextual_return: Option<SymbolId>,
) -> Result<ReadSignature> {
    reader.push_method(method);
    let parameter_types = reader.read_symbol_key_array(contextual_parameters);
    let read = parameter_types.and_then(|parameter_types| {
        let return_type = reader.read_symbol_key(contextual_return)?;
        Ok(ReadSignature {
            parameter_types,
            return_type,
        })
    });
    reader.pop_method(method);
    read
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader);
    let name = reader.read_name()?;
    let containers = reader.read_symbol_key(contextual.as_ref().and_then(|c| c.container))?;
    let arity = reader.read_count()?;
    let is_partial_implementation = reader.read_boolean()?;
    let ref_kinds = reader.read_ref_kind_array()?;
    let signature_start = reader.position();
    let compilation = reader.compilation();

    let mut matches = Vec::new();
    for container in containers.all_symbols() {
        for candidate in compilation.members(container, &name) {
            let view = reader.require(candidate)?;
            let Some(method) = view.as_method() else {
                continue;
            };
            if view.arity() != arity
                || method.parameters.len() != ref_kinds.len()
                || parameter_ref_kinds(compilation, &method.parameters)? != ref_kinds
            {
                continue;
            }

            let expected = definition_parameter_types(compilation, candidate, &view)?;
            reader.set_position(signature_start);
            let read = read_signature(reader, Some(candidate), &expected, method.return_type)?;
            if signature_matches(reader, candidate, &view, &expected, &read)? {
                matches.push(candidate);
            }
        }
    }

    // Leave the cursor, and the record cache, as if the first match was read.
    reader.set_position(signature_start);
    let chosen = matches.first().copied();
    let chosen_parameters = match chosen {
        Some(chosen) => {
            let view = reader.require(chosen)?;
            definition_parameter_types(compilation, chosen, &view)?
        }
        None => Vec::new(),
    };
    read_signature(reader, chosen, &chosen_parameters, None)?;

    if matches.is_empty() {
        return Ok(if containers.is_found() {
            SymbolKeyResolution::failed(reason(SymbolKeyType::Method, "signature", None))
        } else {
            fail(SymbolKeyType::Method, "containingType", &containers)
        });
    }

    if is_partial_implementation {
        for matched in &mut matches {
            if let SymbolData::Method(method) = &reader.require(*matched)?.data {
                if let Some(implementation) = method.partial_implementation_part {
                    *matched = implementation;
                }
            }
        }
    }
    Ok(SymbolKeyResolution::from_symbols(matches, String::new))
}

/// Compare a signature read with `candidate` pushed against the candidate
fn signature_matches(
    reader: &SymbolKeyReader<'_>,
    candidate: SymbolId,
    view: &Symbol,
    expected_parameters: &[SymbolId],
    read: &ReadSignature,
) -> Result<bool> {
    let compilation = reader.compilation();
    let Ok(parameter_types) = &read.parameter_types else {
        return Ok(false);
    };
    if !signature::parameter_types_match(compilation, parameter_types, expected_parameters)? {
        return Ok(false);
    }

    let is_conversion = view
        .as_method()
        .is_some_and(|m| m.method_kind == MethodKind::Conversion);
    if !is_conversion {
        return Ok(true);
    }
    let definition = reader.require(view.definition_or(candidate))?;
    let expected_return = definition.as_method().and_then(|m| m.return_type);
    match (read.return_type.first_symbol(), expected_return) {
        (Some(read), Some(expected)) => signature::types_equivalent(compilation, read, expected),
        (None, None) => Ok(true),
        _ => Ok(false),
    }
}
