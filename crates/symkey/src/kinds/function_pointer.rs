//! `G` function pointer records
//!
//! Fields: calling convention, unmanaged convention types, return ref kind,
//! return type, parameter ref kinds, parameter types.

use super::{contextual_view, fail, fail_with, reason, wrong_kind};
use crate::error::{Result, SymbolKeyError};
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{
    CallingConvention, FunctionPointerParameter, FunctionPointerSignature, Symbol, SymbolData,
    SymbolId,
};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let SymbolData::FunctionPointerType(signature) = &symbol.data else {
        return Err(wrong_kind(id, "function pointer type"));
    };
    writer.write_integer(i64::from(signature.calling_convention.code()));
    writer.write_symbol_key_array(&signature.unmanaged_convention_types)?;
    writer.write_integer(i64::from(signature.return_ref_kind.code()));
    writer.write_symbol_key(Some(signature.return_type))?;
    writer.write_ref_kind_array(signature.parameters.iter().map(|p| p.ref_kind));
    let types: Vec<SymbolId> = signature.parameters.iter().map(|p| p.ty).collect();
    writer.write_symbol_key_array(&types)
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let contextual = contextual_view(reader).and_then(|view| match &view.data {
        SymbolData::FunctionPointerType(signature) => Some(signature.clone()),
        _ => None,
    });

    let code = reader.read_integer()?;
    let calling_convention = i32::try_from(code)
        .ok()
        .and_then(CallingConvention::from_code)
        .ok_or_else(|| {
            SymbolKeyError::malformed(reader.position(), format!("unknown calling convention {code}"))
        })?;
    let unmanaged = reader.read_symbol_key_array(
        contextual
            .as_ref()
            .map_or(&[][..], |c| &c.unmanaged_convention_types),
    )?;
    let return_ref_kind = reader.read_ref_kind()?;
    let return_type = reader.read_symbol_key(contextual.as_ref().map(|c| c.return_type))?;
    let ref_kinds = reader.read_ref_kind_array()?;
    let contextual_types: Vec<SymbolId> = contextual
        .as_ref()
        .map(|c| c.parameters.iter().map(|p| p.ty).collect())
        .unwrap_or_default();
    let parameter_types = reader.read_symbol_key_array(&contextual_types)?;

    let unmanaged_convention_types = match unmanaged {
        Ok(types) => types,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::FunctionPointer, "callingConventionTypes", Some(&inner)));
        }
    };
    let Some(return_type) = return_type.first_symbol() else {
        return Ok(fail(SymbolKeyType::FunctionPointer, "returnType", &return_type));
    };
    let parameter_types = match parameter_types {
        Ok(types) => types,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::FunctionPointer, "parameterTypes", Some(&inner)));
        }
    };
    if parameter_types.len() != ref_kinds.len() {
        return Err(SymbolKeyError::malformed(
            reader.position(),
            "function pointer ref kinds and parameter types differ in length",
        ));
    }

    let signature = FunctionPointerSignature {
        calling_convention,
        unmanaged_convention_types,
        return_ref_kind,
        return_type,
        parameters: ref_kinds
            .into_iter()
            .zip(parameter_types)
            .map(|(ref_kind, ty)| FunctionPointerParameter { ref_kind, ty })
            .collect(),
    };
    Ok(match reader.compilation().create_function_pointer_type(signature) {
        Some(symbol) => SymbolKeyResolution::symbol(symbol),
        None => SymbolKeyResolution::failed(reason(SymbolKeyType::FunctionPointer, "create", None)),
    })
}
