//! `L` built-in operator records: name, return type, parameter types

use super::{fail, fail_with, parameter_types, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolId};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let Some(method) = symbol.as_method() else {
        return Err(wrong_kind(id, "built-in operator"));
    };
    let types = parameter_types(writer.compilation(), &method.parameters)?;
    writer.write_string(Some(&symbol.name));
    writer.write_symbol_key(method.return_type)?;
    writer.write_symbol_key_array(&types)
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let return_type = reader.read_symbol_key(None)?;
    let parameter_types = reader.read_symbol_key_array(&[])?;

    let Some(return_type) = return_type.first_symbol() else {
        return Ok(fail(SymbolKeyType::BuiltinOperator, "returnType", &return_type));
    };
    let parameter_types = match parameter_types {
        Ok(types) => types,
        Err(inner) => {
            return Ok(fail_with(SymbolKeyType::BuiltinOperator, "parameterTypes", Some(&inner)));
        }
    };
    Ok(
        match reader
            .compilation()
            .create_builtin_operator(&name, return_type, &parameter_types)
        {
            Some(operator) => SymbolKeyResolution::symbol(operator),
            None => SymbolKeyResolution::failed(reason(SymbolKeyType::BuiltinOperator, "create", None)),
        },
    )
}
