//! `E` error type records
//!
//! Fields: name, container form (`0` parent type key, `1` namespace names
//! innermost first, `2` none), arity, constructed flag, type arguments.
//! Resolution always synthesizes a placeholder, so an error type key never
//! fails for lack of a real type.

use crate::error::{Result, SymbolKeyError};
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{Symbol, SymbolId};

const PARENT_TYPE: i64 = 0;
const NAMESPACE_NAMES: i64 = 1;
const NO_CONTAINER: i64 = 2;

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, symbol: &Symbol) -> Result<()> {
    writer.write_string(Some(&symbol.name));

    let container = match symbol.container {
        Some(id) => Some((id, writer.require(id)?)),
        None => None,
    };
    match container {
        Some((id, view)) if view.as_named_type().is_some() => {
            writer.write_integer(PARENT_TYPE);
            writer.write_symbol_key(Some(id))?;
        }
        Some((_, view)) if view.as_namespace().is_some() => {
            writer.write_integer(NAMESPACE_NAMES);
            let names = namespace_names(writer, view)?;
            writer.write_string_array(names.iter().map(|n| Some(n.as_str())));
        }
        _ => writer.write_integer(NO_CONTAINER),
    }

    let data = symbol.as_named_type().cloned().unwrap_or_default();
    writer.write_count(symbol.arity());
    writer.write_boolean(data.is_constructed());
    if data.is_constructed() {
        writer.write_symbol_key_array(&data.type_arguments)
    } else {
        writer.write_symbol_key_array(&[])
    }
}

/// Names of the namespace chain up to (excluding) the global namespace
fn namespace_names(
    writer: &SymbolKeyWriter<'_>,
    mut namespace: std::sync::Arc<Symbol>,
) -> Result<Vec<String>> {
    let mut names = Vec::new();
    loop {
        let is_global = namespace.as_namespace().map_or(true, |d| d.is_global);
        if is_global {
            break;
        }
        names.push(namespace.name.clone());
        match namespace.container {
            Some(parent) => namespace = writer.require(parent)?,
            None => break,
        }
    }
    Ok(names)
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let compilation = reader.compilation();

    let containers: Vec<Option<SymbolId>> = match reader.read_integer()? {
        PARENT_TYPE => {
            let parents = reader.read_symbol_key(None)?.all_symbols();
            if parents.is_empty() {
                vec![None]
            } else {
                parents.into_iter().map(Some).collect()
            }
        }
        NAMESPACE_NAMES => {
            let names = reader.read_string_array()?;
            let mut namespace = compilation.global_namespace();
            for name in names.iter().rev() {
                namespace = compilation.create_error_namespace(namespace, name.as_deref().unwrap_or(""));
            }
            vec![Some(namespace)]
        }
        NO_CONTAINER => vec![None],
        other => {
            return Err(SymbolKeyError::malformed(
                reader.position(),
                format!("unknown error type container form {other}"),
            ));
        }
    };

    let arity = reader.read_count()?;
    let is_constructed = reader.read_boolean()?;
    let type_arguments = reader.read_symbol_key_array(&[])?;
    if let Err(inner) = &type_arguments {
        tracing::trace!(
            %name,
            %inner,
            "error type arguments unresolved, keeping the unconstructed type"
        );
    }

    let mut matches = Vec::new();
    for container in containers {
        let error_type = compilation.create_error_type(container, &name, arity);
        let resolved = match &type_arguments {
            Ok(arguments) if is_constructed && arguments.len() == arity => compilation
                .construct(error_type, arguments)
                .unwrap_or(error_type),
            _ => error_type,
        };
        matches.push(resolved);
    }
    Ok(SymbolKeyResolution::from_symbols(matches, String::new))
}
