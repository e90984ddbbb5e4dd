//! Per-kind record schemas
//!
//! One module per record tag (or family of closely related tags). Every
//! module pairs a `create` routine, which writes the record's fields, with a
//! `resolve` routine, which reads the same fields back in the same order and
//! matches them against the target compilation.
//!
//! Resolvers must read every field of their record before deciding the
//! outcome, otherwise the cursor would stop in the middle of the record.

mod alias;
mod anonymous;
mod array;
mod assembly;
mod body_level;
mod builtin_operator;
mod constructed_method;
mod dynamic;
mod error_type;
mod function_pointer;
mod members;
mod method;
mod module;
mod named_type;
mod namespace;
mod parameter;
mod pointer;
mod preprocessing;
mod reduced_extension;
mod tuple;
mod type_parameter;

use crate::error::{Result, SymbolKeyError};
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::{breadcrumb, SymbolKeyResolution};
use crate::writer::SymbolKeyWriter;
use std::sync::Arc;
use symkey_model::{
    Compilation, MethodKind, RefKind, Symbol, SymbolData, SymbolId, TypeShape,
};

/// Record tag a symbol is written with
pub(crate) fn key_type_of(symbol: &Symbol) -> SymbolKeyType {
    if symbol.is_body_level() {
        return SymbolKeyType::BodyLevel;
    }
    match &symbol.data {
        SymbolData::Method(method) => {
            if method.is_constructed() {
                return SymbolKeyType::ConstructedMethod;
            }
            match method.method_kind {
                MethodKind::ReducedExtension => SymbolKeyType::ReducedExtensionMethod,
                MethodKind::AnonymousFunction => SymbolKeyType::AnonymousFunctionOrDelegate,
                MethodKind::BuiltinOperator => SymbolKeyType::BuiltinOperator,
                _ => SymbolKeyType::Method,
            }
        }
        SymbolData::NamedType(data) => match data.shape {
            TypeShape::Tuple(_) => SymbolKeyType::TupleType,
            TypeShape::AnonymousType(_) => SymbolKeyType::AnonymousType,
            TypeShape::AnonymousDelegate { .. } => SymbolKeyType::AnonymousFunctionOrDelegate,
            TypeShape::Ordinary => SymbolKeyType::NamedType,
        },
        SymbolData::ErrorType(_) => SymbolKeyType::ErrorType,
        SymbolData::Assembly(_) => SymbolKeyType::Assembly,
        SymbolData::Module(_) => SymbolKeyType::Module,
        SymbolData::Namespace(_) => SymbolKeyType::Namespace,
        SymbolData::ArrayType { .. } => SymbolKeyType::ArrayType,
        SymbolData::PointerType { .. } => SymbolKeyType::PointerType,
        SymbolData::FunctionPointerType(_) => SymbolKeyType::FunctionPointer,
        SymbolData::DynamicType => SymbolKeyType::DynamicType,
        SymbolData::TypeParameter(_) => SymbolKeyType::TypeParameter,
        SymbolData::Field(_) => SymbolKeyType::Field,
        SymbolData::Property(_) => SymbolKeyType::Property,
        SymbolData::Event(_) => SymbolKeyType::Event,
        SymbolData::Parameter(_) => SymbolKeyType::Parameter,
        SymbolData::Alias(_) => SymbolKeyType::Alias,
        SymbolData::Preprocessing => SymbolKeyType::Preprocessing,
        SymbolData::Local(_) | SymbolData::Label | SymbolData::RangeVariable => {
            SymbolKeyType::BodyLevel
        }
    }
}

/// Write the fields of `symbol` for `tag`
pub(crate) fn create(
    tag: SymbolKeyType,
    writer: &mut SymbolKeyWriter<'_>,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<()> {
    match tag {
        SymbolKeyType::Alias => alias::create(writer, id, symbol),
        SymbolKeyType::BodyLevel => body_level::create(writer, id, symbol),
        SymbolKeyType::ConstructedMethod => constructed_method::create(writer, id, symbol),
        SymbolKeyType::NamedType => named_type::create(writer, symbol),
        SymbolKeyType::ErrorType => error_type::create(writer, symbol),
        SymbolKeyType::Field | SymbolKeyType::Event => {
            members::create_field_or_event(writer, id, symbol)
        }
        SymbolKeyType::FunctionPointer => function_pointer::create(writer, id, symbol),
        SymbolKeyType::DynamicType => Ok(()),
        SymbolKeyType::BuiltinOperator => builtin_operator::create(writer, id, symbol),
        SymbolKeyType::Method => method::create(writer, id, symbol),
        SymbolKeyType::Namespace => namespace::create(writer, symbol),
        SymbolKeyType::PointerType => pointer::create(writer, id, symbol),
        SymbolKeyType::Parameter => parameter::create(writer, id, symbol),
        SymbolKeyType::Property => members::create_property(writer, id, symbol),
        SymbolKeyType::ArrayType => array::create(writer, id, symbol),
        SymbolKeyType::Assembly => {
            assembly::create(writer, symbol);
            Ok(())
        }
        SymbolKeyType::TupleType => tuple::create(writer, id, symbol),
        SymbolKeyType::Module => module::create(writer, symbol),
        SymbolKeyType::AnonymousType => anonymous::create_type(writer, id, symbol),
        SymbolKeyType::ReducedExtensionMethod => reduced_extension::create(writer, id, symbol),
        SymbolKeyType::TypeParameter => type_parameter::create(writer, id, symbol),
        SymbolKeyType::AnonymousFunctionOrDelegate => {
            anonymous::create_function_or_delegate(writer, id, symbol)
        }
        SymbolKeyType::Preprocessing => {
            preprocessing::create(writer, symbol);
            Ok(())
        }
        SymbolKeyType::Array
        | SymbolKeyType::Reference
        | SymbolKeyType::Null
        | SymbolKeyType::TypeParameterOrdinal => {
            unreachable!("structural tag {tag:?} chosen for a symbol")
        }
    }
}

/// Read the fields of a `tag` record and resolve them
pub(crate) fn resolve(
    tag: SymbolKeyType,
    reader: &mut SymbolKeyReader<'_>,
) -> Result<SymbolKeyResolution> {
    match tag {
        SymbolKeyType::Alias => alias::resolve(reader),
        SymbolKeyType::BodyLevel => body_level::resolve(reader),
        SymbolKeyType::ConstructedMethod => constructed_method::resolve(reader),
        SymbolKeyType::NamedType => named_type::resolve(reader),
        SymbolKeyType::ErrorType => error_type::resolve(reader),
        SymbolKeyType::Field => members::resolve_field(reader),
        SymbolKeyType::Event => members::resolve_event(reader),
        SymbolKeyType::FunctionPointer => function_pointer::resolve(reader),
        SymbolKeyType::DynamicType => Ok(dynamic::resolve(reader)),
        SymbolKeyType::BuiltinOperator => builtin_operator::resolve(reader),
        SymbolKeyType::Method => method::resolve(reader),
        SymbolKeyType::Namespace => namespace::resolve(reader),
        SymbolKeyType::PointerType => pointer::resolve(reader),
        SymbolKeyType::Parameter => parameter::resolve(reader),
        SymbolKeyType::Property => members::resolve_property(reader),
        SymbolKeyType::ArrayType => array::resolve(reader),
        SymbolKeyType::Assembly => assembly::resolve(reader),
        SymbolKeyType::TupleType => tuple::resolve(reader),
        SymbolKeyType::Module => module::resolve(reader),
        SymbolKeyType::AnonymousType => anonymous::resolve_type(reader),
        SymbolKeyType::ReducedExtensionMethod => reduced_extension::resolve(reader),
        SymbolKeyType::TypeParameter => type_parameter::resolve(reader),
        SymbolKeyType::AnonymousFunctionOrDelegate => {
            anonymous::resolve_function_or_delegate(reader)
        }
        SymbolKeyType::Preprocessing => preprocessing::resolve(reader),
        SymbolKeyType::Array
        | SymbolKeyType::Reference
        | SymbolKeyType::Null
        | SymbolKeyType::TypeParameterOrdinal => Err(SymbolKeyError::malformed(
            reader.position(),
            format!("structural tag {} used as a record", tag.as_char()),
        )),
    }
}

/// Failure for `field` of a `tag` record, chaining the inner breadcrumb
pub(crate) fn fail(
    tag: SymbolKeyType,
    field: &str,
    inner: &SymbolKeyResolution,
) -> SymbolKeyResolution {
    SymbolKeyResolution::failed(breadcrumb(tag.name(), field, inner.failure_reason()))
}

/// Failure for `field` of a `tag` record with an explicit inner reason
pub(crate) fn fail_with(
    tag: SymbolKeyType,
    field: &str,
    inner: Option<&str>,
) -> SymbolKeyResolution {
    SymbolKeyResolution::failed(breadcrumb(tag.name(), field, inner))
}

/// Breadcrumb text for `field` of a `tag` record
pub(crate) fn reason(tag: SymbolKeyType, field: &str, inner: Option<&str>) -> String {
    breadcrumb(tag.name(), field, inner)
}

/// Error for a symbol whose payload does not match its record tag
pub(crate) fn wrong_kind(id: SymbolId, expected: &'static str) -> SymbolKeyError {
    symkey_model::ModelError::WrongKind { id, expected }.into()
}

/// View of the contextual symbol of the current record
pub(crate) fn contextual_view(reader: &SymbolKeyReader<'_>) -> Option<Arc<Symbol>> {
    reader
        .contextual()
        .and_then(|id| reader.compilation().symbol(id))
}

/// Container of the contextual symbol
pub(crate) fn contextual_container(reader: &SymbolKeyReader<'_>) -> Option<SymbolId> {
    contextual_view(reader).and_then(|view| view.container)
}

/// Ref kinds of a list of parameters
pub(crate) fn parameter_ref_kinds(
    compilation: &dyn Compilation,
    parameters: &[SymbolId],
) -> Result<Vec<RefKind>> {
    parameters
        .iter()
        .map(|parameter| -> Result<RefKind> {
            let view = compilation.require(*parameter)?;
            Ok(match &view.data {
                SymbolData::Parameter(data) => data.ref_kind,
                _ => RefKind::None,
            })
        })
        .collect()
}

/// Types of a list of parameters
pub(crate) fn parameter_types(
    compilation: &dyn Compilation,
    parameters: &[SymbolId],
) -> Result<Vec<SymbolId>> {
    parameters
        .iter()
        .map(|parameter| -> Result<SymbolId> {
            let view = compilation.require(*parameter)?;
            match &view.data {
                SymbolData::Parameter(data) => Ok(data.ty),
                _ => Err(wrong_kind(*parameter, "parameter")),
            }
        })
        .collect()
}

/// Parameter types of the original definition of `symbol`
pub(crate) fn definition_parameter_types(
    compilation: &dyn Compilation,
    id: SymbolId,
    symbol: &Symbol,
) -> Result<Vec<SymbolId>> {
    let definition = symbol.definition_or(id);
    if definition == id {
        parameter_types(compilation, symbol.parameters())
    } else {
        let view = compilation.require(definition)?;
        parameter_types(compilation, view.parameters())
    }
}
