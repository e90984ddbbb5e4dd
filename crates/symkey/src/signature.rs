//! Signature-only type equivalence
//!
//! Used when matching method and property signatures. Two method type
//! parameters are equal when they sit at the same ordinal, whatever method
//! declares them; everything else falls back to the compilation's own
//! equivalence after unwrapping structural types.

use crate::error::Result;
use symkey_model::{Compilation, SymbolData, SymbolId, TypeParameterKind, TypeShape};

/// Check if two types are equal for signature matching
pub(crate) fn types_equivalent(
    compilation: &dyn Compilation,
    a: SymbolId,
    b: SymbolId,
) -> Result<bool> {
    if a == b {
        return Ok(true);
    }
    let left = compilation.require(a)?;
    let right = compilation.require(b)?;

    match (&left.data, &right.data) {
        (SymbolData::TypeParameter(x), SymbolData::TypeParameter(y))
            if x.kind == TypeParameterKind::Method && y.kind == TypeParameterKind::Method =>
        {
            Ok(x.ordinal == y.ordinal)
        }
        (
            SymbolData::ArrayType { element: x, rank: xr },
            SymbolData::ArrayType { element: y, rank: yr },
        ) => Ok(xr == yr && types_equivalent(compilation, *x, *y)?),
        (SymbolData::PointerType { pointed_at: x }, SymbolData::PointerType { pointed_at: y }) => {
            types_equivalent(compilation, *x, *y)
        }
        (SymbolData::FunctionPointerType(x), SymbolData::FunctionPointerType(y)) => {
            if x.calling_convention != y.calling_convention
                || x.return_ref_kind != y.return_ref_kind
                || x.parameters.len() != y.parameters.len()
                || !types_equivalent(compilation, x.return_type, y.return_type)?
            {
                return Ok(false);
            }
            for (p, q) in x.parameters.iter().zip(&y.parameters) {
                if p.ref_kind != q.ref_kind || !types_equivalent(compilation, p.ty, q.ty)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => match (left.as_named_type(), right.as_named_type()) {
            (Some(x), Some(y)) => {
                let x_underlying = match &x.shape {
                    TypeShape::Tuple(tuple) => Some(tuple.underlying),
                    _ => None,
                };
                let y_underlying = match &y.shape {
                    TypeShape::Tuple(tuple) => Some(tuple.underlying),
                    _ => None,
                };
                if x_underlying.is_some() || y_underlying.is_some() {
                    return types_equivalent(
                        compilation,
                        x_underlying.unwrap_or(a),
                        y_underlying.unwrap_or(b),
                    );
                }
                if !compilation.symbols_equivalent(left.definition_or(a), right.definition_or(b))
                    || x.type_arguments.len() != y.type_arguments.len()
                {
                    return Ok(false);
                }
                for (p, q) in x.type_arguments.iter().zip(&y.type_arguments) {
                    if !types_equivalent(compilation, *p, *q)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(compilation.symbols_equivalent(a, b)),
        },
    }
}

/// Check if two parameter type lists are pairwise equivalent
pub(crate) fn parameter_types_match(
    compilation: &dyn Compilation,
    left: &[SymbolId],
    right: &[SymbolId],
) -> Result<bool> {
    if left.len() != right.len() {
        return Ok(false);
    }
    for (a, b) in left.iter().zip(right) {
        if !types_equivalent(compilation, *a, *b)? {
            return Ok(false);
        }
    }
    Ok(true)
}
