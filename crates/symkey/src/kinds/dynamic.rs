//! `I` dynamic type records: no fields

use super::fail_with;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;

pub(super) fn resolve(reader: &SymbolKeyReader<'_>) -> SymbolKeyResolution {
    match reader.compilation().dynamic_type() {
        Some(symbol) => SymbolKeyResolution::symbol(symbol),
        None => fail_with(SymbolKeyType::DynamicType, "create", None),
    }
}
