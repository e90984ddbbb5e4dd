//! `A` alias records: name, target, declaring file
//!
//! Aliases only exist in the file that declares them. The resolver walks
//! that file's declarations, descending through namespaces but never into
//! types or members, since aliases cannot be declared there.

use super::{contextual_view, fail, fail_with, reason, wrong_kind};
use crate::error::Result;
use crate::grammar::SymbolKeyType;
use crate::reader::SymbolKeyReader;
use crate::resolution::SymbolKeyResolution;
use crate::writer::SymbolKeyWriter;
use symkey_model::{DeclarationNode, Symbol, SymbolData, SymbolId, SymbolKind};

pub(super) fn create(writer: &mut SymbolKeyWriter<'_>, id: SymbolId, symbol: &Symbol) -> Result<()> {
    let SymbolData::Alias(alias) = &symbol.data else {
        return Err(wrong_kind(id, "alias"));
    };
    writer.write_string(Some(&symbol.name));
    writer.write_symbol_key(Some(alias.target))?;
    writer.write_string(symbol.first_location().path());
    Ok(())
}

pub(super) fn resolve(reader: &mut SymbolKeyReader<'_>) -> Result<SymbolKeyResolution> {
    let name = reader.read_name()?;
    let contextual = contextual_view(reader).and_then(|view| match view.data {
        SymbolData::Alias(alias) => Some(alias.target),
        _ => None,
    });
    let targets = reader.read_symbol_key(contextual)?;
    let path = reader.read_string()?;

    if !targets.is_found() {
        return Ok(fail(SymbolKeyType::Alias, "target", &targets));
    }
    let Some(path) = path else {
        return Ok(fail_with(SymbolKeyType::Alias, "filePath", None));
    };
    let Some(tree) = reader.compilation().syntax_tree(&path) else {
        return Ok(fail_with(SymbolKeyType::Alias, "filePath", None));
    };

    let targets = targets.all_symbols();
    let mut matches = Vec::new();
    collect_aliases(reader, &tree, &name, &targets, &mut matches)?;
    Ok(SymbolKeyResolution::from_symbols(matches, || {
        reason(SymbolKeyType::Alias, "name", None)
    }))
}

fn collect_aliases(
    reader: &SymbolKeyReader<'_>,
    node: &DeclarationNode,
    name: &str,
    targets: &[SymbolId],
    matches: &mut Vec<SymbolId>,
) -> Result<()> {
    let compilation = reader.compilation();
    for child in &node.children {
        let Some(declared) = child.declared else {
            continue;
        };
        let view = reader.require(declared)?;
        match &view.data {
            SymbolData::Alias(alias) => {
                let same_target = targets
                    .iter()
                    .any(|target| compilation.symbols_equivalent(alias.target, *target));
                if same_target && reader.names_equal(&view.name, name) {
                    matches.push(declared);
                }
            }
            _ if view.kind() == SymbolKind::Namespace => {
                collect_aliases(reader, child, name, targets, matches)?;
            }
            _ => {}
        }
    }
    Ok(())
}
