//! Declaration trees
//!
//! A [`DeclarationNode`] tree is the minimal syntax view the key reader needs:
//! which symbols a file declares, nested the way the declarations nest.

use crate::id::SymbolId;

/// One declaration in a file, with nested declarations as children
///
/// The root of a file has `declared == None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationNode {
    /// Symbol introduced by this declaration
    pub declared: Option<SymbolId>,
    /// Nested declarations in source order
    pub children: Vec<DeclarationNode>,
}

impl DeclarationNode {
    /// Root node of a file
    #[inline]
    #[must_use]
    pub fn root(children: Vec<DeclarationNode>) -> Self {
        Self {
            declared: None,
            children,
        }
    }

    /// Leaf declaring `symbol`
    #[inline]
    #[must_use]
    pub fn leaf(symbol: SymbolId) -> Self {
        Self {
            declared: Some(symbol),
            children: Vec::new(),
        }
    }

    /// Node declaring `symbol` with nested declarations
    #[inline]
    #[must_use]
    pub fn node(symbol: SymbolId, children: Vec<DeclarationNode>) -> Self {
        Self {
            declared: Some(symbol),
            children,
        }
    }

    /// Count every node in the tree, including this one
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(DeclarationNode::len).sum::<usize>()
    }

    /// Check if the node has no children
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
