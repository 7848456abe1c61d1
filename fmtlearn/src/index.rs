//! Token-to-leaf index over one parse tree.

use rustc_hash::FxHashMap;

use crate::tree::{NodeId, ParseTree};

/// Mapping from token stream index to its leaf node.
///
/// Built once per document in a single traversal and cached by the
/// extractor; every on-channel token in the stream has exactly one entry.
#[derive(Debug, Clone)]
pub struct TreeIndex {
    map: FxHashMap<usize, NodeId>,
}

impl TreeIndex {
    /// Index every leaf of `tree`. A tree with no leaves yields an empty
    /// index.
    #[must_use]
    pub fn build(tree: &ParseTree) -> Self {
        let mut map = FxHashMap::default();
        for leaf in tree.leaves() {
            if let Some(token_index) = tree.token_index(leaf) {
                map.insert(token_index, leaf);
            }
        }
        Self { map }
    }

    /// Leaf node wrapping the token at stream position `token_index`.
    #[must_use]
    pub fn leaf_for(&self, token_index: usize) -> Option<NodeId> {
        self.map.get(&token_index).copied()
    }

    /// Number of indexed tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the tree had no leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
