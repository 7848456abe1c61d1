//! Arena-backed parse tree and the per-file document.
//!
//! The external parser's tree has parent back-references, a cyclic shape.
//! Here nodes live in an arena addressed by stable [`NodeId`]s; each node
//! stores its parent's id and rule nodes store their children's ids, so
//! ancestor walks are plain index-chasing.

use crate::token::TokenStream;

/// Stable handle to a node in a [`ParseTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of a parse-tree node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Internal node spanning a contiguous token range.
    Rule {
        /// Grammar rule id.
        rule_index: i32,
        /// Stream index of the first token under this node.
        start: usize,
        /// Stream index of the last token under this node (inclusive).
        stop: usize,
        /// Children in source order.
        children: Vec<NodeId>,
    },
    /// Terminal node wrapping one on-channel token.
    Leaf {
        /// Stream index of the wrapped token.
        token: usize,
    },
}

/// One parse-tree node; the root has no parent.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Rule or leaf payload.
    pub kind: NodeKind,
}

/// A parse tree owned by its document.
#[derive(Debug, Clone)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ParseTree {
    /// Root node of the tree.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics when `id` does not belong to this tree's arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Parent of `id`, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Children of `id` in source order; empty for leaves.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Rule { children, .. } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Grammar rule id of `id`, `None` for leaves.
    #[must_use]
    pub fn rule_index(&self, id: NodeId) -> Option<i32> {
        match self.node(id).kind {
            NodeKind::Rule { rule_index, .. } => Some(rule_index),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// True when `id` is an internal (rule) node.
    #[must_use]
    pub fn is_rule(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Rule { .. })
    }

    /// Stream index of the token wrapped by a leaf, `None` for rules.
    #[must_use]
    pub fn token_index(&self, id: NodeId) -> Option<usize> {
        match self.node(id).kind {
            NodeKind::Leaf { token } => Some(token),
            NodeKind::Rule { .. } => None,
        }
    }

    /// Stream index of the first token under `id`.
    #[must_use]
    pub fn start_token_index(&self, id: NodeId) -> usize {
        match self.node(id).kind {
            NodeKind::Rule { start, .. } => start,
            NodeKind::Leaf { token } => token,
        }
    }

    /// Stream index of the last token under `id` (inclusive).
    #[must_use]
    pub fn stop_token_index(&self, id: NodeId) -> usize {
        match self.node(id).kind {
            NodeKind::Rule { stop, .. } => stop,
            NodeKind::Leaf { token } => token,
        }
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a tree with an empty arena (never produced by the builder).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All leaf nodes, depth-first source order.
    #[must_use]
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.node(id).kind {
                NodeKind::Leaf { .. } => out.push(id),
                NodeKind::Rule { children, .. } => {
                    stack.extend(children.iter().rev().copied());
                }
            }
        }
        out
    }

    /// Deepest rule node whose token span contains both `a` and `b`.
    ///
    /// Descends from the root into the unique rule child covering the
    /// region; when no child covers it, the current node is the answer.
    /// Falls back to the root when even the root does not cover the region.
    #[must_use]
    pub fn smallest_rule_enclosing(&self, a: usize, b: usize) -> NodeId {
        let (lo, hi) = (a.min(b), a.max(b));
        let mut cur = self.root;
        'descend: loop {
            for &child in self.children(cur) {
                if self.is_rule(child)
                    && self.start_token_index(child) <= lo
                    && self.stop_token_index(child) >= hi
                {
                    cur = child;
                    continue 'descend;
                }
            }
            return cur;
        }
    }
}

/// Incremental arena construction, bottom-up.
///
/// Leaves and rules are pushed as they are discovered; [`TreeBuilder::rule`]
/// patches its children's parent pointers, and [`TreeBuilder::build`] seals
/// the arena with the chosen root.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Fresh builder with an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf wrapping the token at stream position `token_index`.
    pub fn leaf(&mut self, token_index: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            kind: NodeKind::Leaf { token: token_index },
        });
        id
    }

    /// Add a rule node over `children`, patching their parent pointers.
    ///
    /// The token span is derived from the first and last child; a childless
    /// rule (empty source) spans token 0.
    pub fn rule(&mut self, rule_index: i32, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let start = children
            .first()
            .map_or(0, |&c| self.start_token_index(c));
        let stop = children.last().map_or(0, |&c| self.stop_token_index(c));
        for &child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(Node {
            parent: None,
            kind: NodeKind::Rule {
                rule_index,
                start,
                stop,
                children,
            },
        });
        id
    }

    fn start_token_index(&self, id: NodeId) -> usize {
        match self.nodes[id.0].kind {
            NodeKind::Rule { start, .. } => start,
            NodeKind::Leaf { token } => token,
        }
    }

    fn stop_token_index(&self, id: NodeId) -> usize {
        match self.nodes[id.0].kind {
            NodeKind::Rule { stop, .. } => stop,
            NodeKind::Leaf { token } => token,
        }
    }

    /// Seal the arena.
    ///
    /// # Panics
    ///
    /// Panics when `root` is not a node of this arena.
    #[must_use]
    pub fn build(self, root: NodeId) -> ParseTree {
        assert!(
            root.0 < self.nodes.len(),
            "root {root:?} outside arena of {} nodes",
            self.nodes.len()
        );
        ParseTree {
            nodes: self.nodes,
            root,
        }
    }
}

/// One parsed source file: token stream, parse tree, and the tab size the
/// alignment detector uses for this file.
#[derive(Debug, Clone)]
pub struct Document {
    /// Token stream, hidden tokens and trailing EOF included.
    pub tokens: TokenStream,
    /// Parse tree over the on-channel tokens.
    pub tree: ParseTree,
    /// Columns per tab stop.
    pub tab_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// leaf(0) leaf(1) under rule A, leaf(2) under rule B, both under root.
    fn small_tree() -> (ParseTree, NodeId, NodeId) {
        let mut b = TreeBuilder::new();
        let l0 = b.leaf(0);
        let l1 = b.leaf(1);
        let l2 = b.leaf(2);
        let a = b.rule(7, vec![l0, l1]);
        let bb = b.rule(8, vec![l2]);
        let root = b.rule(1, vec![a, bb]);
        (b.build(root), a, bb)
    }

    #[test]
    fn spans_derive_from_children() {
        let (tree, a, bb) = small_tree();
        assert_eq!(tree.start_token_index(a), 0);
        assert_eq!(tree.stop_token_index(a), 1);
        assert_eq!(tree.start_token_index(tree.root()), 0);
        assert_eq!(tree.stop_token_index(tree.root()), 2);
        assert_eq!(tree.rule_index(bb), Some(8));
    }

    #[test]
    fn parents_are_patched() {
        let (tree, a, _) = small_tree();
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 3);
        assert_eq!(tree.parent(leaves[0]), Some(a));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn smallest_rule_enclosing_descends() {
        let (tree, a, bb) = small_tree();
        assert_eq!(tree.smallest_rule_enclosing(0, 1), a);
        assert_eq!(tree.smallest_rule_enclosing(2, 2), bb);
        assert_eq!(tree.smallest_rule_enclosing(1, 2), tree.root());
    }
}
