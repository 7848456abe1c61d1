//! Ancestor analysis over the parse-tree arena.
//!
//! Pure queries: which ancestors start or stop exactly at a token, and
//! where two nodes' ancestor chains meet. Absence of an ancestor is a
//! normal result, never an error.

use smallvec::SmallVec;

use crate::tree::{NodeId, ParseTree};

/// Lazy walk from a node's immediate parent up to the root.
#[derive(Debug, Clone)]
pub struct Ancestors<'t> {
    tree: &'t ParseTree,
    cur: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cur?;
        self.cur = self.tree.parent(id);
        Some(id)
    }
}

impl ParseTree {
    /// Ancestors of `id`, immediate parent first, root last.
    #[must_use]
    pub fn ancestors_of(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            cur: self.parent(id),
        }
    }

    /// Outermost ancestor of `node` (itself included) whose span starts at
    /// `token_index`, or `None` when `node` does not start there.
    ///
    /// Identifies the largest construct opening at a token, e.g. a token
    /// that begins an expression, the enclosing statement, and the
    /// enclosing block all at once.
    #[must_use]
    pub fn earliest_ancestor_starting_at(
        &self,
        node: NodeId,
        token_index: usize,
    ) -> Option<NodeId> {
        let mut p = Some(node);
        let mut outermost = None;
        while let Some(id) = p {
            if self.start_token_index(id) != token_index {
                break;
            }
            outermost = Some(id);
            p = self.parent(id);
        }
        outermost
    }

    /// Outermost ancestor of `node` (itself included) whose span stops at
    /// `token_index`, or `None` when `node` does not stop there.
    #[must_use]
    pub fn earliest_ancestor_stopping_at(
        &self,
        node: NodeId,
        token_index: usize,
    ) -> Option<NodeId> {
        let mut p = Some(node);
        let mut outermost = None;
        while let Some(id) = p {
            if self.stop_token_index(id) != token_index {
                break;
            }
            outermost = Some(id);
            p = self.parent(id);
        }
        outermost
    }

    /// Deepest node on both `a`'s and `b`'s ancestor chains.
    ///
    /// Returns `a` when the nodes are equal, otherwise the first of `a`'s
    /// ancestors (nearest first) that is also an ancestor of `b`. `None`
    /// only for nodes of disjoint arenas.
    #[must_use]
    pub fn deepest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if a == b {
            return Some(a);
        }
        let b_chain: SmallVec<[NodeId; 16]> = self.ancestors_of(b).collect();
        self.ancestors_of(a).find(|id| b_chain.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    /// root(0) -> stmt(2) -> expr(3) -> [leaf t0, leaf t1]; sibling leaf t2.
    fn nested() -> (ParseTree, NodeId, NodeId, NodeId, NodeId) {
        let mut b = TreeBuilder::new();
        let l0 = b.leaf(0);
        let l1 = b.leaf(1);
        let l2 = b.leaf(2);
        let expr = b.rule(3, vec![l0, l1]);
        let stmt = b.rule(2, vec![expr]);
        let root = b.rule(0, vec![stmt, l2]);
        (b.build(root), expr, stmt, l0, l2)
    }

    #[test]
    fn ancestors_run_parent_to_root() {
        let (tree, expr, stmt, l0, _) = nested();
        let chain: Vec<NodeId> = tree.ancestors_of(l0).collect();
        assert_eq!(chain, vec![expr, stmt, tree.root()]);
    }

    #[test]
    fn earliest_starting_ancestor_climbs_to_outermost() {
        let (tree, expr, stmt, _, _) = nested();
        // expr, stmt, and root all start at token 0.
        assert_eq!(
            tree.earliest_ancestor_starting_at(expr, 0),
            Some(tree.root())
        );
        // stmt stops at token 1 but root stops at token 2.
        assert_eq!(tree.earliest_ancestor_stopping_at(expr, 1), Some(stmt));
    }

    #[test]
    fn no_ancestor_when_node_does_not_start_there() {
        let (tree, expr, _, _, _) = nested();
        assert_eq!(tree.earliest_ancestor_starting_at(expr, 1), None);
        assert_eq!(tree.earliest_ancestor_stopping_at(expr, 0), None);
    }

    #[test]
    fn common_ancestor_of_node_with_itself() {
        let (tree, expr, _, _, _) = nested();
        assert_eq!(tree.deepest_common_ancestor(expr, expr), Some(expr));
    }

    #[test]
    fn common_ancestor_across_subtrees_is_root() {
        let (tree, _, _, l0, l2) = nested();
        assert_eq!(tree.deepest_common_ancestor(l0, l2), Some(tree.root()));
    }
}
