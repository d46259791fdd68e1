//! The interface a tree matcher needs from a labeling scheme.

use crate::syntax::{NodeRef, are_equivalent_exact};

use super::distance::{MatchingDistance, value_distance};
use super::label::{Classification, Label};

/// Tree view and distance metric used by [`Match`](super::Match) and
/// [`EditScript`](super::EditScript).
///
/// Only labeled nodes take part in matching. A labeled node's *parent* is
/// its nearest labeled ancestor and its *children* are the labeled nodes
/// reachable through unlabeled ones. Enumeration never enters leaves.
pub trait TreeComparer<'t>: Sync {
    type Label: Label;

    fn classify(&self, node: NodeRef<'t>) -> Classification<Self::Label>;

    /// Distance that takes the node kind's structure into account.
    /// `None` falls back to [`value_distance`].
    fn weighted_distance(&self, _old: NodeRef<'t>, _new: NodeRef<'t>) -> Option<f64> {
        None
    }

    /// Whether an update edit is needed for two matched nodes. Labeled
    /// children are not part of a node's value.
    fn values_equal(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> bool;

    fn label(&self, node: NodeRef<'t>) -> Self::Label {
        self.classify(node).label
    }

    fn has_label(&self, node: NodeRef<'t>) -> bool {
        !self.label(node).is_ignored()
    }

    /// Enumeration enters the node's children
    fn descends_into(&self, node: NodeRef<'t>) -> bool {
        !self.classify(node).is_leaf
    }

    /// Distance in `[0, 1]` of two nodes with the same label
    fn distance(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> f64 {
        match self.weighted_distance(old, new) {
            Some(d) if d == 0.0 && !are_equivalent_exact(old, new) => MatchingDistance::EPSILON,
            Some(d) => d,
            None => value_distance(old, new),
        }
    }

    /// Nearest labeled ancestor
    fn parent(&self, node: NodeRef<'t>) -> Option<NodeRef<'t>> {
        node.ancestors().skip(1).find(|a| self.has_label(*a))
    }

    /// Labeled ancestor `level` steps up
    fn ancestor(&self, node: NodeRef<'t>, level: usize) -> Option<NodeRef<'t>> {
        let mut current = node;
        for _ in 0..level {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// Labeled children in source order
    fn children(&self, node: NodeRef<'t>) -> Vec<NodeRef<'t>> {
        let mut result = Vec::new();
        if !self.descends_into(node) {
            return result;
        }
        let mut stack: Vec<NodeRef<'t>> = node.children().rev().collect();
        while let Some(child) = stack.pop() {
            if self.has_label(child) {
                result.push(child);
            } else if self.descends_into(child) {
                stack.extend(child.children().rev());
            }
        }
        result
    }

    /// Labeled strict descendants of `root` in preorder
    fn descendants(&self, root: NodeRef<'t>) -> Vec<NodeRef<'t>> {
        root.descendants_with(|n| n == root || self.descends_into(n))
            .skip(1)
            .filter(|n| self.has_label(*n))
            .collect()
    }
}
