//! Matching of two labeled trees.
//!
//! The matcher pairs nodes of equal label. Labels are processed in ordinal
//! order; within a label, exactly equivalent nodes are paired first along
//! their longest common subsequence, and the rest greedily in passes of
//! increasing distance thresholds.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use tracing::trace;

use crate::syntax::{NodeId, NodeRef, are_equivalent_exact};

use super::comparer::TreeComparer;
use super::distance::MatchingDistance;
use super::edit_script::EditScript;
use super::label::Label;
use super::lcs::{self, SequenceEdit};

/// A one-to-one partial mapping between the labeled nodes of two trees.
/// The roots are always matched.
#[derive(Debug, Clone)]
pub struct Match<'t, C> {
    comparer: C,
    old_root: NodeRef<'t>,
    new_root: NodeRef<'t>,
    old_to_new: FxHashMap<NodeId, NodeRef<'t>>,
    new_to_old: FxHashMap<NodeId, NodeRef<'t>>,
}

impl<'t, C: TreeComparer<'t>> Match<'t, C> {
    pub fn new(comparer: C, old_root: NodeRef<'t>, new_root: NodeRef<'t>) -> Self {
        Self::with_known_matches(comparer, old_root, new_root, &[], MatchingDistance::MAX)
    }

    /// Match two trees, keeping `known_matches` whose labels agree.
    /// Greedy passes stop at `max_distance`.
    pub fn with_known_matches(
        comparer: C,
        old_root: NodeRef<'t>,
        new_root: NodeRef<'t>,
        known_matches: &[(NodeRef<'t>, NodeRef<'t>)],
        max_distance: f64,
    ) -> Self {
        let mut result = Self {
            comparer,
            old_root,
            new_root,
            old_to_new: FxHashMap::default(),
            new_to_old: FxHashMap::default(),
        };
        result.add(old_root, new_root);

        for &(old, new) in known_matches {
            if result.comparer.label(old) == result.comparer.label(new)
                && !result.has_partner_in_new(old)
                && !result.has_partner_in_old(new)
            {
                result.add(old, new);
            }
        }

        result.compute(max_distance);
        trace!(
            old_root = ?old_root,
            new_root = ?new_root,
            matched = result.old_to_new.len(),
            "tree match computed"
        );
        result
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    pub fn old_root(&self) -> NodeRef<'t> {
        self.old_root
    }

    pub fn new_root(&self) -> NodeRef<'t> {
        self.new_root
    }

    pub fn partner_in_new(&self, old: NodeRef<'t>) -> Option<NodeRef<'t>> {
        self.old_to_new.get(&old.id()).copied()
    }

    pub fn partner_in_old(&self, new: NodeRef<'t>) -> Option<NodeRef<'t>> {
        self.new_to_old.get(&new.id()).copied()
    }

    pub fn has_partner_in_new(&self, old: NodeRef<'t>) -> bool {
        self.old_to_new.contains_key(&old.id())
    }

    pub fn has_partner_in_old(&self, new: NodeRef<'t>) -> bool {
        self.new_to_old.contains_key(&new.id())
    }

    pub fn contains(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> bool {
        self.partner_in_new(old) == Some(new)
    }

    /// Matched pairs ordered by the old node's position
    pub fn matches(&self) -> Vec<(NodeRef<'t>, NodeRef<'t>)> {
        let mut pairs: Vec<_> = self
            .old_to_new
            .iter()
            .map(|(id, new)| (self.old_root.tree().node(*id), *new))
            .collect();
        pairs.sort_by_key(|(old, _)| old.id());
        pairs
    }

    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    /// Edit script transforming the old tree into the new one
    pub fn edit_script(&self) -> EditScript<'t> {
        EditScript::new(self)
    }

    /// Align two node sequences, treating matched nodes as equal
    pub fn sequence_edits(&self, old: &[NodeRef<'t>], new: &[NodeRef<'t>]) -> Vec<SequenceEdit> {
        lcs::edits(old, new, |a, b| self.contains(*a, *b))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn add(&mut self, old: NodeRef<'t>, new: NodeRef<'t>) {
        self.old_to_new.insert(old.id(), new);
        self.new_to_old.insert(new.id(), old);
    }

    fn compute(&mut self, max_distance: f64) {
        let old_nodes = self.group_by_label(self.old_root);
        let new_nodes = self.group_by_label(self.new_root);

        for (old_group, new_group) in old_nodes.iter().zip(&new_nodes) {
            let Some(first) = old_group.first() else {
                continue;
            };
            if new_group.is_empty() {
                continue;
            }
            let tied = self.comparer.label(*first).tied_to_ancestor();

            self.match_equivalent(old_group, new_group, tied);
            for threshold in MatchingDistance::PASSES {
                if threshold > max_distance || self.all_matched(old_group, new_group) {
                    break;
                }
                self.match_within(old_group, new_group, tied, threshold);
            }
        }
    }

    /// Labeled descendants of `root` bucketed by label ordinal
    fn group_by_label(&self, root: NodeRef<'t>) -> Vec<Vec<NodeRef<'t>>> {
        let mut groups = vec![Vec::new(); C::Label::COUNT];
        for node in self.comparer.descendants(root) {
            let label = self.comparer.label(node);
            if !label.is_ignored() {
                groups[label.ordinal()].push(node);
            }
        }
        groups
    }

    fn all_matched(&self, old_group: &[NodeRef<'t>], new_group: &[NodeRef<'t>]) -> bool {
        old_group.iter().all(|n| self.has_partner_in_new(*n))
            || new_group.iter().all(|n| self.has_partner_in_old(*n))
    }

    /// A tied node may only match a node whose tied ancestor is the partner
    /// of its own tied ancestor
    fn tied_ancestors_match(&self, old: NodeRef<'t>, new: NodeRef<'t>, tied: usize) -> bool {
        if tied == 0 {
            return true;
        }
        match (self.comparer.ancestor(old, tied), self.comparer.ancestor(new, tied)) {
            (Some(old_ancestor), Some(new_ancestor)) => self.contains(old_ancestor, new_ancestor),
            _ => false,
        }
    }

    /// Pair exactly equivalent nodes along their longest common subsequence
    fn match_equivalent(&mut self, old_group: &[NodeRef<'t>], new_group: &[NodeRef<'t>], tied: usize) {
        let old: Vec<_> = old_group
            .iter()
            .filter(|n| !self.has_partner_in_new(**n))
            .map(|n| (*n, fingerprint(*n)))
            .collect();
        let new: Vec<_> = new_group
            .iter()
            .filter(|n| !self.has_partner_in_old(**n))
            .map(|n| (*n, fingerprint(*n)))
            .collect();

        let pairs = lcs::compute(&old, &new, |(a, fa), (b, fb)| {
            fa == fb && self.tied_ancestors_match(*a, *b, tied) && are_equivalent_exact(*a, *b)
        });
        for (i, j) in pairs {
            self.add(old[i].0, new[j].0);
        }
    }

    /// Greedily pair each unmatched old node with its closest unmatched new
    /// node within `threshold`
    fn match_within(
        &mut self,
        old_group: &[NodeRef<'t>],
        new_group: &[NodeRef<'t>],
        tied: usize,
        threshold: f64,
    ) {
        let mut first_unmatched = 0;
        for &old in old_group {
            if self.has_partner_in_new(old) {
                continue;
            }

            let expected_ancestor = if tied > 0 {
                match self
                    .comparer
                    .ancestor(old, tied)
                    .and_then(|a| self.partner_in_new(a))
                {
                    Some(ancestor) => Some(ancestor),
                    None => continue,
                }
            } else {
                None
            };

            while first_unmatched < new_group.len() && self.has_partner_in_old(new_group[first_unmatched]) {
                first_unmatched += 1;
            }

            let mut best: Option<(NodeRef<'t>, f64)> = None;
            for &new in &new_group[first_unmatched..] {
                if self.has_partner_in_old(new) {
                    continue;
                }
                if expected_ancestor.is_some() && self.comparer.ancestor(new, tied) != expected_ancestor {
                    continue;
                }
                let distance = self.comparer.distance(old, new);
                if distance <= threshold && best.is_none_or(|(_, d)| distance < d) {
                    best = Some((new, distance));
                    if distance == MatchingDistance::EXACT {
                        break;
                    }
                }
            }

            if let Some((new, _)) = best {
                self.add(old, new);
            }
        }
    }
}

/// Hash of a subtree's token kinds and texts
fn fingerprint(node: NodeRef<'_>) -> u64 {
    let mut hasher = FxHasher::default();
    node.kind().hash(&mut hasher);
    for token in node.descendant_tokens() {
        token.kind().hash(&mut hasher);
        token.text().hash(&mut hasher);
    }
    hasher.finish()
}
