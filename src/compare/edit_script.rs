//! Edit scripts derived from a [`Match`].
//!
//! Inserts, updates, moves and reorders are produced by a breadth-first
//! walk of the new tree; deletes follow in preorder of the old tree. A
//! parent's edit always precedes its descendants' edits of the same walk.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::syntax::{NodeId, NodeRef};

use super::comparer::TreeComparer;
use super::lcs;
use super::matching::Match;

/// Kind of a tree edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EditKind {
    /// Node value changed
    Update,
    Insert,
    Delete,
    /// Node moved to a different parent
    Move,
    /// Node moved among the children of the same parent
    Reorder,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditKind::Update => "update",
            EditKind::Insert => "insert",
            EditKind::Delete => "delete",
            EditKind::Move => "move",
            EditKind::Reorder => "reorder",
        };
        f.write_str(name)
    }
}

/// One tree edit. Inserts carry only the new node, deletes only the old one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edit<'t> {
    Update { old: NodeRef<'t>, new: NodeRef<'t> },
    Insert { new: NodeRef<'t> },
    Delete { old: NodeRef<'t> },
    Move { old: NodeRef<'t>, new: NodeRef<'t> },
    Reorder { old: NodeRef<'t>, new: NodeRef<'t> },
}

impl<'t> Edit<'t> {
    pub fn kind(&self) -> EditKind {
        match self {
            Edit::Update { .. } => EditKind::Update,
            Edit::Insert { .. } => EditKind::Insert,
            Edit::Delete { .. } => EditKind::Delete,
            Edit::Move { .. } => EditKind::Move,
            Edit::Reorder { .. } => EditKind::Reorder,
        }
    }

    pub fn old_node(&self) -> Option<NodeRef<'t>> {
        match *self {
            Edit::Update { old, .. }
            | Edit::Delete { old }
            | Edit::Move { old, .. }
            | Edit::Reorder { old, .. } => Some(old),
            Edit::Insert { .. } => None,
        }
    }

    pub fn new_node(&self) -> Option<NodeRef<'t>> {
        match *self {
            Edit::Update { new, .. }
            | Edit::Insert { new }
            | Edit::Move { new, .. }
            | Edit::Reorder { new, .. } => Some(new),
            Edit::Delete { .. } => None,
        }
    }

    /// The node the edit is reported on: the new node when there is one
    pub fn node(&self) -> NodeRef<'t> {
        match *self {
            Edit::Delete { old } => old,
            Edit::Update { new, .. }
            | Edit::Insert { new }
            | Edit::Move { new, .. }
            | Edit::Reorder { new, .. } => new,
        }
    }
}

impl fmt::Debug for Edit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.old_node(), self.new_node()) {
            (Some(old), Some(new)) => write!(f, "{} [{:?}]->[{:?}]", self.kind(), old, new),
            (Some(old), None) => write!(f, "{} [{:?}]", self.kind(), old),
            (None, Some(new)) => write!(f, "{} [{:?}]", self.kind(), new),
            (None, None) => write!(f, "{}", self.kind()),
        }
    }
}

/// Ordered edits transforming the old tree into the new one
#[derive(Debug, Clone, Default)]
pub struct EditScript<'t> {
    edits: Vec<Edit<'t>>,
}

impl<'t> EditScript<'t> {
    pub fn new<C: TreeComparer<'t>>(m: &Match<'t, C>) -> Self {
        let mut builder = Builder {
            m,
            edits: Vec::new(),
        };
        builder.add_updates_inserts_moves();
        builder.add_deletes();
        Self { edits: builder.edits }
    }

    pub fn edits(&self) -> &[Edit<'t>] {
        &self.edits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit<'t>> {
        self.edits.iter()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Insert, delete and update edits keyed by node. Moves and reorders are
    /// not recorded.
    pub fn edit_map(&self) -> EditMap {
        let mut map = EditMap::default();
        for edit in &self.edits {
            match *edit {
                Edit::Delete { old } => {
                    map.old.insert(old.id(), EditKind::Delete);
                }
                Edit::Insert { new } => {
                    map.new.insert(new.id(), EditKind::Insert);
                }
                Edit::Update { old, new } => {
                    map.old.insert(old.id(), EditKind::Update);
                    map.new.insert(new.id(), EditKind::Update);
                }
                Edit::Move { .. } | Edit::Reorder { .. } => {}
            }
        }
        map
    }
}

impl<'a, 't> IntoIterator for &'a EditScript<'t> {
    type Item = &'a Edit<'t>;
    type IntoIter = std::slice::Iter<'a, Edit<'t>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// Node to edit kind lookup, one table per tree
#[derive(Debug, Clone, Default)]
pub struct EditMap {
    old: FxHashMap<NodeId, EditKind>,
    new: FxHashMap<NodeId, EditKind>,
}

impl EditMap {
    pub fn old_edit(&self, old: NodeRef<'_>) -> Option<EditKind> {
        self.old.get(&old.id()).copied()
    }

    pub fn new_edit(&self, new: NodeRef<'_>) -> Option<EditKind> {
        self.new.get(&new.id()).copied()
    }

    /// The syntactic parent of an inserted or deleted node carries the same
    /// kind of edit
    pub fn has_parent_edit(&self, edit: &Edit<'_>) -> bool {
        match *edit {
            Edit::Insert { new } => new
                .parent()
                .is_some_and(|p| self.new_edit(p) == Some(EditKind::Insert)),
            Edit::Delete { old } => old
                .parent()
                .is_some_and(|p| self.old_edit(p) == Some(EditKind::Delete)),
            _ => false,
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

struct Builder<'m, 't, C> {
    m: &'m Match<'t, C>,
    edits: Vec<Edit<'t>>,
}

impl<'t, C: TreeComparer<'t>> Builder<'_, 't, C> {
    fn add_updates_inserts_moves(&mut self) {
        let m = self.m;
        let comparer = m.comparer();
        let mut queue = VecDeque::new();
        queue.push_back(m.new_root());
        while let Some(node) = queue.pop_front() {
            self.process_node(node);
            queue.extend(comparer.children(node));
        }
    }

    fn process_node(&mut self, new: NodeRef<'t>) {
        let m = self.m;
        let comparer = m.comparer();
        let Some(old) = m.partner_in_old(new) else {
            self.edits.push(Edit::Insert { new });
            return;
        };

        if let Some(new_parent) = comparer.parent(new) {
            if !comparer.values_equal(old, new) {
                self.edits.push(Edit::Update { old, new });
            }
            let parents_match = comparer
                .parent(old)
                .is_some_and(|old_parent| m.contains(old_parent, new_parent));
            if !parents_match {
                self.edits.push(Edit::Move { old, new });
            }
        }

        self.align_children(old, new);
    }

    /// Children matched to children of the partner but out of LCS order are
    /// reordered
    fn align_children(&mut self, old: NodeRef<'t>, new: NodeRef<'t>) {
        let m = self.m;
        let comparer = m.comparer();
        let old_children: Vec<_> = comparer
            .children(old)
            .into_iter()
            .filter(|c| {
                m.partner_in_new(*c)
                    .and_then(|p| comparer.parent(p))
                    .is_some_and(|p| p == new)
            })
            .collect();
        let new_children: Vec<_> = comparer
            .children(new)
            .into_iter()
            .filter(|c| {
                m.partner_in_old(*c)
                    .and_then(|p| comparer.parent(p))
                    .is_some_and(|p| p == old)
            })
            .collect();
        if old_children.is_empty() || new_children.is_empty() {
            return;
        }

        let in_order = lcs::compute(&old_children, &new_children, |a, b| m.contains(*a, *b));
        let mut ordered = vec![false; old_children.len()];
        for (i, _) in in_order {
            ordered[i] = true;
        }
        for (i, child) in old_children.iter().enumerate() {
            if ordered[i] {
                continue;
            }
            if let Some(partner) = m.partner_in_new(*child) {
                self.edits.push(Edit::Reorder {
                    old: *child,
                    new: partner,
                });
            }
        }
    }

    fn add_deletes(&mut self) {
        let m = self.m;
        for old in m.comparer().descendants(m.old_root()) {
            if !m.has_partner_in_new(old) {
                self.edits.push(Edit::Delete { old });
            }
        }
    }
}
