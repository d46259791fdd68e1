//! Distance primitives shared by the comparers.
//!
//! All distances are in `[0, 1]`; 0 means identical. Missing parts compare
//! equal to missing parts and maximally distant to present parts.

use crate::parser::SyntaxKind;
use crate::syntax::{NodeRef, TokenRef, are_equivalent_exact};

use super::lcs;

/// Thresholds used by the greedy matching passes
#[derive(Debug, Clone, Copy)]
pub struct MatchingDistance;

impl MatchingDistance {
    pub const EXACT: f64 = 0.0;
    /// Smallest distance of two nodes that are not equivalent
    pub const EPSILON: f64 = 0.00001;
    pub const MATCH_1: f64 = 0.5;
    pub const MATCH_2: f64 = 1.0;
    pub const MATCH_3: f64 = 1.5;
    pub const MAX: f64 = 2.0;

    /// Thresholds of the greedy passes that follow exact seeding
    pub const PASSES: [f64; 5] = [Self::EPSILON, Self::MATCH_1, Self::MATCH_2, Self::MATCH_3, Self::MAX];
}

fn tokens_equal(a: &TokenRef<'_>, b: &TokenRef<'_>) -> bool {
    a.kind() == b.kind() && a.text() == b.text()
}

/// LCS distance of two token sequences
pub fn token_distance(old: &[TokenRef<'_>], new: &[TokenRef<'_>]) -> f64 {
    lcs::distance(old, new, tokens_equal)
}

/// Token distance of two optional nodes
pub fn node_distance(old: Option<NodeRef<'_>>, new: Option<NodeRef<'_>>) -> f64 {
    match (old, new) {
        (None, None) => 0.0,
        (Some(old), Some(new)) => {
            let old: Vec<_> = old.descendant_tokens().collect();
            let new: Vec<_> = new.descendant_tokens().collect();
            token_distance(&old, &new)
        }
        _ => 1.0,
    }
}

/// Token distance of two node lists, ignoring `,` separators
pub fn node_list_distance(old: &[NodeRef<'_>], new: &[NodeRef<'_>]) -> f64 {
    let old_tokens = list_tokens(old);
    let new_tokens = list_tokens(new);
    token_distance(&old_tokens, &new_tokens)
}

fn list_tokens<'t>(nodes: &[NodeRef<'t>]) -> Vec<TokenRef<'t>> {
    nodes
        .iter()
        .flat_map(|n| n.descendant_tokens())
        .filter(|t| t.kind() != SyntaxKind::COMMA)
        .collect()
}

/// Character distance of two optional names
pub fn name_distance(old: Option<&str>, new: Option<&str>) -> f64 {
    match (old, new) {
        (None, None) => 0.0,
        (Some(old), Some(new)) => lcs::string_distance(old, new),
        _ => 1.0,
    }
}

/// 0 for equivalent subtrees, otherwise the token distance bumped to at
/// least [`MatchingDistance::EPSILON`]
pub fn value_distance(old: NodeRef<'_>, new: NodeRef<'_>) -> f64 {
    if are_equivalent_exact(old, new) {
        return MatchingDistance::EXACT;
    }
    let distance = node_distance(Some(old), Some(new));
    if distance == 0.0 {
        MatchingDistance::EPSILON
    } else {
        distance
    }
}

/// Combine a main distance with the distances of up to two optional parts.
/// Parts missing on both sides do not participate.
pub fn combine_optional(
    distance0: f64,
    part1: (Option<NodeRef<'_>>, Option<NodeRef<'_>>),
    part2: (Option<NodeRef<'_>>, Option<NodeRef<'_>>),
    weight0: f64,
    weight1: f64,
) -> f64 {
    let has1 = part1.0.is_some() || part1.1.is_some();
    let has2 = part2.0.is_some() || part2.1.is_some();
    match (has1, has2) {
        (false, false) => distance0,
        (true, false) => weight0 * distance0 + (1.0 - weight0) * node_distance(part1.0, part1.1),
        (false, true) => weight0 * distance0 + (1.0 - weight0) * node_distance(part2.0, part2.1),
        (true, true) => {
            let rest = weight1 * node_distance(part1.0, part1.1)
                + (1.0 - weight1) * node_distance(part2.0, part2.1);
            weight0 * distance0 + (1.0 - weight0) * rest
        }
    }
}

// ============================================================================
// Locals
// ============================================================================

/// Names of locals declared by a variable declaration
fn declaration_local_names<'t>(declaration: NodeRef<'t>, out: &mut Vec<TokenRef<'t>>) {
    out.extend(
        declaration
            .child_nodes(SyntaxKind::VARIABLE_DECLARATOR)
            .filter_map(|d| d.identifier()),
    );
}

/// Names of locals declared directly in a block
fn block_local_names<'t>(block: NodeRef<'t>) -> Vec<TokenRef<'t>> {
    let mut names = Vec::new();
    for statement in block.child_nodes(SyntaxKind::LOCAL_DECLARATION_STATEMENT) {
        if let Some(declaration) = statement.child_node(SyntaxKind::VARIABLE_DECLARATION) {
            declaration_local_names(declaration, &mut names);
        }
    }
    names
}

/// Distance of the locals declared by two declarations; `None` when either
/// side declares nothing
pub fn declaration_locals_distance(old: Option<NodeRef<'_>>, new: Option<NodeRef<'_>>) -> Option<f64> {
    let (old, new) = (old?, new?);
    let mut old_names = Vec::new();
    let mut new_names = Vec::new();
    declaration_local_names(old, &mut old_names);
    declaration_local_names(new, &mut new_names);
    if old_names.is_empty() || new_names.is_empty() {
        return None;
    }
    Some(token_distance(&old_names, &new_names))
}

/// Distance of the locals declared directly in two blocks; `None` when
/// either block declares nothing
pub fn block_locals_distance(old: NodeRef<'_>, new: NodeRef<'_>) -> Option<f64> {
    let old_names = block_local_names(old);
    let new_names = block_local_names(new);
    if old_names.is_empty() || new_names.is_empty() {
        return None;
    }
    Some(token_distance(&old_names, &new_names))
}

/// Weigh the locals of two block statements more than the rest
pub fn adjust_for_locals_in_block(
    distance: f64,
    old: Option<NodeRef<'_>>,
    new: Option<NodeRef<'_>>,
    locals_weight: f64,
) -> f64 {
    match (old, new) {
        (Some(old), Some(new)) if old.kind() == SyntaxKind::BLOCK && new.kind() == SyntaxKind::BLOCK => {
            match block_locals_distance(old, new) {
                Some(locals) => locals * locals_weight + distance * (1.0 - locals_weight),
                None => distance,
            }
        }
        _ => distance,
    }
}
