//! Comparer for statements inside one member or lambda body.

use crate::parser::SyntaxKind;
use crate::syntax::ast::{
    CatchClause, EmbeddedStatementOwner, ForEachStatement, ForStatement, IfStatement, Lambda,
    UsingStatement,
};
use crate::syntax::{AstNode, NodeRef, are_equivalent, are_equivalent_exact, are_equivalent_ignoring_lambda_bodies};

use super::comparer::TreeComparer;
use super::distance::{
    adjust_for_locals_in_block, block_locals_distance, combine_optional, declaration_locals_distance,
    name_distance, node_distance, node_list_distance, value_distance,
};
use super::label::{Classification, Label, StatementLabel};

/// Matches statements of a body. The roots are labeled `Root` and never
/// match anything but each other. Lambda and local function bodies are not
/// entered; they are matched separately.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementSyntaxComparer<'t> {
    old_root: Option<NodeRef<'t>>,
    new_root: Option<NodeRef<'t>>,
}

impl<'t> StatementSyntaxComparer<'t> {
    pub fn new(old_root: NodeRef<'t>, new_root: NodeRef<'t>) -> Self {
        Self {
            old_root: Some(old_root),
            new_root: Some(new_root),
        }
    }

    pub fn is_root(&self, node: NodeRef<'t>) -> bool {
        self.old_root == Some(node) || self.new_root == Some(node)
    }

    fn parent_label(&self, node: NodeRef<'t>) -> Option<StatementLabel> {
        node.parent().map(|p| self.label(p))
    }

    fn block_distance(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> f64 {
        let (Some(old_parent), Some(new_parent)) = (old.parent(), new.parent()) else {
            return 0.0;
        };
        if self.parent_label(old) != self.parent_label(new) {
            return 0.2 + 0.8 * weighted_block_distance(old, new);
        }
        match old_parent.kind() {
            SyntaxKind::IF_STATEMENT
            | SyntaxKind::FOREACH_STATEMENT
            | SyntaxKind::FOR_STATEMENT
            | SyntaxKind::WHILE_STATEMENT
            | SyntaxKind::DO_STATEMENT
            | SyntaxKind::LOCK_STATEMENT
            | SyntaxKind::USING_STATEMENT
            | SyntaxKind::SWITCH_SECTION => self.distance(old_parent, new_parent),
            SyntaxKind::CATCH_CLAUSE => {
                let old_catch = CatchClause(old_parent);
                let new_catch = CatchClause(new_parent);
                let bare = |c: CatchClause<'t>| c.declaration().is_none() && c.filter().is_none();
                if bare(old_catch) && bare(new_catch) {
                    // Bare catch blocks are told apart by their try blocks
                    let old_try = old_parent.parent().and_then(|t| t.child_node(SyntaxKind::BLOCK));
                    let new_try = new_parent.parent().and_then(|t| t.child_node(SyntaxKind::BLOCK));
                    let tries = match (old_try, new_try) {
                        (Some(old_try), Some(new_try)) => value_distance(old_try, new_try),
                        (None, None) => 0.0,
                        _ => 1.0,
                    };
                    0.5 * tries + 0.5 * value_distance(old, new)
                } else {
                    self.distance(old_parent, new_parent)
                }
            }
            SyntaxKind::CHECKED_STATEMENT
            | SyntaxKind::UNCHECKED_STATEMENT
            | SyntaxKind::ELSE_CLAUSE
            | SyntaxKind::FINALLY_CLAUSE
            | SyntaxKind::TRY_STATEMENT => 0.2 * value_distance(old, new),
            _ => weighted_block_distance(old, new),
        }
    }
}

impl<'t> TreeComparer<'t> for StatementSyntaxComparer<'t> {
    type Label = StatementLabel;

    fn classify(&self, node: NodeRef<'t>) -> Classification<StatementLabel> {
        if self.is_root(node) {
            return Classification {
                label: StatementLabel::Root,
                is_leaf: false,
            };
        }
        StatementLabel::classify(node.kind(), node.parent().map(|p| p.kind()))
    }

    fn parent(&self, node: NodeRef<'t>) -> Option<NodeRef<'t>> {
        if self.is_root(node) {
            return None;
        }
        node.ancestors().skip(1).find(|a| self.has_label(*a))
    }

    fn descends_into(&self, node: NodeRef<'t>) -> bool {
        if self.is_root(node) {
            return true;
        }
        !self.classify(node).is_leaf && !node.kind().is_nested_function()
    }

    fn weighted_distance(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> Option<f64> {
        let distance = match old.kind() {
            SyntaxKind::BLOCK => self.block_distance(old, new),
            SyntaxKind::VARIABLE_DECLARATOR => name_distance(
                old.identifier().map(|t| t.text()),
                new.identifier().map(|t| t.text()),
            ),
            SyntaxKind::IF_STATEMENT => {
                let (old, new) = (IfStatement(old), IfStatement(new));
                header_distance(old.condition(), old.statement(), new.condition(), new.statement())
            }
            SyntaxKind::WHILE_STATEMENT | SyntaxKind::DO_STATEMENT | SyntaxKind::LOCK_STATEMENT => {
                let (old, new) = (EmbeddedStatementOwner(old), EmbeddedStatementOwner(new));
                header_distance(old.expression(), old.statement(), new.expression(), new.statement())
            }
            SyntaxKind::FOR_STATEMENT => for_distance(ForStatement(old), ForStatement(new)),
            SyntaxKind::FOREACH_STATEMENT => foreach_distance(ForEachStatement(old), ForEachStatement(new)),
            SyntaxKind::USING_STATEMENT => using_distance(UsingStatement(old), UsingStatement(new)),
            SyntaxKind::CATCH_CLAUSE => {
                let (old, new) = (CatchClause(old), CatchClause(new));
                let blocks = node_distance(old.block(), new.block());
                let distance = combine_optional(
                    blocks,
                    (old.declaration(), new.declaration()),
                    (old.filter(), new.filter()),
                    0.8,
                    0.5,
                );
                adjust_for_locals_in_block(distance, old.block(), new.block(), 0.3)
            }
            SyntaxKind::SIMPLE_LAMBDA_EXPRESSION
            | SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION
            | SyntaxKind::LOCAL_FUNCTION_STATEMENT => nested_function_distance(old, new)?,
            SyntaxKind::YIELD_RETURN_STATEMENT | SyntaxKind::YIELD_BREAK_STATEMENT => {
                // The yielded values matter less than the state machine shape
                if old.kind() == new.kind() { 0.0 } else { 0.1 }
            }
            _ => return None,
        };
        Some(distance)
    }

    fn values_equal(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> bool {
        match old.kind() {
            // Everything but the punctuation is labeled
            SyntaxKind::FOR_STATEMENT => true,
            SyntaxKind::SWITCH_SECTION => {
                let labels = |n: NodeRef<'t>| {
                    n.children()
                        .filter(|c| !c.kind().is_statement())
                        .collect::<Vec<_>>()
                };
                let (old_labels, new_labels) = (labels(old), labels(new));
                old_labels.len() == new_labels.len()
                    && old_labels
                        .iter()
                        .zip(&new_labels)
                        .all(|(a, b)| are_equivalent(*a, *b, |c| self.has_label_any(c)))
            }
            kind if kind.is_nested_function() => are_equivalent_ignoring_lambda_bodies(old, new),
            _ if self.classify(old).is_leaf => are_equivalent_exact(old, new),
            _ => are_equivalent(old, new, |c| self.has_label_any(c)),
        }
    }
}

impl StatementSyntaxComparer<'_> {
    /// Label test usable for nodes of any lifetime. Roots are never
    /// children of the nodes being compared.
    fn has_label_any(&self, node: NodeRef<'_>) -> bool {
        let parent = node.parent().map(|p| p.kind());
        !StatementLabel::classify(node.kind(), parent).label.is_ignored()
    }
}

// ============================================================================
// Weighted distances
// ============================================================================

fn weighted_block_distance(old: NodeRef<'_>, new: NodeRef<'_>) -> f64 {
    block_locals_distance(old, new).unwrap_or_else(|| value_distance(old, new))
}

/// Statements with a header (condition, lock target) and an embedded
/// statement; the header dominates
fn header_distance(
    old_header: Option<NodeRef<'_>>,
    old_statement: Option<NodeRef<'_>>,
    new_header: Option<NodeRef<'_>>,
    new_statement: Option<NodeRef<'_>>,
) -> f64 {
    let headers = node_distance(old_header, new_header);
    let statements = node_distance(old_statement, new_statement);
    let distance = headers * 0.6 + statements * 0.4;
    adjust_for_locals_in_block(distance, old_statement, new_statement, 0.5)
}

fn for_distance(old: ForStatement<'_>, new: ForStatement<'_>) -> f64 {
    let statements = node_distance(old.statement(), new.statement());
    let conditions = node_distance(old.condition(), new.condition());
    let incrementors = node_list_distance(&old.incrementors(), &new.incrementors());
    let distance = conditions * 0.3 + incrementors * 0.3 + statements * 0.4;
    match declaration_locals_distance(old.declaration(), new.declaration()) {
        Some(locals) => distance * 0.4 + locals * 0.6,
        None => distance,
    }
}

fn foreach_distance(old: ForEachStatement<'_>, new: ForEachStatement<'_>) -> f64 {
    let statements = node_distance(old.statement(), new.statement());
    let expressions = node_distance(old.expression(), new.expression());
    let identifiers = name_distance(
        old.identifier().map(|t| t.text()),
        new.identifier().map(|t| t.text()),
    );
    let distance = identifiers * 0.6 + expressions * 0.2 + statements * 0.2;
    adjust_for_locals_in_block(distance, old.statement(), new.statement(), 0.6)
}

fn using_distance(old: UsingStatement<'_>, new: UsingStatement<'_>) -> f64 {
    match declaration_locals_distance(old.declaration(), new.declaration()) {
        Some(locals) => {
            let statements = node_distance(old.statement(), new.statement());
            statements * 0.2 + locals * 0.8
        }
        None => {
            let old_header = using_header(old);
            let new_header = using_header(new);
            header_distance(old_header, old.statement(), new_header, new.statement())
        }
    }
}

fn using_header<'t>(using: UsingStatement<'t>) -> Option<NodeRef<'t>> {
    using.expression().or(using.declaration())
}

/// An async mismatch keeps lambdas apart; otherwise parameters weigh more
/// than bodies
fn nested_function_distance(old: NodeRef<'_>, new: NodeRef<'_>) -> Option<f64> {
    let old = Lambda::cast(old)?;
    let new = Lambda::cast(new)?;
    if old.is_async() != new.is_async() {
        return Some(1.0);
    }
    let parameters = {
        let old_params: Vec<_> = old.parameters().iter().map(|p| p.syntax()).collect();
        let new_params: Vec<_> = new.parameters().iter().map(|p| p.syntax()).collect();
        node_list_distance(&old_params, &new_params)
    };
    let bodies = node_distance(old.body(), new.body());
    let mut distance = parameters * 0.6 + bodies * 0.4;
    if old.is_local_function() {
        let names = name_distance(
            old.name().map(|t| t.text()),
            new.name().map(|t| t.text()),
        );
        distance = distance * 0.5 + names * 0.5;
    }
    Some(distance)
}
