//! Structural equivalence of subtrees.
//!
//! Two subtrees are equivalent when they have the same shape and their
//! tokens have the same kinds and texts. Trivia never participates.

use crate::parser::SyntaxKind;

use super::node::{ElementRef, NodeRef};

/// Compare two subtrees, skipping child nodes (on both sides) for which
/// `ignore_child` returns true. The roots themselves are always compared.
pub fn are_equivalent<F>(old: NodeRef<'_>, new: NodeRef<'_>, ignore_child: F) -> bool
where
    F: Fn(NodeRef<'_>) -> bool + Copy,
{
    if old.kind() != new.kind() {
        return false;
    }
    let keep = |e: &ElementRef<'_>| match e {
        ElementRef::Node(n) => !ignore_child(*n),
        ElementRef::Token(_) => true,
    };
    let mut old_children = old.children_with_tokens().filter(keep);
    let mut new_children = new.children_with_tokens().filter(keep);
    loop {
        match (old_children.next(), new_children.next()) {
            (None, None) => return true,
            (Some(ElementRef::Token(a)), Some(ElementRef::Token(b))) => {
                if a.kind() != b.kind() || a.text() != b.text() {
                    return false;
                }
            }
            (Some(ElementRef::Node(a)), Some(ElementRef::Node(b))) => {
                if !are_equivalent(a, b, ignore_child) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

/// Compare two subtrees token by token
pub fn are_equivalent_exact(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    are_equivalent(old, new, |_| false)
}

/// Compare two subtrees treating the bodies of lambdas and local functions
/// as equal. Signatures of nested functions still have to match.
pub fn are_equivalent_ignoring_lambda_bodies(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    if old.kind() != new.kind() {
        return false;
    }
    let old_body = nested_body(old);
    let new_body = nested_body(new);
    let mut old_children = old.children_with_tokens().filter(|e| Some(*e) != old_body);
    let mut new_children = new.children_with_tokens().filter(|e| Some(*e) != new_body);
    loop {
        match (old_children.next(), new_children.next()) {
            (None, None) => return true,
            (Some(ElementRef::Token(a)), Some(ElementRef::Token(b))) => {
                if a.kind() != b.kind() || a.text() != b.text() {
                    return false;
                }
            }
            (Some(ElementRef::Node(a)), Some(ElementRef::Node(b))) => {
                if !are_equivalent_ignoring_lambda_bodies(a, b) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn nested_body(node: NodeRef<'_>) -> Option<ElementRef<'_>> {
    if node.kind().is_nested_function() {
        node.nested_function_body().map(ElementRef::Node)
    } else {
        None
    }
}

/// Compare the token sequences of two subtrees, ignoring structure
pub fn are_token_equivalent(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    let mut old_tokens = old.descendant_tokens();
    let mut new_tokens = new.descendant_tokens();
    loop {
        match (old_tokens.next(), new_tokens.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a.kind() == b.kind() && a.text() == b.text() => {}
            _ => return false,
        }
    }
}

/// Kinds ignored when comparing declarations with their bodies stripped
pub fn is_member_body(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::BLOCK | SyntaxKind::ARROW_EXPRESSION_CLAUSE)
}
