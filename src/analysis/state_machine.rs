//! Async methods, iterators and their suspension points.
//!
//! A suspended state machine resumes at the suspension point it stopped
//! at. Suspension points are therefore matched before the rest of the body
//! and passed to the body match as known matches.

use crate::base::TextRange;
use crate::compare::{EditKind, SequenceEdit, lcs};
use crate::parser::SyntaxKind;
use crate::syntax::{NodeRef, are_equivalent_ignoring_lambda_bodies};

use super::body::{BodyContext, member_body};
use super::display::{deleted_node_span, diagnostic_span, display_name};
use super::rude_edit::{RudeEditDiagnostic, RudeEditKind};

/// Shape of the state machine a function compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateMachineKind {
    None,
    Async,
    Iterator,
}

impl StateMachineKind {
    pub fn display_name(self) -> &'static str {
        match self {
            StateMachineKind::None => "method",
            StateMachineKind::Async => "async method",
            StateMachineKind::Iterator => "iterator",
        }
    }
}

/// Kind of state machine of a member, lambda or local function
pub fn state_machine_kind(function: NodeRef<'_>) -> StateMachineKind {
    if function.has_token(SyntaxKind::ASYNC_KW) {
        return StateMachineKind::Async;
    }
    let body = if function.kind().is_nested_function() {
        function.nested_function_body()
    } else {
        member_body(function)
    };
    let is_iterator = body.is_some_and(|body| {
        body.descendants_with(|n| !n.kind().is_nested_function())
            .any(|n| matches!(n.kind(), SyntaxKind::YIELD_RETURN_STATEMENT | SyntaxKind::YIELD_BREAK_STATEMENT))
    });
    if is_iterator {
        StateMachineKind::Iterator
    } else {
        StateMachineKind::None
    }
}

/// Await expressions and `yield return` statements of a body, excluding
/// those of nested lambdas and local functions, in source order
pub fn suspension_points(body: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    body.descendants_with(|n| !n.kind().is_nested_function())
        .filter(|n| matches!(n.kind(), SyntaxKind::AWAIT_EXPRESSION | SyntaxKind::YIELD_RETURN_STATEMENT))
        .collect()
}

/// Suspension points of two bodies matched ahead of the body match
#[derive(Debug, Clone, Default)]
pub(crate) struct SuspensionPointMatch<'t> {
    pub known: Vec<(NodeRef<'t>, NodeRef<'t>)>,
    pub deleted: Vec<NodeRef<'t>>,
    pub inserted: Vec<NodeRef<'t>>,
    /// Suspension points are added to a body with none and active statements
    pub creating: bool,
}

pub(crate) fn match_suspension_points<'t>(
    old_body: NodeRef<'t>,
    new_body: NodeRef<'t>,
    has_active_statements: bool,
) -> SuspensionPointMatch<'t> {
    let old_points = suspension_points(old_body);
    let new_points = suspension_points(new_body);
    let creating = old_points.is_empty() && !new_points.is_empty() && has_active_statements;
    let mut result = SuspensionPointMatch {
        creating,
        ..SuspensionPointMatch::default()
    };
    if old_points.is_empty() && !creating {
        return result;
    }

    if old_points.len() == new_points.len()
        && old_points.iter().zip(&new_points).all(|(o, n)| o.kind() == n.kind())
    {
        result.known = old_points.into_iter().zip(new_points).collect();
        return result;
    }

    for edit in lcs::edits(&old_points, &new_points, |o, n| o.kind() == n.kind()) {
        match edit {
            SequenceEdit::Match { old_index, new_index } => {
                result.known.push((old_points[old_index], new_points[new_index]))
            }
            SequenceEdit::Delete { old_index } => result.deleted.push(old_points[old_index]),
            SequenceEdit::Insert { new_index } => result.inserted.push(new_points[new_index]),
        }
    }
    result
}

/// An await whose surrounding statement keeps no temporaries across the
/// suspension: `await F();`, `x = await F();`, `var x = await F();` and
/// `return await F();`
fn is_simple_await(await_expr: NodeRef<'_>) -> bool {
    let Some(parent) = await_expr.parent() else {
        return false;
    };
    match parent.kind() {
        SyntaxKind::EXPRESSION_STATEMENT | SyntaxKind::RETURN_STATEMENT => true,
        SyntaxKind::ASSIGNMENT_EXPRESSION => {
            let mut children = parent.children();
            let target = children.next();
            parent.has_token(SyntaxKind::EQ)
                && target.is_some_and(|t| t.kind() == SyntaxKind::NAME_EXPRESSION)
                && children.next() == Some(await_expr)
                && parent.parent().is_some_and(|p| p.kind() == SyntaxKind::EXPRESSION_STATEMENT)
        }
        SyntaxKind::EQUALS_VALUE_CLAUSE => parent
            .parent()
            .is_some_and(|declarator| declarator.kind() == SyntaxKind::VARIABLE_DECLARATOR),
        _ => false,
    }
}

fn enclosing_statement(node: NodeRef<'_>) -> NodeRef<'_> {
    node.ancestors()
        .skip(1)
        .find(|a| a.kind().is_statement() || a.kind() == SyntaxKind::EQUALS_VALUE_CLAUSE)
        .unwrap_or(node)
}

/// Report state machine changes of a member whose body was matched
pub(crate) fn report_changes<'t>(
    ctx: &BodyContext<'_, 't>,
    points: &SuspensionPointMatch<'t>,
    has_active_statements: bool,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    let old_kind = state_machine_kind(ctx.old_member);
    let new_kind = state_machine_kind(ctx.new_member);
    let member_span = diagnostic_span(ctx.new_member, EditKind::Update);

    if old_kind != StateMachineKind::None && new_kind != StateMachineKind::None && old_kind != new_kind {
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::ChangingStateMachineShape, member_span)
                .with_node(ctx.new_member.kind())
                .with_argument(old_kind.display_name())
                .with_argument(new_kind.display_name()),
        );
    } else if old_kind == StateMachineKind::Async && new_kind == StateMachineKind::None {
        report_async_to_sync(ctx.new_member, diagnostics);
    } else if has_active_statements && old_kind == StateMachineKind::None && new_kind != StateMachineKind::None {
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::UpdatingStateMachineMethodAroundActiveStatement, member_span)
                .with_node(ctx.new_member.kind()),
        );
    }

    for deleted in &points.deleted {
        let span = deleted_node_span(*deleted, |n| ctx.partner_in_new(n));
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::Delete, span)
                .with_node(deleted.kind())
                .with_argument(display_name(*deleted, EditKind::Delete)),
        );
    }

    for inserted in &points.inserted {
        let kind = if points.creating {
            RudeEditKind::InsertAroundActiveStatement
        } else {
            RudeEditKind::Insert
        };
        diagnostics.push(
            RudeEditDiagnostic::new(kind, diagnostic_span(*inserted, EditKind::Insert))
                .with_node(inserted.kind())
                .with_argument(display_name(*inserted, EditKind::Insert)),
        );
    }

    for (old, new) in &points.known {
        if old.kind() != SyntaxKind::AWAIT_EXPRESSION {
            continue;
        }
        let spilled = !is_simple_await(*old) || !is_simple_await(*new);
        if spilled && !are_equivalent_ignoring_lambda_bodies(enclosing_statement(*old), enclosing_statement(*new)) {
            diagnostics.push(
                RudeEditDiagnostic::new(RudeEditKind::AwaitStatementUpdate, enclosing_statement(*new).range())
                    .with_node(new.kind()),
            );
        }
    }
}

/// `function` lost its `async` modifier
pub(crate) fn report_async_to_sync(new_function: NodeRef<'_>, diagnostics: &mut Vec<RudeEditDiagnostic>) {
    diagnostics.push(
        RudeEditDiagnostic::new(
            RudeEditKind::ChangingFromAsynchronousToSynchronous,
            nested_or_member_span(new_function),
        )
        .with_node(new_function.kind())
        .with_argument(function_display_name(new_function)),
    );
}

fn nested_or_member_span(function: NodeRef<'_>) -> TextRange {
    diagnostic_span(function, EditKind::Update)
}

fn function_display_name(function: NodeRef<'_>) -> &'static str {
    super::display::try_display_name(function, EditKind::Update).unwrap_or("method")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;
    use rstest::rstest;

    fn method(tree: &SyntaxTree) -> NodeRef<'_> {
        tree.root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::METHOD_DECLARATION)
            .unwrap()
    }

    #[rstest]
    #[case("class C { async Task M() { await F(); } }", StateMachineKind::Async)]
    #[case("class C { IEnumerable<int> M() { yield return 1; } }", StateMachineKind::Iterator)]
    #[case("class C { void M() { F(() => { }); } }", StateMachineKind::None)]
    #[case("class C { void M() { int G() { yield break; } } }", StateMachineKind::None)]
    fn test_state_machine_kind(#[case] source: &str, #[case] expected: StateMachineKind) {
        let tree = SyntaxTree::parse(source);
        assert_eq!(state_machine_kind(method(&tree)), expected);
    }

    #[test]
    fn test_suspension_points_skip_lambdas() {
        let tree = SyntaxTree::parse("class C { async Task M() { await A(); F(async () => await B()); await C(); } }");
        let body = member_body(method(&tree)).unwrap();
        let points: Vec<_> = suspension_points(body).iter().map(|p| p.text()).collect();
        assert_eq!(points, vec!["await A()", "await C()"]);
    }

    #[test]
    fn test_equal_counts_match_pairwise() {
        let old = SyntaxTree::parse("class C { async Task M() { await A(); await B(); } }");
        let new = SyntaxTree::parse("class C { async Task M() { await X(); await Y(); } }");
        let m = match_suspension_points(member_body(method(&old)).unwrap(), member_body(method(&new)).unwrap(), false);
        assert_eq!(m.known.len(), 2);
        assert_eq!(m.known[0].1.text(), "await X()");
        assert!(m.deleted.is_empty() && m.inserted.is_empty());
    }

    #[test]
    fn test_creating_requires_active_statements() {
        let old = SyntaxTree::parse("class C { async Task M() { F(); } }");
        let new = SyntaxTree::parse("class C { async Task M() { await F(); } }");
        let old_body = member_body(method(&old)).unwrap();
        let new_body = member_body(method(&new)).unwrap();
        assert!(!match_suspension_points(old_body, new_body, false).creating);
        let m = match_suspension_points(old_body, new_body, true);
        assert!(m.creating);
        assert_eq!(m.inserted.len(), 1);
    }

    #[rstest]
    #[case("await F();", true)]
    #[case("x = await F();", true)]
    #[case("var x = await F();", true)]
    #[case("return await F();", true)]
    #[case("G(await F());", false)]
    #[case("x = 1 + await F();", false)]
    fn test_simple_await(#[case] statement: &str, #[case] expected: bool) {
        let tree = SyntaxTree::parse(&format!("class C {{ async Task M() {{ {statement} }} }}"));
        let await_expr = tree
            .root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::AWAIT_EXPRESSION)
            .unwrap();
        assert_eq!(is_simple_await(await_expr), expected);
    }
}
