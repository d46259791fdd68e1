//! Exception handling regions around active statements.
//!
//! A catch or finally clause containing an active statement, and a try
//! block containing a non-leaf one, pin the shape of the handler. Adding,
//! removing or changing such a handler cannot be applied.

use crate::base::TextRange;
use crate::compare::{EditKind, SequenceEdit, lcs};
use crate::parser::SyntaxKind;
use crate::syntax::ast::{CatchClause, TryStatement};
use crate::syntax::{NodeRef, are_equivalent_ignoring_lambda_bodies};

use super::body::{BodyContext, member_body};
use super::display::{diagnostic_span, display_name};
use super::rude_edit::{RudeEditDiagnostic, RudeEditKind};

/// Try statements, catch and finally clauses around `statement`,
/// innermost first. Try statements count only for non-leaf frames and
/// only when the statement is in the try block itself.
pub fn exception_region_ancestors(statement: NodeRef<'_>, is_non_leaf: bool) -> Vec<NodeRef<'_>> {
    let mut result = Vec::new();
    let mut child = statement;
    for ancestor in statement.ancestors().skip(1) {
        if ancestor.kind().is_nested_function() || member_body(ancestor).is_some() {
            break;
        }
        match ancestor.kind() {
            SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE => result.push(ancestor),
            SyntaxKind::TRY_STATEMENT if is_non_leaf && TryStatement(ancestor).block() == Some(child) => {
                result.push(ancestor)
            }
            _ => {}
        }
        child = ancestor;
    }
    result
}

/// Span of the handler a region node protects
pub fn region_span(node: NodeRef<'_>) -> TextRange {
    if node.kind() != SyntaxKind::TRY_STATEMENT {
        return node.range();
    }
    let stmt = TryStatement(node);
    let catches: Vec<_> = stmt.catches().collect();
    match (catches.first(), catches.last(), stmt.finally_clause()) {
        (Some(first), Some(last), _) => TextRange::new(first.range().start(), last.range().end()),
        (_, _, Some(finally)) => finally.range(),
        _ => node.range(),
    }
}

/// Region spans around a statement in the new document
pub fn region_spans(statement: NodeRef<'_>, is_non_leaf: bool) -> Vec<TextRange> {
    exception_region_ancestors(statement, is_non_leaf)
        .into_iter()
        .map(region_span)
        .collect()
}

fn optional_equivalent(old: Option<NodeRef<'_>>, new: Option<NodeRef<'_>>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => are_equivalent_ignoring_lambda_bodies(old, new),
        (None, None) => true,
        _ => false,
    }
}

fn are_equivalent_catches(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    let (old, new) = (CatchClause(old), CatchClause(new));
    optional_equivalent(old.declaration(), new.declaration()) && optional_equivalent(old.filter(), new.filter())
}

/// The handlers of two region nodes behave the same
pub fn are_equivalent_regions(old: NodeRef<'_>, new: NodeRef<'_>) -> bool {
    if old.kind() != new.kind() {
        return false;
    }
    match old.kind() {
        SyntaxKind::TRY_STATEMENT => {
            let old_catches: Vec<_> = TryStatement(old).catches().collect();
            let new_catches: Vec<_> = TryStatement(new).catches().collect();
            old_catches.len() == new_catches.len()
                && old_catches
                    .iter()
                    .zip(&new_catches)
                    .all(|(o, n)| are_equivalent_catches(*o, *n))
                && TryStatement(old).finally_clause().is_some() == TryStatement(new).finally_clause().is_some()
        }
        SyntaxKind::CATCH_CLAUSE => are_equivalent_catches(old, new),
        _ => true,
    }
}

/// Report handlers around an active statement that were added, removed
/// or changed
pub(crate) fn report_changes<'t>(
    ctx: &BodyContext<'_, 't>,
    old: NodeRef<'t>,
    new: NodeRef<'t>,
    is_non_leaf: bool,
    new_span: TextRange,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    let old_regions = exception_region_ancestors(old, is_non_leaf);
    let new_regions = exception_region_ancestors(new, is_non_leaf);
    if old_regions.is_empty() && new_regions.is_empty() {
        return;
    }

    let edits = lcs::edits(&old_regions, &new_regions, |o, n| ctx.body_match.partner_in_new(*o) == Some(*n));
    for edit in edits {
        let diagnostic = match edit {
            SequenceEdit::Match { old_index, new_index } => {
                let (o, n) = (old_regions[old_index], new_regions[new_index]);
                if are_equivalent_regions(o, n) {
                    continue;
                }
                RudeEditDiagnostic::new(RudeEditKind::UpdateAroundActiveStatement, diagnostic_span(n, EditKind::Update))
                    .with_node(n.kind())
                    .with_argument(display_name(n, EditKind::Update))
            }
            SequenceEdit::Insert { new_index } => {
                let n = new_regions[new_index];
                RudeEditDiagnostic::new(RudeEditKind::InsertAroundActiveStatement, diagnostic_span(n, EditKind::Insert))
                    .with_node(n.kind())
                    .with_argument(display_name(n, EditKind::Insert))
            }
            SequenceEdit::Delete { old_index } => {
                let o = old_regions[old_index];
                RudeEditDiagnostic::new(RudeEditKind::DeleteAroundActiveStatement, new_span)
                    .with_node(o.kind())
                    .with_argument(display_name(o, EditKind::Delete))
            }
        };
        diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;

    fn call<'t>(tree: &'t SyntaxTree, name: &str) -> NodeRef<'t> {
        tree.root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::EXPRESSION_STATEMENT && n.text().starts_with(name))
            .unwrap()
    }

    const SOURCE: &str = "class C { void M() { try { A(); } catch (E e) { B(); } catch { C(); } finally { D(); } } }";

    #[test]
    fn test_try_counts_only_for_non_leaf() {
        let tree = SyntaxTree::parse(SOURCE);
        assert!(exception_region_ancestors(call(&tree, "A"), false).is_empty());
        let regions = exception_region_ancestors(call(&tree, "A"), true);
        assert_eq!(regions.len(), 1);
        assert_eq!(tree.slice(region_span(regions[0])), "catch (E e) { B(); } catch { C(); }");
    }

    #[test]
    fn test_catch_does_not_include_its_try() {
        let tree = SyntaxTree::parse(SOURCE);
        let regions = exception_region_ancestors(call(&tree, "B"), true);
        assert_eq!(regions.iter().map(|r| r.kind()).collect::<Vec<_>>(), vec![SyntaxKind::CATCH_CLAUSE]);
        assert_eq!(region_spans(call(&tree, "D"), true), vec![tree
            .root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::FINALLY_CLAUSE)
            .unwrap()
            .range()]);
    }

    #[test]
    fn test_regions_stop_at_lambda() {
        let tree = SyntaxTree::parse("class C { void M() { try { F(() => { G(); }); } finally { } } }");
        assert!(exception_region_ancestors(call(&tree, "G"), true).is_empty());
    }

    #[test]
    fn test_catch_equivalence_ignores_block() {
        let old = SyntaxTree::parse("class C { void M() { try { } catch (E e) { A(); } } }");
        let new = SyntaxTree::parse("class C { void M() { try { } catch (E e) { B(); } } }");
        let changed = SyntaxTree::parse("class C { void M() { try { } catch (F e) { A(); } } }");
        fn catch(tree: &SyntaxTree) -> NodeRef<'_> {
            tree.root().descendants().find(|n| n.kind() == SyntaxKind::CATCH_CLAUSE).unwrap()
        }
        assert!(are_equivalent_regions(catch(&old), catch(&new)));
        assert!(!are_equivalent_regions(catch(&old), catch(&changed)));
    }
}
