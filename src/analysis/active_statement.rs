//! Active statements and their mapping into the new document.
//!
//! An active statement is found in the old tree from its span, mapped to
//! its partner through the body match and given a new span. Statements
//! without a partner map to the closest surviving statement.

use crate::base::{TextRange, TextSize};
use crate::compare::{EditKind, Label, StatementLabel};
use crate::parser::SyntaxKind;
use crate::syntax::ast::{CatchClause, EmbeddedStatementOwner, ForEachStatement, IfStatement, UsingStatement};
use crate::syntax::{AstNode, NodeRef, SyntaxTree, are_equivalent_ignoring_lambda_bodies};

use super::body::{BodyContext, is_body_root};
use super::breakpoints::{foreach_part_at, foreach_part_span, try_get_closest_breakpoint_span_in};
use super::display::{deleted_node_span, diagnostic_span, display_name};
use super::exception_regions;
use super::rude_edit::{RudeEditDiagnostic, RudeEditKind};

/// Debugger frame state of an active statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActiveStatementFlags {
    /// The statement is the top of some thread's stack
    pub leaf_frame: bool,
    /// The statement is a call site waiting for a callee to return
    pub non_leaf_frame: bool,
    /// Execution stopped in the middle of the statement
    pub partially_executed: bool,
}

impl ActiveStatementFlags {
    pub const LEAF: Self = Self {
        leaf_frame: true,
        non_leaf_frame: false,
        partially_executed: false,
    };

    pub const NON_LEAF: Self = Self {
        leaf_frame: false,
        non_leaf_frame: true,
        partially_executed: false,
    };

    pub fn is_leaf(&self) -> bool {
        self.leaf_frame
    }

    pub fn is_non_leaf(&self) -> bool {
        self.non_leaf_frame
    }

    pub fn partially_executed(mut self) -> Self {
        self.partially_executed = true;
        self
    }
}

/// Part of a statement an active span may cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatementPart {
    #[default]
    Default,
    OpenBrace,
    CloseBrace,
    ForEach,
    ForEachVariable,
    ForEachIn,
    ForEachExpression,
}

/// An active statement as reported by the debugger for the old document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStatement {
    pub ordinal: usize,
    pub old_span: TextRange,
    pub flags: ActiveStatementFlags,
    /// Derived from the span when absent
    pub statement_part: Option<StatementPart>,
}

impl ActiveStatement {
    pub fn new(ordinal: usize, old_span: TextRange, flags: ActiveStatementFlags) -> Self {
        Self {
            ordinal,
            old_span,
            flags,
            statement_part: None,
        }
    }
}

/// Where an active statement ended up in the new document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStatementRemap {
    pub ordinal: usize,
    /// `None` when the statement's member was deleted
    pub new_span: Option<TextRange>,
    pub statement_part: StatementPart,
    /// Spans of the exception handling regions around the new statement
    pub exception_regions: Vec<TextRange>,
}

/// An active statement resolved to its node in the old tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocatedStatement<'t> {
    pub ordinal: usize,
    pub flags: ActiveStatementFlags,
    pub node: NodeRef<'t>,
    pub part: StatementPart,
}

// ============================================================================
// Locating statements
// ============================================================================

/// Nodes an active span can resolve to
fn is_statement_node(node: NodeRef<'_>) -> bool {
    let kind = node.kind();
    kind.is_statement()
        || matches!(
            kind,
            SyntaxKind::VARIABLE_DECLARATOR
                | SyntaxKind::CATCH_CLAUSE
                | SyntaxKind::CATCH_FILTER_CLAUSE
                | SyntaxKind::WHEN_CLAUSE
        )
        || (kind.is_expression() && node.parent().is_some_and(|p| p.kind() == SyntaxKind::FOR_STATEMENT))
        || is_body_root(node)
}

/// The statement covering `span` and the part of it the span denotes
pub fn find_statement_and_part(tree: &SyntaxTree, span: TextRange) -> Option<(NodeRef<'_>, StatementPart)> {
    let token = tree.token_at_offset(span.start())?;
    let mut node = token.parent();
    while !node.range().contains_range(span) {
        node = node.parent()?;
    }
    let statement = loop {
        // A span covering the type and the first declarator
        if node.kind() == SyntaxKind::VARIABLE_DECLARATION && span.start() == node.range().start() {
            let partial = span.end() < node.range().end();
            let in_header = node
                .parent()
                .is_some_and(|p| matches!(p.kind(), SyntaxKind::FOR_STATEMENT | SyntaxKind::USING_STATEMENT));
            if partial || in_header {
                if let Some(first) = node.child_node(SyntaxKind::VARIABLE_DECLARATOR) {
                    break first;
                }
            }
        }
        if is_statement_node(node) {
            break node;
        }
        node = node.parent()?;
    };
    Some((statement, statement_part(statement, span.start())))
}

fn statement_part(statement: NodeRef<'_>, position: TextSize) -> StatementPart {
    match statement.kind() {
        SyntaxKind::BLOCK => {
            if statement
                .child_token(SyntaxKind::R_BRACE)
                .is_some_and(|t| t.range().start() == position)
            {
                StatementPart::CloseBrace
            } else if statement
                .child_token(SyntaxKind::L_BRACE)
                .is_some_and(|t| t.range().start() == position)
            {
                StatementPart::OpenBrace
            } else {
                StatementPart::Default
            }
        }
        SyntaxKind::FOREACH_STATEMENT => foreach_part_at(statement, position),
        _ => StatementPart::Default,
    }
}

// ============================================================================
// Equivalence
// ============================================================================

fn optional_equivalent(old: Option<NodeRef<'_>>, new: Option<NodeRef<'_>>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => are_equivalent_ignoring_lambda_bodies(old, new),
        (None, None) => true,
        _ => false,
    }
}

/// Condition of a loop or the expression of a `lock` or `switch`
pub(crate) fn governing_expression(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    match node.kind() {
        SyntaxKind::SWITCH_STATEMENT => node.children().find(|c| c.kind().is_expression()),
        _ => EmbeddedStatementOwner::cast(node).and_then(|owner| owner.expression()),
    }
}

/// The parts of two statements that execute as part of the active
/// statement are equivalent. Embedded statements are not compared.
pub fn are_equivalent_active_statements(old: NodeRef<'_>, new: NodeRef<'_>, part: StatementPart) -> bool {
    if old.kind() != new.kind() {
        return false;
    }
    match old.kind() {
        SyntaxKind::IF_STATEMENT => optional_equivalent(IfStatement(old).condition(), IfStatement(new).condition()),
        SyntaxKind::WHILE_STATEMENT
        | SyntaxKind::DO_STATEMENT
        | SyntaxKind::LOCK_STATEMENT
        | SyntaxKind::SWITCH_STATEMENT => {
            optional_equivalent(governing_expression(old), governing_expression(new))
        }
        SyntaxKind::USING_STATEMENT => {
            let (old_using, new_using) = (UsingStatement(old), UsingStatement(new));
            optional_equivalent(old_using.declaration(), new_using.declaration())
                && optional_equivalent(old_using.expression(), new_using.expression())
        }
        SyntaxKind::FOREACH_STATEMENT => {
            let (old_each, new_each) = (ForEachStatement(old), ForEachStatement(new));
            let variable = || {
                optional_equivalent(old_each.ty(), new_each.ty())
                    && old_each.identifier().map(|t| t.text()) == new_each.identifier().map(|t| t.text())
            };
            let expression = || optional_equivalent(old_each.expression(), new_each.expression());
            match part {
                StatementPart::ForEachVariable => variable(),
                StatementPart::ForEachIn => true,
                StatementPart::ForEachExpression => expression(),
                _ => variable() && expression(),
            }
        }
        SyntaxKind::CATCH_CLAUSE => {
            let (old_catch, new_catch) = (CatchClause(old), CatchClause(new));
            optional_equivalent(old_catch.declaration(), new_catch.declaration())
                && optional_equivalent(old_catch.filter(), new_catch.filter())
        }
        SyntaxKind::BLOCK
        | SyntaxKind::TRY_STATEMENT
        | SyntaxKind::CHECKED_STATEMENT
        | SyntaxKind::UNCHECKED_STATEMENT
        | SyntaxKind::FINALLY_CLAUSE => true,
        _ => are_equivalent_ignoring_lambda_bodies(old, new),
    }
}

// ============================================================================
// Spans
// ============================================================================

/// Statements near `statement` in the order they are tried when the
/// statement itself was deleted: following siblings, the closing brace of
/// the enclosing block, preceding siblings, then the same for the parent
pub fn near_statements(statement: NodeRef<'_>) -> Vec<(NodeRef<'_>, StatementPart)> {
    let mut result = Vec::new();
    let mut current = statement;
    while !is_body_root(current) {
        let Some(parent) = current.parent() else {
            break;
        };
        let siblings: Vec<_> = parent.children().filter(|c| c.kind().is_statement()).collect();
        let index = siblings.iter().position(|s| *s == current);
        if let Some(index) = index {
            result.extend(siblings[index + 1..].iter().map(|s| (*s, StatementPart::Default)));
        }
        if parent.kind() == SyntaxKind::BLOCK {
            result.push((parent, StatementPart::CloseBrace));
        }
        if let Some(index) = index {
            result.extend(siblings[..index].iter().rev().map(|s| (*s, StatementPart::Default)));
        }
        if !is_body_root(parent) && parent.kind().is_statement() && parent.kind() != SyntaxKind::BLOCK {
            result.push((parent, StatementPart::Default));
        }
        if parent.kind().is_nested_function() {
            break;
        }
        current = parent;
    }
    if is_body_root(current) && current.kind() != SyntaxKind::BLOCK {
        result.push((current, StatementPart::Default));
    }
    result
}

/// Span an active statement occupies in `statement` for `part`
pub fn find_closest_active_span(statement: NodeRef<'_>, part: StatementPart) -> TextRange {
    match (statement.kind(), part) {
        (SyntaxKind::BLOCK, StatementPart::OpenBrace) => {
            if let Some(brace) = statement.child_token(SyntaxKind::L_BRACE) {
                return brace.range();
            }
        }
        (SyntaxKind::BLOCK, StatementPart::CloseBrace) => {
            if let Some(brace) = statement.child_token(SyntaxKind::R_BRACE) {
                return brace.range();
            }
        }
        (
            SyntaxKind::FOREACH_STATEMENT,
            StatementPart::ForEach
            | StatementPart::ForEachVariable
            | StatementPart::ForEachIn
            | StatementPart::ForEachExpression,
        ) => {
            if let Some(span) = foreach_part_span(statement, part) {
                return span;
            }
        }
        _ => {}
    }

    if matches!(
        statement.kind(),
        SyntaxKind::ARROW_EXPRESSION_CLAUSE | SyntaxKind::EQUALS_VALUE_CLAUSE
    ) {
        if let Some(expression) = statement.children().find(|c| c.kind().is_expression()) {
            return expression.range();
        }
    }

    let range = statement.range();
    if let Some(span) = try_get_closest_breakpoint_span_in(statement, range.start(), u32::from(range.len())) {
        return span;
    }
    near_statements(statement)
        .into_iter()
        .find_map(|(near, _)| {
            let near_range = near.range();
            try_get_closest_breakpoint_span_in(near, near_range.start(), u32::from(near_range.len()))
        })
        .unwrap_or(range)
}

/// Span in the new document for a statement that has no partner
pub(crate) fn deleted_active_span(ctx: &BodyContext<'_, '_>, statement: NodeRef<'_>) -> (TextRange, StatementPart) {
    for (near, part) in near_statements(statement) {
        if let Some(partner) = ctx.body_match.partner_in_new(near) {
            return (find_closest_active_span(partner, part), part);
        }
    }
    let body = ctx.new_body();
    let part = if body.kind() == SyntaxKind::BLOCK {
        StatementPart::CloseBrace
    } else {
        StatementPart::Default
    };
    (find_closest_active_span(body, part), part)
}

// ============================================================================
// Remapping
// ============================================================================

/// Map the active statements of one member body into the new document,
/// reporting edits that cannot be applied while they are executing
pub(crate) fn remap_body_statements<'t>(
    ctx: &BodyContext<'_, 't>,
    statements: &[LocatedStatement<'t>],
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) -> Vec<ActiveStatementRemap> {
    statements
        .iter()
        .map(|statement| remap_statement(ctx, statement, diagnostics))
        .collect()
}

fn remap_statement<'t>(
    ctx: &BodyContext<'_, 't>,
    statement: &LocatedStatement<'t>,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) -> ActiveStatementRemap {
    let flags = statement.flags;
    let old = statement.node;

    let partner = ctx
        .body_match
        .partner_in_new(old)
        .or_else(|| tied_partner_in_new(ctx, old));
    let Some(new) = partner else {
        let (new_span, part) = deleted_active_span(ctx, old);
        if let Some(function) = removed_nested_function(ctx, old) {
            let span = deleted_node_span(function, |n| ctx.partner_in_new(n));
            diagnostics.push(
                RudeEditDiagnostic::new(RudeEditKind::ActiveStatementLambdaRemoved, span)
                    .with_node(function.kind())
                    .with_argument(display_name(function, EditKind::Delete)),
            );
        } else if flags.is_non_leaf() || flags.partially_executed {
            let kind = if flags.is_leaf() && flags.partially_executed {
                RudeEditKind::PartiallyExecutedActiveStatementDelete
            } else {
                RudeEditKind::DeleteActiveStatement
            };
            diagnostics.push(RudeEditDiagnostic::new(kind, new_span).with_node(old.kind()));
        }
        return ActiveStatementRemap {
            ordinal: statement.ordinal,
            new_span: Some(new_span),
            statement_part: part,
            exception_regions: Vec::new(),
        };
    };

    let new_span = find_closest_active_span(new, statement.part);

    if (flags.is_non_leaf() || flags.partially_executed)
        && !are_equivalent_active_statements(old, new, statement.part)
    {
        let kind = if flags.is_leaf() && flags.partially_executed {
            RudeEditKind::PartiallyExecutedActiveStatementUpdate
        } else {
            RudeEditKind::ActiveStatementUpdate
        };
        diagnostics.push(RudeEditDiagnostic::new(kind, new_span).with_node(new.kind()));
    }

    report_enclosing_statement_changes(ctx, old, new, new_span, diagnostics);
    if flags.is_non_leaf() {
        report_checked_context_change(old, new, new_span, diagnostics);
    }
    exception_regions::report_changes(ctx, old, new, flags.is_non_leaf(), new_span, diagnostics);

    ActiveStatementRemap {
        ordinal: statement.ordinal,
        new_span: Some(new_span),
        statement_part: statement.part,
        exception_regions: exception_regions::region_spans(new, flags.is_non_leaf()),
    }
}

/// Partner of a node whose identity is tied to its parent, found through
/// the nearest matched ancestor: the node in the ancestor's partner with the
/// same kind and identifier
fn tied_partner_in_new<'t>(ctx: &BodyContext<'_, 't>, old: NodeRef<'t>) -> Option<NodeRef<'t>> {
    let parent_kind = old.parent().map(|p| p.kind());
    if StatementLabel::classify(old.kind(), parent_kind).label.tied_to_ancestor() == 0 {
        return None;
    }
    let body = ctx.old_body();
    let ancestor_partner = old
        .ancestors()
        .skip(1)
        .take_while(|a| *a != body)
        .find_map(|a| ctx.body_match.partner_in_new(a))?;
    let name = old.identifier().map(|t| t.text());
    ancestor_partner
        .descendants_with(|n| !n.kind().is_nested_function())
        .find(|n| n.kind() == old.kind() && n.identifier().map(|t| t.text()) == name)
}

/// Outermost lambda or local function around `old` that has no partner
fn removed_nested_function<'t>(ctx: &BodyContext<'_, 't>, old: NodeRef<'t>) -> Option<NodeRef<'t>> {
    let body = ctx.old_body();
    old.ancestors()
        .skip(1)
        .take_while(|a| *a != body)
        .filter(|a| a.kind().is_nested_function() && ctx.body_match.partner_in_new(*a).is_none())
        .last()
}

/// Ancestors of a statement inside the innermost body, innermost first,
/// that keep state while the statement executes
fn enclosing_stateful_statements(statement: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    statement
        .ancestors()
        .skip(1)
        .take_while(|a| !a.kind().is_nested_function() && !is_member(*a))
        .filter(|a| {
            matches!(
                a.kind(),
                SyntaxKind::LOCK_STATEMENT | SyntaxKind::USING_STATEMENT | SyntaxKind::FOREACH_STATEMENT
            )
        })
        .collect()
}

fn is_member(node: NodeRef<'_>) -> bool {
    super::body::member_body(node).is_some()
}

/// `lock`, `using` and `foreach` statements around an active statement must
/// survive unchanged
fn report_enclosing_statement_changes<'t>(
    ctx: &BodyContext<'_, 't>,
    old: NodeRef<'t>,
    new: NodeRef<'t>,
    new_span: TextRange,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    let mut old_ancestors = enclosing_stateful_statements(old);
    let mut new_ancestors = enclosing_stateful_statements(new);

    // Equivalent pairs
    old_ancestors.retain(|o| {
        match new_ancestors
            .iter()
            .position(|n| are_equivalent_active_statements(*o, *n, StatementPart::Default))
        {
            Some(index) => {
                new_ancestors.remove(index);
                false
            }
            None => true,
        }
    });

    // Pairs that are the same statement with a different header
    old_ancestors.retain(|o| {
        let similar = new_ancestors.iter().position(|n| {
            ctx.body_match.partner_in_new(*o) == Some(*n)
                || (o.kind() == SyntaxKind::FOREACH_STATEMENT
                    && n.kind() == SyntaxKind::FOREACH_STATEMENT
                    && o.identifier().map(|t| t.text()) == n.identifier().map(|t| t.text()))
        });
        match similar {
            Some(index) => {
                let n = new_ancestors.remove(index);
                diagnostics.push(
                    RudeEditDiagnostic::new(
                        RudeEditKind::UpdateAroundActiveStatement,
                        diagnostic_span(n, EditKind::Update),
                    )
                    .with_node(n.kind())
                    .with_argument(display_name(n, EditKind::Update)),
                );
                false
            }
            None => true,
        }
    });

    for n in new_ancestors {
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::InsertAroundActiveStatement, diagnostic_span(n, EditKind::Insert))
                .with_node(n.kind())
                .with_argument(display_name(n, EditKind::Insert)),
        );
    }
    for o in old_ancestors {
        diagnostics.push(
            RudeEditDiagnostic::new(RudeEditKind::DeleteAroundActiveStatement, new_span)
                .with_node(o.kind())
                .with_argument(display_name(o, EditKind::Delete)),
        );
    }
}

fn checked_context(statement: NodeRef<'_>) -> Option<NodeRef<'_>> {
    statement
        .ancestors()
        .skip(1)
        .take_while(|a| !a.kind().is_nested_function() && !is_member(*a))
        .find(|a| matches!(a.kind(), SyntaxKind::CHECKED_STATEMENT | SyntaxKind::UNCHECKED_STATEMENT))
}

fn report_checked_context_change(
    old: NodeRef<'_>,
    new: NodeRef<'_>,
    new_span: TextRange,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) {
    let old_context = checked_context(old);
    let new_context = checked_context(new);
    if old_context.map(|c| c.kind()) == new_context.map(|c| c.kind()) {
        return;
    }
    let (span, node) = match (new_context, old_context) {
        (Some(n), _) => (diagnostic_span(n, EditKind::Update), n),
        (None, Some(o)) => (new_span, o),
        (None, None) => return,
    };
    diagnostics.push(
        RudeEditDiagnostic::new(RudeEditKind::UpdateAroundActiveStatement, span)
            .with_node(node.kind())
            .with_argument(display_name(node, EditKind::Update)),
    );
}
