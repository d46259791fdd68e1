//! Breakpoint spans.
//!
//! Walks from the token at a position up through its ancestors and asks
//! each ancestor for the span a sequence point would occupy there. The
//! walk is independent of any diffing and only looks at one tree.

use crate::base::{TextRange, TextSize};
use crate::parser::SyntaxKind;
use crate::syntax::ast::{ForEachStatement, ForStatement, VariableDeclarator};
use crate::syntax::{AstNode, NodeRef, SyntaxTree};

use super::active_statement::StatementPart;

/// Outcome of asking one ancestor for a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Span(TextRange),
    /// The position is somewhere no breakpoint can be set
    NoSpan,
    /// Ask the parent
    Continue,
}

/// The innermost breakpoint span at `position`
pub fn try_get_breakpoint_span(tree: &SyntaxTree, position: TextSize) -> Option<TextRange> {
    try_get_closest_breakpoint_span(tree, position, 0)
}

/// The innermost breakpoint span at `position` that is at least
/// `min_length` long. When no candidate is long enough the outermost one
/// found is returned.
pub fn try_get_closest_breakpoint_span(
    tree: &SyntaxTree,
    position: TextSize,
    min_length: u32,
) -> Option<TextRange> {
    try_get_closest_breakpoint_span_in(tree.root(), position, min_length)
}

/// Like [`try_get_closest_breakpoint_span`], but the walk stops at `root`
pub(crate) fn try_get_closest_breakpoint_span_in(
    root: NodeRef<'_>,
    position: TextSize,
    min_length: u32,
) -> Option<TextRange> {
    let token = root.tree().token_at_offset(position)?;
    let min_length = TextSize::new(min_length);
    let mut candidate = None;
    for node in token.parent().ancestors() {
        match breakpoint_span(node, position) {
            Candidate::Span(span) => {
                candidate = Some(span);
                if span.len() >= min_length {
                    break;
                }
            }
            Candidate::NoSpan => break,
            Candidate::Continue => {}
        }
        if node == root {
            break;
        }
    }
    candidate
}

fn breakpoint_span(node: NodeRef<'_>, position: TextSize) -> Candidate {
    use Candidate::*;

    let range = node.range();
    match node.kind() {
        SyntaxKind::COMPILATION_UNIT
        | SyntaxKind::USING_DIRECTIVE
        | SyntaxKind::NAMESPACE_DECLARATION
        | SyntaxKind::CLASS_DECLARATION
        | SyntaxKind::STRUCT_DECLARATION
        | SyntaxKind::INTERFACE_DECLARATION
        | SyntaxKind::ENUM_DECLARATION
        | SyntaxKind::DELEGATE_DECLARATION
        | SyntaxKind::ATTRIBUTE_LIST => NoSpan,

        SyntaxKind::BLOCK => {
            let open = node.child_token(SyntaxKind::L_BRACE);
            let close = node.child_token(SyntaxKind::R_BRACE);
            match (open, close) {
                (Some(open), _) if position < open.range().end() => Span(open.range()),
                (_, Some(close)) if position >= close.range().start() => Span(close.range()),
                _ => Continue,
            }
        }

        SyntaxKind::LOCAL_DECLARATION_STATEMENT => {
            if node.has_token(SyntaxKind::CONST_KW) {
                return NoSpan;
            }
            match node.child_node(SyntaxKind::VARIABLE_DECLARATION) {
                Some(declaration) => declaration_span(node, declaration, position),
                None => Continue,
            }
        }

        SyntaxKind::FIELD_DECLARATION => {
            if node.has_token(SyntaxKind::CONST_KW) {
                return NoSpan;
            }
            match node.child_node(SyntaxKind::VARIABLE_DECLARATION) {
                Some(declaration) => declaration_span(node, declaration, position),
                None => NoSpan,
            }
        }

        SyntaxKind::IF_STATEMENT
        | SyntaxKind::WHILE_STATEMENT
        | SyntaxKind::LOCK_STATEMENT
        | SyntaxKind::SWITCH_STATEMENT
        | SyntaxKind::USING_STATEMENT => match node.child_token(SyntaxKind::R_PAREN) {
            Some(close) => Span(TextRange::new(range.start(), close.range().end())),
            None => Span(range),
        },

        SyntaxKind::ELSE_CLAUSE => match node.children().find(|c| c.kind().is_statement()) {
            Some(statement) => breakpoint_span(statement, statement.range().start()),
            None => Continue,
        },

        SyntaxKind::DO_STATEMENT => {
            let Some(while_kw) = node.child_token(SyntaxKind::WHILE_KW) else {
                return Span(range);
            };
            if position < while_kw.range().start() {
                if let Some(statement) = node.children().find(|c| c.kind().is_statement()) {
                    return breakpoint_span(statement, statement.range().start());
                }
            }
            Span(TextRange::new(while_kw.range().start(), range.end()))
        }

        SyntaxKind::FOR_STATEMENT => for_span(node, position),

        SyntaxKind::FOREACH_STATEMENT => match foreach_part_span(node, foreach_part_at(node, position)) {
            Some(span) => Span(span),
            None => Continue,
        },

        SyntaxKind::TRY_STATEMENT
        | SyntaxKind::FINALLY_CLAUSE
        | SyntaxKind::CHECKED_STATEMENT
        | SyntaxKind::UNCHECKED_STATEMENT => match node.child_node(SyntaxKind::BLOCK) {
            Some(block) => breakpoint_span(block, block.range().start()),
            None => Continue,
        },

        SyntaxKind::CATCH_CLAUSE => {
            let end = node
                .child_node(SyntaxKind::CATCH_DECLARATION)
                .map(|d| d.range().end())
                .or_else(|| node.first_token().map(|t| t.range().end()))
                .unwrap_or(range.end());
            Span(TextRange::new(range.start(), end))
        }

        SyntaxKind::CATCH_FILTER_CLAUSE | SyntaxKind::WHEN_CLAUSE => Span(range),

        SyntaxKind::SWITCH_SECTION => match node.children().find(|c| c.kind().is_statement()) {
            Some(statement) => breakpoint_span(statement, statement.range().start()),
            None => NoSpan,
        },

        SyntaxKind::SIMPLE_LAMBDA_EXPRESSION | SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION => {
            match node.nested_function_body() {
                Some(body) if body.kind() == SyntaxKind::BLOCK => {
                    breakpoint_span(body, body.range().start())
                }
                Some(body) => Span(body.range()),
                None => Continue,
            }
        }

        SyntaxKind::METHOD_DECLARATION
        | SyntaxKind::OPERATOR_DECLARATION
        | SyntaxKind::CONSTRUCTOR_DECLARATION
        | SyntaxKind::DESTRUCTOR_DECLARATION
        | SyntaxKind::GET_ACCESSOR_DECLARATION
        | SyntaxKind::SET_ACCESSOR_DECLARATION
        | SyntaxKind::LOCAL_FUNCTION_STATEMENT => member_span(node, position),

        SyntaxKind::CONSTRUCTOR_INITIALIZER => Span(range),

        SyntaxKind::PROPERTY_DECLARATION => {
            if let Some(arrow) = node.child_node(SyntaxKind::ARROW_EXPRESSION_CLAUSE) {
                return expression_of(arrow).map_or(NoSpan, Span);
            }
            let in_accessors = node
                .child_node(SyntaxKind::ACCESSOR_LIST)
                .is_some_and(|list| list.range().contains(position));
            match node.child_node(SyntaxKind::EQUALS_VALUE_CLAUSE) {
                Some(initializer) if !in_accessors => expression_of(initializer).map_or(NoSpan, Span),
                _ => NoSpan,
            }
        }

        SyntaxKind::ACCESSOR_LIST | SyntaxKind::ENUM_MEMBER_DECLARATION => NoSpan,

        kind if kind.is_statement() => Span(range),

        _ => Continue,
    }
}

/// Span of a local or field declaration. A lone declarator covers the whole
/// statement; the first of several includes the type; otherwise the
/// declarator at the position, or the closest one with an initializer.
fn declaration_span(owner: NodeRef<'_>, declaration: NodeRef<'_>, position: TextSize) -> Candidate {
    let declarators: Vec<_> = declaration
        .children()
        .filter_map(VariableDeclarator::cast)
        .collect();
    let has_initializer = |d: &VariableDeclarator<'_>| d.initializer().is_some();

    if let [single] = declarators.as_slice() {
        if !has_initializer(single) {
            return Candidate::NoSpan;
        }
        let start = owner
            .children_with_tokens()
            .find(|c| c.kind() != SyntaxKind::ATTRIBUTE_LIST)
            .map(|c| c.range().start())
            .unwrap_or(owner.range().start());
        return Candidate::Span(TextRange::new(start, owner.range().end()));
    }

    let at = declarators
        .iter()
        .position(|d| position < d.syntax().range().end())
        .unwrap_or(declarators.len().saturating_sub(1));

    let chosen = if declarators.get(at).is_some_and(has_initializer) {
        Some(at)
    } else {
        // Closest declarator with an initializer, preferring later ones on ties
        declarators
            .iter()
            .enumerate()
            .filter(|(_, d)| has_initializer(d))
            .min_by_key(|(i, _)| (i.abs_diff(at), usize::MAX - i))
            .map(|(i, _)| i)
    };

    match chosen {
        Some(0) => {
            let end = declarators[0].syntax().range().end();
            Candidate::Span(TextRange::new(declaration.range().start(), end))
        }
        Some(i) => Candidate::Span(declarators[i].syntax().range()),
        None => Candidate::Continue,
    }
}

fn for_span(node: NodeRef<'_>, position: TextSize) -> Candidate {
    let stmt = ForStatement(node);
    let semicolons: Vec<_> = node
        .tokens()
        .filter(|t| t.kind() == SyntaxKind::SEMICOLON)
        .map(|t| t.range().end())
        .collect();
    let close = node
        .child_token(SyntaxKind::R_PAREN)
        .map(|t| t.range().end())
        .unwrap_or(node.range().end());

    let containing_or_first = |nodes: Vec<NodeRef<'_>>| {
        nodes
            .iter()
            .find(|n| n.range().contains_inclusive(position))
            .or(nodes.first())
            .map(|n| n.range())
    };

    let initializer = stmt
        .declaration()
        .map(|d| d.range())
        .or_else(|| containing_or_first(stmt.initializers()));
    let condition = stmt.condition().map(|c| c.range());
    let incrementor = containing_or_first(stmt.incrementors());

    let span = match semicolons.as_slice() {
        [first, ..] if position < *first => initializer.or(condition),
        [_, second, ..] if position < *second => condition.or(initializer),
        _ if position < close => incrementor.or(condition),
        _ => initializer.or(condition).or(incrementor),
    };
    span.map_or(Candidate::Continue, Candidate::Span)
}

fn member_span(node: NodeRef<'_>, position: TextSize) -> Candidate {
    if let Some(initializer) = node.child_node(SyntaxKind::CONSTRUCTOR_INITIALIZER) {
        if position >= initializer.range().start() && position < initializer.range().end() {
            return Candidate::Span(initializer.range());
        }
    }
    if let Some(arrow) = node.child_node(SyntaxKind::ARROW_EXPRESSION_CLAUSE) {
        return expression_of(arrow).map_or(Candidate::NoSpan, Candidate::Span);
    }
    match node.child_node(SyntaxKind::BLOCK) {
        Some(body) if position < body.range().start() => breakpoint_span(body, body.range().start()),
        Some(_) => Candidate::NoSpan,
        // Auto-implemented accessor
        None if matches!(
            node.kind(),
            SyntaxKind::GET_ACCESSOR_DECLARATION | SyntaxKind::SET_ACCESSOR_DECLARATION
        ) =>
        {
            Candidate::Span(node.range())
        }
        None => Candidate::NoSpan,
    }
}

fn expression_of(clause: NodeRef<'_>) -> Option<TextRange> {
    clause
        .children()
        .find(|c| c.kind().is_expression())
        .map(|e| e.range())
}

// ============================================================================
// foreach parts
// ============================================================================

/// The part of a `foreach` header `position` falls in
pub(crate) fn foreach_part_at(node: NodeRef<'_>, position: TextSize) -> StatementPart {
    let stmt = ForEachStatement(node);
    if let Some(expression) = stmt.expression() {
        if position >= expression.range().start() {
            return StatementPart::ForEachExpression;
        }
    }
    if let Some(in_kw) = node.child_token(SyntaxKind::IN_KW) {
        if position >= in_kw.range().start() {
            return StatementPart::ForEachIn;
        }
    }
    if let Some(ty) = stmt.ty() {
        if position >= ty.range().start() {
            return StatementPart::ForEachVariable;
        }
    }
    StatementPart::ForEach
}

/// Span of one part of a `foreach` header
pub(crate) fn foreach_part_span(node: NodeRef<'_>, part: StatementPart) -> Option<TextRange> {
    let stmt = ForEachStatement(node);
    match part {
        StatementPart::ForEachVariable => {
            let ty = stmt.ty()?;
            let end = stmt.identifier().map(|t| t.range().end()).unwrap_or(ty.range().end());
            Some(TextRange::new(ty.range().start(), end))
        }
        StatementPart::ForEachIn => node.child_token(SyntaxKind::IN_KW).map(|t| t.range()),
        StatementPart::ForEachExpression => stmt.expression().map(|e| e.range()),
        _ => node.child_token(SyntaxKind::FOREACH_KW).map(|t| t.range()),
    }
}
