//! Display names and diagnostic spans keyed by syntax kind.
//!
//! Both tables are plain `match` expressions over [`SyntaxKind`]. A rude
//! edit on a kind missing from these tables is a bug in the classifier.

use crate::base::{TextRange, TextSize};
use crate::compare::EditKind;
use crate::parser::SyntaxKind;
use crate::syntax::ast::AccessorList;
use crate::syntax::{ElementRef, NodeRef};

// ============================================================================
// Display names
// ============================================================================

/// Name of the construct shown in rude edit messages
pub fn display_name(node: NodeRef<'_>, edit: EditKind) -> &'static str {
    match try_display_name(node, edit) {
        Some(name) => name,
        None => panic!("no display name for {:?}", node.kind()),
    }
}

pub fn try_display_name(node: NodeRef<'_>, edit: EditKind) -> Option<&'static str> {
    let name = match node.kind() {
        SyntaxKind::USING_DIRECTIVE => "using directive",
        SyntaxKind::NAMESPACE_DECLARATION => "namespace",
        SyntaxKind::CLASS_DECLARATION => "class",
        SyntaxKind::STRUCT_DECLARATION => "struct",
        SyntaxKind::INTERFACE_DECLARATION => "interface",
        SyntaxKind::ENUM_DECLARATION => "enum",
        SyntaxKind::DELEGATE_DECLARATION => "delegate",
        SyntaxKind::FIELD_DECLARATION => {
            if node.has_token(SyntaxKind::CONST_KW) {
                "const field"
            } else {
                "field"
            }
        }
        SyntaxKind::VARIABLE_DECLARATION | SyntaxKind::VARIABLE_DECLARATOR => {
            return node.parent().and_then(|p| try_display_name(p, edit));
        }
        SyntaxKind::METHOD_DECLARATION => "method",
        SyntaxKind::OPERATOR_DECLARATION => "operator",
        SyntaxKind::CONSTRUCTOR_DECLARATION => "constructor",
        SyntaxKind::DESTRUCTOR_DECLARATION => "destructor",
        SyntaxKind::PROPERTY_DECLARATION => {
            let is_auto = node
                .child_node(SyntaxKind::ACCESSOR_LIST)
                .is_some_and(|list| AccessorList(list).is_auto());
            if is_auto { "auto-property" } else { "property" }
        }
        SyntaxKind::ENUM_MEMBER_DECLARATION => "enum value",
        SyntaxKind::GET_ACCESSOR_DECLARATION => "property getter",
        SyntaxKind::SET_ACCESSOR_DECLARATION => "property setter",
        SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE => "type constraint",
        SyntaxKind::TYPE_PARAMETER_LIST | SyntaxKind::TYPE_PARAMETER => "type parameter",
        SyntaxKind::PARAMETER => "parameter",
        SyntaxKind::ATTRIBUTE_LIST => {
            if edit == EditKind::Update {
                "attribute target"
            } else {
                "attribute"
            }
        }
        SyntaxKind::ATTRIBUTE => "attribute",

        // Statements
        SyntaxKind::TRY_STATEMENT => "try block",
        SyntaxKind::CATCH_CLAUSE | SyntaxKind::CATCH_DECLARATION => "catch clause",
        SyntaxKind::CATCH_FILTER_CLAUSE => "filter clause",
        SyntaxKind::FINALLY_CLAUSE => "finally clause",
        SyntaxKind::USING_STATEMENT => "using statement",
        SyntaxKind::LOCK_STATEMENT => "lock statement",
        SyntaxKind::FOREACH_STATEMENT => "foreach statement",
        SyntaxKind::CHECKED_STATEMENT => "checked statement",
        SyntaxKind::UNCHECKED_STATEMENT => "unchecked statement",
        SyntaxKind::YIELD_BREAK_STATEMENT => "yield break statement",
        SyntaxKind::YIELD_RETURN_STATEMENT => "yield return statement",
        SyntaxKind::AWAIT_EXPRESSION => "await expression",
        SyntaxKind::SIMPLE_LAMBDA_EXPRESSION | SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION => "lambda",
        SyntaxKind::LOCAL_FUNCTION_STATEMENT => "local function",
        SyntaxKind::SWITCH_STATEMENT => "switch statement",
        SyntaxKind::LOCAL_DECLARATION_STATEMENT => "local variable declaration",
        _ => return None,
    };
    Some(name)
}

// ============================================================================
// Diagnostic spans
// ============================================================================

/// Span a rude edit on `node` is reported at
pub fn diagnostic_span(node: NodeRef<'_>, edit: EditKind) -> TextRange {
    let range = node.range();
    match node.kind() {
        SyntaxKind::COMPILATION_UNIT => TextRange::empty(TextSize::new(0)),

        SyntaxKind::NAMESPACE_DECLARATION => {
            let end = last_before(node, SyntaxKind::L_BRACE).unwrap_or(range.end());
            TextRange::new(range.start(), end)
        }

        SyntaxKind::CLASS_DECLARATION
        | SyntaxKind::STRUCT_DECLARATION
        | SyntaxKind::INTERFACE_DECLARATION => {
            let end = node
                .child_node(SyntaxKind::TYPE_PARAMETER_LIST)
                .map(|tpl| tpl.range().end())
                .or_else(|| node.identifier().map(|t| t.range().end()))
                .unwrap_or(range.end());
            from_declaration_start(node, end)
        }

        SyntaxKind::ENUM_DECLARATION | SyntaxKind::PROPERTY_DECLARATION => {
            let end = node.identifier().map(|t| t.range().end()).unwrap_or(range.end());
            from_declaration_start(node, end)
        }

        SyntaxKind::DELEGATE_DECLARATION
        | SyntaxKind::METHOD_DECLARATION
        | SyntaxKind::OPERATOR_DECLARATION
        | SyntaxKind::CONSTRUCTOR_DECLARATION
        | SyntaxKind::DESTRUCTOR_DECLARATION
        | SyntaxKind::LOCAL_FUNCTION_STATEMENT => {
            let end = node
                .child_node(SyntaxKind::PARAMETER_LIST)
                .map(|list| list.range().end())
                .unwrap_or(range.end());
            from_declaration_start(node, end)
        }

        SyntaxKind::FIELD_DECLARATION => {
            let end = node
                .child_node(SyntaxKind::VARIABLE_DECLARATION)
                .map(|d| d.range().end())
                .unwrap_or(range.end());
            from_declaration_start(node, end)
        }

        SyntaxKind::VARIABLE_DECLARATION => match node.parent() {
            Some(field) if field.kind() == SyntaxKind::FIELD_DECLARATION => diagnostic_span(field, edit),
            _ => range,
        },

        SyntaxKind::GET_ACCESSOR_DECLARATION | SyntaxKind::SET_ACCESSOR_DECLARATION => {
            let end = node.identifier().map(|t| t.range().end()).unwrap_or(range.end());
            from_declaration_start(node, end)
        }

        SyntaxKind::ACCESSOR_LIST => match node.parent() {
            Some(property) => diagnostic_span(property, edit),
            None => range,
        },

        SyntaxKind::BLOCK => node
            .child_token(SyntaxKind::L_BRACE)
            .map(|t| t.range())
            .unwrap_or(range),

        SyntaxKind::TRY_STATEMENT
        | SyntaxKind::FINALLY_CLAUSE
        | SyntaxKind::CHECKED_STATEMENT
        | SyntaxKind::UNCHECKED_STATEMENT
        | SyntaxKind::ELSE_CLAUSE => node.first_token().map(|t| t.range()).unwrap_or(range),

        SyntaxKind::CATCH_CLAUSE => {
            let end = node
                .child_node(SyntaxKind::CATCH_DECLARATION)
                .map(|d| d.range().end())
                .or_else(|| node.first_token().map(|t| t.range().end()))
                .unwrap_or(range.end());
            TextRange::new(range.start(), end)
        }

        SyntaxKind::IF_STATEMENT
        | SyntaxKind::WHILE_STATEMENT
        | SyntaxKind::FOR_STATEMENT
        | SyntaxKind::FOREACH_STATEMENT
        | SyntaxKind::USING_STATEMENT
        | SyntaxKind::LOCK_STATEMENT
        | SyntaxKind::SWITCH_STATEMENT => {
            let end = first_direct(node, SyntaxKind::R_PAREN).unwrap_or(range.end());
            TextRange::new(range.start(), end)
        }

        SyntaxKind::DO_STATEMENT => {
            let start = node
                .child_token(SyntaxKind::WHILE_KW)
                .map(|t| t.range().start())
                .unwrap_or(range.start());
            let end = first_direct(node, SyntaxKind::R_PAREN).unwrap_or(range.end());
            TextRange::new(start, end)
        }

        SyntaxKind::AWAIT_EXPRESSION => node
            .child_token(SyntaxKind::AWAIT_KW)
            .map(|t| t.range())
            .unwrap_or(range),

        SyntaxKind::SIMPLE_LAMBDA_EXPRESSION => node
            .child_node(SyntaxKind::PARAMETER)
            .map(|p| p.range())
            .unwrap_or(range),

        SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION => node
            .child_node(SyntaxKind::PARAMETER_LIST)
            .map(|p| p.range())
            .unwrap_or(range),

        SyntaxKind::SWITCH_SECTION => {
            let end = node
                .children()
                .take_while(|c| {
                    matches!(
                        c.kind(),
                        SyntaxKind::CASE_SWITCH_LABEL
                            | SyntaxKind::CASE_PATTERN_SWITCH_LABEL
                            | SyntaxKind::DEFAULT_SWITCH_LABEL
                    )
                })
                .last()
                .map(|l| l.range().end())
                .unwrap_or(range.end());
            TextRange::new(range.start(), end)
        }

        _ => range,
    }
}

/// Span of a deleted node: the diagnostic span of the partner of its
/// nearest ancestor that survived
pub fn deleted_node_span<'t>(
    old: NodeRef<'t>,
    partner_in_new: impl Fn(NodeRef<'t>) -> Option<NodeRef<'t>>,
) -> TextRange {
    old.ancestors()
        .skip(1)
        .find_map(|ancestor| partner_in_new(ancestor))
        .map(|partner| diagnostic_span(partner, EditKind::Delete))
        .unwrap_or_else(|| TextRange::empty(TextSize::new(0)))
}

/// Start of the first token that does not belong to an attribute list
fn from_declaration_start(node: NodeRef<'_>, end: TextSize) -> TextRange {
    let start = node
        .children_with_tokens()
        .find(|c| c.kind() != SyntaxKind::ATTRIBUTE_LIST)
        .map(|c| c.range().start())
        .unwrap_or(node.range().start());
    TextRange::new(start, end.max(start))
}

fn first_direct(node: NodeRef<'_>, kind: SyntaxKind) -> Option<TextSize> {
    node.child_token(kind).map(|t| t.range().end())
}

/// End of the last element before the first direct `kind` token
fn last_before(node: NodeRef<'_>, kind: SyntaxKind) -> Option<TextSize> {
    let mut end = None;
    for child in node.children_with_tokens() {
        if let ElementRef::Token(t) = child {
            if t.kind() == kind {
                return end;
            }
        }
        end = Some(child.range().end());
    }
    end
}
