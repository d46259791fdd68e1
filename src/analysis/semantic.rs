//! Questions the syntax alone cannot answer.
//!
//! The classifier asks a [`SymbolLookup`] whether a deleted member is still
//! declared somewhere in the new document (for example moved to another
//! partial type fragment) and which variables a body's lambdas capture.
//! [`SyntacticSymbolLookup`] answers both by name and scope rules alone.

use rustc_hash::FxHashSet;

use crate::compare::declaration_name;
use crate::parser::SyntaxKind;
use crate::syntax::ast::{Lambda, Parameter, VariableDeclarator};
use crate::syntax::{AstNode, NodeRef};

/// A variable declared outside of a lambda and used inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapturedVariable<'t> {
    pub name: &'t str,
    /// `VARIABLE_DECLARATOR`, `PARAMETER`, `FOREACH_STATEMENT` or `CATCH_DECLARATION`
    pub declaration: NodeRef<'t>,
}

/// Semantic collaborator consulted by the classifier
pub trait SymbolLookup: Sync {
    /// `old_member` has a declaration with the same signature in the same
    /// containing type somewhere under `new_root`
    fn member_still_declared(&self, old_member: NodeRef<'_>, new_root: NodeRef<'_>) -> bool;

    /// Variables captured by lambdas and local functions nested in `body`,
    /// ordered by declaration position
    fn captured_variables<'t>(&self, body: NodeRef<'t>) -> Vec<CapturedVariable<'t>>;
}

/// Name and scope based lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticSymbolLookup;

impl SymbolLookup for SyntacticSymbolLookup {
    fn member_still_declared(&self, old_member: NodeRef<'_>, new_root: NodeRef<'_>) -> bool {
        let kind = old_member.kind();
        let path = container_path(old_member);
        let key = signature_key(old_member);
        new_root
            .descendants_with(|n| is_declaration_container(n.kind()))
            .filter(|n| n.kind() == kind)
            .any(|n| container_path(n) == path && signature_key(n) == key)
    }

    fn captured_variables<'t>(&self, body: NodeRef<'t>) -> Vec<CapturedVariable<'t>> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for name_expr in body.descendants().filter(|n| n.kind() == SyntaxKind::NAME_EXPRESSION) {
            let Some(ident) = name_expr.identifier() else {
                continue;
            };
            let Some(function) = innermost_nested_function(name_expr, body) else {
                continue;
            };
            let Some(declaration) = resolve_local(name_expr, ident.text()) else {
                continue;
            };
            if declaration == function || function.is_ancestor_of(declaration) {
                continue;
            }
            if seen.insert(declaration) {
                result.push(CapturedVariable {
                    name: ident.text(),
                    declaration,
                });
            }
        }
        result.sort_by_key(|c| c.declaration.range().start());
        result
    }
}

// ============================================================================
// Member lookup
// ============================================================================

/// Nodes whose children may declare members
fn is_declaration_container(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::COMPILATION_UNIT
            | SyntaxKind::NAMESPACE_DECLARATION
            | SyntaxKind::CLASS_DECLARATION
            | SyntaxKind::STRUCT_DECLARATION
            | SyntaxKind::INTERFACE_DECLARATION
            | SyntaxKind::ENUM_DECLARATION
            | SyntaxKind::FIELD_DECLARATION
            | SyntaxKind::VARIABLE_DECLARATION
            | SyntaxKind::PROPERTY_DECLARATION
            | SyntaxKind::ACCESSOR_LIST
    )
}

/// Names of the enclosing namespaces and types, outermost first
fn container_path(node: NodeRef<'_>) -> Vec<String> {
    let mut path: Vec<String> = node
        .ancestors()
        .skip(1)
        .filter(|a| a.kind() == SyntaxKind::NAMESPACE_DECLARATION || a.kind().is_type_declaration())
        .filter_map(declaration_name)
        .collect();
    path.reverse();
    path
}

fn signature_key(node: NodeRef<'_>) -> Option<String> {
    match node.kind() {
        SyntaxKind::METHOD_DECLARATION
        | SyntaxKind::CONSTRUCTOR_DECLARATION
        | SyntaxKind::OPERATOR_DECLARATION
        | SyntaxKind::DELEGATE_DECLARATION => {
            let name = declaration_name(node)?;
            let parameters: Vec<String> = node
                .child_node(SyntaxKind::PARAMETER_LIST)
                .into_iter()
                .flat_map(|list| list.children().filter_map(Parameter::cast))
                .map(|p| p.ty().map(token_text).unwrap_or_default())
                .collect();
            Some(format!("{name}({})", parameters.join(",")))
        }
        SyntaxKind::FIELD_DECLARATION => {
            let names: Vec<&str> = node
                .descendants()
                .filter_map(VariableDeclarator::cast)
                .filter_map(|d| d.name())
                .map(|t| t.text())
                .collect();
            Some(names.join(","))
        }
        SyntaxKind::VARIABLE_DECLARATION => node.parent().and_then(signature_key),
        SyntaxKind::ACCESSOR_LIST => node.parent().and_then(declaration_name),
        _ => declaration_name(node),
    }
}

/// Tokens of a subtree concatenated without trivia
fn token_text(node: NodeRef<'_>) -> String {
    node.descendant_tokens().map(|t| t.text()).collect()
}

// ============================================================================
// Captures
// ============================================================================

/// The innermost lambda or local function between `node` and `body`
fn innermost_nested_function<'t>(node: NodeRef<'t>, body: NodeRef<'t>) -> Option<NodeRef<'t>> {
    node.ancestors()
        .skip(1)
        .take_while(|a| *a != body)
        .find(|a| a.kind().is_nested_function())
}

fn is_member(kind: SyntaxKind) -> bool {
    kind.has_body()
        || matches!(
            kind,
            SyntaxKind::PROPERTY_DECLARATION | SyntaxKind::FIELD_DECLARATION
        )
}

/// Declaration of the local, parameter or range variable `name` visible at `usage`
fn resolve_local<'t>(usage: NodeRef<'t>, name: &str) -> Option<NodeRef<'t>> {
    let mut child = usage;
    for scope in usage.ancestors().skip(1) {
        if let Some(found) = declared_in_scope(scope, child, name) {
            return Some(found);
        }
        if is_member(scope.kind()) || scope.kind().is_type_declaration() {
            return None;
        }
        child = scope;
    }
    None
}

/// A declaration of `name` made by `scope` and visible to its child `child`
fn declared_in_scope<'t>(scope: NodeRef<'t>, child: NodeRef<'t>, name: &str) -> Option<NodeRef<'t>> {
    match scope.kind() {
        SyntaxKind::BLOCK | SyntaxKind::SWITCH_SECTION => scope
            .children()
            .take_while(|s| *s != child)
            .filter(|s| s.kind() == SyntaxKind::LOCAL_DECLARATION_STATEMENT)
            .filter_map(|s| s.child_node(SyntaxKind::VARIABLE_DECLARATION))
            .find_map(|d| declarator_named(d, name)),
        SyntaxKind::FOR_STATEMENT | SyntaxKind::USING_STATEMENT => scope
            .child_node(SyntaxKind::VARIABLE_DECLARATION)
            .and_then(|d| declarator_named(d, name)),
        SyntaxKind::FOREACH_STATEMENT => scope
            .identifier()
            .filter(|t| t.text() == name && t.range().end() <= child.range().start())
            .map(|_| scope),
        SyntaxKind::CATCH_CLAUSE => scope
            .child_node(SyntaxKind::CATCH_DECLARATION)
            .filter(|d| d.identifier().is_some_and(|t| t.text() == name)),
        SyntaxKind::SIMPLE_LAMBDA_EXPRESSION
        | SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION
        | SyntaxKind::LOCAL_FUNCTION_STATEMENT => Lambda(scope)
            .parameters()
            .into_iter()
            .find(|p| p.name().is_some_and(|t| t.text() == name))
            .map(|p| p.syntax()),
        kind if kind.has_body() => scope
            .child_node(SyntaxKind::PARAMETER_LIST)
            .into_iter()
            .flat_map(|list| list.children().filter_map(Parameter::cast))
            .find(|p| p.name().is_some_and(|t| t.text() == name))
            .map(|p| p.syntax()),
        _ => None,
    }
}

fn declarator_named<'t>(declaration: NodeRef<'t>, name: &str) -> Option<NodeRef<'t>> {
    declaration
        .children()
        .filter_map(VariableDeclarator::cast)
        .find(|d| d.name().is_some_and(|t| t.text() == name))
        .map(|d| d.syntax())
}
