//! Member bodies and the match context shared by the body analyses.

use crate::compare::BodyMatch;
use crate::parser::SyntaxKind;
use crate::syntax::NodeRef;

/// Body of a member: the block or expression body of methods, operators,
/// constructors, destructors and accessors, the expression body or
/// initializer of a property, the initializer of a non-const field variable
pub fn member_body(member: NodeRef<'_>) -> Option<NodeRef<'_>> {
    match member.kind() {
        kind if kind.has_body() => member
            .children()
            .find(|c| matches!(c.kind(), SyntaxKind::BLOCK | SyntaxKind::ARROW_EXPRESSION_CLAUSE)),
        SyntaxKind::PROPERTY_DECLARATION => member.children().find(|c| {
            matches!(
                c.kind(),
                SyntaxKind::ARROW_EXPRESSION_CLAUSE | SyntaxKind::EQUALS_VALUE_CLAUSE
            )
        }),
        SyntaxKind::VARIABLE_DECLARATOR => {
            let is_const = member
                .ancestors()
                .find(|a| a.kind() == SyntaxKind::FIELD_DECLARATION)
                .is_some_and(|field| field.has_token(SyntaxKind::CONST_KW));
            if is_const || !is_field_declarator(member) {
                None
            } else {
                member.child_node(SyntaxKind::EQUALS_VALUE_CLAUSE)
            }
        }
        _ => None,
    }
}

fn is_field_declarator(node: NodeRef<'_>) -> bool {
    node.parent()
        .and_then(|declaration| declaration.parent())
        .is_some_and(|field| field.kind() == SyntaxKind::FIELD_DECLARATION)
}

/// Node is the body of a member or of a lambda or local function
pub fn is_body_root(node: NodeRef<'_>) -> bool {
    node.parent().is_some_and(|parent| {
        member_body(parent) == Some(node)
            || (parent.kind().is_nested_function() && parent.nested_function_body() == Some(node))
    })
}

/// The member whose body contains `node`
pub fn owning_member(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    node.ancestors()
        .find(|a| member_body(*a).is_some_and(|body| body == node || body.is_ancestor_of(node)))
}

/// Matched old and new member together with the match of their bodies
#[derive(Debug)]
pub(crate) struct BodyContext<'a, 't> {
    pub old_member: NodeRef<'t>,
    pub new_member: NodeRef<'t>,
    pub body_match: &'a BodyMatch<'t>,
}

impl<'t> BodyContext<'_, 't> {
    pub fn partner_in_new(&self, old: NodeRef<'t>) -> Option<NodeRef<'t>> {
        self.body_match
            .partner_in_new(old)
            .or_else(|| (old == self.old_member).then_some(self.new_member))
    }

    pub fn partner_in_old(&self, new: NodeRef<'t>) -> Option<NodeRef<'t>> {
        self.body_match
            .partner_in_old(new)
            .or_else(|| (new == self.new_member).then_some(self.old_member))
    }

    pub fn old_body(&self) -> NodeRef<'t> {
        self.body_match.root().old_root()
    }

    pub fn new_body(&self) -> NodeRef<'t> {
        self.body_match.root().new_root()
    }
}
