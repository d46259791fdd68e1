//! Typed wrappers over arena nodes.
//!
//! Each struct wraps a [`NodeRef`] and provides accessors for the parts the
//! comparer and analyses care about.

use crate::parser::SyntaxKind;

use super::node::{ElementRef, NodeRef, TokenRef};

/// Trait for typed AST nodes wrapping arena nodes
pub trait AstNode<'t>: Sized + Copy {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: NodeRef<'t>) -> Option<Self>;
    fn syntax(&self) -> NodeRef<'t>;
}

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name<'t>(pub(crate) NodeRef<'t>);

        impl<'t> AstNode<'t> for $name<'t> {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: NodeRef<'t>) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> NodeRef<'t> {
                self.0
            }
        }
    };
}

macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            self.0.has_token(SyntaxKind::$kind)
        }
    };
}

macro_rules! first_child_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Get the first `", stringify!($kind), "` child of this node.")]
        pub fn $name(&self) -> Option<NodeRef<'t>> {
            self.0.child_node(SyntaxKind::$kind)
        }
    };
}

/// The first child node that is an expression
fn first_expression(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    node.children().find(|c| c.kind().is_expression())
}

/// The last child node that is a statement
fn last_statement(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    node.children().rev().find(|c| c.kind().is_statement())
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(TypeDeclaration, CLASS_DECLARATION | STRUCT_DECLARATION | INTERFACE_DECLARATION);

impl<'t> TypeDeclaration<'t> {
    has_token_method!(is_partial, PARTIAL_KW);
    first_child_method!(type_parameter_list, TYPE_PARAMETER_LIST);

    pub fn name(&self) -> Option<TokenRef<'t>> {
        self.0.identifier()
    }

    pub fn is_interface(&self) -> bool {
        self.0.kind() == SyntaxKind::INTERFACE_DECLARATION
    }

    /// Member declarations of the type body
    pub fn members(self) -> impl Iterator<Item = NodeRef<'t>> {
        self.0.children().filter(|c| {
            !matches!(
                c.kind(),
                SyntaxKind::ATTRIBUTE_LIST
                    | SyntaxKind::TYPE_PARAMETER_LIST
                    | SyntaxKind::BASE_LIST
                    | SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE
                    | SyntaxKind::ERROR
            )
        })
    }
}

ast_node!(MethodDeclaration, METHOD_DECLARATION);

impl<'t> MethodDeclaration<'t> {
    has_token_method!(is_async, ASYNC_KW);
    has_token_method!(is_extern, EXTERN_KW);
    first_child_method!(type_parameter_list, TYPE_PARAMETER_LIST);
    first_child_method!(parameter_list, PARAMETER_LIST);
    first_child_method!(explicit_interface, EXPLICIT_INTERFACE_SPECIFIER);
    first_child_method!(return_type, TYPE);

    pub fn name(&self) -> Option<TokenRef<'t>> {
        self.0.identifier()
    }

    pub fn body(&self) -> Option<NodeRef<'t>> {
        self.0
            .children()
            .find(|c| matches!(c.kind(), SyntaxKind::BLOCK | SyntaxKind::ARROW_EXPRESSION_CLAUSE))
    }
}

ast_node!(PropertyDeclaration, PROPERTY_DECLARATION);

impl<'t> PropertyDeclaration<'t> {
    first_child_method!(accessor_list, ACCESSOR_LIST);
    first_child_method!(expression_body, ARROW_EXPRESSION_CLAUSE);
    first_child_method!(initializer, EQUALS_VALUE_CLAUSE);
    first_child_method!(ty, TYPE);

    pub fn name(&self) -> Option<TokenRef<'t>> {
        self.0.identifier()
    }
}

ast_node!(AccessorList, ACCESSOR_LIST);

impl<'t> AccessorList<'t> {
    pub fn accessors(self) -> impl Iterator<Item = NodeRef<'t>> {
        self.0.children().filter(|c| {
            matches!(
                c.kind(),
                SyntaxKind::GET_ACCESSOR_DECLARATION | SyntaxKind::SET_ACCESSOR_DECLARATION
            )
        })
    }

    pub fn has_setter(&self) -> bool {
        self.0.child_node(SyntaxKind::SET_ACCESSOR_DECLARATION).is_some()
    }

    /// All accessors are auto-implemented (`get;`)
    pub fn is_auto(&self) -> bool {
        self.accessors().all(|a| {
            !a.children()
                .any(|c| matches!(c.kind(), SyntaxKind::BLOCK | SyntaxKind::ARROW_EXPRESSION_CLAUSE))
        })
    }
}

ast_node!(Parameter, PARAMETER);

impl<'t> Parameter<'t> {
    first_child_method!(ty, TYPE);
    first_child_method!(default_value, EQUALS_VALUE_CLAUSE);

    pub fn name(&self) -> Option<TokenRef<'t>> {
        self.0.identifier()
    }

    /// `ref`, `out`, `in`, `params` or `this`
    pub fn modifiers(self) -> impl Iterator<Item = SyntaxKind> + 't {
        self.0
            .tokens()
            .map(|t| t.kind())
            .filter(|k| k.is_parameter_modifier())
    }
}

ast_node!(VariableDeclarator, VARIABLE_DECLARATOR);

impl<'t> VariableDeclarator<'t> {
    first_child_method!(initializer, EQUALS_VALUE_CLAUSE);

    pub fn name(&self) -> Option<TokenRef<'t>> {
        self.0.identifier()
    }
}

// ============================================================================
// Nested functions
// ============================================================================

ast_node!(Lambda, SIMPLE_LAMBDA_EXPRESSION | PARENTHESIZED_LAMBDA_EXPRESSION | LOCAL_FUNCTION_STATEMENT);

impl<'t> Lambda<'t> {
    has_token_method!(is_async, ASYNC_KW);

    pub fn is_local_function(&self) -> bool {
        self.0.kind() == SyntaxKind::LOCAL_FUNCTION_STATEMENT
    }

    /// Parameter nodes in declaration order
    pub fn parameters(&self) -> Vec<Parameter<'t>> {
        match self.0.kind() {
            SyntaxKind::SIMPLE_LAMBDA_EXPRESSION => {
                self.0.children().filter_map(Parameter::cast).collect()
            }
            _ => self
                .0
                .child_node(SyntaxKind::PARAMETER_LIST)
                .map(|list| list.children().filter_map(Parameter::cast).collect())
                .unwrap_or_default(),
        }
    }

    pub fn parameter_list(&self) -> Option<NodeRef<'t>> {
        self.0.child_node(SyntaxKind::PARAMETER_LIST)
    }

    pub fn body(&self) -> Option<NodeRef<'t>> {
        self.0.nested_function_body()
    }

    pub fn name(&self) -> Option<TokenRef<'t>> {
        if self.is_local_function() {
            self.0.identifier()
        } else {
            None
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(IfStatement, IF_STATEMENT);

impl<'t> IfStatement<'t> {
    first_child_method!(else_clause, ELSE_CLAUSE);

    pub fn condition(&self) -> Option<NodeRef<'t>> {
        first_expression(self.0)
    }

    pub fn statement(&self) -> Option<NodeRef<'t>> {
        self.0.children().find(|c| c.kind().is_statement())
    }
}

// `while`, `lock`, `do`, `checked` and `else` share the shape
// "header expression plus one embedded statement"
ast_node!(
    EmbeddedStatementOwner,
    WHILE_STATEMENT | DO_STATEMENT | LOCK_STATEMENT | ELSE_CLAUSE | CHECKED_STATEMENT | UNCHECKED_STATEMENT
);

impl<'t> EmbeddedStatementOwner<'t> {
    pub fn expression(&self) -> Option<NodeRef<'t>> {
        first_expression(self.0)
    }

    pub fn statement(&self) -> Option<NodeRef<'t>> {
        self.0.children().find(|c| c.kind().is_statement())
    }
}

ast_node!(ForStatement, FOR_STATEMENT);

impl<'t> ForStatement<'t> {
    first_child_method!(declaration, VARIABLE_DECLARATION);

    /// Initializer expressions, condition and incrementors split on the
    /// `;` tokens of the header
    fn header_parts(&self) -> [Vec<NodeRef<'t>>; 3] {
        let mut parts: [Vec<NodeRef<'t>>; 3] = Default::default();
        let mut section = 0;
        for child in self.0.children_with_tokens() {
            match child {
                ElementRef::Token(t) if t.kind() == SyntaxKind::SEMICOLON => section += 1,
                ElementRef::Token(t) if t.kind() == SyntaxKind::R_PAREN => break,
                ElementRef::Node(n) if n.kind().is_expression() && section < 3 => {
                    parts[section].push(n)
                }
                _ => {}
            }
        }
        parts
    }

    pub fn initializers(&self) -> Vec<NodeRef<'t>> {
        let [initializers, _, _] = self.header_parts();
        initializers
    }

    pub fn condition(&self) -> Option<NodeRef<'t>> {
        let [_, condition, _] = self.header_parts();
        condition.into_iter().next()
    }

    pub fn incrementors(&self) -> Vec<NodeRef<'t>> {
        let [_, _, incrementors] = self.header_parts();
        incrementors
    }

    pub fn statement(&self) -> Option<NodeRef<'t>> {
        last_statement(self.0)
    }
}

ast_node!(ForEachStatement, FOREACH_STATEMENT);

impl<'t> ForEachStatement<'t> {
    first_child_method!(ty, TYPE);

    pub fn identifier(&self) -> Option<TokenRef<'t>> {
        self.0.identifier()
    }

    pub fn expression(&self) -> Option<NodeRef<'t>> {
        first_expression(self.0)
    }

    pub fn statement(&self) -> Option<NodeRef<'t>> {
        last_statement(self.0)
    }
}

ast_node!(UsingStatement, USING_STATEMENT);

impl<'t> UsingStatement<'t> {
    first_child_method!(declaration, VARIABLE_DECLARATION);

    pub fn expression(&self) -> Option<NodeRef<'t>> {
        first_expression(self.0)
    }

    pub fn statement(&self) -> Option<NodeRef<'t>> {
        last_statement(self.0)
    }
}

ast_node!(TryStatement, TRY_STATEMENT);

impl<'t> TryStatement<'t> {
    first_child_method!(block, BLOCK);
    first_child_method!(finally_clause, FINALLY_CLAUSE);

    pub fn catches(self) -> impl Iterator<Item = NodeRef<'t>> {
        self.0.child_nodes(SyntaxKind::CATCH_CLAUSE)
    }
}

ast_node!(CatchClause, CATCH_CLAUSE);

impl<'t> CatchClause<'t> {
    first_child_method!(declaration, CATCH_DECLARATION);
    first_child_method!(filter, CATCH_FILTER_CLAUSE);
    first_child_method!(block, BLOCK);
}

ast_node!(SwitchSection, SWITCH_SECTION);

impl<'t> SwitchSection<'t> {
    pub fn labels(self) -> impl Iterator<Item = NodeRef<'t>> {
        self.0.children().filter(|c| {
            matches!(
                c.kind(),
                SyntaxKind::CASE_SWITCH_LABEL
                    | SyntaxKind::CASE_PATTERN_SWITCH_LABEL
                    | SyntaxKind::DEFAULT_SWITCH_LABEL
            )
        })
    }

    pub fn statements(self) -> impl Iterator<Item = NodeRef<'t>> {
        self.0.children().filter(|c| c.kind().is_statement())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SyntaxTree;
    use super::*;

    fn first<'t, N: AstNode<'t>>(tree: &'t SyntaxTree) -> N {
        tree.root().descendants().find_map(N::cast).unwrap()
    }

    #[test]
    fn test_for_statement_parts() {
        let tree = SyntaxTree::parse("class C { void M() { for (i = 0, j = 1; i < 10; i++, j--) F(); } }");
        let stmt: ForStatement<'_> = first(&tree);
        assert_eq!(stmt.initializers().len(), 2);
        assert_eq!(stmt.condition().unwrap().text(), "i < 10");
        assert_eq!(stmt.incrementors().len(), 2);
        assert_eq!(stmt.statement().unwrap().text(), "F();");
    }

    #[test]
    fn test_lambda_parameters() {
        let tree = SyntaxTree::parse("class C { void M() { F(async (int a, b) => a); } }");
        let lambda: Lambda<'_> = first(&tree);
        assert!(lambda.is_async());
        let names: Vec<_> = lambda
            .parameters()
            .iter()
            .filter_map(|p| p.name())
            .map(|t| t.text())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(lambda.body().unwrap().text(), "a");
    }

    #[test]
    fn test_accessor_list() {
        let tree = SyntaxTree::parse("class C { int P { get; private set; } }");
        let list: AccessorList<'_> = first(&tree);
        assert!(list.has_setter());
        assert!(list.is_auto());
    }

    #[test]
    fn test_type_members() {
        let tree = SyntaxTree::parse("partial class C<T> : B { int x; void M() {} }");
        let ty: TypeDeclaration<'_> = first(&tree);
        assert!(ty.is_partial());
        assert_eq!(ty.name().unwrap().text(), "C");
        assert_eq!(ty.members().count(), 2);
    }
}
