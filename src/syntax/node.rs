//! Cursors over an arena [`SyntaxTree`].

use std::fmt;
use std::hash::{Hash, Hasher};

use rowan::TextRange;

use crate::base::LineCol;
use crate::parser::SyntaxKind;

use super::tree::{Element, NodeId, SyntaxTree, TokenId};

/// A node of a [`SyntaxTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

/// A significant token of a [`SyntaxTree`]
#[derive(Clone, Copy)]
pub struct TokenRef<'t> {
    tree: &'t SyntaxTree,
    id: TokenId,
}

/// A child of a node: either a node or a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef<'t> {
    Node(NodeRef<'t>),
    Token(TokenRef<'t>),
}

impl<'t> ElementRef<'t> {
    pub fn kind(self) -> SyntaxKind {
        match self {
            ElementRef::Node(n) => n.kind(),
            ElementRef::Token(t) => t.kind(),
        }
    }

    pub fn range(self) -> TextRange {
        match self {
            ElementRef::Node(n) => n.range(),
            ElementRef::Token(t) => t.range(),
        }
    }

    pub fn into_node(self) -> Option<NodeRef<'t>> {
        match self {
            ElementRef::Node(n) => Some(n),
            ElementRef::Token(_) => None,
        }
    }

    pub fn into_token(self) -> Option<TokenRef<'t>> {
        match self {
            ElementRef::Token(t) => Some(t),
            ElementRef::Node(_) => None,
        }
    }
}

// ============================================================================
// NodeRef
// ============================================================================

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn tree(self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> SyntaxKind {
        self.tree.nodes[self.id.index()].kind
    }

    /// Range from the first to the last significant token
    pub fn range(self) -> TextRange {
        self.tree.nodes[self.id.index()].range
    }

    /// Source text of the node including interior trivia
    pub fn text(self) -> &'t str {
        self.tree.slice(self.range())
    }

    pub fn parent(self) -> Option<NodeRef<'t>> {
        self.tree.nodes[self.id.index()]
            .parent
            .map(|id| NodeRef::new(self.tree, id))
    }

    /// Ancestors starting at the node itself
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'t>> {
        std::iter::successors(Some(self), |n| n.parent())
    }

    /// True if `other` is a strict descendant of this node
    pub fn is_ancestor_of(self, other: NodeRef<'_>) -> bool {
        let data = &self.tree.nodes[self.id.index()];
        other.id.0 > self.id.0 && other.id.0 < data.subtree_end
    }

    pub fn children_with_tokens(self) -> impl DoubleEndedIterator<Item = ElementRef<'t>> {
        let tree = self.tree;
        tree.nodes[self.id.index()]
            .children
            .iter()
            .map(move |child| match *child {
                Element::Node(id) => ElementRef::Node(NodeRef::new(tree, id)),
                Element::Token(id) => ElementRef::Token(TokenRef::new(tree, id)),
            })
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = NodeRef<'t>> {
        self.children_with_tokens().filter_map(ElementRef::into_node)
    }

    /// Direct child tokens
    pub fn tokens(self) -> impl DoubleEndedIterator<Item = TokenRef<'t>> {
        self.children_with_tokens().filter_map(ElementRef::into_token)
    }

    pub fn child_node(self, kind: SyntaxKind) -> Option<NodeRef<'t>> {
        self.children().find(|c| c.kind() == kind)
    }

    pub fn child_nodes(self, kind: SyntaxKind) -> impl Iterator<Item = NodeRef<'t>> {
        self.children().filter(move |c| c.kind() == kind)
    }

    pub fn child_token(self, kind: SyntaxKind) -> Option<TokenRef<'t>> {
        self.tokens().find(|t| t.kind() == kind)
    }

    pub fn has_token(self, kind: SyntaxKind) -> bool {
        self.child_token(kind).is_some()
    }

    /// The first direct identifier token
    pub fn identifier(self) -> Option<TokenRef<'t>> {
        self.child_token(SyntaxKind::IDENT)
    }

    /// Nodes of the subtree in preorder, starting at the node itself
    pub fn descendants(self) -> Descendants<'t, fn(NodeRef<'t>) -> bool> {
        fn always(_: NodeRef<'_>) -> bool {
            true
        }
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
            descend: always,
        }
    }

    /// Like [`descendants`](Self::descendants), but does not enter the
    /// children of nodes for which `descend` returns false. Those nodes
    /// themselves are still yielded.
    pub fn descendants_with<F>(self, descend: F) -> Descendants<'t, F>
    where
        F: FnMut(NodeRef<'t>) -> bool,
    {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
            descend,
        }
    }

    /// Significant tokens of the subtree in source order
    pub fn descendant_tokens(self) -> impl Iterator<Item = TokenRef<'t>> {
        let tree = self.tree;
        let range = self.range();
        let start = tree.tokens.partition_point(|t| t.range.start() < range.start());
        let end = tree.tokens.partition_point(|t| t.range.end() <= range.end());
        (start..end.max(start)).map(move |i| TokenRef::new(tree, TokenId(i as u32)))
    }

    pub fn first_token(self) -> Option<TokenRef<'t>> {
        self.descendant_tokens().next()
    }

    pub fn last_token(self) -> Option<TokenRef<'t>> {
        self.descendant_tokens().last()
    }

    /// The modifier keyword `kind` appears among the node's direct tokens
    pub fn has_modifier(self, kind: SyntaxKind) -> bool {
        debug_assert!(kind.is_modifier());
        self.has_token(kind)
    }

    /// Body of a lambda or local function
    pub fn nested_function_body(self) -> Option<NodeRef<'t>> {
        match self.kind() {
            SyntaxKind::SIMPLE_LAMBDA_EXPRESSION | SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION => {
                let mut after_arrow = false;
                for child in self.children_with_tokens() {
                    match child {
                        ElementRef::Token(t) if t.kind() == SyntaxKind::FAT_ARROW => after_arrow = true,
                        ElementRef::Node(n) if after_arrow => return Some(n),
                        _ => {}
                    }
                }
                None
            }
            SyntaxKind::LOCAL_FUNCTION_STATEMENT => self
                .children()
                .find(|c| matches!(c.kind(), SyntaxKind::BLOCK | SyntaxKind::ARROW_EXPRESSION_CLAUSE)),
            _ => None,
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.range())
    }
}

/// Preorder iterator over a subtree
pub struct Descendants<'t, F> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
    descend: F,
}

impl<'t, F> Iterator for Descendants<'t, F>
where
    F: FnMut(NodeRef<'t>) -> bool,
{
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = NodeRef::new(self.tree, id);
        if (self.descend)(node) {
            let children = &self.tree.nodes[id.index()].children;
            self.stack.extend(children.iter().rev().filter_map(|c| match c {
                Element::Node(child) => Some(*child),
                Element::Token(_) => None,
            }));
        }
        Some(node)
    }
}

// ============================================================================
// TokenRef
// ============================================================================

impl<'t> TokenRef<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, id: TokenId) -> Self {
        Self { tree, id }
    }

    pub fn id(self) -> TokenId {
        self.id
    }

    pub fn kind(self) -> SyntaxKind {
        self.tree.tokens[self.id.index()].kind
    }

    pub fn text(self) -> &'t str {
        self.tree.tokens[self.id.index()].text.as_str()
    }

    pub fn range(self) -> TextRange {
        self.tree.tokens[self.id.index()].range
    }

    pub fn parent(self) -> NodeRef<'t> {
        NodeRef::new(self.tree, self.tree.tokens[self.id.index()].parent)
    }

    pub fn previous(self) -> Option<TokenRef<'t>> {
        self.tree.previous_token(self.id)
    }

    /// Whitespace and comments between this token and the previous one
    pub fn leading_trivia(self) -> TextRange {
        self.tree.leading_trivia(self.id)
    }

    pub fn line_col(self) -> LineCol {
        self.tree.line_index().line_col(self.range().start())
    }
}

impl PartialEq for TokenRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for TokenRef<'_> {}

impl Hash for TokenRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TokenRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.range(), self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SyntaxTree;
    use super::*;

    fn find(tree: &SyntaxTree, kind: SyntaxKind) -> NodeRef<'_> {
        tree.root().descendants().find(|n| n.kind() == kind).unwrap()
    }

    #[test]
    fn test_descendant_tokens_cover_node() {
        let tree = SyntaxTree::parse("class C { void M() { F(1, 2); } }");
        let call = find(&tree, SyntaxKind::INVOCATION_EXPRESSION);
        let texts: Vec<_> = call.descendant_tokens().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["F", "(", "1", ",", "2", ")"]);
        assert_eq!(call.first_token().unwrap().text(), "F");
        assert_eq!(call.last_token().unwrap().text(), ")");
    }

    #[test]
    fn test_descendants_with_skips_subtrees() {
        let tree = SyntaxTree::parse("class C { void M() { F(x => { G(); }); } }");
        let skip_lambdas = |n: NodeRef<'_>| !n.kind().is_lambda();
        let method = find(&tree, SyntaxKind::METHOD_DECLARATION);
        let kinds: Vec<_> = method.descendants_with(skip_lambdas).map(|n| n.kind()).collect();
        assert!(kinds.contains(&SyntaxKind::SIMPLE_LAMBDA_EXPRESSION));
        assert_eq!(
            kinds.iter().filter(|k| **k == SyntaxKind::EXPRESSION_STATEMENT).count(),
            1
        );
    }

    #[test]
    fn test_nested_function_body() {
        let tree = SyntaxTree::parse("class C { void M() { F(a => a + 1); int L() => 1; } }");
        let lambda = find(&tree, SyntaxKind::SIMPLE_LAMBDA_EXPRESSION);
        assert_eq!(lambda.nested_function_body().unwrap().text(), "a + 1");
        let local = find(&tree, SyntaxKind::LOCAL_FUNCTION_STATEMENT);
        assert_eq!(
            local.nested_function_body().unwrap().kind(),
            SyntaxKind::ARROW_EXPRESSION_CLAUSE
        );
    }

    #[test]
    fn test_ancestors_end_at_root() {
        let tree = SyntaxTree::parse("class C { void M() { return; } }");
        let ret = find(&tree, SyntaxKind::RETURN_STATEMENT);
        let last = ret.ancestors().last().unwrap();
        assert_eq!(last, tree.root());
    }
}
