//! Arena syntax trees.
//!
//! The comparer needs stable, cheap node identities that can be stored in
//! hash maps and shared across threads. Rowan's red nodes are reference
//! counted and `!Send`, so each document is flattened once into an arena:
//!
//! ```text
//! GreenNode (rowan)
//!     ↓  preorder walk, trivia dropped
//! SyntaxTree { nodes: Vec<NodeData>, tokens: Vec<TokenData> }
//!     ↓
//! NodeRef<'t> / TokenRef<'t>  (Copy cursors borrowing the arena)
//! ```
//!
//! Nodes are allocated in preorder, so a node id is always smaller than the
//! ids of its descendants and `subtree_end` bounds the subtree.

use rowan::{GreenNode, NodeOrToken, TextRange, TextSize, WalkEvent};
use smol_str::SmolStr;

use crate::base::LineIndex;
use crate::parser::{self, SyntaxError, SyntaxKind, SyntaxNode};

use super::node::{NodeRef, TokenRef};

/// Identity of a node within one [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

/// Identity of a token within one [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<Element>,
    /// One past the last descendant id
    pub(crate) subtree_end: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct TokenData {
    pub(crate) kind: SyntaxKind,
    pub(crate) text: SmolStr,
    pub(crate) range: TextRange,
    pub(crate) parent: NodeId,
}

/// An immutable, trivia-free syntax tree of one document version
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) tokens: Vec<TokenData>,
    text: String,
    /// Trivia is gone from the arena; line positions still see it
    lines: LineIndex,
    errors: Vec<SyntaxError>,
}

impl SyntaxTree {
    /// Parse `text` and flatten the result
    pub fn parse(text: &str) -> Self {
        let parse = parser::parse(text);
        let mut tree = Self::new(&parse.green, text);
        tree.errors = parse.errors;
        tree
    }

    /// Flatten a green tree. `text` must be the text the tree was parsed from.
    pub fn new(green: &GreenNode, text: &str) -> Self {
        let root = SyntaxNode::new_root(green.clone());
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut tokens: Vec<TokenData> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();

        for event in root.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(NodeOrToken::Node(node)) => {
                    let id = NodeId(nodes.len() as u32);
                    let parent = stack.last().copied();
                    if let Some(parent) = parent {
                        nodes[parent.index()].children.push(Element::Node(id));
                    }
                    nodes.push(NodeData {
                        kind: node.kind(),
                        range: node.text_range(),
                        parent,
                        children: Vec::new(),
                        subtree_end: id.0 + 1,
                    });
                    stack.push(id);
                }
                WalkEvent::Leave(NodeOrToken::Node(_)) => {
                    if let Some(id) = stack.pop() {
                        nodes[id.index()].subtree_end = nodes.len() as u32;
                    }
                }
                WalkEvent::Enter(NodeOrToken::Token(token)) => {
                    if token.kind().is_trivia() {
                        continue;
                    }
                    let Some(&parent) = stack.last() else {
                        continue;
                    };
                    let id = TokenId(tokens.len() as u32);
                    nodes[parent.index()].children.push(Element::Token(id));
                    tokens.push(TokenData {
                        kind: token.kind(),
                        text: SmolStr::new(token.text()),
                        range: token.text_range(),
                        parent,
                    });
                }
                WalkEvent::Leave(NodeOrToken::Token(_)) => {}
            }
        }

        trim_node_ranges(&mut nodes, &tokens);

        Self {
            nodes,
            tokens,
            text: text.to_string(),
            lines: LineIndex::new(text),
            errors: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId(0))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    pub fn token(&self, id: TokenId) -> TokenRef<'_> {
        TokenRef::new(self, id)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All significant tokens in source order
    pub fn tokens(&self) -> impl Iterator<Item = TokenRef<'_>> + '_ {
        (0..self.tokens.len() as u32).map(|i| TokenRef::new(self, TokenId(i)))
    }

    /// The token containing `offset`, or the first token after it when
    /// `offset` falls between tokens. Offsets past the end yield the last token.
    pub fn token_at_offset(&self, offset: TextSize) -> Option<TokenRef<'_>> {
        if self.tokens.is_empty() {
            return None;
        }
        let idx = self.tokens.partition_point(|t| t.range.end() <= offset);
        let idx = idx.min(self.tokens.len() - 1);
        Some(TokenRef::new(self, TokenId(idx as u32)))
    }

    /// Trivia between `token` and the significant token before it
    pub fn leading_trivia(&self, token: TokenId) -> TextRange {
        let start = self
            .previous_token(token)
            .map_or(TextSize::new(0), |previous| previous.range().end());
        TextRange::new(start, self.tokens[token.index()].range.start())
    }

    /// The significant token immediately before `token`, if any
    pub fn previous_token(&self, token: TokenId) -> Option<TokenRef<'_>> {
        token
            .0
            .checked_sub(1)
            .map(|i| TokenRef::new(self, TokenId(i)))
    }

    /// Text of `range`, clamped to the document
    pub fn slice(&self, range: TextRange) -> &str {
        let len = TextSize::of(self.text.as_str());
        let start = range.start().min(len);
        let end = range.end().min(len);
        &self.text[TextRange::new(start, end)]
    }
}

/// Rowan ranges of the root and of nodes ending in recovered input may
/// include trivia; shrink every node to its first and last significant token.
fn trim_node_ranges(nodes: &mut [NodeData], tokens: &[TokenData]) {
    // Children are visited after parents in preorder, so walk backwards to
    // have every child's trimmed range ready before its parent.
    for idx in (0..nodes.len()).rev() {
        let first = nodes[idx].children.iter().find_map(|child| match child {
            Element::Token(t) => Some(tokens[t.index()].range),
            Element::Node(n) => non_empty(nodes[n.index()].range),
        });
        let last = nodes[idx].children.iter().rev().find_map(|child| match child {
            Element::Token(t) => Some(tokens[t.index()].range),
            Element::Node(n) => non_empty(nodes[n.index()].range),
        });
        if let (Some(first), Some(last)) = (first, last) {
            nodes[idx].range = TextRange::new(first.start(), last.end());
        } else {
            let start = nodes[idx].range.start();
            nodes[idx].range = TextRange::empty(start);
        }
    }
}

fn non_empty(range: TextRange) -> Option<TextRange> {
    (!range.is_empty()).then_some(range)
}
