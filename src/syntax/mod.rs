//! Arena syntax trees consumed by the comparer and analyses.
//!
//! ```text
//! parser::parse ─→ GreenNode ─→ SyntaxTree (arena, trivia-free)
//!                                   │
//!                                   ├─ NodeRef / TokenRef cursors
//!                                   ├─ ast::* typed wrappers
//!                                   └─ equivalence checks
//! ```

pub mod ast;
mod equivalence;
mod node;
mod tree;

pub use ast::AstNode;
pub use equivalence::{
    are_equivalent, are_equivalent_exact, are_equivalent_ignoring_lambda_bodies,
    are_token_equivalent, is_member_body,
};
pub use node::{Descendants, ElementRef, NodeRef, TokenRef};
pub use tree::{Element, NodeId, SyntaxTree, TokenId};
