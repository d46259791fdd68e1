//! Tree matching and edit scripts.
//!
//! ```text
//! old tree ─┐
//!           ├─ Match (labels, LCS seeding, greedy passes) ─→ EditScript
//! new tree ─┘
//! ```
//!
//! Two labeling schemes exist: [`TopSyntaxComparer`] for declarations and
//! [`StatementSyntaxComparer`] for the statements of one body. Bodies of
//! lambdas and local functions are matched separately, see [`BodyMatch`].

mod body;
mod comparer;
mod distance;
mod edit_script;
mod label;
pub mod lcs;
mod matching;
mod statement;
mod top;

pub use body::{BodyMatch, NestedBodyMatch, StatementMatch, directly_contains};
pub use comparer::TreeComparer;
pub use distance::MatchingDistance;
pub use edit_script::{Edit, EditKind, EditMap, EditScript};
pub use label::{Classification, Label, StatementLabel, TopLabel};
pub use lcs::SequenceEdit;
pub use matching::Match;
pub use statement::StatementSyntaxComparer;
pub use top::{TopSyntaxComparer, declaration_name};

/// Top-level match of two compilation units
pub type TopMatch<'t> = Match<'t, TopSyntaxComparer>;
