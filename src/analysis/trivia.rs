//! Whitespace and comment changes of members without syntax edits.
//!
//! A member whose tokens all moved by the same number of lines keeps its
//! sequence points and only needs a line delta. Any other layout change (a
//! column shift, a line break added between two tokens) recompiles the
//! member, which is a rude edit for generic members and members of generic
//! types.

use tracing::trace;

use crate::base::TextRange;
use crate::compare::{EditKind, EditMap, TopMatch};
use crate::parser::SyntaxKind;
use crate::syntax::{NodeRef, TokenRef};

use super::body::member_body;
use super::classifier::{in_generic_type, report_body_shape};
use super::display::display_name;
use super::rude_edit::{RudeEditDiagnostic, RudeEditKind};

/// A member that moved from `old_line` to `new_line` with its layout intact.
/// Lines are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineChange {
    pub old_line: u32,
    pub new_line: u32,
}

/// Matched members with no syntax edit whose trivia changed
#[derive(Debug, Clone, Default)]
pub struct TriviaEdits<'t> {
    /// Old and new member whose layout changed; each is recompiled
    pub updated: Vec<(NodeRef<'t>, NodeRef<'t>)>,
    /// Sorted by old line
    pub line_changes: Vec<LineChange>,
}

impl TriviaEdits<'_> {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.line_changes.is_empty()
    }
}

enum Layout<'t> {
    Unchanged,
    Shifted(LineChange),
    /// First token whose position no longer follows the others
    Changed(TokenRef<'t>),
}

pub(crate) fn analyze_trivia<'t>(
    top_match: &TopMatch<'t>,
    edit_map: &EditMap,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
) -> TriviaEdits<'t> {
    let mut result = TriviaEdits::default();
    for (old, new) in top_match.matches() {
        // Updated and inserted members are recompiled anyway
        if edit_map.new_edit(new).is_some() {
            continue;
        }
        let (Some(old_tokens), Some(new_tokens)) = (active_tokens(old), active_tokens(new)) else {
            continue;
        };
        debug_assert_eq!(old_tokens.len(), new_tokens.len());
        match compare_layout(&old_tokens, &new_tokens) {
            Layout::Unchanged => {}
            Layout::Shifted(change) => result.line_changes.push(change),
            Layout::Changed(token) => {
                trace!(member = ?new, token = ?token, "member layout changed");
                report_trivia_update(new, token.leading_trivia(), diagnostics);
                result.updated.push((old, new));
            }
        }
    }
    result.line_changes.sort();
    result
}

/// Tokens of a member that carry sequence points
fn active_tokens<'t>(member: NodeRef<'t>) -> Option<Vec<TokenRef<'t>>> {
    let body = member_body(member)?;
    let tokens = match member.kind() {
        SyntaxKind::VARIABLE_DECLARATOR => member.descendant_tokens().collect(),
        SyntaxKind::CONSTRUCTOR_DECLARATION => member
            .child_node(SyntaxKind::CONSTRUCTOR_INITIALIZER)
            .into_iter()
            .flat_map(|initializer| initializer.descendant_tokens())
            .chain(body.descendant_tokens())
            .collect(),
        _ => body.descendant_tokens().collect(),
    };
    Some(tokens)
}

fn compare_layout<'t>(old: &[TokenRef<'t>], new: &[TokenRef<'t>]) -> Layout<'t> {
    let mut first: Option<(i64, LineChange)> = None;
    for (old_token, new_token) in old.iter().zip(new) {
        let old_position = old_token.line_col();
        let new_position = new_token.line_col();
        if old_position.col != new_position.col {
            return Layout::Changed(*new_token);
        }
        let delta = i64::from(new_position.line) - i64::from(old_position.line);
        match first {
            None => {
                let change = LineChange {
                    old_line: old_position.line,
                    new_line: new_position.line,
                };
                first = Some((delta, change));
            }
            Some((first_delta, _)) if first_delta != delta => return Layout::Changed(*new_token),
            Some(_) => {}
        }
    }
    match first {
        Some((delta, change)) if delta != 0 => Layout::Shifted(change),
        _ => Layout::Unchanged,
    }
}

fn report_trivia_update(member: NodeRef<'_>, span: TextRange, diagnostics: &mut Vec<RudeEditDiagnostic>) {
    let generic_method =
        member.kind() == SyntaxKind::METHOD_DECLARATION && member.child_node(SyntaxKind::TYPE_PARAMETER_LIST).is_some();
    let kind = if generic_method {
        Some(RudeEditKind::GenericMethodTriviaUpdate)
    } else if in_generic_type(member) {
        Some(RudeEditKind::GenericTypeTriviaUpdate)
    } else {
        None
    };
    if let Some(kind) = kind {
        diagnostics.push(
            RudeEditDiagnostic::new(kind, span)
                .with_node(member.kind())
                .with_argument(display_name(member, EditKind::Update)),
        );
    }
    report_body_shape(member, member, diagnostics);
}
