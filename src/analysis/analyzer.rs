//! Document analysis driver.
//!
//! ```text
//! old/new SyntaxTree ─→ TopMatch ─→ EditScript ─→ TopEditClassifier ─┐
//!                                                                    ├─→ DocumentAnalysisResult
//! active statements ─→ owning members ─→ BodyMatch per member ───────┘
//!                                         (suspension points, lambdas,
//!                                          remapping, exception regions)
//! ```

use indexmap::IndexMap;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::base::TextRange;
use crate::compare::{BodyMatch, EditKind, EditScript, Match, NestedBodyMatch, TopMatch, TopSyntaxComparer};
use crate::syntax::{NodeRef, SyntaxTree};

use super::active_statement::{
    ActiveStatement, ActiveStatementRemap, LocatedStatement, StatementPart, find_statement_and_part,
    remap_body_statements,
};
use super::body::{BodyContext, member_body, owning_member};
use super::classifier::{TopEditClassifier, classify_body_edits, report_switch_pattern_changes};
use super::display::{deleted_node_span, diagnostic_span};
use super::error::{AnalysisError, Result};
use super::options::AnalyzerOptions;
use super::rude_edit::{RudeEditDiagnostic, RudeEditKind};
use super::semantic::SymbolLookup;
use super::state_machine::{match_suspension_points, report_changes as report_state_machine_changes};
use super::trivia::{TriviaEdits, analyze_trivia};

/// Edits of one matched member body: the body itself first, then the
/// bodies of its lambdas and local functions
#[derive(Debug, Clone)]
pub struct MemberBodyEdits<'t> {
    pub old_member: NodeRef<'t>,
    pub new_member: NodeRef<'t>,
    pub scripts: Vec<EditScript<'t>>,
}

impl MemberBodyEdits<'_> {
    pub fn is_empty(&self) -> bool {
        self.scripts.iter().all(|s| s.is_empty())
    }
}

/// Outcome of analyzing one old/new document pair
#[derive(Debug, Clone)]
pub struct DocumentAnalysisResult<'t> {
    /// Top-level edits of declarations
    pub edits: EditScript<'t>,
    pub rude_edits: Vec<RudeEditDiagnostic>,
    /// One entry per input active statement, in ordinal order
    pub active_statements: Vec<ActiveStatementRemap>,
    pub body_edits: Vec<MemberBodyEdits<'t>>,
    /// Layout-only changes; empty when the document has syntax rude edits
    pub trivia: TriviaEdits<'t>,
}

impl DocumentAnalysisResult<'_> {
    pub fn has_rude_edits(&self) -> bool {
        !self.rude_edits.is_empty()
    }

    /// Some declaration, body or member layout changed
    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty() || self.body_edits.iter().any(|b| !b.is_empty()) || !self.trivia.is_empty()
    }
}

/// Input of one document analysis in a batch
#[derive(Debug, Clone, Copy)]
pub struct DocumentPair<'t> {
    pub old: &'t SyntaxTree,
    pub new: &'t SyntaxTree,
    pub active_statements: &'t [ActiveStatement],
}

fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(AnalysisError::Cancelled)
    } else {
        Ok(())
    }
}

/// Analyze documents in parallel. Results are in input order.
pub fn analyze_documents<'t>(
    documents: &[DocumentPair<'t>],
    options: &AnalyzerOptions,
    symbols: &dyn SymbolLookup,
    cancel: &CancellationToken,
) -> Vec<Result<DocumentAnalysisResult<'t>>> {
    documents
        .par_iter()
        .map(|doc| analyze_document(doc.old, doc.new, doc.active_statements, options, symbols, cancel))
        .collect()
}

/// Compare two versions of a document, classify the edits and remap the
/// active statements of the old version into the new one
pub fn analyze_document<'t>(
    old: &'t SyntaxTree,
    new: &'t SyntaxTree,
    active_statements: &[ActiveStatement],
    options: &AnalyzerOptions,
    symbols: &dyn SymbolLookup,
    cancel: &CancellationToken,
) -> Result<DocumentAnalysisResult<'t>> {
    check_cancelled(cancel)?;
    let located = locate_active_statements(old, active_statements)?;

    let top_match: TopMatch<'t> = Match::with_known_matches(
        TopSyntaxComparer::new(),
        old.root(),
        new.root(),
        &[],
        options.max_match_distance,
    );
    let edits = top_match.edit_script();
    debug!(
        matches = top_match.len(),
        edits = edits.len(),
        active_statements = active_statements.len(),
        "top-level match computed"
    );

    let mut classifier = TopEditClassifier::new(&top_match, &edits, options, symbols);
    for edit in &edits {
        check_cancelled(cancel)?;
        classifier.classify(edit);
    }
    let mut rude_edits = std::mem::take(&mut classifier.diagnostics);
    let edit_map = classifier.edit_map;

    // Members whose bodies need a statement match, in a stable order
    let mut members: IndexMap<NodeRef<'t>, Vec<LocatedStatement<'t>>> = IndexMap::new();
    for edit in &edits {
        if edit.kind() == EditKind::Update {
            if let Some(old_member) = edit.old_node() {
                if member_body(old_member).is_some() || edit.new_node().and_then(member_body).is_some() {
                    members.entry(old_member).or_default();
                }
            }
        }
    }
    for (member, statement) in located {
        members.entry(member).or_default().push(statement);
    }

    let mut remaps = Vec::with_capacity(active_statements.len());
    let mut body_edits = Vec::new();
    for (old_member, statements) in &members {
        check_cancelled(cancel)?;
        let Some(new_member) = top_match.partner_in_new(*old_member) else {
            let span = deleted_node_span(*old_member, |n| top_match.partner_in_new(n));
            report_lost_statements(statements, span, &mut rude_edits, &mut remaps);
            continue;
        };
        let (Some(old_body), Some(new_body)) = (member_body(*old_member), member_body(new_member)) else {
            let span = diagnostic_span(new_member, EditKind::Update);
            report_lost_statements(statements, span, &mut rude_edits, &mut remaps);
            continue;
        };

        let has_active_statements = !statements.is_empty();
        let points = match_suspension_points(old_body, new_body, has_active_statements);
        let body_match = BodyMatch::compute(old_body, new_body, &points.known, options.max_match_distance);
        check_nested_bodies(body_match.nested(), cancel)?;

        let ctx = BodyContext {
            old_member: *old_member,
            new_member,
            body_match: &body_match,
        };
        let before = rude_edits.len();
        report_state_machine_changes(&ctx, &points, has_active_statements, &mut rude_edits);
        classify_body_edits(&ctx, options, symbols, &mut rude_edits);
        report_switch_pattern_changes(&ctx, statements, &mut rude_edits);
        remaps.extend(remap_body_statements(&ctx, statements, &mut rude_edits));

        let scripts: Vec<_> = body_match
            .edit_scripts()
            .into_iter()
            .map(|(_, script)| script)
            .collect();
        debug!(
            member = ?old_member,
            edits = scripts.iter().map(|s| s.len()).sum::<usize>(),
            active_statements = statements.len(),
            rude_edits = rude_edits.len() - before,
            "member body analyzed"
        );
        body_edits.push(MemberBodyEdits {
            old_member: *old_member,
            new_member,
            scripts,
        });
    }

    remaps.sort_by_key(|r| r.ordinal);

    // Layout changes only matter once the syntax edits are applicable
    let trivia = if rude_edits.is_empty() {
        check_cancelled(cancel)?;
        analyze_trivia(&top_match, &edit_map, &mut rude_edits)
    } else {
        TriviaEdits::default()
    };
    debug!(
        rude_edits = rude_edits.len(),
        bodies = body_edits.len(),
        trivia_updates = trivia.updated.len(),
        line_changes = trivia.line_changes.len(),
        "document analyzed"
    );
    Ok(DocumentAnalysisResult {
        edits,
        rude_edits,
        active_statements: remaps,
        body_edits,
        trivia,
    })
}

fn check_nested_bodies(nested: &[NestedBodyMatch<'_>], cancel: &CancellationToken) -> Result<()> {
    for n in nested {
        check_cancelled(cancel)?;
        trace!(
            function = ?n.old_function,
            matches = n.body.root().len(),
            "nested body matched"
        );
        check_nested_bodies(n.body.nested(), cancel)?;
    }
    Ok(())
}

/// Active statements of a member that was deleted or lost its body
fn report_lost_statements(
    statements: &[LocatedStatement<'_>],
    span: TextRange,
    diagnostics: &mut Vec<RudeEditDiagnostic>,
    remaps: &mut Vec<ActiveStatementRemap>,
) {
    for statement in statements {
        diagnostics.push(RudeEditDiagnostic::new(RudeEditKind::DeleteActiveStatement, span).with_node(statement.node.kind()));
        remaps.push(ActiveStatementRemap {
            ordinal: statement.ordinal,
            new_span: None,
            statement_part: statement.part,
            exception_regions: Vec::new(),
        });
    }
}

/// Resolve each active span to its statement and owning member
fn locate_active_statements<'t>(
    tree: &'t SyntaxTree,
    active_statements: &[ActiveStatement],
) -> Result<Vec<(NodeRef<'t>, LocatedStatement<'t>)>> {
    let len = tree.text().len() as u32;
    active_statements
        .iter()
        .map(|active| {
            let span = active.old_span;
            if u32::from(span.end()) > len {
                return Err(AnalysisError::InvalidActiveStatementSpan { span, len });
            }
            let (node, found_part) =
                find_statement_and_part(tree, span).ok_or(AnalysisError::ActiveStatementOutsideMember { span })?;
            let member = owning_member(node).ok_or(AnalysisError::ActiveStatementOutsideMember { span })?;
            trace!(ordinal = active.ordinal, statement = ?node, "active statement located");
            let part = match active.statement_part {
                Some(part) if part != StatementPart::Default => part,
                _ => found_part,
            };
            Ok((
                member,
                LocatedStatement {
                    ordinal: active.ordinal,
                    flags: active.flags,
                    node,
                    part,
                },
            ))
        })
        .collect()
}
