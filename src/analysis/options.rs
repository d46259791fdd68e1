//! Analyzer options

use crate::compare::MatchingDistance;

/// Options controlling one document analysis
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Minimum length of a breakpoint span before an enclosing span is preferred
    pub min_breakpoint_span_length: u32,
    /// Report rude edits for variables that become (or stop being) captured by lambdas
    pub report_lambda_capture_changes: bool,
    /// Ask the [`SymbolLookup`](super::SymbolLookup) whether a deleted member
    /// still exists elsewhere before reporting its deletion
    pub defer_member_deletes_to_semantics: bool,
    /// Upper bound of the greedy matching passes
    pub max_match_distance: f64,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            min_breakpoint_span_length: 0,
            report_lambda_capture_changes: true,
            defer_member_deletes_to_semantics: true,
            max_match_distance: MatchingDistance::MAX,
        }
    }
}

impl AnalyzerOptions {
    /// Options that report every deletion syntactically
    pub fn syntactic() -> Self {
        Self {
            defer_member_deletes_to_semantics: false,
            ..Self::default()
        }
    }
}
