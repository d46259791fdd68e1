//! Edit classification and active statement remapping.
//!
//! ```text
//! analyzer ─→ classifier ─→ display (names, spans)
//!    │            └────────→ semantic (SymbolLookup)
//!    ├─→ state_machine (await / yield)
//!    ├─→ trivia (layout-only member changes)
//!    ├─→ active_statement ─→ exception_regions
//!    │          └──────────→ breakpoints
//!    └─→ body (member bodies, match context)
//! ```
//!
//! [`analyze_document`] is the entry point. The breakpoint locator is also
//! usable on its own.

mod active_statement;
mod analyzer;
mod body;
mod breakpoints;
mod classifier;
mod display;
mod error;
mod exception_regions;
mod options;
mod rude_edit;
mod semantic;
mod state_machine;
mod trivia;

pub use active_statement::{
    ActiveStatement, ActiveStatementFlags, ActiveStatementRemap, StatementPart,
    are_equivalent_active_statements, find_closest_active_span, find_statement_and_part,
};
pub use analyzer::{
    DocumentAnalysisResult, DocumentPair, MemberBodyEdits, analyze_document, analyze_documents,
};
pub use body::{is_body_root, member_body, owning_member};
pub use breakpoints::{try_get_breakpoint_span, try_get_closest_breakpoint_span};
pub use display::{deleted_node_span, diagnostic_span, display_name, try_display_name};
pub use error::{AnalysisError, Result};
pub use exception_regions::{are_equivalent_regions, exception_region_ancestors, region_span, region_spans};
pub use options::AnalyzerOptions;
pub use rude_edit::{RudeEditDiagnostic, RudeEditKind};
pub use semantic::{CapturedVariable, SymbolLookup, SyntacticSymbolLookup};
pub use state_machine::{StateMachineKind, state_machine_kind, suspension_points};
pub use trivia::{LineChange, TriviaEdits};
