//! # enc-base
//!
//! Edit-and-continue analysis: matches two versions of a source file,
//! classifies the changes as applicable to a running process or "rude",
//! and remaps the statements suspended threads are executing.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! analysis  → Rude edit classification, active statements, breakpoints
//!   ↓
//! compare   → Labels, tree matching, edit scripts
//!   ↓
//! syntax    → Arena trees, typed wrappers, structural equivalence
//!   ↓
//! parser    → Logos lexer, recursive-descent parser for the reference language
//!   ↓
//! base      → Primitives (TextRange, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → compare → analysis)
// ============================================================================

/// Foundation types: TextRange, line/column conversion
pub mod base;

/// Parser: Logos lexer, recursive-descent parser producing rowan trees
pub mod parser;

/// Syntax: arena trees lowered from the parser output
pub mod syntax;

/// Tree matching and edit scripts
pub mod compare;

/// Edit classification, active statement remapping, breakpoint spans
pub mod analysis;

// Re-export the analysis entry points
pub use analysis::{
    ActiveStatement, ActiveStatementFlags, ActiveStatementRemap, AnalysisError, AnalyzerOptions,
    DocumentAnalysisResult, RudeEditDiagnostic, RudeEditKind, SymbolLookup, SyntacticSymbolLookup,
    analyze_document, analyze_documents, try_get_breakpoint_span, try_get_closest_breakpoint_span,
};

// Re-export foundation types
pub use base::{LineCol, LineIndex, Span, TextRange, TextSize};
pub use syntax::SyntaxTree;
