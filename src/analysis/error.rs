//! Errors returned to callers of the analyzer.
//!
//! Rude edits and unmappable active statements are results, not errors.
//! Only malformed input and cancellation end up here.

use thiserror::Error;

use crate::base::TextRange;

/// Errors that abort a document analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The cancellation token was signalled.
    #[error("analysis cancelled")]
    Cancelled,

    /// An active statement span does not lie within the old document.
    #[error("active statement span {span:?} is outside of the document (length {len})")]
    InvalidActiveStatementSpan { span: TextRange, len: u32 },

    /// An active statement span is not inside any member body.
    #[error("active statement span {span:?} is not inside a member body")]
    ActiveStatementOutsideMember { span: TextRange },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
