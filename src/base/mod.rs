//! Foundation types shared by every layer.
//!
//! - [`TextRange`], [`TextSize`] - source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//! - [`Span`] - a line/column range for reporting
//!
//! This module has NO dependencies on other enc modules.

mod line_index;

pub use line_index::{LineCol, LineIndex, Span};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
