//! Parser error handling module
//!
//! - Categorized error codes for filtering and documentation
//! - Syntax errors with ranges and optional hints

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::SyntaxError;
