//! Matching and edit script tests
//!
//! Properties every match and edit script must satisfy, checked on
//! fixtures and small edits:
//! - determinism
//! - matched labels agree
//! - identical trees produce the identity match and no edits
//! - ancestor-first edit ordering

pub mod tests_edit_scripts;
pub mod tests_properties;
