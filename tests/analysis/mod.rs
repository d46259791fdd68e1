//! Analysis layer tests
//!
//! End-to-end document analyses:
//! - Reference scenarios (body update, generic method, field reorder, foreach header)
//! - Rude edit tables for declarations, lambdas and state machines
//! - Active statement remapping and exception regions
//! - Breakpoint spans

pub mod tests_active_statements;
pub mod tests_breakpoints;
pub mod tests_rude_edits;
pub mod tests_scenarios;
