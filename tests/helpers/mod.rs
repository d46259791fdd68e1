//! Shared test helpers

pub mod edit_test;
pub mod source_fixtures;
