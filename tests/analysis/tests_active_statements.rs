//! Active statement remapping and the edits around them

use enc::analysis::{ActiveStatementFlags, RudeEditKind, StatementPart};
use rstest::rstest;

use crate::helpers::edit_test::EditTest;

use RudeEditKind as R;

// ============================================================================
// Updates and deletes of active statements
// ============================================================================

#[test]
fn test_leaf_statement_update_is_allowed() {
    let test = EditTest::body("<AS:0>F(1);</AS:0>", "<AS:0>F(2);</AS:0>");
    test.assert_rude_edits(&[]);
    test.assert_active_statements_remapped();
}

#[test]
fn test_non_leaf_statement_update() {
    let test = EditTest::body("<AS:1>F(1);</AS:1>", "<AS:1>F(2);</AS:1>");
    test.assert_rude_edits(&[R::ActiveStatementUpdate]);
    assert_eq!(test.first_rude_edit_text(), "F(2);");
}

#[test]
fn test_partially_executed_leaf_update() {
    let test = EditTest::body("<AS:0>F(1);</AS:0>", "<AS:0>F(2);</AS:0>")
        .with_flags(0, ActiveStatementFlags::LEAF.partially_executed());
    test.assert_rude_edits(&[R::PartiallyExecutedActiveStatementUpdate]);
}

#[rstest]
#[case(ActiveStatementFlags::NON_LEAF, vec![R::DeleteActiveStatement])]
#[case(ActiveStatementFlags::LEAF, vec![])]
#[case(ActiveStatementFlags::LEAF.partially_executed(), vec![R::PartiallyExecutedActiveStatementDelete])]
fn test_deleted_active_statement(#[case] flags: ActiveStatementFlags, #[case] expected: Vec<RudeEditKind>) {
    let test = EditTest::body("F(); <AS:1>G();</AS:1> H();", "F(); <AS:1>H();</AS:1>").with_flags(1, flags);
    test.assert_rude_edits(&expected);
    test.assert_active_statements_remapped();
}

#[test]
fn test_deleted_last_statement_maps_to_closing_brace() {
    let test = EditTest::body("F(); <AS:0>G();</AS:0>", "F();");
    let result = test.analyze();
    assert!(!result.has_rude_edits());
    let remap = &result.active_statements[0];
    assert_eq!(remap.statement_part, StatementPart::CloseBrace);
    assert_eq!(test.new.slice(remap.new_span.unwrap()), "}");
}

#[test]
fn test_active_statement_in_deleted_method() {
    let test = EditTest::new(
        "class C { void M() { <AS:1>F();</AS:1> } void N() { } }",
        "class C { void N() { } }",
    );
    let result = test.analyze();
    assert!(result.rude_edits.iter().any(|d| d.kind == R::DeleteActiveStatement));
    assert_eq!(result.active_statements[0].new_span, None);
}

#[test]
fn test_removed_lambda_containing_active_statement() {
    let test = EditTest::body("F(() => { <AS:1>G();</AS:1> });", "F(null);");
    let kinds = test.rude_edit_kinds();
    assert!(kinds.contains(&R::ActiveStatementLambdaRemoved), "got {kinds:?}");
}

#[test]
fn test_moved_active_statement_is_remapped() {
    let test = EditTest::body(
        "if (a) { <AS:0>F();</AS:0> } G();",
        "G(); if (a) { <AS:0>F();</AS:0> }",
    );
    test.assert_active_statements_remapped();
}

// ============================================================================
// Enclosing statements
// ============================================================================

#[rstest]
#[case("<AS:1>F();</AS:1>", "lock (o) { <AS:1>F();</AS:1> }", vec![R::InsertAroundActiveStatement])]
#[case("lock (o) { <AS:1>F();</AS:1> }", "<AS:1>F();</AS:1>", vec![R::DeleteAroundActiveStatement])]
#[case("lock (a) { <AS:1>F();</AS:1> }", "lock (b) { <AS:1>F();</AS:1> }", vec![R::UpdateAroundActiveStatement])]
#[case("lock (a) { <AS:1>F();</AS:1> }", "lock (a) { G(); <AS:1>F();</AS:1> }", vec![])]
#[case("using (r) { <AS:1>F();</AS:1> }", "using (s) { <AS:1>F();</AS:1> }", vec![R::UpdateAroundActiveStatement])]
#[case("while (a) { <AS:1>F();</AS:1> }", "while (b) { <AS:1>F();</AS:1> }", vec![])]
#[case("checked { <AS:1>F();</AS:1> }", "unchecked { <AS:1>F();</AS:1> }", vec![R::UpdateAroundActiveStatement])]
fn test_enclosing_statements(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    let test = EditTest::body(old, new);
    test.assert_rude_edits(&expected);
    test.assert_active_statements_remapped();
}

#[test]
fn test_switch_with_pattern_guard() {
    let test = EditTest::body(
        "switch (x) { case int i <AS:0>when i > 0</AS:0>: F(); break; }",
        "switch (y) { case int i <AS:0>when i > 0</AS:0>: F(); break; }",
    );
    test.assert_rude_edits(&[R::UpdateAroundActiveStatement]);
}

#[test]
fn test_switch_without_pattern_guard() {
    let test = EditTest::body(
        "switch (x) { case 1: <AS:0>F();</AS:0> break; }",
        "switch (y) { case 1: <AS:0>F();</AS:0> break; }",
    );
    test.assert_rude_edits(&[]);
}

// ============================================================================
// Exception regions
// ============================================================================

#[test]
fn test_catch_type_change_around_non_leaf() {
    let test = EditTest::body(
        "try { <AS:1>F();</AS:1> } catch (IOException e) { }",
        "try { <AS:1>F();</AS:1> } catch (Exception e) { }",
    );
    test.assert_rude_edits(&[R::UpdateAroundActiveStatement]);

    let result = test.analyze();
    let regions = &result.active_statements[0].exception_regions;
    assert_eq!(regions.len(), 1);
    assert_eq!(test.new.slice(regions[0]), "catch (Exception e) { }");
}

#[test]
fn test_catch_type_change_around_leaf() {
    let test = EditTest::body(
        "try { <AS:0>F();</AS:0> } catch (IOException e) { }",
        "try { <AS:0>F();</AS:0> } catch (Exception e) { }",
    );
    test.assert_rude_edits(&[]);
    assert!(test.analyze().active_statements[0].exception_regions.is_empty());
}

#[test]
fn test_active_statement_in_catch_block() {
    let test = EditTest::body(
        "try { } catch (IOException e) { <AS:0>F();</AS:0> }",
        "try { } catch (Exception e) { <AS:0>F();</AS:0> }",
    );
    test.assert_rude_edits(&[R::UpdateAroundActiveStatement]);
}

#[test]
fn test_finally_removed_around_non_leaf() {
    let test = EditTest::body("try { <AS:1>F();</AS:1> } finally { }", "<AS:1>F();</AS:1>");
    let kinds = test.rude_edit_kinds();
    assert!(kinds.contains(&R::DeleteAroundActiveStatement), "got {kinds:?}");
}
