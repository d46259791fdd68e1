//! Reference scenarios of the analyzer

use enc::analysis::RudeEditKind;
use enc::compare::{Edit, EditKind};
use enc::parser::SyntaxKind;

use crate::helpers::edit_test::EditTest;

#[test]
fn test_body_only_change_is_not_rude() {
    let test = EditTest::new(
        "class C { int M() { return 1; } }",
        "class C { int M() { return 2; } }",
    );
    let result = test.analyze();

    assert!(!result.has_rude_edits());
    let top: Vec<_> = result.edits.iter().map(|e| (e.kind(), e.node().kind())).collect();
    assert_eq!(top, vec![(EditKind::Update, SyntaxKind::METHOD_DECLARATION)]);

    assert_eq!(result.body_edits.len(), 1);
    let body = &result.body_edits[0];
    assert_eq!(body.scripts.len(), 1);
    let edits = body.scripts[0].edits();
    assert_eq!(edits.len(), 1);
    let Edit::Update { old, new } = edits[0] else {
        panic!("expected an update, got {:?}", edits[0]);
    };
    assert_eq!(old.kind(), SyntaxKind::RETURN_STATEMENT);
    assert_eq!(old.text(), "return 1;");
    assert_eq!(new.text(), "return 2;");
}

#[test]
fn test_adding_type_parameters_to_method() {
    let test = EditTest::new("class C { void M() {} }", "class C { void M<T>() {} }");
    test.assert_rude_edits(&[RudeEditKind::GenericMethodUpdate]);
    assert_eq!(test.first_rude_edit_text(), "<T>");
}

#[test]
fn test_reordering_fields() {
    let test = EditTest::new("class C { int a; int b; }", "class C { int b; int a; }");
    let result = test.analyze();
    assert!(result.edits.iter().any(|e| e.kind() == EditKind::Reorder));
    assert!(result.rude_edits.iter().any(|d| d.kind == RudeEditKind::Move));
}

#[test]
fn test_foreach_expression_change_around_active_statement() {
    let test = EditTest::body(
        "foreach (var x in xs) { <AS:1>F(x);</AS:1> }",
        "foreach (var x in ys) { <AS:1>F(x);</AS:1> }",
    );
    test.assert_active_statements_remapped();
    test.assert_rude_edits(&[RudeEditKind::UpdateAroundActiveStatement]);
    assert_eq!(test.first_rude_edit_text(), "foreach (var x in ys)");
}

#[test]
fn test_no_op_edit_produces_nothing() {
    let source = "class C { void M() { <AS:0>F();</AS:0> } }";
    let test = EditTest::new(source, source);
    let result = test.analyze();
    assert!(result.edits.is_empty());
    assert!(result.rude_edits.is_empty());
    assert!(result.body_edits.iter().all(|b| b.is_empty()));
    test.assert_active_statements_remapped();
}
