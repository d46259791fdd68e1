//! Rude edit tables

use enc::analysis::{AnalyzerOptions, LineChange, RudeEditKind};
use rstest::rstest;

use crate::helpers::edit_test::EditTest;

use RudeEditKind as R;

// ============================================================================
// Declarations
// ============================================================================

#[rstest]
#[case("class C { void M() { } }", "class C { void N() { } }", vec![R::Renamed])]
#[case("class C { void M() { } }", "class C { static void M() { } }", vec![R::ModifiersUpdate])]
#[case("class C { int M() => 1; }", "class C { long M() => 1; }", vec![R::TypeUpdate])]
#[case("class C { }", "class C { virtual void M() { } }", vec![R::InsertVirtual])]
#[case("class C { }", "class C { void M() { } int P { get; set; } int f; }", vec![])]
#[case("class C { }", "class C { public static int operator -(C c) => 0; }", vec![R::InsertOperator])]
#[case("class C { const int X = 1; }", "class C { const int X = 2; }", vec![R::InitializerUpdate])]
#[case("class C { int x; }", "class C { const int x; }", vec![R::FieldKindUpdate])]
#[case("class C { int x; }", "class C { long x; }", vec![R::TypeUpdate])]
#[case("class C { int x, y; }", "class C { int x, z; }", vec![R::Renamed])]
#[case("class C { int P { get; set; } }", "class C { long P { get; set; } }", vec![R::TypeUpdate])]
#[case("class C { int P { get; set; } }", "class C { int P { set; get; } }", vec![])]
#[case("class C { int P { get { return 1; } } }", "class C { int P { get { return 2; } } }", vec![])]
#[case("class C<T> { int P { get { return 1; } } }", "class C<T> { int P { get { return 2; } } }", vec![R::GenericTypeUpdate])]
#[case("class C { C(int a) { } }", "class C { }", vec![R::Delete])]
#[case("class C { C() { } }", "class C { }", vec![])]
#[case("namespace N { }", "namespace M { }", vec![R::Renamed])]
#[case("class C { }", "interface C { }", vec![R::TypeKindUpdate])]
#[case("class C { void M(int a, int b) { } }", "class C { void M(int b, int a) { } }", vec![R::Move])]
#[case("class C { void M<T>() { } }", "class C { void M<T>() where T : class { } }", vec![R::Insert])]
#[case("delegate void D();", "delegate int D();", vec![R::TypeUpdate])]
fn test_declaration_rude_edits(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new)
        .with_options(AnalyzerOptions::syntactic())
        .assert_rude_edits(&expected);
}

// ============================================================================
// Attributes on parameters, accessors, enum members and type parameters
// ============================================================================

#[rstest]
#[case("class C { void M([A] int a) { } }", "class C { void M([B] int a) { } }", vec![R::Update])]
#[case("class C { void M(int a) { } }", "class C { void M([A] int a) { } }", vec![R::Update])]
#[case("class C { void M([A] int a) { } }", "class C { void M(int a) { } }", vec![R::Update])]
#[case("class C { void M([A] int a) { } }", "class C { void M([A] int b) { } }", vec![R::Renamed])]
fn test_parameter_attribute_update(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[rstest]
#[case("class C { int P { [A] get; set; } }", "class C { int P { [B] get; set; } }", vec![R::Update])]
#[case("class C { int P { get; [A] set; } }", "class C { int P { get; set; } }", vec![R::Update])]
#[case("class C { int P { [A] get; set; } }", "class C { int P { [A] get; private set; } }", vec![R::ModifiersUpdate])]
fn test_accessor_attribute_update(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[rstest]
#[case("enum E { [A] X }", "enum E { [B] X }", vec![R::Update])]
#[case("enum E { X }", "enum E { [A] X }", vec![R::Update])]
#[case("enum E { [A] X = 1 }", "enum E { [A] X = 2 }", vec![R::InitializerUpdate])]
fn test_enum_member_attribute_update(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[rstest]
#[case("class C<[A] T> { }", "class C<[B] T> { }", vec![R::Update])]
#[case("interface I<[A] T> { }", "interface I<[A] out T> { }", vec![R::VarianceUpdate])]
fn test_type_parameter_attribute_update(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[test]
fn test_attribute_update_names_the_declaration() {
    let test = EditTest::new("class C { void M([A] int a) { } }", "class C { void M([B] int a) { } }");
    let result = test.analyze();
    assert_eq!(result.rude_edits.len(), 1);
    assert!(result.rude_edits[0].message().contains("parameter"), "{}", result.rude_edits[0].message());
}

// ============================================================================
// Whitespace and comments
// ============================================================================

#[rstest]
#[case("class C { void M<T>() { F(); } }", "class C { void M<T>() {  F(); } }", vec![R::GenericMethodTriviaUpdate])]
#[case("class C { void M<T>() { F(); } }", "class C { void M<T>() {\n F(); } }", vec![R::GenericMethodTriviaUpdate])]
#[case("class C<T> { void M() { F(); } }", "class C<T> { void M() { /* c */ F(); } }", vec![R::GenericTypeTriviaUpdate])]
#[case("class C<T> { int P { get { return 1; } } }", "class C<T> { int P { get {  return 1; } } }", vec![R::GenericTypeTriviaUpdate])]
#[case("class C { void M() { F(); } }", "class C { void M() {  F(); } }", vec![])]
#[case("class C { void M<T>() { F(); } }", "\nclass C { void M<T>() { F(); } }", vec![])]
fn test_generic_method_trivia_update(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[test]
fn test_trivia_update_reported_at_changed_trivia() {
    let test = EditTest::new(
        "class C { void M<T>() { F(); G(); } }",
        "class C { void M<T>() { F(); /* note */ G(); } }",
    );
    test.assert_rude_edits(&[R::GenericMethodTriviaUpdate]);
    assert_eq!(test.first_rude_edit_text(), " /* note */ ");
}

#[test]
fn test_moved_member_becomes_a_line_change() {
    let test = EditTest::new(
        "class C<T> {\n  void M() {\n    F();\n  }\n}",
        "class C<T> {\n  // moved\n  void M() {\n    F();\n  }\n}",
    );
    let result = test.analyze();
    assert!(!result.has_rude_edits());
    assert!(result.has_changes());
    assert!(result.trivia.updated.is_empty());
    assert_eq!(result.trivia.line_changes, vec![LineChange { old_line: 1, new_line: 2 }]);
}

#[test]
fn test_trivia_is_not_analyzed_after_syntax_rude_edits() {
    let test = EditTest::new(
        "class C<T> { void M() { F(); } void N() { } }",
        "class C<T> { void M() {  F(); } void O() { } }",
    );
    test.assert_rude_edits(&[R::Renamed]);
    assert!(test.analyze().trivia.is_empty());
}

// ============================================================================
// Body constructs that cannot be remapped
// ============================================================================

#[rstest]
#[case(
    "class C { void M() { var s = stackalloc int[1]; F(1); } }",
    "class C { void M() { var s = stackalloc int[1]; F(2); } }",
    vec![R::StackAllocUpdate]
)]
#[case(
    "class C { void M() { var s = stackalloc int[1]; var t = stackalloc int[2]; F(1); } }",
    "class C { void M() { var s = stackalloc int[1]; var t = stackalloc int[2]; F(2); } }",
    vec![R::StackAllocUpdate]
)]
#[case(
    "class C { int M(int x) => x switch { 1 => 0, _ => 1 }; }",
    "class C { int M(int x) => x switch { 1 => 2, _ => 1 }; }",
    vec![R::SwitchExpressionUpdate]
)]
#[case(
    "class C { void M() { F(x switch { _ => 0 }); G(y switch { _ => 0 }); } }",
    "class C { void M() { F(x switch { _ => 1 }); G(y switch { _ => 0 }); } }",
    vec![R::SwitchExpressionUpdate, R::SwitchExpressionUpdate]
)]
#[case(
    "class C { void M() { F(() => { var s = stackalloc int[1]; }); G(1); } }",
    "class C { void M() { F(() => { var s = stackalloc int[1]; }); G(2); } }",
    vec![]
)]
#[case(
    "class C<T> { void M() { var s = stackalloc int[1]; F(1); } }",
    "class C<T> { void M() { var s = stackalloc int[1]; F(2); } }",
    vec![R::GenericTypeUpdate, R::StackAllocUpdate]
)]
#[case(
    "class C { int x = y switch { _ => 1 }; }",
    "class C { int x = y switch { _ => 2 }; }",
    vec![R::SwitchExpressionUpdate]
)]
#[case(
    "class C { void M() { var s = stackalloc int[1]; } }",
    "class C { void N() { var s = stackalloc int[1]; } }",
    vec![R::Renamed]
)]
fn test_body_construct_updates(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[test]
fn test_body_construct_reported_at_construct() {
    let test = EditTest::new(
        "class C { void M() { var s = stackalloc int[1]; F(1); } }",
        "class C { void M() { var s = stackalloc int[1]; F(2); } }",
    );
    assert_eq!(test.first_rude_edit_text(), "stackalloc int[1]");
}

// ============================================================================
// Lambdas and local functions
// ============================================================================

#[rstest]
#[case("F((int a) => a);", "F((long a) => a);", vec![R::ChangingLambdaParameters])]
#[case("F((int a) => a);", "F((int a, int b) => a);", vec![R::ChangingLambdaParameters])]
#[case("F((int a) => a);", "F((int b) => b);", vec![])]
#[case("int L() { return 1; }", "long L() { return 1; }", vec![R::ChangingLambdaReturnType])]
#[case("F(async () => await G());", "F(() => G());", vec![R::ChangingFromAsynchronousToSynchronous])]
#[case("F(() => { G(); });", "void L() { G(); } F(L);", vec![R::SwitchBetweenLambdaAndLocalFunction])]
#[case("F(x => x);", "F(x => x + 1);", vec![])]
#[case("void L() { } F();", "F(); void L() { }", vec![])]
fn test_lambda_rude_edits(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::body(old, new).assert_rude_edits(&expected);
}

#[rstest]
#[case("int x = 1; F(() => 1);", "int x = 1; F(() => x);", vec![R::CapturingVariable])]
#[case("int x = 1; F(() => x);", "int x = 1; F(() => 1);", vec![R::NotCapturingVariable])]
#[case("int x = 1; F(() => x);", "int x = 1; F(() => x + 1);", vec![])]
#[case("int x = 1; F(() => x);", "F(() => 1);", vec![R::DeletingCapturedVariable])]
fn test_capture_rude_edits(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::body(old, new).assert_rude_edits(&expected);
}

#[test]
fn test_capturing_parameter() {
    let test = EditTest::new(
        "class C { void M(int a) { F(() => 1); } }",
        "class C { void M(int a) { F(() => a); } }",
    );
    test.assert_rude_edits(&[R::CapturingVariable]);
    assert_eq!(test.first_rude_edit_text(), "a");
}

#[test]
fn test_capture_checks_can_be_disabled() {
    let options = AnalyzerOptions {
        report_lambda_capture_changes: false,
        ..AnalyzerOptions::default()
    };
    EditTest::body("int x = 1; F(() => 1);", "int x = 1; F(() => x);")
        .with_options(options)
        .assert_rude_edits(&[]);
}

// ============================================================================
// State machines
// ============================================================================

#[rstest]
#[case(
    "class C { async Task M() { await A(); await B(); } }",
    "class C { async Task M() { await A(); } }",
    vec![R::Delete]
)]
#[case(
    "class C { async Task M() { await A(); } }",
    "class C { async Task M() { await A(); await B(); } }",
    vec![R::Insert]
)]
#[case(
    "class C { async Task M() { G(await F()); } }",
    "class C { async Task M() { H(await F()); } }",
    vec![R::AwaitStatementUpdate]
)]
#[case(
    "class C { async Task M() { x = await F(); } }",
    "class C { async Task M() { y = await F(); } }",
    vec![]
)]
#[case(
    "class C { async Task M() { await F(); } }",
    "class C { Task M() { return F(); } }",
    vec![R::ChangingFromAsynchronousToSynchronous, R::Delete]
)]
#[case(
    "class C { IEnumerable<int> M() { yield return 1; } }",
    "class C { async IEnumerable<int> M() { await F(); yield return 1; } }",
    vec![R::ChangingStateMachineShape, R::Insert]
)]
fn test_state_machine_rude_edits(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<RudeEditKind>) {
    EditTest::new(old, new).assert_rude_edits(&expected);
}

#[test]
fn test_making_method_async_around_active_statement() {
    EditTest::new(
        "class C { void M() { <AS:1>F();</AS:1> } }",
        "class C { async void M() { await G(); <AS:1>F();</AS:1> } }",
    )
    .assert_rude_edits(&[R::UpdatingStateMachineMethodAroundActiveStatement, R::InsertAroundActiveStatement]);
}

#[test]
fn test_rude_edit_messages() {
    let test = EditTest::new("class C { }", "class C { virtual void M() { } }");
    let result = test.analyze();
    let message = result.rude_edits[0].message();
    assert!(message.contains("method"), "unexpected message: {message}");
}
