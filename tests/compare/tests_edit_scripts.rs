//! Edit scripts of small top-level and body edits

use enc::SyntaxTree;
use enc::compare::{BodyMatch, EditKind, Match, MatchingDistance, TopSyntaxComparer};
use enc::parser::SyntaxKind;
use enc::syntax::NodeRef;
use rstest::rstest;

fn top_edits(old: &str, new: &str) -> Vec<(EditKind, SyntaxKind)> {
    let old = SyntaxTree::parse(old);
    let new = SyntaxTree::parse(new);
    let m = Match::new(TopSyntaxComparer::new(), old.root(), new.root());
    m.edit_script().iter().map(|e| (e.kind(), e.node().kind())).collect()
}

fn first_block(tree: &SyntaxTree) -> NodeRef<'_> {
    tree.root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::BLOCK)
        .unwrap()
}

fn body_edits(old: &str, new: &str) -> Vec<(EditKind, SyntaxKind)> {
    let old = SyntaxTree::parse(&format!("class C {{ void M() {{ {old} }} }}"));
    let new = SyntaxTree::parse(&format!("class C {{ void M() {{ {new} }} }}"));
    let (old_body, new_body) = (first_block(&old), first_block(&new));
    let m = BodyMatch::compute(old_body, new_body, &[], MatchingDistance::MAX);
    m.root().edit_script().iter().map(|e| (e.kind(), e.node().kind())).collect()
}

#[rstest]
#[case(
    "class C { void M() { } }",
    "class C { void M<T>() { } }",
    vec![(EditKind::Insert, SyntaxKind::TYPE_PARAMETER_LIST), (EditKind::Insert, SyntaxKind::TYPE_PARAMETER)]
)]
#[case(
    "class C { }",
    "class C { void M() { } }",
    vec![(EditKind::Insert, SyntaxKind::METHOD_DECLARATION), (EditKind::Insert, SyntaxKind::PARAMETER_LIST)]
)]
#[case(
    "class C { void M() { } }",
    "class C { }",
    vec![(EditKind::Delete, SyntaxKind::METHOD_DECLARATION), (EditKind::Delete, SyntaxKind::PARAMETER_LIST)]
)]
#[case(
    "class C { void M() { } } class D { }",
    "class C { } class D { void M() { } }",
    vec![(EditKind::Move, SyntaxKind::METHOD_DECLARATION)]
)]
#[case("enum E { A }", "enum E { B }", vec![(EditKind::Update, SyntaxKind::ENUM_MEMBER_DECLARATION)])]
#[case(
    "class C { void M(int a) { } }",
    "class C { void M(long a) { } }",
    vec![(EditKind::Update, SyntaxKind::PARAMETER)]
)]
#[case(
    "class C { void M() { F(1); } }",
    "class C { void M() { F(2); } }",
    vec![(EditKind::Update, SyntaxKind::METHOD_DECLARATION)]
)]
fn test_top_level_edit_script(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<(EditKind, SyntaxKind)>) {
    assert_eq!(top_edits(old, new), expected);
}

#[test]
fn test_reordered_fields_yield_reorder() {
    let edits = top_edits("class C { int a; int b; }", "class C { int b; int a; }");
    assert_eq!(edits, vec![(EditKind::Reorder, SyntaxKind::FIELD_DECLARATION)]);
}

#[rstest]
#[case("return 1;", "return 2;", vec![(EditKind::Update, SyntaxKind::RETURN_STATEMENT)])]
#[case("F(); G();", "G(); F();", vec![(EditKind::Reorder, SyntaxKind::EXPRESSION_STATEMENT)])]
#[case("if (a) { F(); }", "if (a) { } F();", vec![(EditKind::Move, SyntaxKind::EXPRESSION_STATEMENT)])]
#[case("F();", "F(); G();", vec![(EditKind::Insert, SyntaxKind::EXPRESSION_STATEMENT)])]
#[case("F(); G();", "G();", vec![(EditKind::Delete, SyntaxKind::EXPRESSION_STATEMENT)])]
#[case("F(x => x);", "F(x => x + 1);", vec![])]
fn test_body_edit_script(#[case] old: &str, #[case] new: &str, #[case] expected: Vec<(EditKind, SyntaxKind)>) {
    assert_eq!(body_edits(old, new), expected);
}
