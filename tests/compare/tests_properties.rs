//! Structural properties of matches and edit scripts

use enc::SyntaxTree;
use enc::analysis::member_body;
use enc::compare::{BodyMatch, Edit, EditKind, EditScript, Match, MatchingDistance, TopSyntaxComparer, TreeComparer};
use enc::syntax::NodeRef;
use once_cell::sync::Lazy;
use rstest::rstest;

use crate::helpers::source_fixtures::*;

fn top_match<'t>(old: &'t SyntaxTree, new: &'t SyntaxTree) -> Match<'t, TopSyntaxComparer> {
    Match::new(TopSyntaxComparer::new(), old.root(), new.root())
}

fn try_first_method_body(tree: &SyntaxTree) -> Option<NodeRef<'_>> {
    tree.root()
        .descendants()
        .find_map(|n| member_body(n).filter(|_| n.kind().has_body()))
}

fn first_method_body(tree: &SyntaxTree) -> NodeRef<'_> {
    try_first_method_body(tree).expect("no member body")
}

fn assert_labels_agree<'t, C: TreeComparer<'t>>(m: &Match<'t, C>) {
    for (old, new) in m.matches() {
        assert_eq!(
            m.comparer().label(old),
            m.comparer().label(new),
            "matched {:?} with {:?}",
            old.kind(),
            new.kind()
        );
    }
}

/// An edit never comes after an edit on one of its ancestors in the same tree
fn assert_ancestor_first(script: &EditScript<'_>) {
    let edits = script.edits();
    for (i, earlier) in edits.iter().enumerate() {
        for later in &edits[i + 1..] {
            let is_delete = |e: &Edit<'_>| e.kind() == EditKind::Delete;
            let (a, b) = match (is_delete(earlier), is_delete(later)) {
                (false, false) => (earlier.new_node(), later.new_node()),
                (true, true) => (earlier.old_node(), later.old_node()),
                _ => continue,
            };
            if let (Some(a), Some(b)) = (a, b) {
                assert!(
                    !b.is_ancestor_of(a),
                    "edit {later:?} on an ancestor follows {earlier:?}"
                );
            }
        }
    }
}

static STATEMENTS_TREE: Lazy<SyntaxTree> = Lazy::new(|| SyntaxTree::parse(STATEMENTS));

const EDITS: &[(&str, &str)] = &[
    ("class C { int a; int b; }", "class C { int b; int a; }"),
    ("class C { void M() { } }", "class C { void M<T>() { } }"),
    ("class C { void M(int a) { } }", "class D { void M(int a, int b) { } class E { } }"),
    ("namespace N { class A { } class B { } }", "namespace N { class B { void M() { } } } class A { }"),
    ("enum E { A, B, C }", "enum E { C, A, D }"),
    ("class C { int P { get; set; } }", "class C { int P => 1; }"),
];

#[rstest]
#[case(EMPTY_CLASS)]
#[case(CLASS_WITH_MEMBERS)]
#[case(STATEMENTS)]
#[case(ITERATOR)]
#[case(LAMBDAS)]
fn test_identical_trees_have_identity_match(#[case] source: &str) {
    let old = SyntaxTree::parse(source);
    let new = SyntaxTree::parse(source);

    let top = top_match(&old, &new);
    assert!(top.edit_script().is_empty());
    for (o, n) in top.matches() {
        assert_eq!(o.range(), n.range());
    }
    let labeled = top.comparer().descendants(old.root()).len();
    assert_eq!(top.len(), labeled + 1);

    let (Some(old_body), Some(new_body)) = (try_first_method_body(&old), try_first_method_body(&new)) else {
        return;
    };
    let body = BodyMatch::compute(old_body, new_body, &[], MatchingDistance::MAX);
    for m in body.all_matches() {
        for (o, n) in m.matches() {
            assert_eq!(o.range(), n.range());
        }
    }
    assert!(body.edit_scripts().iter().all(|(_, script)| script.is_empty()));
}

#[test]
fn test_match_is_deterministic() {
    for (old, new) in EDITS {
        let old = SyntaxTree::parse(old);
        let new = SyntaxTree::parse(new);
        let first = top_match(&old, &new);
        let second = top_match(&old, &new);
        assert_eq!(first.matches(), second.matches());
        assert_eq!(first.edit_script().edits(), second.edit_script().edits());
    }
}

#[test]
fn test_body_match_is_deterministic() {
    let new = SyntaxTree::parse(&STATEMENTS.replace("sum += item;", "sum += item * 2; Log(item);"));
    let (old_body, new_body) = (first_method_body(&STATEMENTS_TREE), first_method_body(&new));
    let first = BodyMatch::compute(old_body, new_body, &[], MatchingDistance::MAX);
    let second = BodyMatch::compute(old_body, new_body, &[], MatchingDistance::MAX);
    let edits = |m: &BodyMatch<'_>| -> Vec<Vec<String>> {
        m.edit_scripts()
            .iter()
            .map(|(_, s)| s.iter().map(|e| format!("{e:?}")).collect())
            .collect()
    };
    assert_eq!(edits(&first), edits(&second));
}

#[test]
fn test_matched_labels_agree() {
    for (old, new) in EDITS {
        let old = SyntaxTree::parse(old);
        let new = SyntaxTree::parse(new);
        assert_labels_agree(&top_match(&old, &new));
    }

    let new = SyntaxTree::parse(&STATEMENTS.replace("lock (gate)", "using (gate)"));
    let body = BodyMatch::compute(first_method_body(&STATEMENTS_TREE), first_method_body(&new), &[], MatchingDistance::MAX);
    for m in body.all_matches() {
        assert_labels_agree(m);
    }
}

#[test]
fn test_edits_are_ancestor_first() {
    for (old, new) in EDITS {
        let old = SyntaxTree::parse(old);
        let new = SyntaxTree::parse(new);
        assert_ancestor_first(&top_match(&old, &new).edit_script());
    }

    let old = SyntaxTree::parse(LAMBDAS);
    let new = SyntaxTree::parse(
        "class C { void M(int a) { if (a > 0) { Run(() => { int b = a; return b; }); } Run(x => x); } }",
    );
    let body = BodyMatch::compute(first_method_body(&old), first_method_body(&new), &[], MatchingDistance::MAX);
    for (_, script) in body.edit_scripts() {
        assert_ancestor_first(&script);
    }
}
