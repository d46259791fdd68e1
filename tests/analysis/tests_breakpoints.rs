//! Breakpoint spans over whole documents

use enc::analysis::{try_get_breakpoint_span, try_get_closest_breakpoint_span};
use enc::parser::SyntaxKind;
use enc::{SyntaxTree, TextSize};
use rstest::rstest;

use crate::helpers::source_fixtures::*;

/// Parse `marked`, returning the tree and the offset of its `$$` marker
fn parse_marked(marked: &str) -> (SyntaxTree, TextSize) {
    let offset = marked.find("$$").expect("no $$ marker");
    let tree = SyntaxTree::parse(&marked.replacen("$$", "", 1));
    (tree, TextSize::new(offset as u32))
}

#[rstest]
#[case("class C { void M() { if ($$a) { F(); } } }", Some("if (a)"))]
#[case("class C { void M() { for (int i = 0; $$i < n; i++) { } } }", Some("i < n"))]
#[case("class C { void M() { F(() => { $$G(); }); } }", Some("G();"))]
#[case("class C { void M() { return $$x; } }", Some("return x;"))]
#[case("class C { void M() { yield return $$x; } }", Some("yield return x;"))]
#[case("class C { void M() { using ($$r) { } } }", Some("using (r)"))]
#[case("$$class C { }", None)]
#[case("using $$System;", None)]
fn test_breakpoint_at_marker(#[case] marked: &str, #[case] expected: Option<&str>) {
    let (tree, position) = parse_marked(marked);
    let span = try_get_breakpoint_span(&tree, position);
    assert_eq!(span.map(|s| tree.slice(s)), expected);
}

#[rstest]
#[case(STATEMENTS)]
#[case(ITERATOR)]
#[case(LAMBDAS)]
fn test_breakpoint_stays_inside_single_statement(#[case] source: &str) {
    let tree = SyntaxTree::parse(source);
    let statements = tree.root().descendants().filter(|n| {
        n.kind() == SyntaxKind::BLOCK && n.children().count() == 1 && n.children().all(|c| c.kind().is_statement())
    });
    for block in statements {
        let Some(statement) = block.children().next() else {
            continue;
        };
        // Statements whose body is itself a block report their header
        if statement.descendants().skip(1).any(|d| d.kind() == SyntaxKind::BLOCK) {
            continue;
        }
        let range = statement.range();
        for token in statement.descendant_tokens() {
            let Some(span) = try_get_breakpoint_span(&tree, token.range().start()) else {
                continue;
            };
            assert!(
                range.contains_range(span),
                "{:?} at {:?} escaped {:?}",
                tree.slice(span),
                token.text(),
                statement.text()
            );
        }
    }
}

#[test]
fn test_min_length_prefers_enclosing_span() {
    let (tree, position) = parse_marked("class C { void M() { F(x => $$x); } }");
    let inner = try_get_closest_breakpoint_span(&tree, position, 0).unwrap();
    assert_eq!(tree.slice(inner), "x");

    let outer = try_get_closest_breakpoint_span(&tree, position, 5).unwrap();
    assert_eq!(tree.slice(outer), "F(x => x);");
}

#[test]
fn test_min_length_falls_back_to_outermost_candidate() {
    let (tree, position) = parse_marked("class C { void M() { $$F(); } }");
    let span = try_get_closest_breakpoint_span(&tree, position, 1000).unwrap();
    assert!(tree.slice(span).len() < 1000);
}
