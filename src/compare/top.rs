//! Comparer for declarations outside member bodies.

use crate::parser::SyntaxKind;
use crate::syntax::{NodeRef, are_equivalent};

use super::comparer::TreeComparer;
use super::distance::{name_distance, value_distance};
use super::label::{Classification, Label, TopLabel};

/// Matches namespaces, types, members, parameters and attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct TopSyntaxComparer;

impl TopSyntaxComparer {
    pub fn new() -> Self {
        Self
    }
}

impl<'t> TreeComparer<'t> for TopSyntaxComparer {
    type Label = TopLabel;

    fn classify(&self, node: NodeRef<'t>) -> Classification<TopLabel> {
        TopLabel::classify(node.kind())
    }

    fn weighted_distance(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> Option<f64> {
        let old_name = declaration_name(old);
        let new_name = declaration_name(new);
        if old_name.is_none() && new_name.is_none() {
            return None;
        }
        let names = name_distance(old_name.as_deref(), new_name.as_deref());
        Some(0.9 * names + 0.1 * value_distance(old, new))
    }

    fn values_equal(&self, old: NodeRef<'t>, new: NodeRef<'t>) -> bool {
        are_equivalent(old, new, is_declaration_part)
    }
}

/// A labeled node whose ancestors are all labeled non-leaves. Labeled kinds
/// nested in bodies or initializers (lambda parameters, local declarations)
/// are part of the enclosing value, and so is everything under a leaf
/// (the attribute lists of a parameter).
fn is_declaration_part(node: NodeRef<'_>) -> bool {
    !TopLabel::classify(node.kind()).label.is_ignored()
        && node.ancestors().skip(1).all(|a| !TopLabel::classify(a.kind()).is_leaf)
}

/// Name of a declaration as written, qualified names joined with `.`
pub fn declaration_name(node: NodeRef<'_>) -> Option<String> {
    match node.kind() {
        SyntaxKind::NAMESPACE_DECLARATION | SyntaxKind::USING_DIRECTIVE | SyntaxKind::ATTRIBUTE => {
            let name: String = node
                .tokens()
                .skip_while(|t| t.kind() != SyntaxKind::IDENT)
                .take_while(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT))
                .map(|t| t.text())
                .collect();
            (!name.is_empty()).then_some(name)
        }
        SyntaxKind::OPERATOR_DECLARATION => {
            let mut tokens = node.tokens().skip_while(|t| t.kind() != SyntaxKind::OPERATOR_KW);
            tokens.next();
            tokens.next().map(|t| t.text().to_string())
        }
        SyntaxKind::CLASS_DECLARATION
        | SyntaxKind::STRUCT_DECLARATION
        | SyntaxKind::INTERFACE_DECLARATION
        | SyntaxKind::ENUM_DECLARATION
        | SyntaxKind::ENUM_MEMBER_DECLARATION
        | SyntaxKind::DELEGATE_DECLARATION
        | SyntaxKind::METHOD_DECLARATION
        | SyntaxKind::CONSTRUCTOR_DECLARATION
        | SyntaxKind::DESTRUCTOR_DECLARATION
        | SyntaxKind::PROPERTY_DECLARATION
        | SyntaxKind::GET_ACCESSOR_DECLARATION
        | SyntaxKind::SET_ACCESSOR_DECLARATION
        | SyntaxKind::VARIABLE_DECLARATOR
        | SyntaxKind::TYPE_PARAMETER
        | SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE
        | SyntaxKind::PARAMETER
        | SyntaxKind::LOCAL_FUNCTION_STATEMENT => node.identifier().map(|t| t.text().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;
    use rstest::rstest;

    fn find(tree: &SyntaxTree, kind: SyntaxKind) -> NodeRef<'_> {
        tree.root().descendants().find(|n| n.kind() == kind).unwrap()
    }

    #[rstest]
    #[case("namespace A.B { }", SyntaxKind::NAMESPACE_DECLARATION, "A.B")]
    #[case("using System.Text;", SyntaxKind::USING_DIRECTIVE, "System.Text")]
    #[case("class C { int operator +(C a, C b) => 1; }", SyntaxKind::OPERATOR_DECLARATION, "+")]
    #[case("class C { T I.M<T>() { } }", SyntaxKind::METHOD_DECLARATION, "M")]
    #[case("class C { [A.Obsolete] int F; }", SyntaxKind::ATTRIBUTE, "A.Obsolete")]
    #[case("class C { int P { get; } }", SyntaxKind::GET_ACCESSOR_DECLARATION, "get")]
    fn test_declaration_name(#[case] source: &str, #[case] kind: SyntaxKind, #[case] expected: &str) {
        let tree = SyntaxTree::parse(source);
        assert_eq!(declaration_name(find(&tree, kind)).as_deref(), Some(expected));
    }

    #[test]
    fn test_values_equal_ignores_members() {
        let old = SyntaxTree::parse("class C { void M() { } }");
        let new = SyntaxTree::parse("class C { void M() { } void N() { } }");
        let comparer = TopSyntaxComparer::new();
        let old_class = find(&old, SyntaxKind::CLASS_DECLARATION);
        let new_class = find(&new, SyntaxKind::CLASS_DECLARATION);
        assert!(comparer.values_equal(old_class, new_class));
    }

    #[test]
    fn test_values_equal_sees_body_changes() {
        let old = SyntaxTree::parse("class C { void M() { F(x => x); } }");
        let new = SyntaxTree::parse("class C { void M() { F(y => y); } }");
        let comparer = TopSyntaxComparer::new();
        let old_method = find(&old, SyntaxKind::METHOD_DECLARATION);
        let new_method = find(&new, SyntaxKind::METHOD_DECLARATION);
        assert!(!comparer.values_equal(old_method, new_method));
    }

    #[rstest]
    #[case("class C { void M([A] int a) { } }", "class C { void M([B] int a) { } }", SyntaxKind::PARAMETER)]
    #[case("class C { int P { [A] get; set; } }", "class C { int P { [B] get; set; } }", SyntaxKind::GET_ACCESSOR_DECLARATION)]
    #[case("enum E { [A] X }", "enum E { [B] X }", SyntaxKind::ENUM_MEMBER_DECLARATION)]
    #[case("class C<[A] T> { }", "class C<[B] T> { }", SyntaxKind::TYPE_PARAMETER)]
    fn test_values_equal_sees_attributes_under_leaves(
        #[case] old: &str,
        #[case] new: &str,
        #[case] kind: SyntaxKind,
    ) {
        let old = SyntaxTree::parse(old);
        let new = SyntaxTree::parse(new);
        let comparer = TopSyntaxComparer::new();
        assert!(!comparer.values_equal(find(&old, kind), find(&new, kind)));
    }

    #[test]
    fn test_values_equal_skips_attribute_lists_of_members() {
        let old = SyntaxTree::parse("class C { [A] void M() { } }");
        let new = SyntaxTree::parse("class C { [B] void M() { } }");
        let comparer = TopSyntaxComparer::new();
        let old_method = find(&old, SyntaxKind::METHOD_DECLARATION);
        let new_method = find(&new, SyntaxKind::METHOD_DECLARATION);
        assert!(comparer.values_equal(old_method, new_method));
    }

    #[test]
    fn test_renamed_method_is_closer_than_other_method() {
        let old = SyntaxTree::parse("class C { void Run(int a) { } }");
        let new = SyntaxTree::parse("class C { void Runs(int a) { } void Stop() { } }");
        let comparer = TopSyntaxComparer::new();
        let run = find(&old, SyntaxKind::METHOD_DECLARATION);
        let mut methods = new
            .root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::METHOD_DECLARATION);
        let runs = methods.next().unwrap();
        let stop = methods.next().unwrap();
        assert!(comparer.distance(run, runs) < comparer.distance(run, stop));
    }
}
