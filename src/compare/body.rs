//! Matching of member bodies including nested lambda bodies.

use crate::syntax::NodeRef;

use super::edit_script::EditScript;
use super::matching::Match;
use super::statement::StatementSyntaxComparer;

pub type StatementMatch<'t> = Match<'t, StatementSyntaxComparer<'t>>;

/// Statement match of one body plus the matches of the bodies of its
/// matched lambdas and local functions
#[derive(Debug, Clone)]
pub struct BodyMatch<'t> {
    root: StatementMatch<'t>,
    nested: Vec<NestedBodyMatch<'t>>,
}

/// Match of the bodies of two matched nested functions
#[derive(Debug, Clone)]
pub struct NestedBodyMatch<'t> {
    pub old_function: NodeRef<'t>,
    pub new_function: NodeRef<'t>,
    pub body: BodyMatch<'t>,
}

impl<'t> BodyMatch<'t> {
    /// Match `old_body` against `new_body`. Known matches are applied to the
    /// body that directly contains them.
    pub fn compute(
        old_body: NodeRef<'t>,
        new_body: NodeRef<'t>,
        known_matches: &[(NodeRef<'t>, NodeRef<'t>)],
        max_distance: f64,
    ) -> Self {
        let own: Vec<_> = known_matches
            .iter()
            .copied()
            .filter(|(old, new)| {
                directly_contains(old_body, *old) && directly_contains(new_body, *new)
            })
            .collect();

        let comparer = StatementSyntaxComparer::new(old_body, new_body);
        let root = Match::with_known_matches(comparer, old_body, new_body, &own, max_distance);

        let nested = root
            .matches()
            .into_iter()
            .filter(|(old, new)| old.kind().is_nested_function() && new.kind().is_nested_function())
            .filter_map(|(old, new)| {
                let old_inner = old.nested_function_body()?;
                let new_inner = new.nested_function_body()?;
                Some(NestedBodyMatch {
                    old_function: old,
                    new_function: new,
                    body: BodyMatch::compute(old_inner, new_inner, known_matches, max_distance),
                })
            })
            .collect();

        Self { root, nested }
    }

    pub fn root(&self) -> &StatementMatch<'t> {
        &self.root
    }

    pub fn nested(&self) -> &[NestedBodyMatch<'t>] {
        &self.nested
    }

    /// This body's match followed by the nested ones, outermost first
    pub fn all_matches(&self) -> Vec<&StatementMatch<'t>> {
        let mut result = vec![&self.root];
        for nested in &self.nested {
            result.extend(nested.body.all_matches());
        }
        result
    }

    /// The match whose old body directly contains `old`
    pub fn match_containing_old(&self, old: NodeRef<'t>) -> Option<&StatementMatch<'t>> {
        self.all_matches()
            .into_iter()
            .find(|m| directly_contains(m.old_root(), old))
    }

    /// The match whose new body directly contains `new`
    pub fn match_containing_new(&self, new: NodeRef<'t>) -> Option<&StatementMatch<'t>> {
        self.all_matches()
            .into_iter()
            .find(|m| directly_contains(m.new_root(), new))
    }

    pub fn partner_in_new(&self, old: NodeRef<'t>) -> Option<NodeRef<'t>> {
        self.all_matches().into_iter().find_map(|m| m.partner_in_new(old))
    }

    pub fn partner_in_old(&self, new: NodeRef<'t>) -> Option<NodeRef<'t>> {
        self.all_matches().into_iter().find_map(|m| m.partner_in_old(new))
    }

    /// Edit scripts of every match, outermost first
    pub fn edit_scripts(&self) -> Vec<(&StatementMatch<'t>, EditScript<'t>)> {
        self.all_matches()
            .into_iter()
            .map(|m| (m, m.edit_script()))
            .collect()
    }
}

/// `node` is `body` or lies in it without crossing a nested function
pub fn directly_contains(body: NodeRef<'_>, node: NodeRef<'_>) -> bool {
    if body.id() != node.id() && !body.is_ancestor_of(node) {
        return false;
    }
    !node
        .ancestors()
        .skip(1)
        .take_while(|a| a.id() != body.id())
        .any(|a| a.kind().is_nested_function())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::EditKind;
    use crate::compare::MatchingDistance;
    use crate::parser::SyntaxKind;
    use crate::syntax::SyntaxTree;

    fn body(tree: &SyntaxTree) -> NodeRef<'_> {
        tree.root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::METHOD_DECLARATION)
            .and_then(|m| m.child_node(SyntaxKind::BLOCK))
            .unwrap()
    }

    #[test]
    fn test_nested_lambda_bodies_are_matched() {
        let old = SyntaxTree::parse("class C { void M() { F(x => { G(x); }); } }");
        let new = SyntaxTree::parse("class C { void M() { F(x => { G(x); H(); }); } }");
        let m = BodyMatch::compute(body(&old), body(&new), &[], MatchingDistance::MAX);
        assert_eq!(m.nested().len(), 1);

        let scripts = m.edit_scripts();
        assert!(scripts[0].1.is_empty());
        let inner: Vec<_> = scripts[1].1.iter().map(|e| e.kind()).collect();
        assert_eq!(inner, vec![EditKind::Insert]);
    }

    #[test]
    fn test_partner_lookup_reaches_lambda_bodies() {
        let source = "class C { void M() { F(() => { return; }); } }";
        let old = SyntaxTree::parse(source);
        let new = SyntaxTree::parse(source);
        let m = BodyMatch::compute(body(&old), body(&new), &[], MatchingDistance::MAX);
        let ret = old
            .root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::RETURN_STATEMENT)
            .unwrap();
        let partner = m.partner_in_new(ret).unwrap();
        assert_eq!(partner.range(), ret.range());
        assert!(m.root().partner_in_new(ret).is_none());
    }

    #[test]
    fn test_directly_contains_stops_at_lambdas() {
        let tree = SyntaxTree::parse("class C { void M() { F(() => { return; }); } }");
        let root = body(&tree);
        let ret = tree
            .root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::RETURN_STATEMENT)
            .unwrap();
        assert!(!directly_contains(root, ret));
        assert!(directly_contains(root, root));
    }
}
