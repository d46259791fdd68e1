//! Labeling schemes for top-level and statement matching.
//!
//! A label groups node kinds that may be matched against each other. Nodes
//! with different labels are never matched. Labels are processed in ordinal
//! order, so every label tied to an ancestor must come after all labels its
//! ancestor can carry.

use crate::parser::SyntaxKind;

/// Common interface of the label enums
pub trait Label: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug + Send + Sync {
    /// Number of real labels (excluding `Ignored`)
    const COUNT: usize;

    fn ordinal(self) -> usize;

    /// How many labeled ancestors up the node's identity is tied to
    fn tied_to_ancestor(self) -> usize;

    fn is_ignored(self) -> bool;
}

/// Result of classifying one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<L> {
    pub label: L,
    /// Never descend into the node's children when enumerating
    pub is_leaf: bool,
}

impl<L> Classification<L> {
    fn node(label: L) -> Self {
        Self { label, is_leaf: false }
    }

    fn leaf(label: L) -> Self {
        Self { label, is_leaf: true }
    }
}

// ============================================================================
// Top-level labels
// ============================================================================

/// Labels of declarations outside member bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TopLabel {
    CompilationUnit,
    Namespace,
    UsingDirective,
    TypeDeclaration,
    EnumDeclaration,
    DelegateDeclaration,
    FieldDeclaration,
    FieldVariableDeclaration,
    FieldVariableDeclarator,
    MethodDeclaration,
    OperatorDeclaration,
    ConstructorDeclaration,
    DestructorDeclaration,
    PropertyDeclaration,
    EnumMemberDeclaration,
    AccessorList,
    AccessorDeclaration,
    TypeParameterList,
    TypeParameterConstraintClause,
    TypeParameter,
    ParameterList,
    Parameter,
    AttributeList,
    Attribute,
    Ignored,
}

impl Label for TopLabel {
    const COUNT: usize = TopLabel::Ignored as usize;

    fn ordinal(self) -> usize {
        self as usize
    }

    fn tied_to_ancestor(self) -> usize {
        match self {
            TopLabel::FieldVariableDeclaration
            | TopLabel::FieldVariableDeclarator
            | TopLabel::AccessorList
            | TopLabel::TypeParameterList
            | TopLabel::TypeParameterConstraintClause
            | TopLabel::ParameterList
            | TopLabel::AttributeList => 1,
            _ => 0,
        }
    }

    fn is_ignored(self) -> bool {
        self == TopLabel::Ignored
    }
}

impl TopLabel {
    /// Classify a node kind for top-level matching.
    /// Member bodies, types and expressions are ignored leaves.
    pub fn classify(kind: SyntaxKind) -> Classification<TopLabel> {
        use Classification as C;
        match kind {
            SyntaxKind::COMPILATION_UNIT => C::node(TopLabel::CompilationUnit),
            SyntaxKind::NAMESPACE_DECLARATION => C::node(TopLabel::Namespace),
            SyntaxKind::USING_DIRECTIVE => C::leaf(TopLabel::UsingDirective),
            SyntaxKind::CLASS_DECLARATION
            | SyntaxKind::STRUCT_DECLARATION
            | SyntaxKind::INTERFACE_DECLARATION => C::node(TopLabel::TypeDeclaration),
            SyntaxKind::ENUM_DECLARATION => C::node(TopLabel::EnumDeclaration),
            SyntaxKind::DELEGATE_DECLARATION => C::node(TopLabel::DelegateDeclaration),
            SyntaxKind::FIELD_DECLARATION => C::node(TopLabel::FieldDeclaration),
            SyntaxKind::VARIABLE_DECLARATION => C::node(TopLabel::FieldVariableDeclaration),
            SyntaxKind::VARIABLE_DECLARATOR => C::leaf(TopLabel::FieldVariableDeclarator),
            SyntaxKind::METHOD_DECLARATION => C::node(TopLabel::MethodDeclaration),
            SyntaxKind::OPERATOR_DECLARATION => C::node(TopLabel::OperatorDeclaration),
            SyntaxKind::CONSTRUCTOR_DECLARATION => C::node(TopLabel::ConstructorDeclaration),
            SyntaxKind::DESTRUCTOR_DECLARATION => C::node(TopLabel::DestructorDeclaration),
            SyntaxKind::PROPERTY_DECLARATION => C::node(TopLabel::PropertyDeclaration),
            SyntaxKind::ENUM_MEMBER_DECLARATION => C::leaf(TopLabel::EnumMemberDeclaration),
            SyntaxKind::ACCESSOR_LIST => C::node(TopLabel::AccessorList),
            SyntaxKind::GET_ACCESSOR_DECLARATION | SyntaxKind::SET_ACCESSOR_DECLARATION => {
                C::leaf(TopLabel::AccessorDeclaration)
            }
            SyntaxKind::TYPE_PARAMETER_LIST => C::node(TopLabel::TypeParameterList),
            SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE => {
                C::leaf(TopLabel::TypeParameterConstraintClause)
            }
            SyntaxKind::TYPE_PARAMETER => C::leaf(TopLabel::TypeParameter),
            SyntaxKind::PARAMETER_LIST => C::node(TopLabel::ParameterList),
            SyntaxKind::PARAMETER => C::leaf(TopLabel::Parameter),
            SyntaxKind::ATTRIBUTE_LIST => C::node(TopLabel::AttributeList),
            SyntaxKind::ATTRIBUTE => C::leaf(TopLabel::Attribute),
            _ => C::leaf(TopLabel::Ignored),
        }
    }
}

// ============================================================================
// Statement labels
// ============================================================================

/// Labels of statements and selected expressions inside member bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatementLabel {
    /// The body being matched
    Root,
    LocalFunction,
    Lambda,
    Block,
    CheckedStatement,

    TryStatement,
    CatchClause,
    CatchDeclaration,
    CatchFilterClause,
    FinallyClause,

    ForStatement,
    ForStatementPart,
    ForEachStatement,
    UsingStatement,
    LockStatement,
    WhileStatement,
    DoStatement,

    IfStatement,
    ElseClause,

    SwitchStatement,
    SwitchSection,
    CasePatternSwitchLabel,
    WhenClause,

    YieldStatement,
    BreakContinueStatement,
    EmptyStatement,
    ExpressionStatement,
    ReturnThrowStatement,

    LocalDeclarationStatement,
    LocalVariableDeclaration,
    LocalVariableDeclarator,
    AwaitExpression,

    Ignored,
}

impl Label for StatementLabel {
    const COUNT: usize = StatementLabel::Ignored as usize;

    fn ordinal(self) -> usize {
        self as usize
    }

    fn tied_to_ancestor(self) -> usize {
        match self {
            StatementLabel::CatchClause
            | StatementLabel::CatchDeclaration
            | StatementLabel::CatchFilterClause
            | StatementLabel::FinallyClause
            | StatementLabel::ForStatementPart
            | StatementLabel::ElseClause
            | StatementLabel::CasePatternSwitchLabel
            | StatementLabel::WhenClause
            | StatementLabel::YieldStatement
            | StatementLabel::BreakContinueStatement
            | StatementLabel::LocalVariableDeclaration
            | StatementLabel::LocalVariableDeclarator
            | StatementLabel::AwaitExpression => 1,
            _ => 0,
        }
    }

    fn is_ignored(self) -> bool {
        self == StatementLabel::Ignored
    }
}

impl StatementLabel {
    /// Classify a node kind for body matching. `parent` distinguishes the
    /// header expressions of `for` statements.
    pub fn classify(kind: SyntaxKind, parent: Option<SyntaxKind>) -> Classification<StatementLabel> {
        use Classification as C;

        if parent == Some(SyntaxKind::FOR_STATEMENT) && kind.is_expression() {
            return C::node(StatementLabel::ForStatementPart);
        }

        match kind {
            SyntaxKind::LOCAL_FUNCTION_STATEMENT => C::node(StatementLabel::LocalFunction),
            SyntaxKind::SIMPLE_LAMBDA_EXPRESSION | SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION => {
                C::node(StatementLabel::Lambda)
            }
            SyntaxKind::BLOCK => C::node(StatementLabel::Block),
            SyntaxKind::CHECKED_STATEMENT | SyntaxKind::UNCHECKED_STATEMENT => {
                C::node(StatementLabel::CheckedStatement)
            }

            SyntaxKind::TRY_STATEMENT => C::node(StatementLabel::TryStatement),
            SyntaxKind::CATCH_CLAUSE => C::node(StatementLabel::CatchClause),
            SyntaxKind::CATCH_DECLARATION => C::node(StatementLabel::CatchDeclaration),
            SyntaxKind::CATCH_FILTER_CLAUSE => C::node(StatementLabel::CatchFilterClause),
            SyntaxKind::FINALLY_CLAUSE => C::node(StatementLabel::FinallyClause),

            SyntaxKind::FOR_STATEMENT => C::node(StatementLabel::ForStatement),
            SyntaxKind::FOREACH_STATEMENT => C::node(StatementLabel::ForEachStatement),
            SyntaxKind::USING_STATEMENT => C::node(StatementLabel::UsingStatement),
            SyntaxKind::LOCK_STATEMENT => C::node(StatementLabel::LockStatement),
            SyntaxKind::WHILE_STATEMENT => C::node(StatementLabel::WhileStatement),
            SyntaxKind::DO_STATEMENT => C::node(StatementLabel::DoStatement),

            SyntaxKind::IF_STATEMENT => C::node(StatementLabel::IfStatement),
            SyntaxKind::ELSE_CLAUSE => C::node(StatementLabel::ElseClause),

            SyntaxKind::SWITCH_STATEMENT => C::node(StatementLabel::SwitchStatement),
            SyntaxKind::SWITCH_SECTION => C::node(StatementLabel::SwitchSection),
            SyntaxKind::CASE_PATTERN_SWITCH_LABEL => C::node(StatementLabel::CasePatternSwitchLabel),
            SyntaxKind::WHEN_CLAUSE => C::node(StatementLabel::WhenClause),

            SyntaxKind::YIELD_RETURN_STATEMENT | SyntaxKind::YIELD_BREAK_STATEMENT => {
                C::node(StatementLabel::YieldStatement)
            }
            SyntaxKind::BREAK_STATEMENT | SyntaxKind::CONTINUE_STATEMENT => {
                C::leaf(StatementLabel::BreakContinueStatement)
            }
            SyntaxKind::EMPTY_STATEMENT => C::leaf(StatementLabel::EmptyStatement),
            SyntaxKind::EXPRESSION_STATEMENT => C::node(StatementLabel::ExpressionStatement),
            SyntaxKind::RETURN_STATEMENT | SyntaxKind::THROW_STATEMENT => {
                C::node(StatementLabel::ReturnThrowStatement)
            }

            SyntaxKind::LOCAL_DECLARATION_STATEMENT => C::node(StatementLabel::LocalDeclarationStatement),
            SyntaxKind::VARIABLE_DECLARATION => C::node(StatementLabel::LocalVariableDeclaration),
            SyntaxKind::VARIABLE_DECLARATOR => C::node(StatementLabel::LocalVariableDeclarator),
            SyntaxKind::AWAIT_EXPRESSION => C::node(StatementLabel::AwaitExpression),

            // Can never contain a lambda, an await or a declaration
            SyntaxKind::LITERAL_EXPRESSION
            | SyntaxKind::NAME_EXPRESSION
            | SyntaxKind::THIS_EXPRESSION
            | SyntaxKind::BASE_EXPRESSION
            | SyntaxKind::TYPE
            | SyntaxKind::TYPE_ARGUMENT_LIST
            | SyntaxKind::PARAMETER_LIST
            | SyntaxKind::PARAMETER
            | SyntaxKind::TYPE_PARAMETER_LIST
            | SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE
            | SyntaxKind::DECLARATION_PATTERN
            | SyntaxKind::CASE_SWITCH_LABEL
            | SyntaxKind::DEFAULT_SWITCH_LABEL => C::leaf(StatementLabel::Ignored),

            _ => C::node(StatementLabel::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyntaxKind::METHOD_DECLARATION, TopLabel::MethodDeclaration, false)]
    #[case(SyntaxKind::PARAMETER, TopLabel::Parameter, true)]
    #[case(SyntaxKind::GET_ACCESSOR_DECLARATION, TopLabel::AccessorDeclaration, true)]
    #[case(SyntaxKind::BLOCK, TopLabel::Ignored, true)]
    #[case(SyntaxKind::ARROW_EXPRESSION_CLAUSE, TopLabel::Ignored, true)]
    #[case(SyntaxKind::STRUCT_DECLARATION, TopLabel::TypeDeclaration, false)]
    fn test_top_classification(#[case] kind: SyntaxKind, #[case] label: TopLabel, #[case] is_leaf: bool) {
        let c = TopLabel::classify(kind);
        assert_eq!(c.label, label);
        assert_eq!(c.is_leaf, is_leaf);
    }

    #[rstest]
    #[case(SyntaxKind::BLOCK, None, StatementLabel::Block, false)]
    #[case(SyntaxKind::BINARY_EXPRESSION, Some(SyntaxKind::FOR_STATEMENT), StatementLabel::ForStatementPart, false)]
    #[case(SyntaxKind::BINARY_EXPRESSION, Some(SyntaxKind::IF_STATEMENT), StatementLabel::Ignored, false)]
    #[case(SyntaxKind::LITERAL_EXPRESSION, None, StatementLabel::Ignored, true)]
    #[case(SyntaxKind::CASE_SWITCH_LABEL, None, StatementLabel::Ignored, true)]
    #[case(SyntaxKind::BREAK_STATEMENT, None, StatementLabel::BreakContinueStatement, true)]
    #[case(SyntaxKind::AWAIT_EXPRESSION, None, StatementLabel::AwaitExpression, false)]
    fn test_statement_classification(
        #[case] kind: SyntaxKind,
        #[case] parent: Option<SyntaxKind>,
        #[case] label: StatementLabel,
        #[case] is_leaf: bool,
    ) {
        let c = StatementLabel::classify(kind, parent);
        assert_eq!(c.label, label);
        assert_eq!(c.is_leaf, is_leaf);
    }

    /// The parent label of every tied label has a smaller ordinal
    #[rstest]
    #[case(StatementLabel::CatchClause, StatementLabel::TryStatement)]
    #[case(StatementLabel::CatchDeclaration, StatementLabel::CatchClause)]
    #[case(StatementLabel::CatchFilterClause, StatementLabel::CatchClause)]
    #[case(StatementLabel::FinallyClause, StatementLabel::TryStatement)]
    #[case(StatementLabel::ForStatementPart, StatementLabel::ForStatement)]
    #[case(StatementLabel::ElseClause, StatementLabel::IfStatement)]
    #[case(StatementLabel::CasePatternSwitchLabel, StatementLabel::SwitchSection)]
    #[case(StatementLabel::WhenClause, StatementLabel::CasePatternSwitchLabel)]
    #[case(StatementLabel::LocalVariableDeclaration, StatementLabel::LocalDeclarationStatement)]
    #[case(StatementLabel::LocalVariableDeclarator, StatementLabel::LocalVariableDeclaration)]
    #[case(StatementLabel::AwaitExpression, StatementLabel::ExpressionStatement)]
    fn test_tied_labels_follow_their_parents(#[case] tied: StatementLabel, #[case] parent: StatementLabel) {
        assert_eq!(tied.tied_to_ancestor(), 1);
        assert!(tied.ordinal() > parent.ordinal());
    }

    #[rstest]
    #[case(TopLabel::FieldVariableDeclaration, TopLabel::FieldDeclaration)]
    #[case(TopLabel::FieldVariableDeclarator, TopLabel::FieldVariableDeclaration)]
    #[case(TopLabel::AccessorList, TopLabel::PropertyDeclaration)]
    #[case(TopLabel::TypeParameterList, TopLabel::MethodDeclaration)]
    #[case(TopLabel::ParameterList, TopLabel::OperatorDeclaration)]
    #[case(TopLabel::AttributeList, TopLabel::EnumMemberDeclaration)]
    fn test_tied_top_labels_follow_their_parents(#[case] tied: TopLabel, #[case] parent: TopLabel) {
        assert_eq!(tied.tied_to_ancestor(), 1);
        assert!(tied.ordinal() > parent.ordinal());
    }
}
