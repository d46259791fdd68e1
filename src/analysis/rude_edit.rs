//! Rude edit kinds and diagnostics.
//!
//! A rude edit is a change that cannot be applied to a running process.
//! Every kind carries a message template with positional `{0}`, `{1}`
//! placeholders filled from the diagnostic's arguments.

use std::fmt;

use crate::base::TextRange;
use crate::parser::SyntaxKind;

/// Kinds of edits that prevent the debug session from continuing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RudeEditKind {
    // =========================================================================
    // Declarations
    // =========================================================================
    Insert,
    Delete,
    Update,
    Move,
    Renamed,
    ModifiersUpdate,
    TypeUpdate,
    TypeKindUpdate,
    BaseTypeOrInterfaceUpdate,
    EnumUnderlyingTypeUpdate,
    FieldKindUpdate,
    InitializerUpdate,
    VarianceUpdate,
    AccessorKindUpdate,
    GenericMethodUpdate,
    GenericTypeUpdate,
    GenericTypeInitializerUpdate,
    GenericMethodTriviaUpdate,
    GenericTypeTriviaUpdate,
    StackAllocUpdate,
    SwitchExpressionUpdate,
    MethodBodyAdd,
    MethodBodyDelete,
    InsertExtern,
    InsertVirtual,
    InsertIntoInterface,
    InsertOperator,
    InsertGenericMethod,
    InsertMethodWithExplicitInterfaceSpecifier,

    // =========================================================================
    // Lambdas and local functions
    // =========================================================================
    SwitchBetweenLambdaAndLocalFunction,
    ChangingLambdaParameters,
    ChangingLambdaReturnType,
    ChangingFromAsynchronousToSynchronous,
    CapturingVariable,
    NotCapturingVariable,
    DeletingCapturedVariable,

    // =========================================================================
    // Active statements
    // =========================================================================
    ActiveStatementUpdate,
    PartiallyExecutedActiveStatementUpdate,
    DeleteActiveStatement,
    PartiallyExecutedActiveStatementDelete,
    ActiveStatementLambdaRemoved,
    UpdateAroundActiveStatement,
    InsertAroundActiveStatement,
    DeleteAroundActiveStatement,

    // =========================================================================
    // State machines
    // =========================================================================
    AwaitStatementUpdate,
    UpdatingStateMachineMethodAroundActiveStatement,
    ChangingStateMachineShape,
}

impl RudeEditKind {
    /// Message template; `{n}` is replaced by the n-th argument
    pub fn message_template(&self) -> &'static str {
        match self {
            Self::Insert => "Adding '{0}' will prevent the debug session from continuing.",
            Self::Delete => "Deleting '{0}' will prevent the debug session from continuing.",
            Self::Update => "Updating '{0}' will prevent the debug session from continuing.",
            Self::Move => "Moving '{0}' will prevent the debug session from continuing.",
            Self::Renamed => "Renaming '{0}' will prevent the debug session from continuing.",
            Self::ModifiersUpdate => {
                "Updating the modifiers of '{0}' will prevent the debug session from continuing."
            }
            Self::TypeUpdate => "Updating the type of '{0}' will prevent the debug session from continuing.",
            Self::TypeKindUpdate => "Updating the kind of a type will prevent the debug session from continuing.",
            Self::BaseTypeOrInterfaceUpdate => {
                "Updating the base class and/or base interface(s) of '{0}' will prevent the debug session from continuing."
            }
            Self::EnumUnderlyingTypeUpdate => {
                "Updating the underlying type of '{0}' will prevent the debug session from continuing."
            }
            Self::FieldKindUpdate => "Updating the kind of '{0}' will prevent the debug session from continuing.",
            Self::InitializerUpdate => {
                "Updating the initializer of '{0}' will prevent the debug session from continuing."
            }
            Self::VarianceUpdate => {
                "Updating the variance of '{0}' will prevent the debug session from continuing."
            }
            Self::AccessorKindUpdate => {
                "Updating the kind of an property/event accessor will prevent the debug session from continuing."
            }
            Self::GenericMethodUpdate => {
                "Modifying a generic method will prevent the debug session from continuing."
            }
            Self::GenericTypeUpdate => {
                "Modifying a method inside the context of a generic type will prevent the debug session from continuing."
            }
            Self::GenericTypeInitializerUpdate => {
                "Modifying the initializer of '{0}' in a generic type will prevent the debug session from continuing."
            }
            Self::GenericMethodTriviaUpdate => {
                "Modifying whitespace or comments in a generic '{0}' will prevent the debug session from continuing."
            }
            Self::GenericTypeTriviaUpdate => {
                "Modifying whitespace or comments in '{0}' inside the context of a generic type will prevent the debug session from continuing."
            }
            Self::StackAllocUpdate => {
                "Modifying '{0}' which contains the 'stackalloc' operator will prevent the debug session from continuing."
            }
            Self::SwitchExpressionUpdate => {
                "Modifying '{0}' which contains a switch expression will prevent the debug session from continuing."
            }
            Self::MethodBodyAdd => "Adding a method body will prevent the debug session from continuing.",
            Self::MethodBodyDelete => "Deleting a method body will prevent the debug session from continuing.",
            Self::InsertExtern => "Adding an extern '{0}' will prevent the debug session from continuing.",
            Self::InsertVirtual => {
                "Adding an abstract '{0}' or overriding an inherited '{0}' will prevent the debug session from continuing."
            }
            Self::InsertIntoInterface => {
                "Adding '{0}' into an interface will prevent the debug session from continuing."
            }
            Self::InsertOperator => {
                "Adding a user defined '{0}' will prevent the debug session from continuing."
            }
            Self::InsertGenericMethod => {
                "Adding a generic '{0}' will prevent the debug session from continuing."
            }
            Self::InsertMethodWithExplicitInterfaceSpecifier => {
                "Adding a method with an explicit interface specifier will prevent the debug session from continuing."
            }
            Self::SwitchBetweenLambdaAndLocalFunction => {
                "Switching between a lambda and a local function will prevent the debug session from continuing."
            }
            Self::ChangingLambdaParameters => {
                "Changing parameters of '{0}' will prevent the debug session from continuing."
            }
            Self::ChangingLambdaReturnType => {
                "Changing the return type of '{0}' will prevent the debug session from continuing."
            }
            Self::ChangingFromAsynchronousToSynchronous => {
                "Changing '{0}' from asynchronous to synchronous will prevent the debug session from continuing."
            }
            Self::CapturingVariable => {
                "Capturing variable '{0}' that hasn't been captured before will prevent the debug session from continuing."
            }
            Self::NotCapturingVariable => {
                "Ceasing to capture variable '{0}' will prevent the debug session from continuing."
            }
            Self::DeletingCapturedVariable => {
                "Deleting captured variable '{0}' will prevent the debug session from continuing."
            }
            Self::ActiveStatementUpdate => {
                "Updating an active statement will prevent the debug session from continuing."
            }
            Self::PartiallyExecutedActiveStatementUpdate => {
                "Updating a complex statement containing an await expression will prevent the debug session from continuing."
            }
            Self::DeleteActiveStatement => {
                "An active statement has been removed from its original method. You must revert your changes to continue or restart the debugging session."
            }
            Self::PartiallyExecutedActiveStatementDelete => {
                "An actively executing statement has been deleted. You must revert your changes to continue or restart the debugging session."
            }
            Self::ActiveStatementLambdaRemoved => {
                "Removing '{0}' that contains an active statement will prevent the debug session from continuing."
            }
            Self::UpdateAroundActiveStatement => {
                "Updating a '{0}' around an active statement will prevent the debug session from continuing."
            }
            Self::InsertAroundActiveStatement => {
                "Adding a '{0}' around an active statement will prevent the debug session from continuing."
            }
            Self::DeleteAroundActiveStatement => {
                "Deleting a '{0}' around an active statement will prevent the debug session from continuing."
            }
            Self::AwaitStatementUpdate => {
                "Updating a complex statement containing an await expression will prevent the debug session from continuing."
            }
            Self::UpdatingStateMachineMethodAroundActiveStatement => {
                "Updating async or iterator modifier around an active statement will prevent the debug session from continuing."
            }
            Self::ChangingStateMachineShape => {
                "Changing '{0}' to '{1}' will prevent the debug session from continuing because it changes the shape of the state machine."
            }
        }
    }

    /// The edit concerns an active statement or its surroundings
    pub fn is_active_statement_edit(&self) -> bool {
        matches!(
            self,
            Self::ActiveStatementUpdate
                | Self::PartiallyExecutedActiveStatementUpdate
                | Self::DeleteActiveStatement
                | Self::PartiallyExecutedActiveStatementDelete
                | Self::ActiveStatementLambdaRemoved
                | Self::UpdateAroundActiveStatement
                | Self::InsertAroundActiveStatement
                | Self::DeleteAroundActiveStatement
                | Self::UpdatingStateMachineMethodAroundActiveStatement
        )
    }
}

impl fmt::Display for RudeEditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One reported rude edit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RudeEditDiagnostic {
    pub kind: RudeEditKind,
    /// Span in the new document, or the nearest surviving span for deletes
    pub span: TextRange,
    /// Kind of the node the edit was reported on, when there is one
    pub syntax_kind: Option<SyntaxKind>,
    pub arguments: Vec<String>,
}

impl RudeEditDiagnostic {
    pub fn new(kind: RudeEditKind, span: TextRange) -> Self {
        Self {
            kind,
            span,
            syntax_kind: None,
            arguments: Vec::new(),
        }
    }

    pub fn with_node(mut self, kind: SyntaxKind) -> Self {
        self.syntax_kind = Some(kind);
        self
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// The message with arguments substituted. Missing arguments are left
    /// as written.
    pub fn message(&self) -> String {
        let mut message = self.kind.message_template().to_string();
        for (i, argument) in self.arguments.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), argument);
        }
        message
    }
}

impl fmt::Display for RudeEditDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.span, self.message())
    }
}
