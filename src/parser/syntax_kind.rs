//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! of the C#-like language understood by the reference front end.

/// All syntax kinds (tokens and nodes)
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,       // identifier
    INT_NUMBER,  // 42
    REAL_NUMBER, // 3.14
    STRING,      // "hello"
    CHAR,        // 'c'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COLON,       // :
    DOT,         // .
    COMMA,       // ,
    EQ,          // =
    EQ_EQ,       // ==
    BANG_EQ,     // !=
    LT,          // <
    GT,          // >
    LT_EQ,       // <=
    GT_EQ,       // >=
    FAT_ARROW,   // =>
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    SLASH,       // /
    PERCENT,     // %
    PLUS_EQ,     // +=
    MINUS_EQ,    // -=
    STAR_EQ,     // *=
    SLASH_EQ,    // /=
    PLUS_PLUS,   // ++
    MINUS_MINUS, // --
    BANG,        // !
    TILDE,       // ~
    AMP,         // &
    PIPE,        // |
    CARET,       // ^
    AMP_AMP,     // &&
    PIPE_PIPE,   // ||
    QUESTION,    // ?
    QUESTION_QUESTION, // ??

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    // Declarations
    NAMESPACE_KW,
    USING_KW,
    CLASS_KW,
    STRUCT_KW,
    INTERFACE_KW,
    ENUM_KW,
    DELEGATE_KW,
    OPERATOR_KW,
    WHERE_KW,

    // Modifiers
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    VIRTUAL_KW,
    ABSTRACT_KW,
    OVERRIDE_KW,
    SEALED_KW,
    EXTERN_KW,
    CONST_KW,
    READONLY_KW,
    ASYNC_KW,
    NEW_KW,
    PARTIAL_KW,
    REF_KW,
    OUT_KW,
    IN_KW,
    PARAMS_KW,

    // Statements
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    DO_KW,
    FOR_KW,
    FOREACH_KW,
    RETURN_KW,
    THROW_KW,
    TRY_KW,
    CATCH_KW,
    FINALLY_KW,
    SWITCH_KW,
    CASE_KW,
    DEFAULT_KW,
    WHEN_KW,
    BREAK_KW,
    CONTINUE_KW,
    YIELD_KW,
    LOCK_KW,
    CHECKED_KW,
    UNCHECKED_KW,

    // Expressions
    AWAIT_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    STACKALLOC_KW,
    THIS_KW,
    BASE_KW,

    // =========================================================================
    // NODES - Declarations
    // =========================================================================
    COMPILATION_UNIT,
    USING_DIRECTIVE,
    NAMESPACE_DECLARATION,
    CLASS_DECLARATION,
    STRUCT_DECLARATION,
    INTERFACE_DECLARATION,
    ENUM_DECLARATION,
    ENUM_MEMBER_DECLARATION,
    DELEGATE_DECLARATION,
    BASE_LIST,
    FIELD_DECLARATION,
    METHOD_DECLARATION,
    OPERATOR_DECLARATION,
    CONSTRUCTOR_DECLARATION,
    CONSTRUCTOR_INITIALIZER,
    DESTRUCTOR_DECLARATION,
    PROPERTY_DECLARATION,
    ACCESSOR_LIST,
    GET_ACCESSOR_DECLARATION,
    SET_ACCESSOR_DECLARATION,
    EXPLICIT_INTERFACE_SPECIFIER,
    ARROW_EXPRESSION_CLAUSE,
    EQUALS_VALUE_CLAUSE,
    PARAMETER_LIST,
    PARAMETER,
    TYPE_PARAMETER_LIST,
    TYPE_PARAMETER,
    TYPE_PARAMETER_CONSTRAINT_CLAUSE,
    ATTRIBUTE_LIST,
    ATTRIBUTE,
    TYPE,
    TYPE_ARGUMENT_LIST,
    VARIABLE_DECLARATION,
    VARIABLE_DECLARATOR,

    // =========================================================================
    // NODES - Statements
    // =========================================================================
    BLOCK,
    LOCAL_DECLARATION_STATEMENT,
    LOCAL_FUNCTION_STATEMENT,
    EXPRESSION_STATEMENT,
    EMPTY_STATEMENT,
    RETURN_STATEMENT,
    THROW_STATEMENT,
    IF_STATEMENT,
    ELSE_CLAUSE,
    WHILE_STATEMENT,
    DO_STATEMENT,
    FOR_STATEMENT,
    FOREACH_STATEMENT,
    USING_STATEMENT,
    LOCK_STATEMENT,
    CHECKED_STATEMENT,
    UNCHECKED_STATEMENT,
    TRY_STATEMENT,
    CATCH_CLAUSE,
    CATCH_DECLARATION,
    CATCH_FILTER_CLAUSE,
    FINALLY_CLAUSE,
    SWITCH_STATEMENT,
    SWITCH_SECTION,
    CASE_SWITCH_LABEL,
    CASE_PATTERN_SWITCH_LABEL,
    DEFAULT_SWITCH_LABEL,
    DECLARATION_PATTERN,
    CONSTANT_PATTERN,
    WHEN_CLAUSE,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,
    YIELD_RETURN_STATEMENT,
    YIELD_BREAK_STATEMENT,

    // =========================================================================
    // NODES - Expressions
    // =========================================================================
    LITERAL_EXPRESSION,
    NAME_EXPRESSION,
    THIS_EXPRESSION,
    BASE_EXPRESSION,
    MEMBER_ACCESS_EXPRESSION,
    INVOCATION_EXPRESSION,
    ELEMENT_ACCESS_EXPRESSION,
    ARGUMENT_LIST,
    BRACKETED_ARGUMENT_LIST,
    ARGUMENT,
    OBJECT_CREATION_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    PREFIX_UNARY_EXPRESSION,
    POSTFIX_UNARY_EXPRESSION,
    BINARY_EXPRESSION,
    ASSIGNMENT_EXPRESSION,
    CONDITIONAL_EXPRESSION,
    AWAIT_EXPRESSION,
    CHECKED_EXPRESSION,
    STACKALLOC_ARRAY_CREATION_EXPRESSION,
    INITIALIZER_EXPRESSION,
    SWITCH_EXPRESSION,
    SWITCH_EXPRESSION_ARM,
    SIMPLE_LAMBDA_EXPRESSION,
    PARENTHESIZED_LAMBDA_EXPRESSION,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::NAMESPACE_KW as u16) && (self as u16) <= (Self::BASE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16)
            && (self as u16) <= (Self::QUESTION_QUESTION as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT_NUMBER | Self::REAL_NUMBER | Self::STRING | Self::CHAR
        )
    }

    /// Check if this is any token kind (as opposed to a node kind)
    pub fn is_token(self) -> bool {
        (self as u16) < (Self::COMPILATION_UNIT as u16)
    }

    /// Declaration modifiers (`public`, `static`, `async`, ...)
    pub fn is_modifier(self) -> bool {
        (self as u16) >= (Self::PUBLIC_KW as u16) && (self as u16) <= (Self::PARTIAL_KW as u16)
    }

    /// Parameter modifiers (`ref`, `out`, `in`, `params`, `this`)
    pub fn is_parameter_modifier(self) -> bool {
        matches!(
            self,
            Self::REF_KW | Self::OUT_KW | Self::IN_KW | Self::PARAMS_KW | Self::THIS_KW
        )
    }

    /// Type declarations that own a member list
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::CLASS_DECLARATION | Self::STRUCT_DECLARATION | Self::INTERFACE_DECLARATION
        )
    }

    /// Declarations that own a body of statements (block or expression body)
    pub fn has_body(self) -> bool {
        matches!(
            self,
            Self::METHOD_DECLARATION
                | Self::OPERATOR_DECLARATION
                | Self::CONSTRUCTOR_DECLARATION
                | Self::DESTRUCTOR_DECLARATION
                | Self::GET_ACCESSOR_DECLARATION
                | Self::SET_ACCESSOR_DECLARATION
        )
    }

    /// Lambda expressions and local functions
    pub fn is_nested_function(self) -> bool {
        matches!(
            self,
            Self::SIMPLE_LAMBDA_EXPRESSION
                | Self::PARENTHESIZED_LAMBDA_EXPRESSION
                | Self::LOCAL_FUNCTION_STATEMENT
        )
    }

    pub fn is_lambda(self) -> bool {
        matches!(
            self,
            Self::SIMPLE_LAMBDA_EXPRESSION | Self::PARENTHESIZED_LAMBDA_EXPRESSION
        )
    }

    /// Expression node kinds
    pub fn is_expression(self) -> bool {
        (self as u16) >= (Self::LITERAL_EXPRESSION as u16)
            && (self as u16) <= (Self::PARENTHESIZED_LAMBDA_EXPRESSION as u16)
            && !matches!(
                self,
                Self::ARGUMENT_LIST | Self::BRACKETED_ARGUMENT_LIST | Self::ARGUMENT | Self::SWITCH_EXPRESSION_ARM
            )
    }

    /// Statement node kinds
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::BLOCK
                | Self::LOCAL_DECLARATION_STATEMENT
                | Self::LOCAL_FUNCTION_STATEMENT
                | Self::EXPRESSION_STATEMENT
                | Self::EMPTY_STATEMENT
                | Self::RETURN_STATEMENT
                | Self::THROW_STATEMENT
                | Self::IF_STATEMENT
                | Self::WHILE_STATEMENT
                | Self::DO_STATEMENT
                | Self::FOR_STATEMENT
                | Self::FOREACH_STATEMENT
                | Self::USING_STATEMENT
                | Self::LOCK_STATEMENT
                | Self::CHECKED_STATEMENT
                | Self::UNCHECKED_STATEMENT
                | Self::TRY_STATEMENT
                | Self::SWITCH_STATEMENT
                | Self::BREAK_STATEMENT
                | Self::CONTINUE_STATEMENT
                | Self::YIELD_RETURN_STATEMENT
                | Self::YIELD_BREAK_STATEMENT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl rowan::Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;
