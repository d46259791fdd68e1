//! Recursive descent parser for the C#-like reference language
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST. Trivia in front of a
//! node is attached to the enclosing node so node ranges start and end at
//! significant tokens.

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_compilation_unit();
    parser.finish()
}

/// Binary operator precedence, higher binds tighter
fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    let prec = match kind {
        SyntaxKind::QUESTION_QUESTION => 1,
        SyntaxKind::PIPE_PIPE => 2,
        SyntaxKind::AMP_AMP => 3,
        SyntaxKind::PIPE => 4,
        SyntaxKind::CARET => 5,
        SyntaxKind::AMP => 6,
        SyntaxKind::EQ_EQ | SyntaxKind::BANG_EQ => 7,
        SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ => 8,
        SyntaxKind::PLUS | SyntaxKind::MINUS => 9,
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => 10,
        _ => return None,
    };
    Some(prec)
}

fn is_assignment_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EQ
            | SyntaxKind::PLUS_EQ
            | SyntaxKind::MINUS_EQ
            | SyntaxKind::STAR_EQ
            | SyntaxKind::SLASH_EQ
    )
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// Raw index of the n-th significant token from the current position
    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut count = 0;
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
            idx += 1;
        }
        None
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.nth_index(n).map(|idx| self.tokens[idx].text).unwrap_or("")
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.nth_index(0).is_none()
    }

    fn at_contextual(&self, text: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.nth_text(0) == text
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == SyntaxKind::ERROR {
                let range = TextRange::at(token.offset, TextSize::of(token.text));
                self.errors.push(SyntaxError::new(
                    format!("invalid character {:?}", token.text),
                    range,
                    ErrorCode::E0101,
                ));
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let code = match kind {
            SyntaxKind::SEMICOLON => ErrorCode::E0201,
            SyntaxKind::R_BRACE => ErrorCode::E0202,
            SyntaxKind::R_PAREN => ErrorCode::E0203,
            SyntaxKind::R_BRACKET => ErrorCode::E0204,
            SyntaxKind::IDENT => ErrorCode::E0301,
            _ => ErrorCode::E0902,
        };
        self.error(code, format!("expected {:?}", kind));
        false
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, code: ErrorCode, message: impl Into<String>) {
        let range = match self.nth_index(0) {
            Some(idx) => {
                let token = &self.tokens[idx];
                TextRange::at(token.offset, TextSize::of(token.text))
            }
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            }
        };
        self.errors.push(SyntaxError::new(message, range, code));
    }

    fn error_recover(&mut self, code: ErrorCode, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(code, message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Lookahead
    // =========================================================================

    /// Scan a type starting at the n-th significant token.
    /// Returns the lookahead index just past the type.
    fn scan_type(&self, n: usize) -> Option<usize> {
        if self.nth(n) != SyntaxKind::IDENT || self.nth_index(n).is_none() {
            return None;
        }
        let mut i = n + 1;
        loop {
            if self.nth(i) == SyntaxKind::DOT && self.nth(i + 1) == SyntaxKind::IDENT {
                i += 2;
            } else if self.nth(i) == SyntaxKind::LT {
                i = self.scan_type_arguments(i)?;
            } else {
                break;
            }
        }
        if self.nth(i) == SyntaxKind::QUESTION {
            i += 1;
        }
        while self.nth(i) == SyntaxKind::L_BRACKET && self.nth(i + 1) == SyntaxKind::R_BRACKET {
            i += 2;
        }
        Some(i)
    }

    fn scan_type_arguments(&self, n: usize) -> Option<usize> {
        debug_assert_eq!(self.nth(n), SyntaxKind::LT);
        let mut i = n + 1;
        loop {
            i = self.scan_type(i)?;
            match self.nth(i) {
                SyntaxKind::COMMA => i += 1,
                SyntaxKind::GT => return Some(i + 1),
                _ => return None,
            }
        }
    }

    /// `Type Name` followed by one of `follow`
    fn at_typed_name(&self, n: usize, follow: &[SyntaxKind]) -> bool {
        match self.scan_type(n) {
            Some(i) => self.nth(i) == SyntaxKind::IDENT && follow.contains(&self.nth(i + 1)),
            None => false,
        }
    }

    /// Index just past the parenthesized group opening at the n-th token
    fn scan_parens(&self, n: usize) -> Option<usize> {
        if self.nth(n) != SyntaxKind::L_PAREN {
            return None;
        }
        let mut depth = 0usize;
        let mut i = n;
        loop {
            self.nth_index(i)?;
            match self.nth(i) {
                SyntaxKind::L_PAREN => depth += 1,
                SyntaxKind::R_PAREN => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn at_lambda(&self) -> bool {
        let start = if self.at(SyntaxKind::ASYNC_KW) { 1 } else { 0 };
        match self.nth(start) {
            SyntaxKind::IDENT => self.nth(start + 1) == SyntaxKind::FAT_ARROW,
            SyntaxKind::L_PAREN => self
                .scan_parens(start)
                .is_some_and(|i| self.nth(i) == SyntaxKind::FAT_ARROW),
            _ => false,
        }
    }

    fn at_local_function(&self) -> bool {
        let mut n = 0;
        while matches!(
            self.nth(n),
            SyntaxKind::STATIC_KW | SyntaxKind::ASYNC_KW | SyntaxKind::EXTERN_KW
        ) {
            n += 1;
        }
        self.at_typed_name(n, &[SyntaxKind::L_PAREN, SyntaxKind::LT])
    }

    // =========================================================================
    // Compilation unit and namespaces
    // =========================================================================

    /// CompilationUnit = UsingDirective* Member*
    fn parse_compilation_unit(&mut self) {
        // The root starts before any leading trivia
        self.builder.start_node(SyntaxKind::COMPILATION_UNIT.into());

        while !self.at_eof() {
            let pos_before = self.pos;
            self.parse_namespace_member();
            if self.pos == pos_before && !self.at_eof() {
                self.error(ErrorCode::E0901, format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }

        self.skip_trivia();
        self.finish_node();
    }

    fn parse_namespace_member(&mut self) {
        match self.current_kind() {
            SyntaxKind::USING_KW => self.parse_using_directive(),
            SyntaxKind::NAMESPACE_KW => self.parse_namespace(),
            _ => self.parse_member(),
        }
    }

    /// UsingDirective = 'using' Name ';'
    fn parse_using_directive(&mut self) {
        self.start_node(SyntaxKind::USING_DIRECTIVE);
        self.bump();
        self.parse_qualified_name();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_qualified_name(&mut self) {
        self.expect(SyntaxKind::IDENT);
        while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.bump();
            self.bump();
        }
    }

    /// Namespace = 'namespace' Name '{' UsingDirective* Member* '}'
    fn parse_namespace(&mut self) {
        self.start_node(SyntaxKind::NAMESPACE_DECLARATION);
        self.bump();
        self.parse_qualified_name();
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                let pos_before = self.pos;
                self.parse_namespace_member();
                if self.pos == pos_before {
                    self.bump();
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Member = AttributeList* Modifier* (TypeDecl | EnumDecl | DelegateDecl | MethodLike | Property | Field)
    fn parse_member(&mut self) {
        let checkpoint = self.checkpoint();
        while self.at(SyntaxKind::L_BRACKET) {
            self.parse_attribute_list();
        }
        while !self.at_eof() && self.current_kind().is_modifier() {
            self.bump();
        }

        match self.current_kind() {
            SyntaxKind::CLASS_KW => self.parse_type_declaration(checkpoint, SyntaxKind::CLASS_DECLARATION),
            SyntaxKind::STRUCT_KW => self.parse_type_declaration(checkpoint, SyntaxKind::STRUCT_DECLARATION),
            SyntaxKind::INTERFACE_KW => {
                self.parse_type_declaration(checkpoint, SyntaxKind::INTERFACE_DECLARATION)
            }
            SyntaxKind::ENUM_KW => self.parse_enum_declaration(checkpoint),
            SyntaxKind::DELEGATE_KW => self.parse_delegate_declaration(checkpoint),
            SyntaxKind::TILDE => self.parse_destructor(checkpoint),
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::L_PAREN => self.parse_constructor(checkpoint),
            SyntaxKind::IDENT if self.scan_type(0).is_some() => self.parse_typed_member(checkpoint),
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::ERROR);
                self.error(ErrorCode::E0302, format!("unexpected {:?} in type body", self.current_kind()));
                while !self.at_eof()
                    && !self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE, SyntaxKind::L_BRACE])
                {
                    self.bump();
                }
                self.eat(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
        }
    }

    /// TypeDecl = ('class' | 'struct' | 'interface') Name TypeParameterList? BaseList? Constraint* '{' Member* '}' ';'?
    fn parse_type_declaration(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.start_node_at(checkpoint, kind);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::LT) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::COLON) {
            self.parse_base_list();
        }
        while self.at(SyntaxKind::WHERE_KW) {
            self.parse_constraint_clause();
        }
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                let pos_before = self.pos;
                self.parse_member();
                if self.pos == pos_before {
                    self.bump();
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// BaseList = ':' Type (',' Type)*
    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BASE_LIST);
        self.bump();
        self.parse_type();
        while self.eat(SyntaxKind::COMMA) {
            self.parse_type();
        }
        self.finish_node();
    }

    /// EnumDecl = 'enum' Name BaseList? '{' (EnumMember (',' EnumMember)* ','?)? '}'
    fn parse_enum_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ENUM_DECLARATION);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::COLON) {
            self.parse_base_list();
        }
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                if !self.at_any(&[SyntaxKind::IDENT, SyntaxKind::L_BRACKET]) {
                    self.error_recover(
                        ErrorCode::E0301,
                        "expected enum member",
                        &[SyntaxKind::COMMA, SyntaxKind::R_BRACE],
                    );
                    self.eat(SyntaxKind::COMMA);
                    continue;
                }
                self.start_node(SyntaxKind::ENUM_MEMBER_DECLARATION);
                while self.at(SyntaxKind::L_BRACKET) {
                    self.parse_attribute_list();
                }
                self.expect(SyntaxKind::IDENT);
                if self.at(SyntaxKind::EQ) {
                    self.parse_equals_value_clause();
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// DelegateDecl = 'delegate' Type Name TypeParameterList? ParameterList Constraint* ';'
    fn parse_delegate_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::DELEGATE_DECLARATION);
        self.bump();
        self.parse_type();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::LT) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list();
        while self.at(SyntaxKind::WHERE_KW) {
            self.parse_constraint_clause();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// Destructor = '~' Name '(' ')' Body
    fn parse_destructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::DESTRUCTOR_DECLARATION);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        self.parse_parameter_list();
        self.parse_member_body();
        self.finish_node();
    }

    /// Constructor = Name ParameterList (':' ('base' | 'this') ArgumentList)? Body
    fn parse_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::CONSTRUCTOR_DECLARATION);
        self.bump();
        self.parse_parameter_list();
        if self.at(SyntaxKind::COLON) {
            self.start_node(SyntaxKind::CONSTRUCTOR_INITIALIZER);
            self.bump();
            if !self.eat(SyntaxKind::BASE_KW) {
                self.expect(SyntaxKind::THIS_KW);
            }
            self.parse_argument_list();
            self.finish_node();
        }
        self.parse_member_body();
        self.finish_node();
    }

    /// Members starting with a type: operators, methods, properties and fields
    fn parse_typed_member(&mut self, checkpoint: Checkpoint) {
        let Some(after_type) = self.scan_type(0) else {
            return;
        };

        if self.nth(after_type) == SyntaxKind::OPERATOR_KW {
            self.start_node_at(checkpoint, SyntaxKind::OPERATOR_DECLARATION);
            self.parse_type();
            self.bump();
            if self.at_eof() || self.at(SyntaxKind::L_PAREN) {
                self.error(ErrorCode::E0902, "expected overloadable operator");
            } else {
                self.bump();
            }
            self.parse_parameter_list();
            self.parse_member_body();
            self.finish_node();
            return;
        }

        // Name, possibly qualified by an explicit interface
        let mut name_end = after_type;
        while self.nth(name_end) == SyntaxKind::IDENT
            && self.nth(name_end + 1) == SyntaxKind::DOT
            && self.nth(name_end + 2) == SyntaxKind::IDENT
        {
            name_end += 2;
        }
        let follow = self.nth(name_end + 1);

        match follow {
            SyntaxKind::L_PAREN | SyntaxKind::LT => {
                self.start_node_at(checkpoint, SyntaxKind::METHOD_DECLARATION);
                self.parse_type();
                if name_end > after_type {
                    self.start_node(SyntaxKind::EXPLICIT_INTERFACE_SPECIFIER);
                    while self.nth(1) == SyntaxKind::DOT {
                        self.bump();
                        self.bump();
                    }
                    self.finish_node();
                }
                self.expect(SyntaxKind::IDENT);
                if self.at(SyntaxKind::LT) {
                    self.parse_type_parameter_list();
                }
                self.parse_parameter_list();
                while self.at(SyntaxKind::WHERE_KW) {
                    self.parse_constraint_clause();
                }
                self.parse_member_body();
                self.finish_node();
            }
            SyntaxKind::L_BRACE | SyntaxKind::FAT_ARROW => {
                self.start_node_at(checkpoint, SyntaxKind::PROPERTY_DECLARATION);
                self.parse_type();
                self.expect(SyntaxKind::IDENT);
                if self.at(SyntaxKind::FAT_ARROW) {
                    self.parse_arrow_expression_clause();
                    self.expect(SyntaxKind::SEMICOLON);
                } else {
                    self.parse_accessor_list();
                    if self.at(SyntaxKind::EQ) {
                        self.parse_equals_value_clause();
                        self.expect(SyntaxKind::SEMICOLON);
                    }
                }
                self.finish_node();
            }
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::FIELD_DECLARATION);
                self.parse_variable_declaration();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
        }
    }

    /// Body = Block | '=>' Expression ';' | ';'
    fn parse_member_body(&mut self) {
        match self.current_kind() {
            SyntaxKind::L_BRACE if !self.at_eof() => self.parse_block(),
            SyntaxKind::FAT_ARROW if !self.at_eof() => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::SEMICOLON);
            }
            _ => {
                if !self.eat(SyntaxKind::SEMICOLON) {
                    self.error(ErrorCode::E0303, "expected body");
                }
            }
        }
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.start_node(SyntaxKind::ARROW_EXPRESSION_CLAUSE);
        self.bump();
        self.parse_expression();
        self.finish_node();
    }

    fn parse_equals_value_clause(&mut self) {
        self.start_node(SyntaxKind::EQUALS_VALUE_CLAUSE);
        self.bump();
        self.parse_expression();
        self.finish_node();
    }

    /// AccessorList = '{' Accessor* '}'
    fn parse_accessor_list(&mut self) {
        self.start_node(SyntaxKind::ACCESSOR_LIST);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let checkpoint = self.checkpoint();
            while self.at(SyntaxKind::L_BRACKET) {
                self.parse_attribute_list();
            }
            while !self.at_eof() && self.current_kind().is_modifier() {
                self.bump();
            }
            let kind = if self.at_contextual("get") {
                SyntaxKind::GET_ACCESSOR_DECLARATION
            } else if self.at_contextual("set") {
                SyntaxKind::SET_ACCESSOR_DECLARATION
            } else {
                self.start_node_at(checkpoint, SyntaxKind::ERROR);
                self.error(ErrorCode::E0302, "expected 'get' or 'set'");
                if !self.at(SyntaxKind::R_BRACE) {
                    self.bump();
                }
                self.finish_node();
                continue;
            };
            self.start_node_at(checkpoint, kind);
            self.bump();
            self.parse_member_body();
            self.finish_node();
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    // =========================================================================
    // Attributes, parameters, type parameters
    // =========================================================================

    /// AttributeList = '[' Attribute (',' Attribute)* ']'
    fn parse_attribute_list(&mut self) {
        self.start_node(SyntaxKind::ATTRIBUTE_LIST);
        self.bump();
        loop {
            self.start_node(SyntaxKind::ATTRIBUTE);
            self.parse_qualified_name();
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_argument_list();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    /// ParameterList = '(' (Parameter (',' Parameter)*)? ')'
    fn parse_parameter_list(&mut self) {
        self.start_node(SyntaxKind::PARAMETER_LIST);
        self.expect(SyntaxKind::L_PAREN);
        if !self.at(SyntaxKind::R_PAREN) {
            loop {
                self.parse_parameter();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    /// Parameter = AttributeList* ParameterModifier* Type? Name ('=' Expression)?
    fn parse_parameter(&mut self) {
        self.start_node(SyntaxKind::PARAMETER);
        while self.at(SyntaxKind::L_BRACKET) {
            self.parse_attribute_list();
        }
        while !self.at_eof() && self.current_kind().is_parameter_modifier() {
            self.bump();
        }
        if self.at_typed_name(0, &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::EQ]) {
            self.parse_type();
        }
        if !self.eat(SyntaxKind::IDENT) {
            self.error_recover(
                ErrorCode::E0304,
                "expected parameter name",
                &[SyntaxKind::COMMA, SyntaxKind::R_PAREN],
            );
        }
        if self.at(SyntaxKind::EQ) {
            self.parse_equals_value_clause();
        }
        self.finish_node();
    }

    /// TypeParameterList = '<' TypeParameter (',' TypeParameter)* '>'
    fn parse_type_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMETER_LIST);
        self.bump();
        loop {
            self.start_node(SyntaxKind::TYPE_PARAMETER);
            while self.at(SyntaxKind::L_BRACKET) {
                self.parse_attribute_list();
            }
            if self.at_any(&[SyntaxKind::IN_KW, SyntaxKind::OUT_KW]) {
                self.bump();
            }
            self.expect(SyntaxKind::IDENT);
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    /// Constraint = 'where' Name ':' ('class' | 'struct' | 'new' '(' ')' | Type) (',' ...)*
    fn parse_constraint_clause(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        self.expect(SyntaxKind::COLON);
        loop {
            match self.current_kind() {
                SyntaxKind::CLASS_KW | SyntaxKind::STRUCT_KW => self.bump(),
                SyntaxKind::NEW_KW => {
                    self.bump();
                    self.expect(SyntaxKind::L_PAREN);
                    self.expect(SyntaxKind::R_PAREN);
                }
                _ => self.parse_type(),
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Types and variable declarations
    // =========================================================================

    /// Type = Name ('.' Name)* TypeArgumentList? '?'? ('[' ']')*
    fn parse_type(&mut self) {
        if !self.at(SyntaxKind::IDENT) {
            self.error(ErrorCode::E0305, "expected type");
            return;
        }
        self.start_node(SyntaxKind::TYPE);
        self.bump();
        loop {
            if self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
            } else if self.at(SyntaxKind::LT) && self.scan_type_arguments(0).is_some() {
                self.start_node(SyntaxKind::TYPE_ARGUMENT_LIST);
                self.bump();
                loop {
                    self.parse_type();
                    if !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
                self.expect(SyntaxKind::GT);
                self.finish_node();
            } else {
                break;
            }
        }
        self.eat(SyntaxKind::QUESTION);
        while self.at(SyntaxKind::L_BRACKET) && self.nth(1) == SyntaxKind::R_BRACKET {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// VariableDeclaration = Type VariableDeclarator (',' VariableDeclarator)*
    fn parse_variable_declaration(&mut self) {
        self.start_node(SyntaxKind::VARIABLE_DECLARATION);
        self.parse_type();
        loop {
            self.start_node(SyntaxKind::VARIABLE_DECLARATOR);
            self.expect(SyntaxKind::IDENT);
            if self.at(SyntaxKind::EQ) {
                self.parse_equals_value_clause();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Block = '{' Statement* '}'
    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let pos_before = self.pos;
            self.parse_statement();
            if self.pos == pos_before {
                self.error(ErrorCode::E0501, format!("stuck on token: {:?}", self.current_kind()));
                self.bump();
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            _ if self.at_eof() => self.error(ErrorCode::E0501, "expected statement"),
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::SEMICOLON => {
                self.start_node(SyntaxKind::EMPTY_STATEMENT);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IF_KW => self.parse_if_statement(),
            SyntaxKind::WHILE_KW => self.parse_while_statement(),
            SyntaxKind::DO_KW => self.parse_do_statement(),
            SyntaxKind::FOR_KW => self.parse_for_statement(),
            SyntaxKind::FOREACH_KW => self.parse_foreach_statement(),
            SyntaxKind::USING_KW => self.parse_using_statement(),
            SyntaxKind::LOCK_KW => self.parse_keyword_paren_statement(SyntaxKind::LOCK_STATEMENT),
            SyntaxKind::TRY_KW => self.parse_try_statement(),
            SyntaxKind::SWITCH_KW => self.parse_switch_statement(),
            SyntaxKind::CHECKED_KW if self.nth(1) == SyntaxKind::L_BRACE => {
                self.start_node(SyntaxKind::CHECKED_STATEMENT);
                self.bump();
                self.parse_block();
                self.finish_node();
            }
            SyntaxKind::UNCHECKED_KW if self.nth(1) == SyntaxKind::L_BRACE => {
                self.start_node(SyntaxKind::UNCHECKED_STATEMENT);
                self.bump();
                self.parse_block();
                self.finish_node();
            }
            SyntaxKind::RETURN_KW => self.parse_jump_statement(SyntaxKind::RETURN_STATEMENT, true),
            SyntaxKind::THROW_KW => self.parse_jump_statement(SyntaxKind::THROW_STATEMENT, true),
            SyntaxKind::BREAK_KW => self.parse_jump_statement(SyntaxKind::BREAK_STATEMENT, false),
            SyntaxKind::CONTINUE_KW => self.parse_jump_statement(SyntaxKind::CONTINUE_STATEMENT, false),
            SyntaxKind::YIELD_KW if self.nth(1) == SyntaxKind::RETURN_KW => {
                self.start_node(SyntaxKind::YIELD_RETURN_STATEMENT);
                self.bump();
                self.bump();
                self.parse_expression();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
            SyntaxKind::YIELD_KW if self.nth(1) == SyntaxKind::BREAK_KW => {
                self.start_node(SyntaxKind::YIELD_BREAK_STATEMENT);
                self.bump();
                self.bump();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
            SyntaxKind::CONST_KW => {
                self.start_node(SyntaxKind::LOCAL_DECLARATION_STATEMENT);
                self.bump();
                self.parse_variable_declaration();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
            _ if self.at_local_function() => self.parse_local_function(),
            _ if self.at_typed_name(0, &[SyntaxKind::EQ, SyntaxKind::SEMICOLON, SyntaxKind::COMMA]) => {
                self.start_node(SyntaxKind::LOCAL_DECLARATION_STATEMENT);
                self.parse_variable_declaration();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) {
        self.start_node(SyntaxKind::EXPRESSION_STATEMENT);
        if self.parse_expression() {
            self.expect(SyntaxKind::SEMICOLON);
        } else {
            self.error_recover(
                ErrorCode::E0501,
                "expected statement",
                &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
            );
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    /// LocalFunction = Modifier* Type Name TypeParameterList? ParameterList Constraint* Body
    fn parse_local_function(&mut self) {
        self.start_node(SyntaxKind::LOCAL_FUNCTION_STATEMENT);
        while self.at_any(&[SyntaxKind::STATIC_KW, SyntaxKind::ASYNC_KW, SyntaxKind::EXTERN_KW]) {
            self.bump();
        }
        self.parse_type();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::LT) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list();
        while self.at(SyntaxKind::WHERE_KW) {
            self.parse_constraint_clause();
        }
        self.parse_member_body();
        self.finish_node();
    }

    fn parse_jump_statement(&mut self, kind: SyntaxKind, has_expression: bool) {
        self.start_node(kind);
        self.bump();
        if has_expression && !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        if !self.parse_expression() {
            self.error(ErrorCode::E0401, "expected expression");
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    /// IfStatement = 'if' '(' Expression ')' Statement ElseClause?
    fn parse_if_statement(&mut self) {
        self.start_node(SyntaxKind::IF_STATEMENT);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_statement();
        if self.at(SyntaxKind::ELSE_KW) {
            self.start_node(SyntaxKind::ELSE_CLAUSE);
            self.bump();
            self.parse_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    /// WhileStatement = 'while' '(' Expression ')' Statement
    fn parse_while_statement(&mut self) {
        self.parse_keyword_paren_statement(SyntaxKind::WHILE_STATEMENT);
    }

    fn parse_keyword_paren_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_statement();
        self.finish_node();
    }

    /// DoStatement = 'do' Statement 'while' '(' Expression ')' ';'
    fn parse_do_statement(&mut self) {
        self.start_node(SyntaxKind::DO_STATEMENT);
        self.bump();
        self.parse_statement();
        self.expect(SyntaxKind::WHILE_KW);
        self.parse_parenthesized_condition();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// ForStatement = 'for' '(' (VariableDeclaration | ExpressionList)? ';' Expression? ';' ExpressionList? ')' Statement
    fn parse_for_statement(&mut self) {
        self.start_node(SyntaxKind::FOR_STATEMENT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        if self.at_typed_name(0, &[SyntaxKind::EQ, SyntaxKind::SEMICOLON, SyntaxKind::COMMA]) {
            self.parse_variable_declaration();
        } else if !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expression_list();
        }
        self.expect(SyntaxKind::SEMICOLON);
        if !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::SEMICOLON);
        if !self.at(SyntaxKind::R_PAREN) {
            self.parse_expression_list();
        }
        self.expect(SyntaxKind::R_PAREN);
        self.parse_statement();
        self.finish_node();
    }

    fn parse_expression_list(&mut self) {
        loop {
            if !self.parse_expression() {
                self.error(ErrorCode::E0401, "expected expression");
                break;
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }

    /// ForEachStatement = 'foreach' '(' Type Name 'in' Expression ')' Statement
    fn parse_foreach_statement(&mut self) {
        self.start_node(SyntaxKind::FOREACH_STATEMENT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        self.parse_type();
        self.expect(SyntaxKind::IDENT);
        self.expect(SyntaxKind::IN_KW);
        if !self.parse_expression() {
            self.error(ErrorCode::E0401, "expected expression");
        }
        self.expect(SyntaxKind::R_PAREN);
        self.parse_statement();
        self.finish_node();
    }

    /// UsingStatement = 'using' '(' (VariableDeclaration | Expression) ')' Statement
    fn parse_using_statement(&mut self) {
        self.start_node(SyntaxKind::USING_STATEMENT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        if self.at_typed_name(0, &[SyntaxKind::EQ, SyntaxKind::COMMA]) {
            self.parse_variable_declaration();
        } else if !self.parse_expression() {
            self.error(ErrorCode::E0401, "expected expression");
        }
        self.expect(SyntaxKind::R_PAREN);
        self.parse_statement();
        self.finish_node();
    }

    /// TryStatement = 'try' Block CatchClause* FinallyClause?
    fn parse_try_statement(&mut self) {
        self.start_node(SyntaxKind::TRY_STATEMENT);
        self.bump();
        self.parse_block();
        let mut has_handler = false;
        while self.at(SyntaxKind::CATCH_KW) {
            has_handler = true;
            self.start_node(SyntaxKind::CATCH_CLAUSE);
            self.bump();
            if self.at(SyntaxKind::L_PAREN) {
                self.start_node(SyntaxKind::CATCH_DECLARATION);
                self.bump();
                self.parse_type();
                self.eat(SyntaxKind::IDENT);
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            if self.at(SyntaxKind::WHEN_KW) {
                self.start_node(SyntaxKind::CATCH_FILTER_CLAUSE);
                self.bump();
                self.parse_parenthesized_condition();
                self.finish_node();
            }
            self.parse_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FINALLY_KW) {
            has_handler = true;
            self.start_node(SyntaxKind::FINALLY_CLAUSE);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        if !has_handler {
            self.error(ErrorCode::E0503, "expected catch or finally");
        }
        self.finish_node();
    }

    /// SwitchStatement = 'switch' '(' Expression ')' '{' SwitchSection* '}'
    fn parse_switch_statement(&mut self) {
        self.start_node(SyntaxKind::SWITCH_STATEMENT);
        self.bump();
        self.parse_parenthesized_condition();
        if self.expect(SyntaxKind::L_BRACE) {
            while self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
                self.parse_switch_section();
            }
            if !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
                self.error_recover(ErrorCode::E0502, "expected case label", &[SyntaxKind::R_BRACE]);
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    /// SwitchSection = SwitchLabel+ Statement*
    fn parse_switch_section(&mut self) {
        self.start_node(SyntaxKind::SWITCH_SECTION);
        while self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
            self.parse_switch_label();
        }
        while !self.at_eof()
            && !self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW, SyntaxKind::R_BRACE])
        {
            let pos_before = self.pos;
            self.parse_statement();
            if self.pos == pos_before {
                self.bump();
            }
        }
        self.finish_node();
    }

    /// SwitchLabel = 'case' (Type Name | Expression) ('when' Expression)? ':' | 'default' ':'
    fn parse_switch_label(&mut self) {
        if self.at(SyntaxKind::DEFAULT_KW) {
            self.start_node(SyntaxKind::DEFAULT_SWITCH_LABEL);
            self.bump();
            self.expect(SyntaxKind::COLON);
            self.finish_node();
            return;
        }

        let label = self.checkpoint();
        self.bump();
        let is_pattern = if self.at_typed_name(0, &[SyntaxKind::COLON, SyntaxKind::WHEN_KW]) {
            self.start_node(SyntaxKind::DECLARATION_PATTERN);
            self.parse_type();
            self.bump();
            self.finish_node();
            true
        } else {
            let pattern = self.checkpoint();
            if !self.parse_expression() {
                self.error(ErrorCode::E0502, "expected case value");
            }
            if self.at(SyntaxKind::WHEN_KW) {
                self.start_node_at(pattern, SyntaxKind::CONSTANT_PATTERN);
                self.finish_node();
                true
            } else {
                false
            }
        };
        if is_pattern && self.at(SyntaxKind::WHEN_KW) {
            self.start_node(SyntaxKind::WHEN_CLAUSE);
            self.bump();
            if !self.parse_expression() {
                self.error(ErrorCode::E0401, "expected expression");
            }
            self.finish_node();
        }
        self.expect(SyntaxKind::COLON);
        let kind = if is_pattern {
            SyntaxKind::CASE_PATTERN_SWITCH_LABEL
        } else {
            SyntaxKind::CASE_SWITCH_LABEL
        };
        self.start_node_at(label, kind);
        self.finish_node();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parse an expression. Returns false when no expression could be started.
    fn parse_expression(&mut self) -> bool {
        if self.at_lambda() {
            self.parse_lambda();
            return true;
        }
        let checkpoint = self.checkpoint();
        if !self.parse_conditional() {
            return false;
        }
        if !self.at_eof() && is_assignment_operator(self.current_kind()) {
            self.start_node_at(checkpoint, SyntaxKind::ASSIGNMENT_EXPRESSION);
            self.bump();
            if !self.parse_expression() {
                self.error(ErrorCode::E0401, "expected expression");
            }
            self.finish_node();
        }
        true
    }

    fn parse_conditional(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_binary(1) {
            return false;
        }
        if self.at(SyntaxKind::QUESTION) {
            self.start_node_at(checkpoint, SyntaxKind::CONDITIONAL_EXPRESSION);
            self.bump();
            self.parse_expression();
            self.expect(SyntaxKind::COLON);
            self.parse_expression();
            self.finish_node();
        }
        true
    }

    fn parse_binary(&mut self, min_precedence: u8) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_unary() {
            return false;
        }
        while !self.at_eof() {
            let Some(precedence) = binary_precedence(self.current_kind()) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BINARY_EXPRESSION);
            self.bump();
            if !self.parse_binary(precedence + 1) {
                self.error(ErrorCode::E0401, "expected operand");
            }
            self.finish_node();
        }
        true
    }

    fn parse_unary(&mut self) -> bool {
        match self.current_kind() {
            _ if self.at_eof() => false,
            SyntaxKind::BANG
            | SyntaxKind::MINUS
            | SyntaxKind::PLUS
            | SyntaxKind::TILDE
            | SyntaxKind::PLUS_PLUS
            | SyntaxKind::MINUS_MINUS => {
                self.start_node(SyntaxKind::PREFIX_UNARY_EXPRESSION);
                self.bump();
                if !self.parse_unary() {
                    self.error(ErrorCode::E0401, "expected operand");
                }
                self.finish_node();
                true
            }
            SyntaxKind::AWAIT_KW => {
                self.start_node(SyntaxKind::AWAIT_EXPRESSION);
                self.bump();
                if !self.parse_unary() {
                    self.error(ErrorCode::E0401, "expected awaited expression");
                }
                self.finish_node();
                true
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        if !self.parse_primary() {
            return false;
        }
        loop {
            match self.current_kind() {
                _ if self.at_eof() => break,
                SyntaxKind::DOT => {
                    self.start_node_at(checkpoint, SyntaxKind::MEMBER_ACCESS_EXPRESSION);
                    self.bump();
                    self.expect(SyntaxKind::IDENT);
                    self.finish_node();
                }
                SyntaxKind::L_PAREN => {
                    self.start_node_at(checkpoint, SyntaxKind::INVOCATION_EXPRESSION);
                    self.parse_argument_list();
                    self.finish_node();
                }
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(checkpoint, SyntaxKind::ELEMENT_ACCESS_EXPRESSION);
                    self.start_node(SyntaxKind::BRACKETED_ARGUMENT_LIST);
                    self.bump();
                    self.parse_arguments_until(SyntaxKind::R_BRACKET);
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                    self.finish_node();
                }
                SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                    self.start_node_at(checkpoint, SyntaxKind::POSTFIX_UNARY_EXPRESSION);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::SWITCH_KW if self.nth(1) == SyntaxKind::L_BRACE => {
                    self.start_node_at(checkpoint, SyntaxKind::SWITCH_EXPRESSION);
                    self.bump();
                    self.parse_switch_expression_arms();
                    self.finish_node();
                }
                _ => break,
            }
        }
        true
    }

    fn parse_primary(&mut self) -> bool {
        match self.current_kind() {
            _ if self.at_eof() => false,
            SyntaxKind::INT_NUMBER
            | SyntaxKind::REAL_NUMBER
            | SyntaxKind::STRING
            | SyntaxKind::CHAR
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NULL_KW => {
                self.start_node(SyntaxKind::LITERAL_EXPRESSION);
                self.bump();
                self.finish_node();
                true
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_EXPRESSION);
                self.bump();
                self.finish_node();
                true
            }
            SyntaxKind::THIS_KW => {
                self.start_node(SyntaxKind::THIS_EXPRESSION);
                self.bump();
                self.finish_node();
                true
            }
            SyntaxKind::BASE_KW => {
                self.start_node(SyntaxKind::BASE_EXPRESSION);
                self.bump();
                self.finish_node();
                true
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PARENTHESIZED_EXPRESSION);
                self.bump();
                if !self.parse_expression() {
                    self.error(ErrorCode::E0401, "expected expression");
                }
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
                true
            }
            SyntaxKind::NEW_KW => {
                self.start_node(SyntaxKind::OBJECT_CREATION_EXPRESSION);
                self.bump();
                self.parse_type();
                if self.at(SyntaxKind::L_PAREN) {
                    self.parse_argument_list();
                }
                self.finish_node();
                true
            }
            SyntaxKind::STACKALLOC_KW => {
                self.start_node(SyntaxKind::STACKALLOC_ARRAY_CREATION_EXPRESSION);
                self.bump();
                if !self.at(SyntaxKind::L_BRACKET) {
                    self.parse_type();
                }
                if self.at(SyntaxKind::L_BRACKET) {
                    self.start_node(SyntaxKind::BRACKETED_ARGUMENT_LIST);
                    self.bump();
                    self.parse_arguments_until(SyntaxKind::R_BRACKET);
                    self.expect(SyntaxKind::R_BRACKET);
                    self.finish_node();
                }
                if self.at(SyntaxKind::L_BRACE) {
                    self.parse_initializer_expression();
                }
                self.finish_node();
                true
            }
            SyntaxKind::CHECKED_KW | SyntaxKind::UNCHECKED_KW if self.nth(1) == SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::CHECKED_EXPRESSION);
                self.bump();
                self.parse_parenthesized_condition();
                self.finish_node();
                true
            }
            _ => false,
        }
    }

    /// Initializer = '{' (Expression (',' Expression)* ','?)? '}'
    fn parse_initializer_expression(&mut self) {
        self.start_node(SyntaxKind::INITIALIZER_EXPRESSION);
        self.bump();
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            if !self.parse_expression() {
                self.error_recover(
                    ErrorCode::E0401,
                    "expected expression",
                    &[SyntaxKind::COMMA, SyntaxKind::R_BRACE, SyntaxKind::SEMICOLON],
                );
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// SwitchExpressionArms = '{' (Arm (',' Arm)* ','?)? '}'
    /// Arm = (Type Name | Expression) ('when' Expression)? '=>' Expression
    ///
    /// Patterns and guards stop before `=>`, so neither is parsed as a lambda.
    fn parse_switch_expression_arms(&mut self) {
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            self.start_node(SyntaxKind::SWITCH_EXPRESSION_ARM);
            if self.at_typed_name(0, &[SyntaxKind::FAT_ARROW, SyntaxKind::WHEN_KW]) {
                self.start_node(SyntaxKind::DECLARATION_PATTERN);
                self.parse_type();
                self.bump();
                self.finish_node();
            } else {
                let pattern = self.checkpoint();
                if self.parse_conditional() {
                    self.start_node_at(pattern, SyntaxKind::CONSTANT_PATTERN);
                    self.finish_node();
                } else {
                    self.error_recover(
                        ErrorCode::E0502,
                        "expected pattern",
                        &[SyntaxKind::FAT_ARROW, SyntaxKind::COMMA, SyntaxKind::R_BRACE],
                    );
                }
            }
            if self.eat(SyntaxKind::WHEN_KW) && !self.parse_conditional() {
                self.error(ErrorCode::E0401, "expected expression");
            }
            self.expect(SyntaxKind::FAT_ARROW);
            if !self.parse_expression() {
                self.error(ErrorCode::E0401, "expected expression");
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
    }

    /// ArgumentList = '(' (Argument (',' Argument)*)? ')'
    fn parse_argument_list(&mut self) {
        self.start_node(SyntaxKind::ARGUMENT_LIST);
        self.expect(SyntaxKind::L_PAREN);
        self.parse_arguments_until(SyntaxKind::R_PAREN);
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    fn parse_arguments_until(&mut self, close: SyntaxKind) {
        if self.at(close) {
            return;
        }
        loop {
            self.start_node(SyntaxKind::ARGUMENT);
            if self.at_any(&[SyntaxKind::REF_KW, SyntaxKind::OUT_KW, SyntaxKind::IN_KW]) {
                self.bump();
            }
            if !self.parse_expression() {
                self.error_recover(
                    ErrorCode::E0402,
                    "expected argument",
                    &[SyntaxKind::COMMA, close, SyntaxKind::SEMICOLON],
                );
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }

    /// Lambda = 'async'? (Name | ParameterList) '=>' (Block | Expression)
    fn parse_lambda(&mut self) {
        let simple = if self.at(SyntaxKind::ASYNC_KW) {
            self.nth(1) == SyntaxKind::IDENT
        } else {
            self.at(SyntaxKind::IDENT)
        };
        let kind = if simple {
            SyntaxKind::SIMPLE_LAMBDA_EXPRESSION
        } else {
            SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION
        };
        self.start_node(kind);
        self.eat(SyntaxKind::ASYNC_KW);
        if simple {
            self.start_node(SyntaxKind::PARAMETER);
            self.bump();
            self.finish_node();
        } else {
            self.parse_parameter_list();
        }
        self.expect(SyntaxKind::FAT_ARROW);
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else if !self.parse_expression() {
            self.error(ErrorCode::E0401, "expected lambda body");
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SyntaxNode;
    use rstest::rstest;

    fn kinds_of(node: &SyntaxNode) -> Vec<SyntaxKind> {
        node.descendants().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_parse_is_lossless() {
        let source = "class C {\n  // comment\n  void M() { int x = 1; }\n}\n";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert_eq!(parse.syntax().text().to_string(), source);
    }

    #[test]
    fn test_node_ranges_exclude_surrounding_trivia() {
        let source = "class C {   void M() {}   }";
        let root = parse(source).syntax();
        let method = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::METHOD_DECLARATION)
            .unwrap();
        assert_eq!(method.text().to_string(), "void M() {}");
    }

    #[test]
    fn test_local_declaration_vs_expression() {
        let root = parse("class C { void M() { int x = 1; x = 2; List<int> y; F(x); } }").syntax();
        let kinds = kinds_of(&root);
        assert_eq!(
            kinds.iter().filter(|k| **k == SyntaxKind::LOCAL_DECLARATION_STATEMENT).count(),
            2
        );
        assert_eq!(
            kinds.iter().filter(|k| **k == SyntaxKind::EXPRESSION_STATEMENT).count(),
            2
        );
    }

    #[test]
    fn test_member_kinds() {
        let source = r#"
            class C<T> : Base where T : class {
                const int K = 1;
                int P { get; set; }
                int Q => 1;
                C() : base() {}
                ~C() {}
                void I.M() {}
                public static C operator +(C a, C b) => a;
            }
        "#;
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        let kinds = kinds_of(&parse.syntax());
        for expected in [
            SyntaxKind::TYPE_PARAMETER_LIST,
            SyntaxKind::BASE_LIST,
            SyntaxKind::TYPE_PARAMETER_CONSTRAINT_CLAUSE,
            SyntaxKind::FIELD_DECLARATION,
            SyntaxKind::PROPERTY_DECLARATION,
            SyntaxKind::ACCESSOR_LIST,
            SyntaxKind::GET_ACCESSOR_DECLARATION,
            SyntaxKind::SET_ACCESSOR_DECLARATION,
            SyntaxKind::CONSTRUCTOR_DECLARATION,
            SyntaxKind::CONSTRUCTOR_INITIALIZER,
            SyntaxKind::DESTRUCTOR_DECLARATION,
            SyntaxKind::EXPLICIT_INTERFACE_SPECIFIER,
            SyntaxKind::OPERATOR_DECLARATION,
        ] {
            assert!(kinds.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn test_lambdas() {
        let root = parse("class C { void M() { F(x => x + 1, async (a, b) => { await a; }); } }").syntax();
        let kinds = kinds_of(&root);
        assert!(kinds.contains(&SyntaxKind::SIMPLE_LAMBDA_EXPRESSION));
        assert!(kinds.contains(&SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION));
        assert!(kinds.contains(&SyntaxKind::AWAIT_EXPRESSION));
    }

    #[test]
    fn test_switch_pattern_labels() {
        let source = "class C { void M() { switch (o) { case int i when i > 0: break; case 1: break; default: break; } } }";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        let kinds = kinds_of(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::CASE_PATTERN_SWITCH_LABEL));
        assert!(kinds.contains(&SyntaxKind::DECLARATION_PATTERN));
        assert!(kinds.contains(&SyntaxKind::WHEN_CLAUSE));
        assert!(kinds.contains(&SyntaxKind::CASE_SWITCH_LABEL));
        assert!(kinds.contains(&SyntaxKind::DEFAULT_SWITCH_LABEL));
    }

    #[rstest]
    #[case("var p = stackalloc int[4];", SyntaxKind::STACKALLOC_ARRAY_CREATION_EXPRESSION)]
    #[case("var s = stackalloc[] { 1, 2 };", SyntaxKind::INITIALIZER_EXPRESSION)]
    #[case("var y = x switch { 1 => a, int i when i > 0 => b, _ => c };", SyntaxKind::SWITCH_EXPRESSION_ARM)]
    fn test_body_expressions(#[case] statement: &str, #[case] kind: SyntaxKind) {
        let source = format!("class C {{ void M() {{ {statement} }} }}");
        let parse = parse(&source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert!(kinds_of(&parse.syntax()).contains(&kind));
    }

    #[test]
    fn test_switch_expression_discard_is_not_a_lambda() {
        let parse = parse("class C { int M(int x) => x switch { _ => 0 }; }");
        assert!(parse.ok(), "{:?}", parse.errors);
        let kinds = kinds_of(&parse.syntax());
        assert!(kinds.contains(&SyntaxKind::SWITCH_EXPRESSION));
        assert!(!kinds.contains(&SyntaxKind::SIMPLE_LAMBDA_EXPRESSION));
    }

    #[test]
    fn test_error_recovery_keeps_text() {
        let source = "class C { void M() { int x = ; } ) }";
        let parse = parse(source);
        assert!(!parse.ok());
        assert_eq!(parse.syntax().text().to_string(), source);
    }
}
