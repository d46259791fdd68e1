//! Logos-based lexer
//!
//! Fast tokenization using the logos crate. Contextual keywords (`get`, `set`,
//! `var`, predefined type names) are lexed as identifiers; the parser
//! recognizes them by text.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"@?[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+[uUlL]*")]
    IntNumber,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?[fFdDmM]?")]
    RealNumber,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)'")]
    Char,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("?")]
    Question,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("abstract")]
    AbstractKw,
    #[token("async")]
    AsyncKw,
    #[token("await")]
    AwaitKw,
    #[token("base")]
    BaseKw,
    #[token("break")]
    BreakKw,
    #[token("case")]
    CaseKw,
    #[token("catch")]
    CatchKw,
    #[token("checked")]
    CheckedKw,
    #[token("class")]
    ClassKw,
    #[token("const")]
    ConstKw,
    #[token("continue")]
    ContinueKw,
    #[token("default")]
    DefaultKw,
    #[token("delegate")]
    DelegateKw,
    #[token("do")]
    DoKw,
    #[token("else")]
    ElseKw,
    #[token("enum")]
    EnumKw,
    #[token("extern")]
    ExternKw,
    #[token("false")]
    FalseKw,
    #[token("finally")]
    FinallyKw,
    #[token("for")]
    ForKw,
    #[token("foreach")]
    ForeachKw,
    #[token("if")]
    IfKw,
    #[token("in")]
    InKw,
    #[token("interface")]
    InterfaceKw,
    #[token("internal")]
    InternalKw,
    #[token("lock")]
    LockKw,
    #[token("namespace")]
    NamespaceKw,
    #[token("new")]
    NewKw,
    #[token("null")]
    NullKw,
    #[token("operator")]
    OperatorKw,
    #[token("out")]
    OutKw,
    #[token("override")]
    OverrideKw,
    #[token("params")]
    ParamsKw,
    #[token("partial")]
    PartialKw,
    #[token("private")]
    PrivateKw,
    #[token("protected")]
    ProtectedKw,
    #[token("public")]
    PublicKw,
    #[token("readonly")]
    ReadonlyKw,
    #[token("ref")]
    RefKw,
    #[token("return")]
    ReturnKw,
    #[token("sealed")]
    SealedKw,
    #[token("stackalloc")]
    StackallocKw,
    #[token("static")]
    StaticKw,
    #[token("struct")]
    StructKw,
    #[token("switch")]
    SwitchKw,
    #[token("this")]
    ThisKw,
    #[token("throw")]
    ThrowKw,
    #[token("true")]
    TrueKw,
    #[token("try")]
    TryKw,
    #[token("unchecked")]
    UncheckedKw,
    #[token("using")]
    UsingKw,
    #[token("virtual")]
    VirtualKw,
    #[token("when")]
    WhenKw,
    #[token("where")]
    WhereKw,
    #[token("while")]
    WhileKw,
    #[token("yield")]
    YieldKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            IntNumber => SyntaxKind::INT_NUMBER,
            RealNumber => SyntaxKind::REAL_NUMBER,
            String => SyntaxKind::STRING,
            Char => SyntaxKind::CHAR,

            // Multi-char punctuation
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            FatArrow => SyntaxKind::FAT_ARROW,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            QuestionQuestion => SyntaxKind::QUESTION_QUESTION,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Comma => SyntaxKind::COMMA,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Bang => SyntaxKind::BANG,
            Tilde => SyntaxKind::TILDE,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Question => SyntaxKind::QUESTION,

            // Keywords
            AbstractKw => SyntaxKind::ABSTRACT_KW,
            AsyncKw => SyntaxKind::ASYNC_KW,
            AwaitKw => SyntaxKind::AWAIT_KW,
            BaseKw => SyntaxKind::BASE_KW,
            BreakKw => SyntaxKind::BREAK_KW,
            CaseKw => SyntaxKind::CASE_KW,
            CatchKw => SyntaxKind::CATCH_KW,
            CheckedKw => SyntaxKind::CHECKED_KW,
            ClassKw => SyntaxKind::CLASS_KW,
            ConstKw => SyntaxKind::CONST_KW,
            ContinueKw => SyntaxKind::CONTINUE_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            DelegateKw => SyntaxKind::DELEGATE_KW,
            DoKw => SyntaxKind::DO_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            EnumKw => SyntaxKind::ENUM_KW,
            ExternKw => SyntaxKind::EXTERN_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            FinallyKw => SyntaxKind::FINALLY_KW,
            ForKw => SyntaxKind::FOR_KW,
            ForeachKw => SyntaxKind::FOREACH_KW,
            IfKw => SyntaxKind::IF_KW,
            InKw => SyntaxKind::IN_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            InternalKw => SyntaxKind::INTERNAL_KW,
            LockKw => SyntaxKind::LOCK_KW,
            NamespaceKw => SyntaxKind::NAMESPACE_KW,
            NewKw => SyntaxKind::NEW_KW,
            NullKw => SyntaxKind::NULL_KW,
            OperatorKw => SyntaxKind::OPERATOR_KW,
            OutKw => SyntaxKind::OUT_KW,
            OverrideKw => SyntaxKind::OVERRIDE_KW,
            ParamsKw => SyntaxKind::PARAMS_KW,
            PartialKw => SyntaxKind::PARTIAL_KW,
            PrivateKw => SyntaxKind::PRIVATE_KW,
            ProtectedKw => SyntaxKind::PROTECTED_KW,
            PublicKw => SyntaxKind::PUBLIC_KW,
            ReadonlyKw => SyntaxKind::READONLY_KW,
            RefKw => SyntaxKind::REF_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            SealedKw => SyntaxKind::SEALED_KW,
            StackallocKw => SyntaxKind::STACKALLOC_KW,
            StaticKw => SyntaxKind::STATIC_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            SwitchKw => SyntaxKind::SWITCH_KW,
            ThisKw => SyntaxKind::THIS_KW,
            ThrowKw => SyntaxKind::THROW_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            TryKw => SyntaxKind::TRY_KW,
            UncheckedKw => SyntaxKind::UNCHECKED_KW,
            UsingKw => SyntaxKind::USING_KW,
            VirtualKw => SyntaxKind::VIRTUAL_KW,
            WhenKw => SyntaxKind::WHEN_KW,
            WhereKw => SyntaxKind::WHERE_KW,
            WhileKw => SyntaxKind::WHILE_KW,
            YieldKw => SyntaxKind::YIELD_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("class C { void M() {} }"),
            vec![
                SyntaxKind::CLASS_KW,
                SyntaxKind::IDENT,
                SyntaxKind::L_BRACE,
                SyntaxKind::IDENT,
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::R_PAREN,
                SyntaxKind::L_BRACE,
                SyntaxKind::R_BRACE,
                SyntaxKind::R_BRACE,
            ]
        );
    }

    #[test]
    fn test_stackalloc_and_switch_expression_tokens() {
        assert_eq!(
            kinds("stackalloc int[n]; x switch { _ => 0 }"),
            vec![
                SyntaxKind::STACKALLOC_KW,
                SyntaxKind::IDENT,
                SyntaxKind::L_BRACKET,
                SyntaxKind::IDENT,
                SyntaxKind::R_BRACKET,
                SyntaxKind::SEMICOLON,
                SyntaxKind::IDENT,
                SyntaxKind::SWITCH_KW,
                SyntaxKind::L_BRACE,
                SyntaxKind::IDENT,
                SyntaxKind::FAT_ARROW,
                SyntaxKind::INT_NUMBER,
                SyntaxKind::R_BRACE,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("format"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("foreach"), vec![SyntaxKind::FOREACH_KW]);
    }

    #[test]
    fn test_multi_char_punctuation() {
        assert_eq!(
            kinds("a => b += ++c"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::FAT_ARROW,
                SyntaxKind::IDENT,
                SyntaxKind::PLUS_EQ,
                SyntaxKind::PLUS_PLUS,
                SyntaxKind::IDENT,
            ]
        );
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let tokens = tokenize("x  = 1; // done");
        let mut expected = 0u32;
        for token in &tokens {
            assert_eq!(u32::from(token.offset), expected);
            expected += token.text.len() as u32;
        }
        assert_eq!(expected as usize, "x  = 1; // done".len());
    }

    #[test]
    fn test_comments_are_trivia() {
        let tokens = tokenize("/* a */ b // c");
        assert_eq!(tokens[0].kind, SyntaxKind::BLOCK_COMMENT);
        assert_eq!(tokens.last().map(|t| t.kind), Some(SyntaxKind::LINE_COMMENT));
    }
}
