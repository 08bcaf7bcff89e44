use logos::Logos;
use std::{fmt, ops::Range};

#[derive(Debug, Logos, Clone, PartialEq)]
pub enum Token {
    // literals
    // NOTE: numeric literals keep their text, the parser reports literals that do not fit
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntLit(String),
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string())]
    FloatLit(String),
    #[regex(r#""([^"\\]|\\(.|\n)?)*"?"#, lex_string)]
    StringLit(String),

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // unary operators
    #[token("!")]
    LogicalNot,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Equals,
    // - equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // - ordering
    #[token(">")]
    GreaterThan,
    #[token("<")]
    LessThan,
    // - logical
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // keywords
    #[token("fn")]
    Fn,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("elseif")]
    ElseIf,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("super")]
    Super,
    #[token("return")]
    Return,

    // misc
    #[regex(r"[ \t\n\r]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Illegal,

    /// Only generated by [`Lexer::next_token`] once the input is exhausted.
    Eof,
}

/// Decodes the body of a string literal. The closing quote is optional, an unterminated
/// string runs until the end of input.
fn lex_string(lex: &mut logos::Lexer<Token>) -> String {
    let mut value = String::new();
    let mut chars = lex.slice()[1..].chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some(escaped) => value.push(escaped),
                None => break,
            },
            c => value.push(c),
        }
    }
    value
}

/// Binding strength of infix operators, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Token {
    /// Returns the infix precedence of the token.
    /// Tokens that cannot continue an expression have [`Precedence::Lowest`].
    pub fn precedence(&self) -> Precedence {
        match self {
            Token::Equals => Precedence::Assign,
            Token::LogicalOr => Precedence::Or,
            Token::LogicalAnd => Precedence::And,
            Token::EqualsEquals | Token::NotEquals => Precedence::Equals,
            Token::LessThan | Token::GreaterThan => Precedence::LessGreater,
            Token::Plus | Token::Minus => Precedence::Sum,
            Token::Asterisk | Token::Slash => Precedence::Product,
            Token::OpenParen => Precedence::Call,
            Token::OpenBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }

    /// The operator spelling of the token, used when printing the AST.
    pub fn as_str(&self) -> &str {
        match self {
            Token::IntLit(lit) | Token::FloatLit(lit) | Token::Identifier(lit) => lit,
            Token::StringLit(_) => "string",
            Token::LogicalNot => "!",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::Equals => "=",
            Token::EqualsEquals => "==",
            Token::NotEquals => "!=",
            Token::GreaterThan => ">",
            Token::LessThan => "<",
            Token::LogicalAnd => "&&",
            Token::LogicalOr => "||",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::Comma => ",",
            Token::Semi => ";",
            Token::Colon => ":",
            Token::Fn => "fn",
            Token::Let => "let",
            Token::Var => "var",
            Token::True => "true",
            Token::False => "false",
            Token::If => "if",
            Token::Else => "else",
            Token::ElseIf => "elseif",
            Token::For => "for",
            Token::While => "while",
            Token::Class => "class",
            Token::Extends => "extends",
            Token::Super => "super",
            Token::Return => "return",
            Token::Illegal => "illegal token",
            Token::Eof => "end of file",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLit(val) => write!(f, "{:?}", val),
            Token::Illegal | Token::Eof => f.write_str(self.as_str()),
            _ => write!(f, "`{}`", self.as_str()),
        }
    }
}

/// Token stream over a source string.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Token>,
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            inner: Token::lexer(content),
            exhausted: false,
        }
    }

    /// Returns the next token. Once the input is exhausted, every call returns [`Token::Eof`].
    pub fn next_token(&mut self) -> Token {
        if self.exhausted {
            return Token::Eof;
        }
        match self.inner.next() {
            Some(token) => token,
            None => {
                self.exhausted = true;
                Token::Eof
            }
        }
    }

    /// Byte range of the last returned token.
    pub fn span(&self) -> Range<usize> {
        if self.exhausted {
            let end = self.inner.source().len();
            end..end
        } else {
            self.inner.span()
        }
    }

    /// Source text of the last returned token.
    pub fn slice(&self) -> &'a str {
        if self.exhausted {
            ""
        } else {
            self.inner.slice()
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}
