use crate::ast::{Block, Expr, Program, Stmt};
use crate::lexer::{Lexer, Precedence, Token};
use std::mem;
use std::ops::Range;
use std::rc::Rc;
use webster_source::{Source, SyntaxError};

mod expr;
mod stmt;

/// Pratt parser over the token stream of a [`Source`].
/// Syntax errors are accumulated in `source.errors` instead of aborting the parse.
pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token,
    /// Byte range of `current_token`.
    current_span: Range<usize>,
    lexer: Lexer<'a>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut lexer = Lexer::new(source.content);
        let current_token = lexer.next_token();
        Self {
            current_token,
            current_span: lexer.span(),
            lexer,
            source,
        }
    }

    /// Parses every statement until the end of input.
    /// Statements that could not be parsed are reported and left out of the [`Program`].
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while self.current_token != Token::Eof {
            match self.parse_declaration() {
                Stmt::Error => {}
                stmt => statements.push(stmt),
            }
        }

        if !self.source.has_no_errors() {
            tracing::debug!(errors = self.source.errors.len(), "program has syntax errors");
        }
        Program { statements }
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn next(&mut self) -> Token {
        let token = self.lexer.next_token();
        self.current_token = token.clone();
        self.current_span = self.lexer.span();
        token
    }

    /// Predicate that tests whether the next token has the same discriminant and eats the next token if yes as a side effect.
    fn eat(&mut self, tok: Token) -> bool {
        if mem::discriminant(&self.current_token) == mem::discriminant(&tok) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats `tok` or reports that it was expected. Returns `true` if the token was eaten.
    fn expect(&mut self, tok: Token) -> bool {
        if self.eat(tok.clone()) {
            true
        } else {
            self.expected(&tok.to_string());
            false
        }
    }

    /// Eats an identifier and returns its name, or reports an error.
    fn expect_ident(&mut self) -> Option<String> {
        match self.current_token.clone() {
            Token::Identifier(ident) => {
                self.next();
                Some(ident)
            }
            _ => {
                self.expected("an identifier");
                None
            }
        }
    }

    /// Raises an error stating what was expected at the current token.
    fn expected(&mut self, what: &str) {
        let found = self.describe_current();
        self.error(format!("expected {}, found {}", what, found));
    }

    /// Raises an unexpected token error.
    fn unexpected(&mut self) {
        let found = self.describe_current();
        self.error(format!("unexpected token {}", found));
    }

    fn describe_current(&self) -> String {
        match self.current_token {
            Token::Illegal => format!(
                "illegal token `{}`",
                self.source.slice(self.current_span.clone())
            ),
            _ => self.current_token.to_string(),
        }
    }

    fn error(&mut self, message: String) {
        tracing::trace!(%message, span = ?self.current_span, "syntax error");
        self.source
            .errors
            .add_error(SyntaxError::new(message, self.current_span.clone()))
    }
}
