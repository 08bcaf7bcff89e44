use super::*;
use crate::ast::ElseIf;
use webster_stack::ensure_sufficient_stack;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with [`Precedence::Lowest`].
    pub fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(Precedence::Lowest)
    }

    /// Parses an expression whose infix operators all bind tighter than `min_precedence`.
    /// To parse any expression use, [`Self::parse_expr`].
    /// Every nested expression goes through here, so this is where the stack is grown.
    fn parse_expr_bp(&mut self, min_precedence: Precedence) -> Expr {
        ensure_sufficient_stack(|| self.parse_expr_bp_inner(min_precedence))
    }

    fn parse_expr_bp_inner(&mut self, min_precedence: Precedence) -> Expr {
        let mut lhs = self.parse_prefix_expr();

        loop {
            let precedence = self.current_token.precedence();
            if precedence <= min_precedence {
                break; // not an infix operator or binds too loosely, stop parsing
            }

            lhs = match self.current_token {
                Token::OpenParen => self.parse_call_expr(lhs),
                Token::OpenBracket => self.parse_index_expr(lhs),
                Token::Equals => self.parse_assign_expr(lhs),
                _ => {
                    // self.current_token is a valid binop
                    let op = self.current_token.clone();
                    self.next();
                    let rhs = self.parse_expr_bp(precedence);
                    Expr::Binary {
                        lhs: Box::new(lhs),
                        op,
                        rhs: Box::new(rhs),
                    }
                }
            }
        }

        lhs
    }

    /// Parses a prefix (atom) expression.
    fn parse_prefix_expr(&mut self) -> Expr {
        match self.current_token {
            Token::IntLit(_)
            | Token::FloatLit(_)
            | Token::StringLit(_)
            | Token::True
            | Token::False => self.parse_literal_expr(),
            Token::Identifier(_) => self.parse_identifier_expr(),
            Token::LogicalNot | Token::Minus => {
                let op = self.current_token.clone();
                self.next();
                Expr::Unary {
                    op,
                    arg: Box::new(self.parse_expr_bp(Precedence::Prefix)),
                }
            }
            Token::OpenParen => self.parse_grouped_expr(),
            Token::OpenBracket => self.parse_array_lit(),
            Token::OpenBrace => self.parse_dict_lit(),
            Token::If => self.parse_if_expr(),
            Token::While => self.parse_while_expr(),
            Token::For => self.parse_for_expr(),
            Token::Fn => self.parse_fn_lit(),
            Token::Eof => {
                self.error("unexpected end of file".to_string());
                Expr::Error
            }
            _ => {
                let found = self.describe_current();
                self.error(format!("no prefix parse function for {} found", found));
                self.next(); // skip the offending token
                Expr::Error
            }
        }
    }

    /* Expressions.Literals */
    /// Parses a literal expression.
    /// A literal can be a number, string or bool literal.
    fn parse_literal_expr(&mut self) -> Expr {
        let val = match self.current_token.clone() {
            Token::IntLit(lit) => match lit.parse() {
                Ok(val) => Expr::IntLit(val),
                Err(_) => {
                    let message = format!("could not parse `{}` as integer", lit);
                    self.error(message);
                    Expr::Error
                }
            },
            Token::FloatLit(lit) => match lit.parse() {
                Ok(val) => Expr::FloatLit(val),
                Err(_) => {
                    let message = format!("could not parse `{}` as float", lit);
                    self.error(message);
                    Expr::Error
                }
            },
            Token::StringLit(val) => Expr::StringLit(val),
            Token::True => Expr::BoolLit(true),
            Token::False => Expr::BoolLit(false),
            _ => {
                self.unexpected();
                Expr::Error
            }
        };
        self.next(); // eat parsed token, also on error so that parsing makes progress
        val
    }

    /* Expressions.Identifier */
    fn parse_identifier_expr(&mut self) -> Expr {
        match self.expect_ident() {
            Some(ident) => Expr::Identifier(ident),
            None => Expr::Error,
        }
    }

    fn parse_grouped_expr(&mut self) -> Expr {
        self.expect(Token::OpenParen);
        let expr = self.parse_expr();
        self.expect(Token::CloseParen);
        expr
    }

    /// Parses a comma separated list of expressions up to and including `end`.
    /// A trailing comma is allowed.
    fn parse_expr_list(&mut self, end: Token) -> Vec<Expr> {
        let mut list = Vec::new();
        if self.eat(end.clone()) {
            return list;
        }

        loop {
            list.push(self.parse_expr());

            if self.eat(end.clone()) {
                break;
            } else if !self.eat(Token::Comma) {
                self.expected(&format!("`,` or {}", end));
                break;
            } else if self.eat(end.clone()) {
                break;
            }
        }
        list
    }

    /* Expressions.Collections */
    fn parse_array_lit(&mut self) -> Expr {
        self.expect(Token::OpenBracket);
        Expr::ArrayLit(self.parse_expr_list(Token::CloseBracket))
    }

    fn parse_dict_lit(&mut self) -> Expr {
        self.expect(Token::OpenBrace);

        let mut pairs = Vec::new();
        if self.eat(Token::CloseBrace) {
            return Expr::DictLit(pairs);
        }

        loop {
            let key = self.parse_expr();
            if !self.expect(Token::Colon) {
                return Expr::Error;
            }
            let value = self.parse_expr();
            pairs.push((key, value));

            if self.eat(Token::CloseBrace) {
                break;
            } else if !self.eat(Token::Comma) {
                self.expected("`,` or `}`");
                return Expr::Error;
            } else if self.eat(Token::CloseBrace) {
                break;
            }
        }

        Expr::DictLit(pairs)
    }

    /* Expressions.ControlFlow */
    fn parse_if_expr(&mut self) -> Expr {
        self.expect(Token::If);
        let condition = self.parse_expr();
        let consequence = self.parse_block();

        let mut else_ifs = Vec::new();
        while self.eat(Token::ElseIf) {
            let condition = self.parse_expr();
            let consequence = self.parse_block();
            else_ifs.push(ElseIf {
                condition,
                consequence,
            });
        }

        let alternative = if self.eat(Token::Else) {
            Some(self.parse_block())
        } else {
            None
        };

        Expr::If {
            condition: Box::new(condition),
            consequence,
            else_ifs,
            alternative,
        }
    }

    fn parse_while_expr(&mut self) -> Expr {
        self.expect(Token::While);
        let condition = self.parse_expr();
        let body = self.parse_block();
        Expr::While {
            condition: Box::new(condition),
            body,
        }
    }

    /// Parses `for first[, second] in iterable { body }`.
    /// `in` is not a keyword, it is matched as an identifier.
    fn parse_for_expr(&mut self) -> Expr {
        self.expect(Token::For);
        let first = match self.expect_ident() {
            Some(ident) => ident,
            None => return Expr::Error,
        };
        let second = if self.eat(Token::Comma) {
            match self.expect_ident() {
                Some(ident) => Some(ident),
                None => return Expr::Error,
            }
        } else {
            None
        };

        match &self.current_token {
            Token::Identifier(ident) if ident == "in" => {
                self.next();
            }
            _ => {
                self.expected("`in`");
                return Expr::Error;
            }
        }

        let iterable = self.parse_expr();
        let body = self.parse_block();
        Expr::For {
            first,
            second,
            iterable: Box::new(iterable),
            body,
        }
    }

    /* Expressions.Functions */
    fn parse_fn_lit(&mut self) -> Expr {
        self.expect(Token::Fn);
        if !self.expect(Token::OpenParen) {
            return Expr::Error;
        }

        let mut params = Vec::new();
        if !self.eat(Token::CloseParen) {
            loop {
                match self.expect_ident() {
                    Some(ident) => params.push(ident),
                    None => return Expr::Error,
                }

                if self.eat(Token::CloseParen) {
                    break;
                } else if !self.eat(Token::Comma) {
                    self.expected("`,` or `)`");
                    return Expr::Error;
                }
            }
        }

        let body = self.parse_block();
        Expr::FnLit {
            ident: None,
            params,
            body: Rc::new(body),
        }
    }

    fn parse_call_expr(&mut self, callee: Expr) -> Expr {
        self.expect(Token::OpenParen);
        let args = self.parse_expr_list(Token::CloseParen);
        Expr::FnCall {
            callee: Box::new(callee),
            args,
        }
    }

    fn parse_index_expr(&mut self, collection: Expr) -> Expr {
        self.expect(Token::OpenBracket);
        let index = self.parse_expr();
        self.expect(Token::CloseBracket);
        Expr::Index {
            collection: Box::new(collection),
            index: Box::new(index),
        }
    }

    /// Parses the right hand side of an assignment. Assignment is right associative.
    fn parse_assign_expr(&mut self, target: Expr) -> Expr {
        let valid_target = matches!(target, Expr::Identifier(_) | Expr::Index { .. });
        if !valid_target {
            self.error(format!("invalid assignment target: {}", target));
        }

        let op = self.current_token.clone();
        self.next();
        let value = self.parse_expr_bp(Precedence::Lowest);

        if !valid_target {
            return Expr::Error;
        }
        Expr::Assign {
            target: Box::new(target),
            op,
            value: Box::new(value),
        }
    }
}
