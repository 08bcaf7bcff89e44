use super::*;

impl<'a> Parser<'a> {
    /// Parses a declaration (or statement).
    pub fn parse_declaration(&mut self) -> Stmt {
        match self.current_token {
            Token::Let | Token::Var => self.parse_binding_declaration(),
            _ => self.parse_stmt(),
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Stmt {
        match self.current_token {
            Token::Return => self.parse_return_stmt(),
            _ => {
                // expression statement
                let expr = self.parse_expr();
                self.eat(Token::Semi);
                match expr {
                    Expr::Error => Stmt::Error,
                    expr => Stmt::ExprStmt(expr),
                }
            }
        }
    }

    /// Parses a braced block. The braces do not open a scope by themselves.
    pub fn parse_block(&mut self) -> Block {
        if !self.expect(Token::OpenBrace) {
            return Block::default();
        }

        let mut statements = Vec::new();
        while self.current_token != Token::CloseBrace && self.current_token != Token::Eof {
            match self.parse_declaration() {
                Stmt::Error => {}
                stmt => statements.push(stmt),
            }
        }
        self.expect(Token::CloseBrace);

        Block { statements }
    }

    /// Parses `let ident = initializer;` and `var ident = initializer;`.
    fn parse_binding_declaration(&mut self) -> Stmt {
        let is_var = self.current_token == Token::Var;
        self.next(); // eat `let` or `var`

        let ident = match self.expect_ident() {
            Some(ident) => ident,
            None => return Stmt::Error,
        };
        if !self.expect(Token::Equals) {
            return Stmt::Error;
        }

        let mut initializer = self.parse_expr();
        self.eat(Token::Semi);

        if initializer == Expr::Error {
            return Stmt::Error;
        }
        // name the function after its binding for diagnostics
        if let Expr::FnLit { ident: fn_ident, .. } = &mut initializer {
            if fn_ident.is_none() {
                *fn_ident = Some(ident.clone());
            }
        }

        if is_var {
            Stmt::VarDeclaration { ident, initializer }
        } else {
            Stmt::LetDeclaration { ident, initializer }
        }
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        self.expect(Token::Return);
        let value = match self.current_token {
            Token::Semi | Token::CloseBrace | Token::Eof => None,
            _ => Some(self.parse_expr()),
        };
        self.eat(Token::Semi);
        Stmt::ReturnStmt(value)
    }
}
