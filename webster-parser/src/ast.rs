//! Abstract syntax tree.

use crate::lexer::Token;
use std::fmt;
use std::rc::Rc;

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A braced sequence of statements. A block does not introduce a scope by itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let ident = initializer;`
    LetDeclaration { ident: String, initializer: Expr },
    /// `var ident = initializer;`, binds exactly like `let`.
    VarDeclaration { ident: String, initializer: Expr },
    /// `return;` or `return expr;`
    ReturnStmt(Option<Expr>),
    ExprStmt(Expr),
    Error,
}

/// An `elseif condition { ... }` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expr,
    pub consequence: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    StringLit(String),
    /// An identifier (e.g. `foo`).
    Identifier(String),
    /// `[a, b, c]`
    ArrayLit(Vec<Expr>),
    /// `{key: value, ...}`
    DictLit(Vec<(Expr, Expr)>),
    /// A unary expression (e.g. `-x`).
    Unary { op: Token, arg: Box<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: Block,
        else_ifs: Vec<ElseIf>,
        alternative: Option<Block>,
    },
    While {
        condition: Box<Expr>,
        body: Block,
    },
    /// `for first, second in iterable { body }`.
    /// Over an array `first` is the element and `second` the is-last flag,
    /// over a dictionary `first` is the key and `second` the value.
    For {
        first: String,
        second: Option<String>,
        iterable: Box<Expr>,
        body: Block,
    },
    /// `fn(params) { body }`. `ident` is only known when the literal is the initializer of a binding.
    FnLit {
        ident: Option<String>,
        params: Vec<String>,
        body: Rc<Block>,
    },
    FnCall { callee: Box<Expr>, args: Vec<Expr> },
    Index { collection: Box<Expr>, index: Box<Expr> },
    /// `target = value`. The parser only produces identifier and index targets.
    Assign {
        target: Box<Expr>,
        op: Token,
        value: Box<Expr>,
    },
    Error,
}

/// Writes `items` separated by `sep`.
fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.statements, " ")
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        join(f, &self.statements, " ")?;
        f.write_str(" }")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::LetDeclaration { ident, initializer } => write!(f, "let {} = {};", ident, initializer),
            Stmt::VarDeclaration { ident, initializer } => write!(f, "var {} = {};", ident, initializer),
            Stmt::ReturnStmt(Some(value)) => write!(f, "return {};", value),
            Stmt::ReturnStmt(None) => f.write_str("return;"),
            Stmt::ExprStmt(expr) => write!(f, "{}", expr),
            Stmt::Error => f.write_str("<error>"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntLit(val) => write!(f, "{}", val),
            Expr::FloatLit(val) => write!(f, "{:?}", val),
            Expr::BoolLit(val) => write!(f, "{}", val),
            Expr::StringLit(val) => write!(f, "{:?}", val),
            Expr::Identifier(ident) => f.write_str(ident),
            Expr::ArrayLit(elements) => {
                f.write_str("[")?;
                join(f, elements, ", ")?;
                f.write_str("]")
            }
            Expr::DictLit(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Expr::Unary { op, arg } => write!(f, "({}{})", op.as_str(), arg),
            Expr::Binary { lhs, op, rhs } => write!(f, "({} {} {})", lhs, op.as_str(), rhs),
            Expr::If {
                condition,
                consequence,
                else_ifs,
                alternative,
            } => {
                write!(f, "if {} {}", condition, consequence)?;
                for else_if in else_ifs {
                    write!(f, " elseif {} {}", else_if.condition, else_if.consequence)?;
                }
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expr::While { condition, body } => write!(f, "while {} {}", condition, body),
            Expr::For {
                first,
                second,
                iterable,
                body,
            } => {
                write!(f, "for {}", first)?;
                if let Some(second) = second {
                    write!(f, ", {}", second)?;
                }
                write!(f, " in {} {}", iterable, body)
            }
            Expr::FnLit { ident, params, body } => {
                f.write_str("fn")?;
                if let Some(ident) = ident {
                    write!(f, " {}", ident)?;
                }
                f.write_str("(")?;
                join(f, params, ", ")?;
                write!(f, ") {}", body)
            }
            Expr::FnCall { callee, args } => {
                write!(f, "{}(", callee)?;
                join(f, args, ", ")?;
                f.write_str(")")
            }
            Expr::Index { collection, index } => write!(f, "({}[{}])", collection, index),
            Expr::Assign { target, op, value } => write!(f, "{} {} {}", target, op.as_str(), value),
            Expr::Error => f.write_str("<error>"),
        }
    }
}
