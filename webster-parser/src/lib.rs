//! Lexer, abstract syntax tree and Pratt parser for the Webster language.

pub mod ast;
pub mod lexer;
pub mod parser;

use webster_source::Source;

/// Parses a whole program. Syntax errors are accumulated in `source.errors`.
pub fn parse(source: &Source) -> ast::Program {
    parser::Parser::new(source).parse_program()
}
