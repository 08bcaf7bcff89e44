//! The Webster scripting language: parse and evaluate source text in one call.

use thiserror::Error;
use webster_eval::{eval_program, RuntimeError};
use webster_source::{ErrorReporter, Source, SyntaxError};
use webster_value::{EnvRef, Environment, Object};

pub use webster_eval as eval;
pub use webster_parser as parser;
pub use webster_value as value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// The source did not parse. Nothing was evaluated.
    #[error("{}", render_syntax_errors(.0))]
    Syntax(Vec<SyntaxError>),
    #[error("Error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// One labelled line per error.
fn render_syntax_errors(errors: &[SyntaxError]) -> String {
    let rendered = ErrorReporter::from(errors.to_vec()).to_string();
    rendered.trim_end().to_string()
}

/// Parses and evaluates `source` in a fresh global environment.
pub fn interpret(source: &str) -> Result<Object, InterpretError> {
    interpret_in(source, &Environment::new().into_ref())
}

/// Parses and evaluates `source` in `env`. Bindings made by the program stay in `env`.
pub fn interpret_in(source: &str, env: &EnvRef) -> Result<Object, InterpretError> {
    let source = Source::new(source);
    let program = webster_parser::parse(&source);
    if !source.has_no_errors() {
        return Err(InterpretError::Syntax(source.errors.errors()));
    }

    Ok(eval_program(&program, env)?)
}
