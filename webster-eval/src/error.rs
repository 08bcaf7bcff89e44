use thiserror::Error;
use webster_value::{Object, UnhashableKey};

/// A failure raised while evaluating a program. Never caught by the language itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("type mismatch: {lhs} {op} {rhs}")]
    TypeMismatch {
        lhs: &'static str,
        op: String,
        rhs: &'static str,
    },
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOperator { op: String, operand: &'static str },
    #[error("unknown operator: {lhs} {op} {rhs}")]
    UnknownInfixOperator {
        lhs: &'static str,
        op: String,
        rhs: &'static str,
    },
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: expected {expected}, got {got}")]
    WrongArgumentCount { expected: usize, got: usize },
    #[error("unusable as dictionary key: {0}")]
    UnusableAsKey(&'static str),
    #[error("index operator not supported: {collection}[{index}]")]
    IndexNotSupported {
        collection: &'static str,
        index: &'static str,
    },
    #[error("index out of range: {index} (length {len})")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("'{0}' cannot be used as iterable")]
    NotIterable(&'static str),
    #[error("cannot assign {value} to {target}")]
    CannotAssign { value: &'static str, target: String },
    #[error("invalid assignment target: {0}")]
    InvalidAssignTarget(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("unknown expression type")]
    UnknownExpression,
}

impl From<UnhashableKey> for RuntimeError {
    fn from(err: UnhashableKey) -> Self {
        RuntimeError::UnusableAsKey(err.0)
    }
}

/// Early exit from the evaluation of a statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Unwind {
    /// A `return` statement, intercepted by the nearest function call.
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

pub type EvalResult<T = Object> = Result<T, Unwind>;
