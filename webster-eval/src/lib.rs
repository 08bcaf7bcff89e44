//! Tree-walking evaluator for Webster programs.

mod error;
pub mod eval;
pub mod ops;

pub use error::{EvalResult, RuntimeError, Unwind};
pub use eval::{apply_function, eval_block, eval_expr, eval_program, eval_stmt};
