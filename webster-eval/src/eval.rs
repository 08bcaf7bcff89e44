//! Tree-walking evaluation of the AST.

use crate::ops::{assign_index, eval_binary, eval_index, eval_unary};
use crate::{EvalResult, RuntimeError, Unwind};
use std::rc::Rc;
use webster_parser::ast::{Block, Expr, Program, Stmt};
use webster_parser::lexer::Token;
use webster_stack::ensure_sufficient_stack;
use webster_value::{DictPair, Dictionary, EnvRef, Environment, Function, Object};

/// Evaluates a whole program in `env`. A top-level `return` ends the program with its value.
pub fn eval_program(program: &Program, env: &EnvRef) -> Result<Object, RuntimeError> {
    let mut result = Object::Null;
    for stmt in &program.statements {
        match eval_stmt(stmt, env) {
            Ok(value) => result = value,
            Err(Unwind::Return(value)) => return Ok(value),
            Err(Unwind::Error(err)) => {
                tracing::debug!(%err, "runtime error");
                return Err(err);
            }
        }
    }
    Ok(result)
}

/// Evaluates the statements of `block` in `env` itself, a block never opens a frame.
/// The value of the block is the value of its last statement.
pub fn eval_block(block: &Block, env: &EnvRef) -> EvalResult {
    let mut result = Object::Null;
    for stmt in &block.statements {
        result = eval_stmt(stmt, env)?;
    }
    Ok(result)
}

pub fn eval_stmt(stmt: &Stmt, env: &EnvRef) -> EvalResult {
    match stmt {
        Stmt::LetDeclaration { ident, initializer } | Stmt::VarDeclaration { ident, initializer } => {
            let value = eval_expr(initializer, env)?;
            env.borrow_mut().set(ident.as_str(), value);
            Ok(Object::Null)
        }
        Stmt::ReturnStmt(value) => {
            let value = match value {
                Some(value) => eval_expr(value, env)?,
                None => Object::Null,
            };
            Err(Unwind::Return(value))
        }
        Stmt::ExprStmt(expr) => eval_expr(expr, env),
        Stmt::Error => Err(RuntimeError::UnknownExpression.into()),
    }
}

pub fn eval_expr(expr: &Expr, env: &EnvRef) -> EvalResult {
    ensure_sufficient_stack(|| eval_expr_inner(expr, env))
}

fn eval_expr_inner(expr: &Expr, env: &EnvRef) -> EvalResult {
    match expr {
        Expr::IntLit(val) => Ok(Object::Integer(*val)),
        Expr::FloatLit(val) => Ok(Object::Float(*val)),
        Expr::BoolLit(val) => Ok(Object::Boolean(*val)),
        Expr::StringLit(val) => Ok(Object::String(val.clone())),
        Expr::Identifier(ident) => {
            let value = env.borrow().get(ident);
            value.ok_or_else(|| RuntimeError::IdentifierNotFound(ident.clone()).into())
        }
        Expr::ArrayLit(elements) => {
            let elements = eval_exprs(elements, env)?;
            Ok(Object::new_array(elements))
        }
        Expr::DictLit(pairs) => {
            let mut dict = Dictionary::new();
            for (key, value) in pairs {
                let key = eval_expr(key, env)?;
                if key.hash_key().is_none() {
                    return Err(RuntimeError::UnusableAsKey(key.type_name()).into());
                }
                let value = eval_expr(value, env)?;
                dict.insert(key, value).map_err(RuntimeError::from)?;
            }
            Ok(Object::new_dictionary(dict))
        }
        Expr::Unary { op, arg } => {
            let operand = eval_expr(arg, env)?;
            Ok(eval_unary(op, operand)?)
        }
        Expr::Binary { lhs, op, rhs } => match op {
            Token::LogicalAnd => {
                let result = eval_expr(lhs, env)?.is_truthy() && eval_expr(rhs, env)?.is_truthy();
                Ok(Object::Boolean(result))
            }
            Token::LogicalOr => {
                let result = eval_expr(lhs, env)?.is_truthy() || eval_expr(rhs, env)?.is_truthy();
                Ok(Object::Boolean(result))
            }
            _ => {
                let lhs = eval_expr(lhs, env)?;
                let rhs = eval_expr(rhs, env)?;
                Ok(eval_binary(op, lhs, rhs)?)
            }
        },
        Expr::If {
            condition,
            consequence,
            else_ifs,
            alternative,
        } => {
            if eval_expr(condition, env)?.is_truthy() {
                return eval_block(consequence, env);
            }
            for else_if in else_ifs {
                if eval_expr(&else_if.condition, env)?.is_truthy() {
                    return eval_block(&else_if.consequence, env);
                }
            }
            match alternative {
                Some(alternative) => eval_block(alternative, env),
                None => Ok(Object::Null),
            }
        }
        Expr::While { condition, body } => {
            let mut result = Object::Null;
            while eval_expr(condition, env)?.is_truthy() {
                result = eval_block(body, env)?;
            }
            Ok(result)
        }
        Expr::For {
            first,
            second,
            iterable,
            body,
        } => eval_for(first, second.as_deref(), eval_expr(iterable, env)?, body, env),
        Expr::FnLit { ident, params, body } => Ok(Object::Function(Rc::new(Function {
            ident: ident.clone(),
            params: params.clone(),
            body: Rc::clone(body),
            env: Rc::clone(env),
        }))),
        Expr::FnCall { callee, args } => {
            let callee = eval_expr(callee, env)?;
            let func = match callee {
                Object::Function(func) => func,
                other => return Err(RuntimeError::NotAFunction(other.type_name()).into()),
            };
            let args = eval_exprs(args, env)?;
            Ok(apply_function(&func, args)?)
        }
        Expr::Index { collection, index } => {
            let collection = eval_expr(collection, env)?;
            let index = eval_expr(index, env)?;
            Ok(eval_index(&collection, &index)?)
        }
        Expr::Assign { target, op, value } => {
            let value = eval_expr(value, env)?;
            if *op != Token::Equals {
                return Err(RuntimeError::CannotAssign {
                    value: value.type_name(),
                    target: target.to_string(),
                }
                .into());
            }
            match &**target {
                Expr::Identifier(ident) => Ok(env.borrow_mut().set(ident.as_str(), value)),
                Expr::Index { collection, index } => {
                    let collection = eval_expr(collection, env)?;
                    let index = eval_expr(index, env)?;
                    assign_index(&collection, index, value.clone())?;
                    Ok(value)
                }
                target => Err(RuntimeError::InvalidAssignTarget(target.to_string()).into()),
            }
        }
        Expr::Error => Err(RuntimeError::UnknownExpression.into()),
    }
}

/// Evaluates `exprs` left to right, stopping at the first failure.
fn eval_exprs(exprs: &[Expr], env: &EnvRef) -> EvalResult<Vec<Object>> {
    exprs.iter().map(|expr| eval_expr(expr, env)).collect()
}

/// Runs `body` once per element of `iterable`, each time in a fresh child frame of `env`.
/// The collection is snapshotted first so that the body may mutate it.
fn eval_for(
    first: &str,
    second: Option<&str>,
    iterable: Object,
    body: &Block,
    env: &EnvRef,
) -> EvalResult {
    let mut result = Object::Null;
    match iterable {
        Object::Array(elements) => {
            let elements = elements.borrow().to_vec();
            let last = elements.len().saturating_sub(1);
            for (i, element) in elements.into_iter().enumerate() {
                let frame = Environment::new_enclosed(env);
                {
                    let mut frame = frame.borrow_mut();
                    frame.set(first, element);
                    if let Some(is_last) = second {
                        frame.set(is_last, Object::Boolean(i == last));
                    }
                }
                result = eval_block(body, &frame)?;
            }
        }
        Object::Dictionary(dict) => {
            let pairs: Vec<DictPair> = dict.borrow().iter().cloned().collect();
            for DictPair { key, value } in pairs {
                let frame = Environment::new_enclosed(env);
                {
                    let mut frame = frame.borrow_mut();
                    frame.set(first, key);
                    if let Some(value_name) = second {
                        frame.set(value_name, value);
                    }
                }
                result = eval_block(body, &frame)?;
            }
        }
        other => return Err(RuntimeError::NotIterable(other.type_name()).into()),
    }
    Ok(result)
}

/// Calls `func` with `args` in a new frame enclosed by the function's defining environment.
pub fn apply_function(func: &Function, args: Vec<Object>) -> Result<Object, RuntimeError> {
    if args.len() != func.params.len() {
        return Err(RuntimeError::WrongArgumentCount {
            expected: func.params.len(),
            got: args.len(),
        });
    }
    tracing::trace!(
        function = func.ident.as_deref().unwrap_or("<anonymous>"),
        args = args.len(),
        "call"
    );

    let frame = Environment::new_enclosed(&func.env);
    {
        let mut frame = frame.borrow_mut();
        for (param, arg) in func.params.iter().zip(args) {
            frame.set(param.as_str(), arg);
        }
    }

    match eval_block(&func.body, &frame) {
        Ok(value) | Err(Unwind::Return(value)) => Ok(value),
        Err(Unwind::Error(err)) => Err(err),
    }
}
