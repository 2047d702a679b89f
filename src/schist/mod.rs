//! Schist: a minimal Lisp dialect embedded in the shell, evaluated by a
//! trampolined environment-passing interpreter (spec.md §4.9).

mod builtins;
mod env;
mod eval;
mod reader;
mod value;

pub use env::Environment;
pub use reader::read_one;
pub use value::{IoMarker, Value};

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SchistError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unbound symbol: {0}")]
    Unbound(String),

    #[error("arity mismatch: {0}")]
    Arity(String),

    #[error("not a function: {0}")]
    NotAFunction(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("type error: {0}")]
    Type(String),
}

/// Evaluate one already-parsed expression to completion, driving the
/// trampoline until no thunk remains.
pub fn eval(expr: &Value, env: &Environment) -> Result<Value, SchistError> {
    eval::eval(expr, env)
}

/// A fresh global environment with every standard built-in bound.
pub fn global_environment() -> Environment {
    let env = Environment::root();
    builtins::install(&env);
    env
}
