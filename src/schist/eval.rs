//! The trampolined evaluator. `step` returns either a finished `Value` or
//! a `Bounce` (a deferred expr+env pair); `eval` is the public wrapper
//! that loops until nothing is left to bounce, giving every tail call —
//! closure application, `if`/`cond`/`let` branches, `begin`'s last
//! expression — unbounded recursion without growing the Rust stack
//! (spec.md §4.9).

use std::sync::Arc;

use super::env::Environment;
use super::value::{BuiltinFn, Closure, Value};
use super::SchistError;

enum Step {
    Done(Value),
    Bounce(Value, Environment),
}

pub fn eval(expr: &Value, env: &Environment) -> Result<Value, SchistError> {
    let mut expr = expr.clone();
    let mut env = env.clone();
    loop {
        match step(&expr, &env)? {
            Step::Done(value) => return Ok(value),
            Step::Bounce(next_expr, next_env) => {
                expr = next_expr;
                env = next_env;
            }
        }
    }
}

fn step(expr: &Value, env: &Environment) -> Result<Step, SchistError> {
    match expr {
        Value::Number(_) | Value::Closure(_) | Value::Builtin(_) | Value::IoMarker(_) => {
            Ok(Step::Done(expr.clone()))
        }
        Value::Symbol(name) => match env.lookup(name) {
            Some(value) => Ok(Step::Done(value)),
            None => Ok(Step::Done(Value::Symbol(name.clone()))),
        },
        Value::List(items) => eval_list(items, env),
    }
}

fn eval_list(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    if items.is_empty() {
        return Ok(Step::Done(Value::List(Vec::new())));
    }

    if let Value::Symbol(name) = &items[0] {
        match name.as_str() {
            "quote" => return Ok(Step::Done(expect_arg(items, 1, "quote")?.clone())),
            "if" => return eval_if(items, env),
            "cond" => return eval_cond(items, env),
            "lambda" => return eval_lambda(items, env),
            "define" => return eval_define(items, env),
            "set!" => return eval_set(items, env),
            "begin" => return eval_begin(&items[1..], env),
            "let" => return eval_let(items, env),
            "eval" => return eval_meta_eval(items, env),
            "apply" => return eval_meta_apply(items, env),
            _ => {}
        }
    }

    let head = eval(&items[0], env)?;
    let mut args = Vec::with_capacity(items.len() - 1);
    for item in &items[1..] {
        args.push(eval(item, env)?);
    }
    apply(head, args)
}

fn expect_arg<'a>(items: &'a [Value], index: usize, form: &str) -> Result<&'a Value, SchistError> {
    items
        .get(index)
        .ok_or_else(|| SchistError::Syntax(format!("{}: missing argument", form)))
}

fn eval_if(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let cond = eval(expect_arg(items, 1, "if")?, env)?;
    if cond.truthy() {
        Ok(Step::Bounce(expect_arg(items, 2, "if")?.clone(), env.clone()))
    } else if let Some(else_branch) = items.get(3) {
        Ok(Step::Bounce(else_branch.clone(), env.clone()))
    } else {
        Ok(Step::Done(Value::List(Vec::new())))
    }
}

fn eval_cond(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    for clause in &items[1..] {
        let clause = clause
            .as_list()
            .ok_or_else(|| SchistError::Syntax("cond: clause must be a list".to_string()))?;
        let is_else = matches!(clause.first(), Some(Value::Symbol(s)) if s == "else");
        let matched = if is_else {
            true
        } else {
            let test = clause
                .first()
                .ok_or_else(|| SchistError::Syntax("cond: empty clause".to_string()))?;
            eval(test, env)?.truthy()
        };
        if matched {
            return eval_begin(&clause[1..], env);
        }
    }
    Ok(Step::Done(Value::List(Vec::new())))
}

fn eval_lambda(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let params_list = expect_arg(items, 1, "lambda")?
        .as_list()
        .ok_or_else(|| SchistError::Syntax("lambda: parameter list must be a list".to_string()))?;
    let mut params = Vec::with_capacity(params_list.len());
    for param in params_list {
        let name = param
            .as_symbol()
            .ok_or_else(|| SchistError::Syntax("lambda: parameters must be symbols".to_string()))?;
        params.push(name.to_string());
    }
    let body = expect_arg(items, 2, "lambda")?.clone();
    Ok(Step::Done(Value::Closure(Arc::new(Closure {
        params,
        body,
        env: env.clone(),
    }))))
}

fn eval_define(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let name = expect_arg(items, 1, "define")?
        .as_symbol()
        .ok_or_else(|| SchistError::Syntax("define: name must be a symbol".to_string()))?
        .to_string();
    let value = eval(expect_arg(items, 2, "define")?, env)?;
    env.define(&name, value.clone());
    Ok(Step::Done(value))
}

fn eval_set(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let name = expect_arg(items, 1, "set!")?
        .as_symbol()
        .ok_or_else(|| SchistError::Syntax("set!: name must be a symbol".to_string()))?;
    let value = eval(expect_arg(items, 2, "set!")?, env)?;
    if env.set(name, value.clone()) {
        Ok(Step::Done(value))
    } else {
        Err(SchistError::Unbound(name.to_string()))
    }
}

fn eval_begin(body: &[Value], env: &Environment) -> Result<Step, SchistError> {
    if body.is_empty() {
        return Ok(Step::Done(Value::List(Vec::new())));
    }
    for expr in &body[..body.len() - 1] {
        eval(expr, env)?;
    }
    Ok(Step::Bounce(body[body.len() - 1].clone(), env.clone()))
}

/// `(let ((x v) …) body)`, equivalent to applying `(lambda (x…) body)` to
/// `(v…)` (spec.md §4.9): bindings are evaluated in the *outer* scope,
/// then installed into one fresh child scope the body runs in.
fn eval_let(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let bindings = expect_arg(items, 1, "let")?
        .as_list()
        .ok_or_else(|| SchistError::Syntax("let: bindings must be a list".to_string()))?;
    let body = expect_arg(items, 2, "let")?;

    let child = Environment::child_of(env);
    for binding in bindings {
        let pair = binding
            .as_list()
            .ok_or_else(|| SchistError::Syntax("let: each binding must be (name value)".to_string()))?;
        let name = pair
            .first()
            .and_then(Value::as_symbol)
            .ok_or_else(|| SchistError::Syntax("let: binding name must be a symbol".to_string()))?;
        let value_expr = pair
            .get(1)
            .ok_or_else(|| SchistError::Syntax("let: binding missing a value".to_string()))?;
        let value = eval(value_expr, env)?;
        child.define(name, value);
    }
    Ok(Step::Bounce(body.clone(), child))
}

/// `eval` and `apply` are handled here rather than as ordinary
/// `BuiltinFn`s: both need access to the environment/trampoline, which a
/// plain `fn(&[Value]) -> Result<Value, SchistError>` built-in cannot
/// reach while staying pure (spec.md §4.9's "this separation keeps the
/// evaluator pure" applies to I/O, not to these meta forms).
fn eval_meta_eval(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let target = eval(expect_arg(items, 1, "eval")?, env)?;
    Ok(Step::Bounce(target, env.clone()))
}

fn eval_meta_apply(items: &[Value], env: &Environment) -> Result<Step, SchistError> {
    let func = eval(expect_arg(items, 1, "apply")?, env)?;
    let args_value = eval(expect_arg(items, 2, "apply")?, env)?;
    let args = args_value
        .as_list()
        .ok_or_else(|| SchistError::Type("apply: second argument must be a list".to_string()))?
        .to_vec();
    apply(func, args)
}

fn apply(func: Value, args: Vec<Value>) -> Result<Step, SchistError> {
    match func {
        Value::Builtin(builtin) => call_builtin(&builtin, &args).map(Step::Done),
        Value::Closure(closure) => {
            if closure.params.len() != args.len() {
                return Err(SchistError::Arity(format!(
                    "expected {} argument(s), got {}",
                    closure.params.len(),
                    args.len()
                )));
            }
            let call_env = Environment::child_of(&closure.env);
            for (param, arg) in closure.params.iter().zip(args) {
                call_env.define(param, arg);
            }
            Ok(Step::Bounce(closure.body.clone(), call_env))
        }
        other => Err(SchistError::NotAFunction(format!("{}", other))),
    }
}

fn call_builtin(builtin: &BuiltinFn, args: &[Value]) -> Result<Value, SchistError> {
    (builtin.func)(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schist::{global_environment, read_one};

    #[test]
    fn begin_evaluates_in_order_and_returns_the_last() {
        let env = global_environment();
        let expr = read_one("(begin (define x 1) (define x 2) x)").unwrap();
        assert_eq!(eval(&expr, &env).unwrap().as_number(), Some(2.0));
    }

    #[test]
    fn cond_else_always_matches() {
        let env = global_environment();
        let expr = read_one("(cond (0 1) (else 2))").unwrap();
        assert_eq!(eval(&expr, &env).unwrap().as_number(), Some(2.0));
    }

    #[test]
    fn set_bang_on_unbound_name_errors() {
        let env = global_environment();
        let expr = read_one("(set! nope 1)").unwrap();
        assert!(eval(&expr, &env).is_err());
    }

    #[test]
    fn meta_apply_calls_a_builtin_with_a_list_of_args() {
        let env = global_environment();
        let expr = read_one("(apply + (list 1 2 3))").unwrap();
        assert_eq!(eval(&expr, &env).unwrap().as_number(), Some(6.0));
    }

    #[test]
    fn meta_eval_evaluates_a_quoted_expression() {
        let env = global_environment();
        let expr = read_one("(eval (quote (+ 1 2)))").unwrap();
        assert_eq!(eval(&expr, &env).unwrap().as_number(), Some(3.0));
    }
}
