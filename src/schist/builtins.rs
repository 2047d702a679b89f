//! Arithmetic, comparison, list, logic, type-predicate and I/O built-ins
//! (spec.md §4.9). Each is a plain `fn(&[Value]) -> Result<Value,
//! SchistError>` — no environment or evaluator access, which keeps this
//! module pure; `eval`/`apply` need that access and so live in
//! `schist::eval` instead.

use std::sync::Arc;

use super::env::Environment;
use super::value::{BuiltinFn, IoMarker, Value};
use super::SchistError;

const TRUE: &str = "#t";
const FALSE: &str = "#f";

fn bool_value(b: bool) -> Value {
    Value::Symbol(if b { TRUE } else { FALSE }.to_string())
}

fn number_args(args: &[Value], form: &str) -> Result<Vec<f64>, SchistError> {
    args.iter()
        .map(|v| v.as_number().ok_or_else(|| SchistError::Type(format!("{}: expected a number", form))))
        .collect()
}

fn add(args: &[Value]) -> Result<Value, SchistError> {
    Ok(Value::Number(number_args(args, "+")?.into_iter().sum()))
}

fn sub(args: &[Value]) -> Result<Value, SchistError> {
    let nums = number_args(args, "-")?;
    match nums.split_first() {
        None => Err(SchistError::Arity("-: requires at least one argument".to_string())),
        Some((first, [])) => Ok(Value::Number(-first)),
        Some((first, rest)) => Ok(Value::Number(rest.iter().fold(*first, |acc, n| acc - n))),
    }
}

fn mul(args: &[Value]) -> Result<Value, SchistError> {
    Ok(Value::Number(number_args(args, "*")?.into_iter().product()))
}

fn div(args: &[Value]) -> Result<Value, SchistError> {
    let nums = number_args(args, "/")?;
    match nums.split_first() {
        None => Err(SchistError::Arity("/: requires at least one argument".to_string())),
        Some((first, [])) => {
            if *first == 0.0 {
                Err(SchistError::DivisionByZero)
            } else {
                Ok(Value::Number(1.0 / first))
            }
        }
        Some((first, rest)) => {
            let mut acc = *first;
            for n in rest {
                if *n == 0.0 {
                    return Err(SchistError::DivisionByZero);
                }
                acc /= n;
            }
            Ok(Value::Number(acc))
        }
    }
}

fn numeric_eq(args: &[Value]) -> Result<Value, SchistError> {
    let nums = number_args(args, "=")?;
    Ok(bool_value(nums.windows(2).all(|w| w[0] == w[1])))
}

/// Structural equality across both value kinds `eq` is meaningfully
/// applied to in this dialect: numbers and symbols.
fn eq(args: &[Value]) -> Result<Value, SchistError> {
    if args.len() != 2 {
        return Err(SchistError::Arity("eq: requires exactly two arguments".to_string()));
    }
    let result = match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        _ => false,
    };
    Ok(bool_value(result))
}

fn chained_compare(args: &[Value], form: &str, op: fn(f64, f64) -> bool) -> Result<Value, SchistError> {
    let nums = number_args(args, form)?;
    Ok(bool_value(nums.windows(2).all(|w| op(w[0], w[1]))))
}

fn lt(args: &[Value]) -> Result<Value, SchistError> {
    chained_compare(args, "<", |a, b| a < b)
}
fn gt(args: &[Value]) -> Result<Value, SchistError> {
    chained_compare(args, ">", |a, b| a > b)
}
fn le(args: &[Value]) -> Result<Value, SchistError> {
    chained_compare(args, "<=", |a, b| a <= b)
}
fn ge(args: &[Value]) -> Result<Value, SchistError> {
    chained_compare(args, ">=", |a, b| a >= b)
}

fn list_fn(args: &[Value]) -> Result<Value, SchistError> {
    Ok(Value::List(args.to_vec()))
}

fn car(args: &[Value]) -> Result<Value, SchistError> {
    let list = single_list_arg(args, "car")?;
    list.first().cloned().ok_or_else(|| SchistError::Type("car: empty list".to_string()))
}

fn cdr(args: &[Value]) -> Result<Value, SchistError> {
    let list = single_list_arg(args, "cdr")?;
    if list.is_empty() {
        return Err(SchistError::Type("cdr: empty list".to_string()));
    }
    Ok(Value::List(list[1..].to_vec()))
}

fn cons(args: &[Value]) -> Result<Value, SchistError> {
    if args.len() != 2 {
        return Err(SchistError::Arity("cons: requires exactly two arguments".to_string()));
    }
    let tail = args[1]
        .as_list()
        .ok_or_else(|| SchistError::Type("cons: second argument must be a list".to_string()))?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::List(items))
}

fn length(args: &[Value]) -> Result<Value, SchistError> {
    let list = single_list_arg(args, "length")?;
    Ok(Value::Number(list.len() as f64))
}

fn null(args: &[Value]) -> Result<Value, SchistError> {
    let list = single_list_arg(args, "null?")?;
    Ok(bool_value(list.is_empty()))
}

fn single_list_arg<'a>(args: &'a [Value], form: &str) -> Result<&'a [Value], SchistError> {
    match args {
        [single] => single.as_list().ok_or_else(|| SchistError::Type(format!("{}: expected a list", form))),
        _ => Err(SchistError::Arity(format!("{}: requires exactly one argument", form))),
    }
}

fn not(args: &[Value]) -> Result<Value, SchistError> {
    match args {
        [single] => Ok(bool_value(!single.truthy())),
        _ => Err(SchistError::Arity("not: requires exactly one argument".to_string())),
    }
}

/// `and`/`or` are built-ins here, not special forms, per spec.md §4.9 —
/// both evaluate every argument eagerly rather than short-circuiting.
fn and(args: &[Value]) -> Result<Value, SchistError> {
    Ok(bool_value(args.iter().all(Value::truthy)))
}

fn or(args: &[Value]) -> Result<Value, SchistError> {
    Ok(bool_value(args.iter().any(Value::truthy)))
}

fn is_number(args: &[Value]) -> Result<Value, SchistError> {
    one_arg(args, "number?").map(|v| bool_value(v.is_number()))
}

fn is_symbol(args: &[Value]) -> Result<Value, SchistError> {
    one_arg(args, "symbol?").map(|v| bool_value(v.is_symbol()))
}

fn is_list(args: &[Value]) -> Result<Value, SchistError> {
    one_arg(args, "list?").map(|v| bool_value(v.is_list()))
}

fn is_function(args: &[Value]) -> Result<Value, SchistError> {
    one_arg(args, "function?").map(|v| bool_value(v.is_function()))
}

fn one_arg<'a>(args: &'a [Value], form: &str) -> Result<&'a Value, SchistError> {
    match args {
        [single] => Ok(single),
        _ => Err(SchistError::Arity(format!("{}: requires exactly one argument", form))),
    }
}

fn display(args: &[Value]) -> Result<Value, SchistError> {
    Ok(Value::IoMarker(IoMarker::Display(Box::new(one_arg(args, "display")?.clone()))))
}

fn write(args: &[Value]) -> Result<Value, SchistError> {
    Ok(Value::IoMarker(IoMarker::Write(Box::new(one_arg(args, "write")?.clone()))))
}

fn print(args: &[Value]) -> Result<Value, SchistError> {
    Ok(Value::IoMarker(IoMarker::Print(Box::new(one_arg(args, "print")?.clone()))))
}

fn newline(args: &[Value]) -> Result<Value, SchistError> {
    if !args.is_empty() {
        return Err(SchistError::Arity("newline: takes no arguments".to_string()));
    }
    Ok(Value::IoMarker(IoMarker::Newline))
}

/// `(read)` with no argument yields the `Read` marker the REPL driver
/// resolves via `Context::readline` (see `schist_cmd`'s top-level-only
/// handling, documented in DESIGN.md). `(read "...")` parses its string
/// argument immediately, which needs no suspension: since this reader has
/// no dedicated string-literal token type (§4.9's reader grammar only
/// names numbers and symbols), the argument surfaces as the `Symbol` the
/// tokenizer already produced from a `"…"`-wrapped word; surrounding
/// quote characters are stripped before the text is re-parsed as a form.
fn read(args: &[Value]) -> Result<Value, SchistError> {
    match args {
        [] => Ok(Value::IoMarker(IoMarker::Read)),
        [Value::Symbol(s)] => {
            let inner = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s);
            super::reader::read_one(inner).map_err(|e| SchistError::Syntax(e.to_string()))
        }
        [_] => Err(SchistError::Type("read: string argument must be a symbol token".to_string())),
        _ => Err(SchistError::Arity("read: takes at most one argument".to_string())),
    }
}

macro_rules! install_builtin {
    ($env:expr, $name:expr, $func:expr) => {
        $env.define(
            $name,
            Value::Builtin(Arc::new(BuiltinFn { name: $name, func: $func })),
        );
    };
}

pub fn install(env: &Environment) {
    install_builtin!(env, "+", add);
    install_builtin!(env, "-", sub);
    install_builtin!(env, "*", mul);
    install_builtin!(env, "/", div);
    install_builtin!(env, "=", numeric_eq);
    install_builtin!(env, "eq", eq);
    install_builtin!(env, "<", lt);
    install_builtin!(env, ">", gt);
    install_builtin!(env, "<=", le);
    install_builtin!(env, ">=", ge);
    install_builtin!(env, "list", list_fn);
    install_builtin!(env, "car", car);
    install_builtin!(env, "cdr", cdr);
    install_builtin!(env, "cons", cons);
    install_builtin!(env, "length", length);
    install_builtin!(env, "null?", null);
    install_builtin!(env, "not", not);
    install_builtin!(env, "and", and);
    install_builtin!(env, "or", or);
    install_builtin!(env, "number?", is_number);
    install_builtin!(env, "symbol?", is_symbol);
    install_builtin!(env, "list?", is_list);
    install_builtin!(env, "function?", is_function);
    install_builtin!(env, "display", display);
    install_builtin!(env, "write", write);
    install_builtin!(env, "print", print);
    install_builtin!(env, "newline", newline);
    install_builtin!(env, "read", read);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sums_all_arguments() {
        assert_eq!(add(&[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]).unwrap().as_number(), Some(6.0));
    }

    #[test]
    fn sub_with_one_argument_negates() {
        assert_eq!(sub(&[Value::Number(5.0)]).unwrap().as_number(), Some(-5.0));
    }

    #[test]
    fn div_by_zero_is_an_error() {
        assert!(div(&[Value::Number(1.0), Value::Number(0.0)]).is_err());
    }

    #[test]
    fn read_with_no_args_returns_the_suspend_marker() {
        assert!(matches!(read(&[]).unwrap(), Value::IoMarker(IoMarker::Read)));
    }

    #[test]
    fn read_with_a_quoted_string_parses_it_as_a_form() {
        let result = read(&[Value::Symbol("\"42\"".to_string())]).unwrap();
        assert_eq!(result.as_number(), Some(42.0));
    }

    #[test]
    fn comparisons_chain_across_all_arguments() {
        assert_eq!(lt(&[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]).unwrap().as_symbol(), Some("#t"));
        assert_eq!(lt(&[Value::Number(1.0), Value::Number(3.0), Value::Number(2.0)]).unwrap().as_symbol(), Some("#f"));
    }

    #[test]
    fn and_or_do_not_short_circuit_but_reduce_correctly() {
        assert_eq!(and(&[bool_value(true), bool_value(true)]).unwrap().as_symbol(), Some("#t"));
        assert_eq!(and(&[bool_value(true), bool_value(false)]).unwrap().as_symbol(), Some("#f"));
        assert_eq!(or(&[bool_value(false), bool_value(true)]).unwrap().as_symbol(), Some("#t"));
    }

    #[test]
    fn cons_prepends_onto_a_list() {
        let result = cons(&[Value::Number(1.0), Value::List(vec![Value::Number(2.0)])]).unwrap();
        assert_eq!(result.as_list().unwrap().len(), 2);
    }

    #[test]
    fn type_predicates_discriminate_kinds() {
        assert_eq!(is_number(&[Value::Number(1.0)]).unwrap().as_symbol(), Some("#t"));
        assert_eq!(is_symbol(&[Value::Number(1.0)]).unwrap().as_symbol(), Some("#f"));
        assert_eq!(is_list(&[Value::List(vec![])]).unwrap().as_symbol(), Some("#t"));
    }
}
