//! The Schist value representation: a small tagged union, grounded on the
//! teacher's `query_engine::value::Value` enum shape and recursive
//! `Display` impl.

use std::fmt;
use std::sync::Arc;

use super::env::Environment;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    Symbol(String),
    List(Vec<Value>),
    Closure(Arc<Closure>),
    Builtin(Arc<BuiltinFn>),
    /// `{display,v}` / `{write,v}` / `{print,v}` / `{newline}` — the I/O
    /// markers `schist::builtins` produces. Never nests inside a list the
    /// evaluator constructs; only ever returned at the top level of an
    /// I/O built-in call.
    IoMarker(IoMarker),
}

#[derive(Clone)]
pub enum IoMarker {
    Display(Box<Value>),
    Write(Box<Value>),
    Print(Box<Value>),
    Newline,
    /// Requests interactive input. Only meaningful as the directly
    /// returned result of a top-level form (see `schist::builtins::read`).
    Read,
}

pub struct Closure {
    pub params: Vec<String>,
    pub body: Value,
    pub env: Environment,
}

pub struct BuiltinFn {
    pub name: &'static str,
    pub func: fn(&[Value]) -> Result<Value, super::SchistError>,
}

impl Value {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Symbol(s) => s != "#f",
            _ => true,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Builtin(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if *n == (*n as i64) as f64 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Closure(_) => write!(f, "#<closure>"),
            Value::Builtin(b) => write!(f, "#<builtin:{}>", b.name),
            Value::IoMarker(_) => write!(f, "#<io>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
