//! Lexical environments: reference-counted records with a parent pointer
//! (spec.md §3/§9 — "a mapping from symbol to value with pointer to a
//! parent scope", implemented as spec.md §9 literally suggests: "`Arc`/
//! `shared_ptr`"). The evaluator itself never schedules work across
//! threads, but `schist`'s built-in REPL (`commands::schist_cmd`) awaits
//! a cooperative `readline` while holding the environment live across
//! that suspension point, so the value graph has to satisfy the same
//! `Send` bound every other async seam in this crate does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::value::Value;

pub struct Scope {
    vars: HashMap<String, Value>,
    parent: Option<Environment>,
}

/// A cheap-to-clone handle to a scope. Closures capture one of these;
/// cloning shares the underlying record rather than copying it.
#[derive(Clone)]
pub struct Environment(Arc<Mutex<Scope>>);

impl Environment {
    pub fn root() -> Self {
        Environment(Arc::new(Mutex::new(Scope {
            vars: HashMap::new(),
            parent: None,
        })))
    }

    pub fn child_of(parent: &Environment) -> Self {
        Environment(Arc::new(Mutex::new(Scope {
            vars: HashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    pub fn define(&self, name: &str, value: Value) {
        self.0.lock().unwrap().vars.insert(name.to_string(), value);
    }

    /// Re-bind an existing name, searching outward through parent scopes.
    /// Returns `false` if `name` is unbound anywhere in the chain.
    pub fn set(&self, name: &str, value: Value) -> bool {
        let parent = {
            let mut scope = self.0.lock().unwrap();
            if scope.vars.contains_key(name) {
                scope.vars.insert(name.to_string(), value);
                return true;
            }
            scope.parent.clone()
        };
        match parent {
            Some(parent) => parent.set(name, value),
            None => false,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let (found, parent) = {
            let scope = self.0.lock().unwrap();
            (scope.vars.get(name).cloned(), scope.parent.clone())
        };
        found.or_else(|| parent.and_then(|parent| parent.lookup(name)))
    }
}
