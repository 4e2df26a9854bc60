//! Environment for variable bindings and declared functions
//!
//! There is a single flat environment. Loops and calls do not push scopes;
//! instead they remember which names existed on entry and drop the rest on
//! exit, so a called body sees (and may mutate) every caller variable.

use super::Value;
use crate::ast::{Block, TypeTag};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A value with its access counters (`c1` reads, `c2` writes)
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked {
    pub value: Value,
    pub reads: u64,
    pub writes: u64,
}

impl Tracked {
    pub fn new(value: Value) -> Self {
        Tracked {
            value,
            reads: 0,
            writes: 0,
        }
    }
}

/// What a name is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Scalar(Tracked),
    /// Each element carries its own counters
    Array(Vec<Tracked>),
}

impl Binding {
    /// Fresh binding with zeroed counters; arrays are split into tracked elements
    pub fn fresh(value: Value) -> Self {
        match value {
            Value::Array(items) => Binding::Array(items.into_iter().map(Tracked::new).collect()),
            other => Binding::Scalar(Tracked::new(other)),
        }
    }

    /// Underlying value, without touching counters
    pub fn value(&self) -> Value {
        match self {
            Binding::Scalar(t) => t.value.clone(),
            Binding::Array(items) => Value::Array(items.iter().map(|t| t.value.clone()).collect()),
        }
    }
}

/// Environment holding variable bindings
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous binding and its counters
    pub fn define(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.bindings.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Bindings sorted by name
    pub fn bindings(&self) -> Vec<(&str, &Binding)> {
        let mut all: Vec<_> = self
            .bindings
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
            .collect();
        all.sort_by_key(|(name, _)| *name);
        all
    }

    /// Names currently bound
    pub fn names(&self) -> HashSet<String> {
        self.bindings.keys().cloned().collect()
    }

    /// Drop every binding whose name is not in `keep`
    pub fn retain_names(&mut self, keep: &HashSet<String>) {
        self.bindings.retain(|name, _| keep.contains(name));
    }

    /// Bind call parameters, remembering what has to be undone on return
    pub fn enter_call(&mut self, params: &[String], args: Vec<Value>) -> CallFrame {
        let existing = self.names();
        let mut shadowed = Vec::new();
        for (param, arg) in params.iter().zip(args) {
            if existing.contains(param) {
                shadowed.push((param.clone(), self.bindings.get(param).cloned()));
            }
            self.define(param.clone(), Binding::fresh(arg));
        }
        CallFrame { existing, shadowed }
    }

    /// Undo a call: drop names the call introduced and put shadowed caller
    /// bindings back. Other caller variables keep the callee's writes.
    pub fn leave_call(&mut self, frame: CallFrame) {
        self.retain_names(&frame.existing);
        for (name, binding) in frame.shadowed.into_iter().rev() {
            if let Some(binding) = binding {
                self.bindings.insert(name, binding);
            }
        }
    }
}

/// Caller state captured by [`Environment::enter_call`]
#[derive(Debug)]
pub struct CallFrame {
    existing: HashSet<String>,
    shadowed: Vec<(String, Option<Binding>)>,
}

/// A declared function
#[derive(Debug)]
pub struct Function {
    pub name: String,
    /// `None` for `void`; recorded but not enforced
    pub ret: Option<TypeTag>,
    pub params: Vec<String>,
    pub body: Block,
}

/// Global function table; later declarations overwrite earlier ones
#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Rc<Function>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, function: Function) {
        self.functions.insert(function.name.clone(), Rc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<Rc<Function>> {
        self.functions.get(name).cloned()
    }

    pub fn clear(&mut self) {
        self.functions.clear();
    }

    /// Functions sorted by name
    pub fn functions(&self) -> Vec<Rc<Function>> {
        let mut all: Vec<_> = self.functions.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}
