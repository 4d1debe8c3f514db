use crate::builtins;
use crate::types::{Symbol, Value, TRUTH};
use std::collections::HashMap;
use std::fmt;
use std::iter::FromIterator;

#[derive(Debug)]
pub struct UnknownSymbol(pub Symbol);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' not found", self.0)
    }
}

#[derive(Debug, Default)]
pub struct Frame(HashMap<Symbol, Value>);

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &Symbol) -> Option<&Value> {
        self.0.get(key)
    }

    fn insert(&mut self, key: Symbol, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }
}

impl FromIterator<(Symbol, Value)> for Frame {
    fn from_iter<I: IntoIterator<Item = (Symbol, Value)>>(iter: I) -> Self {
        Frame(iter.into_iter().collect())
    }
}

/// The global bindings plus one frame per active user-procedure call.
///
/// Lookup only ever consults the innermost call frame and then the global
/// frame. A callee never sees its caller's parameters, and rebinding a
/// parameter never disturbs the caller.
#[derive(Debug, Default)]
pub struct Environment {
    global: Frame,
    calls: Vec<Frame>,
}

impl Environment {
    /// An environment with no bindings at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        log::debug!("push frame, depth {}", self.calls.len() + 1);
        self.calls.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        self.calls.pop();
    }

    /// Number of user-procedure calls currently in progress.
    pub fn depth(&self) -> usize {
        self.calls.len()
    }

    /// Bind `key` in the innermost call frame if it already lives there,
    /// otherwise in the global frame.
    pub fn set<T>(&mut self, key: T, value: Value) -> Option<Value>
    where
        T: Into<Symbol>,
    {
        let key = key.into();
        match self.calls.last_mut() {
            Some(frame) if frame.get(&key).is_some() => frame.insert(key, value),
            _ => self.global.insert(key, value),
        }
    }

    pub fn get(&self, key: &Symbol) -> Option<&Value> {
        self.calls
            .last()
            .and_then(|frame| frame.get(key))
            .or_else(|| self.global.get(key))
    }

    pub fn fetch(&self, key: &Symbol) -> Result<Value, UnknownSymbol> {
        self.get(key)
            .cloned()
            .ok_or_else(|| UnknownSymbol(key.clone()))
    }
}

/// Built-in procedures under their canonical names, the math constants and
/// the truth sentinel.
pub fn standard() -> Environment {
    let mut env = Environment::empty();
    for (&name, &func) in builtins::CORE.iter() {
        env.set(name, Value::Primitive(func));
    }
    for &(name, value) in builtins::CONSTANTS {
        env.set(name, Value::Float(value));
    }
    env.set(TRUTH, Value::truth());
    env.set(TRUTH.to_uppercase(), Value::truth());
    env
}
