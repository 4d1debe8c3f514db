use crate::types::{Arity, Symbol, Value};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A procedure created by `DEFINE`. There are no closures: the body sees its
/// own parameters and the global bindings, nothing else.
#[derive(Debug)]
pub struct Procedure {
    pub name: Symbol,
    pub parameters: Vec<Symbol>,
    pub body: Value,
}

impl Procedure {
    pub fn arity(&self) -> Arity {
        Arity::exactly(self.parameters.len())
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} ({}) {})",
            self.name,
            self.parameters.iter().join(" "),
            self.body
        )
    }
}

#[derive(Debug, Default)]
pub struct ProcedureRegistry {
    procedures: HashMap<Symbol, Rc<Procedure>>,
}

impl ProcedureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `procedure` under its name, handing back whatever it replaced.
    pub fn define(&mut self, procedure: Procedure) -> Option<Rc<Procedure>> {
        self.procedures
            .insert(procedure.name.clone(), Rc::new(procedure))
    }

    pub fn get(&self, name: &Symbol) -> Option<Rc<Procedure>> {
        self.procedures.get(name).cloned()
    }

    pub fn contains(&self, name: &Symbol) -> bool {
        self.procedures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
