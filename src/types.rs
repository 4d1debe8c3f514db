extern crate derive_more;
use crate::evaluator;
use crate::procedures::Procedure;
use derive_more::{Deref, DerefMut};
use std::fmt;
use std::fmt::Formatter;
use std::io::Write;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

#[derive(Deref, DerefMut, Debug, Default)]
pub struct List(pub Vec<Value>);

// Unwinds nested lists with a worklist; the derived drop glue would recurse
// once per level.
impl Drop for List {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.0);
        while let Some(value) = pending.pop() {
            if let Value::List(rc) = value {
                if let Ok(mut list) = Rc::try_unwrap(rc) {
                    pending.append(&mut list.0);
                }
            }
        }
    }
}

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name the truth sentinel is spelled with.
pub const TRUTH: &str = "t";

#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(Int),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(x) => x as f64,
            Number::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Integer(x) => x == 0,
            Number::Float(x) => x == 0.0,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(x) => Value::Integer(x),
            Number::Float(x) => Value::Float(x),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: String,
    expected: Arity,
    got: usize,
}

impl BadArgCount {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn got(&self) -> usize {
        self.got
    }
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: name.to_string(),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Value], &mut dyn Write) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

/// A runtime value. Parsed source shares this representation, so a program
/// is itself a `Value`.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(Int),
    Float(f64),
    Symbol(Symbol),
    List(Rc<List>),
    Primitive(&'static PrimitiveFn),
    Procedure(Rc<Procedure>),
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotANumber(Value),
    NotAList(Value),
    NotASymbol(Value),
    EmptyList,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeMismatch::NotANumber(v) => write!(f, "expected a number, found {}", v),
            TypeMismatch::NotAList(v) => write!(f, "expected a list, found {}", v),
            TypeMismatch::NotASymbol(v) => write!(f, "expected a symbol, found {}", v),
            TypeMismatch::EmptyList => write!(f, "expected a non-empty list, found ()"),
        }
    }
}

impl Value {
    pub fn truth() -> Self {
        Self::new_symbol(TRUTH)
    }

    pub fn falsity() -> Self {
        Self::new_list()
    }

    pub fn from_bool(b: bool) -> Self {
        match b {
            true => Self::truth(),
            false => Self::falsity(),
        }
    }

    pub fn new_list() -> Self {
        Self::List(Rc::new(List::default()))
    }

    pub fn wrap_list(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(List(elements)))
    }

    pub fn new_symbol(name: &str) -> Self {
        Self::Symbol(Symbol::from(name))
    }

    /// Only the truth sentinel counts as true: every other value, not just
    /// `()`, sends `IF` and `WHILE` down their false path.
    pub fn is_truth(&self) -> bool {
        match self {
            Value::Symbol(s) => s.as_str() == TRUTH,
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::List(l) => l.is_empty(),
            _ => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Primitive(_) | Value::Procedure(_))
    }

    pub fn as_number(&self) -> Result<Number, TypeMismatch> {
        match self {
            Value::Integer(x) => Ok(Number::Integer(*x)),
            Value::Float(x) => Ok(Number::Float(*x)),
            _ => Err(TypeMismatch::NotANumber(self.clone())),
        }
    }

    pub fn as_list(&self) -> Result<&[Value], TypeMismatch> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(TypeMismatch::NotAList(self.clone())),
        }
    }

    pub fn as_symbol(&self) -> Result<&Symbol, TypeMismatch> {
        match self {
            Value::Symbol(s) => Ok(s),
            _ => Err(TypeMismatch::NotASymbol(self.clone())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Integer(x), Integer(y)) => x == y,
            (Float(x), Float(y)) => x == y,
            (Integer(x), Float(y)) | (Float(y), Integer(x)) => (*x as f64) == *y,
            (Symbol(x), Symbol(y)) => x == y,
            (List(x), List(y)) => equal_sequences(x, y),
            (Primitive(x), Primitive(y)) => x.name == y.name,
            (Procedure(x), Procedure(y)) => Rc::ptr_eq(x, y),
            _ => false,
        }
    }
}

fn equal_sequences(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_symbol_t_is_true() {
        assert!(Value::truth().is_truth());
        assert!(!Value::falsity().is_truth());
        assert!(!Value::new_symbol("T").is_truth());
        assert!(!Value::Integer(1).is_truth());
    }

    #[test]
    fn falsity_is_the_empty_list() {
        assert!(Value::falsity().is_null());
        assert!(!Value::wrap_list(vec![Value::falsity()]).is_null());
        assert!(!Value::Integer(0).is_null());
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(Value::Integer(2), Value::Float(2.0));
        assert_eq!(Value::Float(2.0), Value::Integer(2));
        assert_ne!(Value::Integer(2), Value::Float(2.5));
    }

    #[test]
    fn lists_compare_elementwise() {
        let a = Value::wrap_list(vec![Value::Integer(1), Value::new_symbol("x")]);
        let b = Value::wrap_list(vec![Value::Integer(1), Value::new_symbol("x")]);
        let c = Value::wrap_list(vec![Value::Integer(1)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Value::new_symbol("x"));
    }

    #[test]
    fn dropping_deeply_nested_lists() {
        let mut value = Value::Integer(0);
        for _ in 0..200_000 {
            value = Value::wrap_list(vec![value]);
        }
        let shared = value.clone();
        drop(value);
        assert!(!shared.is_null());
        drop(shared);
    }

    #[test]
    fn arity_reports_mismatch() {
        assert!(Arity::exactly(2).validate_for(2, "+").is_ok());
        let err = Arity::exactly(2).validate_for(3, "+").unwrap_err();
        assert_eq!(err.name(), "+");
        assert_eq!(err.got(), 3);
        assert!(Arity::at_least(1).validate_for(10, "BEGIN").is_ok());
        assert!(Arity::at_least(1).validate_for(0, "BEGIN").is_err());
    }

    #[test]
    fn accessors_report_the_offending_value() {
        match Value::Integer(3).as_list() {
            Err(TypeMismatch::NotAList(Value::Integer(3))) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Value::new_symbol("a").as_number().is_err());
        assert!(Value::Float(1.5).as_symbol().is_err());
    }
}
