use crate::builtins;
use crate::config::Config;
use crate::environment::{Environment, Frame, UnknownSymbol};
use crate::procedures::{Procedure, ProcedureRegistry};
use crate::special_forms::{self, SpecialForm};
use crate::types::{self, BadArgCount, PrimitiveFn, Symbol, TypeMismatch, Value};
use itertools::Itertools;
use std::fmt;
use std::io::Write;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum ArithmeticError {
    DivideByZero,
    Overflow,
    Domain(&'static str),
}

#[derive(Debug)]
pub enum Error {
    UnknownSymbol(UnknownSymbol),
    UnknownOperator(Value),
    TypeMismatch(types::TypeMismatch),
    BadArgCount(types::BadArgCount),
    Arithmetic(ArithmeticError),
    IterationLimit(u64),
    RecursionLimit(usize),
    Redefinition(Symbol),
    IOError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSymbol(e) => write!(f, "{}", e),
            Error::UnknownOperator(op) => write!(f, "'{}' is not a procedure", op),
            Error::TypeMismatch(e) => write!(f, "type mismatch: {}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::Arithmetic(ArithmeticError::DivideByZero) => write!(f, "cannot divide by zero!"),
            Error::Arithmetic(ArithmeticError::Overflow) => write!(f, "integer overflow"),
            Error::Arithmetic(ArithmeticError::Domain(name)) => {
                write!(f, "argument outside the domain of {}", name)
            }
            Error::IterationLimit(n) => write!(f, "WHILE gave up after {} iterations", n),
            Error::RecursionLimit(n) => write!(f, "procedure calls nested deeper than {}", n),
            Error::Redefinition(name) => write!(f, "procedure {} is already defined", name),
            Error::IOError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<types::TypeMismatch> for Error {
    fn from(t: TypeMismatch) -> Self {
        Self::TypeMismatch(t)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

/// Everything an evaluation may read or mutate. Built from the fields of an
/// `Interpreter` for the duration of one top-level evaluation.
pub struct Context<'a> {
    pub env: &'a mut Environment,
    pub procedures: &'a mut ProcedureRegistry,
    pub out: &'a mut dyn Write,
    pub config: &'a Config,
}

impl<'a> Context<'a> {
    pub fn new(
        env: &'a mut Environment,
        procedures: &'a mut ProcedureRegistry,
        out: &'a mut dyn Write,
        config: &'a Config,
    ) -> Self {
        Self {
            env,
            procedures,
            out,
            config,
        }
    }
}

pub fn eval(ast: &Value, ctx: &mut Context) -> Result {
    log::trace!("eval {}", ast);
    match ast {
        Value::Symbol(s) => lookup(s, ctx),
        Value::List(list) => match list.split_first() {
            None => Ok(Value::falsity()),
            Some((head, operands)) => apply_form(head, operands, ctx),
        },
        _ => Ok(ast.clone()),
    }
}

// A name defined only as a procedure evaluates to a reference to it, so it
// can be bound with SET and called through the variable.
fn lookup(symbol: &Symbol, ctx: &Context) -> Result {
    ctx.env.fetch(symbol).or_else(|e| {
        ctx.procedures
            .get(symbol)
            .map(Value::Procedure)
            .ok_or(Error::UnknownSymbol(e))
    })
}

fn apply_form(head: &Value, operands: &[Value], ctx: &mut Context) -> Result {
    if let Value::Symbol(name) = head {
        let keyword = name.to_uppercase();
        if let Some(form) = SpecialForm::from_keyword(&keyword) {
            log::trace!("special form {}", form);
            return special_forms::apply(form, operands, ctx);
        }
        if let Some(procedure) = ctx.procedures.get(name) {
            let args = evaluate_sequence_elementwise(operands, ctx)?;
            return call_procedure(&procedure, args, ctx);
        }
        if let Some(&func) = builtins::CORE.get(keyword.as_str()) {
            let args = evaluate_sequence_elementwise(operands, ctx)?;
            return call_primitive(func, &args, ctx.out);
        }
    }
    let callable = match head {
        Value::Symbol(name) => {
            lookup(name, ctx).map_err(|_| Error::UnknownOperator(head.clone()))?
        }
        _ => eval(head, ctx)?,
    };
    if !callable.is_callable() {
        return Err(Error::UnknownOperator(callable));
    }
    let args = evaluate_sequence_elementwise(operands, ctx)?;
    apply(&callable, args, ctx)
}

/// Apply an already evaluated callable to already evaluated arguments.
pub fn apply(callable: &Value, args: Vec<Value>, ctx: &mut Context) -> Result {
    match callable {
        Value::Primitive(f) => call_primitive(f, &args, ctx.out),
        Value::Procedure(p) => call_procedure(p, args, ctx),
        _ => Err(Error::UnknownOperator(callable.clone())),
    }
}

pub fn evaluate_sequence_elementwise(seq: &[Value], ctx: &mut Context) -> Result<Vec<Value>> {
    seq.iter().map(|obj| eval(obj, ctx)).collect()
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[Value], out: &mut dyn Write) -> Result {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, pretty_print_args(args));
    let result = (func.fn_ptr)(args, out);
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {}", func.name, e),
    }
    result
}

/// Bind the arguments in a fresh frame, evaluate the body, drop the frame.
pub fn call_procedure(procedure: &Procedure, args: Vec<Value>, ctx: &mut Context) -> Result {
    procedure
        .arity()
        .validate_for(args.len(), procedure.name.as_str())?;
    if let Some(limit) = ctx.config.max_depth {
        if ctx.env.depth() >= limit {
            return Err(Error::RecursionLimit(limit));
        }
    }
    log::trace!("Call {} with {}", procedure.name, pretty_print_args(&args));
    let frame: Frame = procedure.parameters.iter().cloned().zip(args).collect();
    ctx.env.push(frame);
    let result = eval(&procedure.body, ctx);
    ctx.env.pop();
    result
}
