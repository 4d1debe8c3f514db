use crate::evaluator::{eval, Context, Error, Result};
use crate::procedures::Procedure;
use crate::types::{Arity, Symbol, TypeMismatch, Value};
use bimap::BiMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    If,
    While,
    Set,
    Car,
    Cdr,
    Cons,
    ListTest,
    NumberTest,
    SymbolTest,
    Define,
    True,
}

lazy_static! {
    static ref KEYWORDS: BiMap<String, SpecialForm> = {
        use SpecialForm::*;
        let mut m = BiMap::new();
        for &(keyword, form) in &[
            ("IF", If),
            ("WHILE", While),
            ("SET", Set),
            ("CAR", Car),
            ("CDR", Cdr),
            ("CONS", Cons),
            ("LIST?", ListTest),
            ("NUMBER?", NumberTest),
            ("SYMBOL?", SymbolTest),
            ("DEFINE", Define),
            ("T", True),
        ] {
            m.insert(String::from(keyword), form);
        }
        m
    };
}

impl SpecialForm {
    /// Look up an already upper-cased keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS.get_by_left(&keyword.to_string()).copied()
    }

    pub fn keyword(self) -> &'static str {
        KEYWORDS
            .get_by_right(&self)
            .map(String::as_str)
            .unwrap_or("special form")
    }

    pub fn arity(self) -> Arity {
        use SpecialForm::*;
        match self {
            True => Arity::exactly(0),
            Car | Cdr | ListTest | NumberTest | SymbolTest => Arity::exactly(1),
            While | Set | Cons => Arity::exactly(2),
            If | Define => Arity::exactly(3),
        }
    }
}

impl fmt::Display for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Operands arrive unevaluated; each form decides what to evaluate.
pub fn apply(form: SpecialForm, args: &[Value], ctx: &mut Context) -> Result {
    use SpecialForm::*;
    form.arity()
        .validate_for(args.len(), form.keyword())
        .map_err(Error::BadArgCount)?;
    match form {
        If => apply_if(args, ctx),
        While => apply_while(args, ctx),
        Set => apply_set(args, ctx),
        Car => apply_car(args, ctx),
        Cdr => apply_cdr(args, ctx),
        Cons => Ok(Value::wrap_list(vec![eval(&args[0], ctx)?, eval(&args[1], ctx)?])),
        ListTest => {
            let value = eval(&args[0], ctx)?;
            Ok(Value::from_bool(!(value.is_number() || value.is_symbol())))
        }
        NumberTest => eval(&args[0], ctx).map(|v| Value::from_bool(v.is_number())),
        SymbolTest => eval(&args[0], ctx).map(|v| Value::from_bool(v.is_symbol())),
        Define => apply_define(args, ctx),
        True => Ok(Value::truth()),
    }
}

pub fn apply_if(args: &[Value], ctx: &mut Context) -> Result {
    let condition = eval(&args[0], ctx)?;
    if condition.is_truth() {
        eval(&args[1], ctx)
    } else {
        eval(&args[2], ctx)
    }
}

pub fn apply_while(args: &[Value], ctx: &mut Context) -> Result {
    let (test, body) = (&args[0], &args[1]);
    let mut iterations: u64 = 0;
    while eval(test, ctx)?.is_truth() {
        iterations += 1;
        if let Some(limit) = ctx.config.max_iterations {
            if iterations > limit {
                return Err(Error::IterationLimit(limit));
            }
        }
        eval(body, ctx)?;
    }
    log::trace!("WHILE finished after {} iterations", iterations);
    Ok(Value::falsity())
}

pub fn apply_set(args: &[Value], ctx: &mut Context) -> Result {
    let key = args[0].as_symbol()?.clone();
    let value = eval(&args[1], ctx)?;
    log::debug!("set {} to {}", key, value);
    ctx.env.set(key, value.clone());
    Ok(value)
}

pub fn apply_car(args: &[Value], ctx: &mut Context) -> Result {
    let value = eval(&args[0], ctx)?;
    let list = value.as_list()?;
    match list.first() {
        Some(head) => Ok(head.clone()),
        None => Err(Error::TypeMismatch(TypeMismatch::EmptyList)),
    }
}

pub fn apply_cdr(args: &[Value], ctx: &mut Context) -> Result {
    let value = eval(&args[0], ctx)?;
    let list = value.as_list()?;
    Ok(Value::wrap_list(list.iter().skip(1).cloned().collect()))
}

/// `(DEFINE name (params...) body)`; nothing is evaluated.
pub fn apply_define(args: &[Value], ctx: &mut Context) -> Result {
    let name = args[0].as_symbol()?.clone();
    let parameters = args[1]
        .as_list()?
        .iter()
        .map(|p| p.as_symbol().map(Symbol::clone))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if ctx.procedures.contains(&name) {
        if !ctx.config.allow_redefinition {
            return Err(Error::Redefinition(name));
        }
        log::warn!("redefining procedure {}", name);
    }
    let procedure = Procedure {
        name: name.clone(),
        parameters,
        body: args[2].clone(),
    };
    log::debug!("define {}", procedure);
    ctx.procedures.define(procedure);
    Ok(Value::Symbol(name))
}
