use crate::evaluator::{ArithmeticError, Error, Result};
use crate::printer;
use crate::types::{Arity, Int, Number, PrimitiveFn, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::f64::consts;
use std::io::Write;

fn grab_numbers(args: &[Value]) -> Result<Vec<Number>> {
    let type_check: std::result::Result<Vec<_>, _> = args.iter().map(|o| o.as_number()).collect();
    type_check.map_err(Error::TypeMismatch)
}

fn grab_pair(args: &[Value]) -> Result<(Number, Number)> {
    match grab_numbers(args)?.as_slice() {
        &[x, y] => Ok((x, y)),
        _ => unreachable!("arity is checked before primitives are called"),
    }
}

// Integers stay integers until a float shows up or the integer op overflows.
fn arithmetic_(
    args: &[Value],
    int_op: fn(Int, Int) -> Option<Int>,
    float_op: fn(f64, f64) -> f64,
) -> Result {
    match grab_pair(args)? {
        (Number::Integer(x), Number::Integer(y)) => int_op(x, y)
            .map(Value::Integer)
            .ok_or(Error::Arithmetic(ArithmeticError::Overflow)),
        (x, y) => Ok(Value::Float(float_op(x.as_f64(), y.as_f64()))),
    }
}

const SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::exactly(2),
};

fn sum_(args: &[Value], _out: &mut dyn Write) -> Result {
    arithmetic_(args, Int::checked_add, |x, y| x + y)
}

const SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::exactly(2),
};

fn sub_(args: &[Value], _out: &mut dyn Write) -> Result {
    arithmetic_(args, Int::checked_sub, |x, y| x - y)
}

const MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::exactly(2),
};

fn mul_(args: &[Value], _out: &mut dyn Write) -> Result {
    arithmetic_(args, Int::checked_mul, |x, y| x * y)
}

const DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: Arity::exactly(2),
};

// True division: the quotient is a float even for two integers.
fn div_(args: &[Value], _out: &mut dyn Write) -> Result {
    match grab_pair(args)? {
        (_, y) if y.is_zero() => Err(Error::Arithmetic(ArithmeticError::DivideByZero)),
        (x, y) => Ok(Value::Float(x.as_f64() / y.as_f64())),
    }
}

fn compare(x: Number, y: Number) -> Option<Ordering> {
    match (x, y) {
        (Number::Integer(x), Number::Integer(y)) => Some(x.cmp(&y)),
        (x, y) => x.as_f64().partial_cmp(&y.as_f64()),
    }
}

fn comparison_(args: &[Value], test: fn(Ordering) -> bool) -> Result {
    let (x, y) = grab_pair(args)?;
    Ok(Value::from_bool(compare(x, y).map(test).unwrap_or(false)))
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            const $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args: &[Value], _out: &mut dyn Write| comparison_(args, Ordering::[<is_ $NAME:lower>]),
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_primitive!(<, LT);
comparison_primitive!(>, GT);

const EQUAL: PrimitiveFn = PrimitiveFn {
    name: "=",
    fn_ptr: equal_,
    arity: Arity::exactly(2),
};

fn equal_(args: &[Value], _out: &mut dyn Write) -> Result {
    Ok(Value::from_bool(args[0] == args[1]))
}

const BEGIN: PrimitiveFn = PrimitiveFn {
    name: "BEGIN",
    fn_ptr: begin_,
    arity: Arity::at_least(1),
};

// The operands were already evaluated in order; only the last one is kept.
fn begin_(args: &[Value], _out: &mut dyn Write) -> Result {
    Ok(args[args.len() - 1].clone())
}

const NULL_TEST: PrimitiveFn = PrimitiveFn {
    name: "NULL?",
    fn_ptr: null_test_,
    arity: Arity::exactly(1),
};

fn null_test_(args: &[Value], _out: &mut dyn Write) -> Result {
    Ok(Value::from_bool(args[0].is_null()))
}

const PRINT: PrimitiveFn = PrimitiveFn {
    name: "PRINT",
    fn_ptr: print_,
    arity: Arity::exactly(1),
};

fn print_(args: &[Value], out: &mut dyn Write) -> Result {
    writeln!(out, "{}", printer::pr_str(&args[0]))?;
    Ok(Value::falsity())
}

fn float_math_(args: &[Value], name: &'static str, op: fn(f64) -> f64) -> Result {
    let x = args[0]
        .as_number()
        .map_err(Error::TypeMismatch)?
        .as_f64();
    match op(x) {
        y if y.is_nan() && !x.is_nan() => Err(Error::Arithmetic(ArithmeticError::Domain(name))),
        y => Ok(Value::Float(y)),
    }
}

macro_rules! float_primitive {
    ($NAME:ident) => {
        paste::item! {
            const $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($NAME),
                fn_ptr: |args: &[Value], _out: &mut dyn Write| {
                    float_math_(args, stringify!($NAME), f64::[<$NAME:lower>])
                },
                arity: Arity::exactly(1),
            };
        }
    };
}

float_primitive!(SQRT);
float_primitive!(EXP);
float_primitive!(SIN);
float_primitive!(COS);
float_primitive!(TAN);

const LOG: PrimitiveFn = PrimitiveFn {
    name: "LOG",
    fn_ptr: log_,
    arity: Arity::exactly(1),
};

fn log_(args: &[Value], _out: &mut dyn Write) -> Result {
    match args[0].as_number().map_err(Error::TypeMismatch)?.as_f64() {
        x if x <= 0.0 => Err(Error::Arithmetic(ArithmeticError::Domain("LOG"))),
        x => Ok(Value::Float(x.ln())),
    }
}

const ABS: PrimitiveFn = PrimitiveFn {
    name: "ABS",
    fn_ptr: abs_,
    arity: Arity::exactly(1),
};

fn abs_(args: &[Value], _out: &mut dyn Write) -> Result {
    match args[0].as_number().map_err(Error::TypeMismatch)? {
        Number::Integer(x) => x
            .checked_abs()
            .map(Value::Integer)
            .ok_or(Error::Arithmetic(ArithmeticError::Overflow)),
        Number::Float(x) => Ok(Value::Float(x.abs())),
    }
}

fn rounding_(args: &[Value], op: fn(f64) -> f64) -> Result {
    match args[0].as_number().map_err(Error::TypeMismatch)? {
        Number::Integer(x) => Ok(Value::Integer(x)),
        Number::Float(x) => {
            let rounded = op(x);
            if rounded.is_finite() && rounded.abs() < Int::MAX as f64 {
                Ok(Value::Integer(rounded as Int))
            } else {
                Err(Error::Arithmetic(ArithmeticError::Overflow))
            }
        }
    }
}

const FLOOR: PrimitiveFn = PrimitiveFn {
    name: "FLOOR",
    fn_ptr: |args: &[Value], _out: &mut dyn Write| rounding_(args, f64::floor),
    arity: Arity::exactly(1),
};

const CEIL: PrimitiveFn = PrimitiveFn {
    name: "CEIL",
    fn_ptr: |args: &[Value], _out: &mut dyn Write| rounding_(args, f64::ceil),
    arity: Arity::exactly(1),
};

const POW: PrimitiveFn = PrimitiveFn {
    name: "POW",
    fn_ptr: pow_,
    arity: Arity::exactly(2),
};

fn pow_(args: &[Value], _out: &mut dyn Write) -> Result {
    let (x, y) = grab_pair(args)?;
    Ok(Value::Float(x.as_f64().powf(y.as_f64())))
}

/// Numeric constants bound in the standard environment.
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", consts::PI),
    ("e", consts::E),
    ("tau", 2.0 * consts::PI),
];

static PRIMITIVES: &[&PrimitiveFn] = &[
    // Arithmetic
    &SUM,
    &SUB,
    &MUL,
    &DIV,
    // Comparisons
    &EQUAL,
    &LT,
    &GT,
    // Sequencing and lists
    &BEGIN,
    &NULL_TEST,
    // Output
    &PRINT,
    // Math
    &SQRT,
    &EXP,
    &LOG,
    &SIN,
    &COS,
    &TAN,
    &ABS,
    &FLOOR,
    &CEIL,
    &POW,
];

type Namespace = HashMap<&'static str, &'static PrimitiveFn>;
lazy_static! {
    /// Every primitive, keyed by its upper-case name.
    pub static ref CORE: Namespace = PRIMITIVES.iter().map(|&func| (func.name, func)).collect();
}
