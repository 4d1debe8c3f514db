use crate::types::Value;
use itertools::Itertools;
use std::fmt;

pub fn pr_str(object: &Value) -> String {
    match object {
        Value::List(elements) => format!("({})", elements.iter().map(pr_str).join(" ")),
        Value::Integer(value) => value.to_string(),
        Value::Float(value) => float_repr(*value),
        Value::Symbol(name) => name.to_string(),
        Value::Primitive(func) => format!("#<primitive {}>", func.name),
        Value::Procedure(procedure) => format!("#<procedure {}>", procedure.name),
    }
}

// Floats always keep a fractional part so that (/ 4 2) reads back as a float.
// Very large and very small magnitudes switch to exponent notation.
fn float_repr(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_nan() {
        String::from("nan")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "inf" } else { "-inf" })
    } else if magnitude != 0.0 && (magnitude >= 1e16 || magnitude < 1e-4) {
        exponent_repr(value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// Shortest mantissa, signed exponent of at least two digits: 1e+16, 2.5e-07.
fn exponent_repr(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => formatted.clone(),
        },
        None => formatted.clone(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_str(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_print_as_t_and_empty_parens() {
        assert_eq!(pr_str(&Value::truth()), "t");
        assert_eq!(pr_str(&Value::falsity()), "()");
    }

    #[test]
    fn nested_lists_use_parentheses() {
        let inner = Value::wrap_list(vec![Value::Integer(20)]);
        let outer = Value::wrap_list(vec![Value::Integer(10), inner, Value::falsity()]);
        assert_eq!(pr_str(&outer), "(10 (20) ())");
    }

    #[test]
    fn floats_keep_a_fractional_digit() {
        assert_eq!(pr_str(&Value::Float(2.0)), "2.0");
        assert_eq!(pr_str(&Value::Float(0.1)), "0.1");
        assert_eq!(pr_str(&Value::Float(-3.25)), "-3.25");
        assert_eq!(pr_str(&Value::Float(f64::INFINITY)), "inf");
        assert_eq!(pr_str(&Value::Float(f64::NAN)), "nan");
    }

    #[test]
    fn extreme_magnitudes_use_exponents() {
        assert_eq!(pr_str(&Value::Float(1e16)), "1e+16");
        assert_eq!(pr_str(&Value::Float(-2.5e20)), "-2.5e+20");
        assert_eq!(pr_str(&Value::Float(1e-5)), "1e-05");
        assert_eq!(pr_str(&Value::Float(1e15)), "1000000000000000.0");
        assert_eq!(pr_str(&Value::Float(0.0001)), "0.0001");
        assert_eq!(pr_str(&Value::Float(0.0)), "0.0");
    }

    #[test]
    fn integers_print_plainly() {
        assert_eq!(Value::Integer(-10).to_string(), "-10");
    }
}
