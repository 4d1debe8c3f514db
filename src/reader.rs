use crate::tokens::{tokenize, Token};
use crate::types::{Int, Value};
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Reader<'a, 'b> = Peekable<slice::Iter<'b, Token<'a>>>;

pub type Result<T = Value> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    NoMoreTokens,
    UnclosedList,
    UnexpectedCloseBracket,
    TrailingTokens(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoMoreTokens => write!(f, "expected an expression but the input ended"),
            Error::UnclosedList => write!(f, "input ended inside an open '('"),
            Error::UnexpectedCloseBracket => write!(f, "unmatched ')'"),
            Error::TrailingTokens(rest) => {
                write!(f, "unexpected input after the expression: {}", rest)
            }
        }
    }
}

/// Read exactly one expression from `input`.
pub fn read_str(input: &str) -> Result {
    parse(&tokenize(input))
}

/// Read every top-level expression in `input`, in order.
pub fn read_all(input: &str) -> Result<Vec<Value>> {
    let tokens = tokenize(input);
    let mut reader = tokens.iter().peekable();
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(read_form(&mut reader)?);
    }
    Ok(forms)
}

pub fn parse(tokens: &[Token]) -> Result {
    let mut reader = tokens.iter().peekable();
    let form = read_form(&mut reader)?;
    match reader.next() {
        None => Ok(form),
        Some(Token::CloseBracket) => Err(Error::UnexpectedCloseBracket),
        Some(first) => {
            let rest = std::iter::once(first)
                .chain(reader)
                .map(Token::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            Err(Error::TrailingTokens(rest))
        }
    }
}

// Open lists are kept on an explicit stack, so nesting depth is bounded by
// memory rather than by the call stack.
fn read_form(reader: &mut Reader) -> Result {
    let mut open: Vec<Vec<Value>> = Vec::new();
    loop {
        let value = match reader.next() {
            Some(Token::OpenBracket) => {
                open.push(Vec::new());
                continue;
            }
            Some(Token::CloseBracket) => match open.pop() {
                Some(elements) => Value::wrap_list(elements),
                None => return Err(Error::UnexpectedCloseBracket),
            },
            Some(Token::PlainChars(chars)) => read_atom(chars),
            None if open.is_empty() => return Err(Error::NoMoreTokens),
            None => return Err(Error::UnclosedList),
        };
        match open.last_mut() {
            Some(elements) => elements.push(value),
            None => return Ok(value),
        }
    }
}

fn read_atom(chars: &str) -> Value {
    if let Ok(x) = chars.parse::<Int>() {
        Value::Integer(x)
    } else if let Ok(x) = chars.parse::<f64>() {
        Value::Float(x)
    } else {
        Value::new_symbol(chars)
    }
}
