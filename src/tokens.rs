use regex::Regex;
use std::fmt;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Token<'a> {
    OpenBracket,
    CloseBracket,
    PlainChars(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::OpenBracket => "(",
            Token::CloseBracket => ")",
            Token::PlainChars(chars) => chars,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn create_token(captured: &str) -> Token {
    match captured {
        "(" => Token::OpenBracket,
        ")" => Token::CloseBracket,
        _ => Token::PlainChars(captured),
    }
}

/// Split `input` into bracket and atom tokens. Brackets always stand alone,
/// so `(+ 1(- 2 3))` and `( + 1 ( - 2 3 ) )` tokenize identically.
pub fn tokenize(input: &str) -> Vec<Token> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                 # ignore whitespace in this pattern & allow comments
                [()]                # a lone bracket
                |[^\s()]+           # or a run of anything else that isn't whitespace
            "#
        )
        .unwrap();
    }
    TOKEN_RE
        .find_iter(input)
        .map(|m| create_token(m.as_str()))
        .collect()
}
