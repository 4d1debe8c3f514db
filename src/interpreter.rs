use crate::config::Config;
use crate::environment::{self, Environment};
use crate::evaluator::{self, Context};
use crate::procedures::ProcedureRegistry;
use crate::reader;
use crate::types::Value;
use std::fmt;
use std::io::{self, Write};

pub type Result = std::result::Result<Value, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Error::Read(e)
    }
}

impl From<evaluator::Error> for Error {
    fn from(e: evaluator::Error) -> Self {
        Error::Eval(e)
    }
}

/// One independent interpreter: its own bindings, procedures and output.
pub struct Interpreter<W: Write = io::Stdout> {
    env: Environment,
    procedures: ProcedureRegistry,
    out: W,
    config: Config,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout(), Config::default())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W, config: Config) -> Self {
        Interpreter {
            env: environment::standard(),
            procedures: ProcedureRegistry::new(),
            out,
            config,
        }
    }

    pub fn eval(&mut self, ast: &Value) -> evaluator::Result {
        let mut ctx = Context::new(
            &mut self.env,
            &mut self.procedures,
            &mut self.out,
            &self.config,
        );
        let result = evaluator::eval(ast, &mut ctx);
        self.out.flush()?;
        result
    }

    /// Read a single expression and evaluate it.
    pub fn rep(&mut self, line: &str) -> Result {
        let ast = reader::read_str(line)?;
        Ok(self.eval(&ast)?)
    }

    /// Evaluate every statement of `text` in order, carrying on past failures.
    /// Nothing runs if the text cannot be read.
    pub fn run_program(&mut self, text: &str) -> reader::Result<Vec<evaluator::Result>> {
        let statements = program_statements(reader::read_all(text)?);
        log::debug!("running {} statements", statements.len());
        Ok(statements.iter().map(|ast| self.eval(ast)).collect())
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn procedures(&self) -> &ProcedureRegistry {
        &self.procedures
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// A program written as one list of statements, `((SET A 1) (PRINT A))`, is
/// unwrapped into those statements. Anything else is taken form by form.
pub fn program_statements(mut forms: Vec<Value>) -> Vec<Value> {
    let is_block = match forms.as_slice() {
        [Value::List(list)] => {
            !list.is_empty()
                && list
                    .iter()
                    .all(|element| element.as_list().map_or(false, |l| !l.is_empty()))
        }
        _ => false,
    };
    match (is_block, forms.pop()) {
        (true, Some(Value::List(list))) => list.to_vec(),
        (_, Some(last)) => {
            forms.push(last);
            forms
        }
        (_, None) => forms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    fn interpreter() -> Interpreter<Vec<u8>> {
        Interpreter::with_output(Vec::new(), Config::default())
    }

    fn output(interpreter: Interpreter<Vec<u8>>) -> String {
        String::from_utf8(interpreter.into_output()).unwrap()
    }

    #[test]
    fn rep_reads_and_evaluates() {
        let mut i = interpreter();
        assert_eq!(i.rep("(+ 1 2)").unwrap(), Value::Integer(3));
        assert!(matches!(i.rep("(+ 1 2"), Err(Error::Read(reader::Error::UnclosedList))));
        assert!(matches!(i.rep("(+ 1 ())"), Err(Error::Eval(_))));
    }

    #[test]
    fn statement_blocks_are_unwrapped() {
        let forms = reader::read_all("((SET A 1) (PRINT A))").unwrap();
        assert_eq!(program_statements(forms).len(), 2);
    }

    #[test]
    fn single_expressions_are_not_unwrapped() {
        let forms = reader::read_all("(BEGIN (SET A 1) (PRINT A))").unwrap();
        assert_eq!(program_statements(forms).len(), 1);
        let forms = reader::read_all("((CAR (CONS + 0)) 1 2)").unwrap();
        assert_eq!(program_statements(forms).len(), 1);
        let forms = reader::read_all("(SET A 1) (PRINT A)").unwrap();
        assert_eq!(program_statements(forms).len(), 2);
        assert!(program_statements(vec![]).is_empty());
    }

    #[test]
    fn effects_carry_between_statements() {
        let mut i = interpreter();
        let results = i
            .run_program("((SET A 10) (DEFINE TWICE (X) (* 2 X)) (PRINT (TWICE A)))")
            .unwrap();
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(output(i), "20\n");
    }

    #[test]
    fn a_failing_statement_does_not_stop_the_rest() {
        let mut i = interpreter();
        let results = i.run_program("(PRINT 1) (CAR 7) (PRINT 2)").unwrap();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(output(i), "1\n2\n");
    }

    #[test]
    fn malformed_programs_run_nothing() {
        let mut i = interpreter();
        assert!(i.run_program("(PRINT 1) (PRINT 2").is_err());
        assert_eq!(output(i), "");
    }

    #[test]
    fn accessors_expose_interpreter_state() {
        let config = Config {
            max_depth: Some(8),
            ..Config::default()
        };
        let mut i = Interpreter::with_output(Vec::new(), config);
        i.rep("(SET A 3)").unwrap();
        i.rep("(PRINT A)").unwrap();
        assert_eq!(
            i.environment().fetch(&Symbol::from("A")).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(i.config().max_depth, Some(8));
        assert_eq!(i.output().as_slice(), b"3\n");
    }

    #[test]
    fn interpreters_do_not_share_state() {
        let mut first = interpreter();
        let mut second = interpreter();
        first.rep("(SET A 1)").unwrap();
        first.rep("(DEFINE F () 1)").unwrap();
        assert!(second.rep("A").is_err());
        assert!(second.procedures().is_empty());
        assert_eq!(first.procedures().len(), 1);
    }
}
