use crate::config::{Config, DEFAULT_MAX_DEPTH};
use crate::interpreter::Interpreter;
use ansi_term::Colour;
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::{fmt, fs};

#[derive(Debug)]
pub enum Error {
    Usage(clap::Error),
    BadNumber(&'static str, String),
    IOError(PathBuf, io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Usage(e) => write!(f, "{}", e),
            Error::BadNumber(flag, value) => write!(f, "--{} expects a number, not '{}'", flag, value),
            Error::IOError(path, e) => write!(f, "{}: {}", path.display(), e),
        }
    }
}

impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Self {
        Error::Usage(e)
    }
}

#[derive(Debug, PartialEq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    Expression(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Stdin => write!(f, "<stdin>"),
            Source::Expression(_) => write!(f, "<expression>"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Options {
    pub sources: Vec<Source>,
    pub config: Config,
}

fn app() -> App<'static, 'static> {
    App::new("kamin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs programs written in Kamin's Lisp")
        .arg(
            Arg::with_name("FILE")
                .help("Program files to run in order; '-' reads stdin")
                .multiple(true),
        )
        .arg(
            Arg::with_name("eval")
                .short("e")
                .long("eval")
                .value_name("EXPR")
                .help("Evaluate EXPR after the files")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("max-iterations")
                .long("max-iterations")
                .value_name("N")
                .help("Stop any WHILE loop after N iterations")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Maximum nesting of procedure calls")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("no-redefine")
                .long("no-redefine")
                .help("Reject DEFINE of a procedure name that already exists"),
        )
}

fn parse_number<T: std::str::FromStr>(
    matches: &ArgMatches,
    flag: &'static str,
) -> Result<Option<T>, Error> {
    match matches.value_of(flag) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::BadNumber(flag, value.to_string())),
    }
}

pub fn parse_args<I, T>(args: I) -> Result<Options, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = app().get_matches_from_safe(args)?;
    let mut sources: Vec<Source> = matches
        .values_of_os("FILE")
        .into_iter()
        .flatten()
        .map(|path| match path.to_str() {
            Some("-") => Source::Stdin,
            _ => Source::File(PathBuf::from(path)),
        })
        .collect();
    sources.extend(
        matches
            .values_of("eval")
            .into_iter()
            .flatten()
            .map(|expr| Source::Expression(expr.to_string())),
    );
    if sources.is_empty() {
        sources.push(Source::Stdin);
    }

    let config = Config {
        max_iterations: parse_number(&matches, "max-iterations")?,
        max_depth: parse_number(&matches, "max-depth")?.or(Some(DEFAULT_MAX_DEPTH)),
        allow_redefinition: !matches.is_present("no-redefine"),
    };
    Ok(Options { sources, config })
}

fn read_source(source: &Source) -> Result<String, Error> {
    match source {
        Source::File(path) => {
            fs::read_to_string(path).map_err(|e| Error::IOError(path.clone(), e))
        }
        Source::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut buffer)
                .map_err(|e| Error::IOError(PathBuf::from("<stdin>"), e))?;
            Ok(buffer)
        }
        Source::Expression(expr) => Ok(expr.clone()),
    }
}

pub fn report(origin: &dyn fmt::Display, error: &dyn fmt::Display) {
    let label = match atty::is(atty::Stream::Stderr) {
        true => Colour::Red.bold().paint("error").to_string(),
        false => String::from("error"),
    };
    eprintln!("{}: {}: {}", label, origin, error);
}

/// Run every source through one interpreter writing to `out`. Returns whether
/// every statement of every source succeeded.
pub fn run<W: Write>(options: Options, out: W) -> bool {
    let mut interpreter = Interpreter::with_output(out, options.config);
    let mut all_ok = true;
    for source in &options.sources {
        log::info!("running {}", source);
        let text = match read_source(source) {
            Ok(text) => text,
            Err(e) => {
                report(source, &e);
                all_ok = false;
                continue;
            }
        };
        match interpreter.run_program(&text) {
            Ok(results) => {
                for e in results.iter().filter_map(|r| r.as_ref().err()) {
                    report(source, e);
                    all_ok = false;
                }
            }
            Err(e) => {
                report(source, &format!("read error: {}", e));
                all_ok = false;
            }
        }
    }
    all_ok
}

pub fn launch<I, T>(args: I) -> Result<bool, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let options = parse_args(args)?;
    Ok(run(options, io::stdout()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_read_stdin() {
        let options = parse_args(vec!["kamin"]).unwrap();
        assert_eq!(options.sources, vec![Source::Stdin]);
        assert_eq!(options.config, Config::default());
    }

    #[test]
    fn files_then_expressions() {
        let options = parse_args(vec!["kamin", "a.lisp", "-", "-e", "(PRINT 1)"]).unwrap();
        assert_eq!(
            options.sources,
            vec![
                Source::File(PathBuf::from("a.lisp")),
                Source::Stdin,
                Source::Expression(String::from("(PRINT 1)")),
            ]
        );
    }

    #[test]
    fn limits_and_policy_flags() {
        let options = parse_args(vec![
            "kamin",
            "--max-iterations",
            "100",
            "--max-depth",
            "10",
            "--no-redefine",
            "-e",
            "1",
        ])
        .unwrap();
        assert_eq!(options.config.max_iterations, Some(100));
        assert_eq!(options.config.max_depth, Some(10));
        assert!(!options.config.allow_redefinition);
    }

    #[test]
    fn bad_numbers_are_rejected() {
        match parse_args(vec!["kamin", "--max-depth", "deep"]) {
            Err(Error::BadNumber("max-depth", value)) => assert_eq!(value, "deep"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn run_prints_and_reports_failure() {
        let mut out = Vec::new();
        let options = Options {
            sources: vec![
                Source::Expression(String::from("((SET A 2) (PRINT (* A A)))")),
                Source::Expression(String::from("(CAR A)")),
            ],
            config: Config::default(),
        };
        assert!(!run(options, &mut out));
        assert_eq!(String::from_utf8(out).unwrap(), "4\n");
    }

    #[test]
    fn missing_files_are_reported() {
        let options = Options {
            sources: vec![Source::File(PathBuf::from("/definitely/not/here.lisp"))],
            config: Config::default(),
        };
        assert!(!run(options, Vec::new()));
    }
}
