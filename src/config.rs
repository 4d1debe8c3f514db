/// Evaluation limits and policies for one interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Give up on a single `WHILE` after this many passes through its body.
    pub max_iterations: Option<u64>,
    /// Refuse to nest user-procedure calls deeper than this.
    pub max_depth: Option<usize>,
    /// When false, `DEFINE` of an existing procedure name is an error.
    pub allow_redefinition: bool,
}

pub const DEFAULT_MAX_DEPTH: usize = 256;

impl Default for Config {
    fn default() -> Self {
        Config {
            max_iterations: None,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            allow_redefinition: true,
        }
    }
}
