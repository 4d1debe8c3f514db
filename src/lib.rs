pub mod cmdline;
pub mod config;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod procedures;
pub mod reader;
pub mod special_forms;
pub mod types;

#[macro_use]
extern crate lazy_static;

mod builtins;
mod tokens;

pub use config::Config;
pub use interpreter::Interpreter;
pub use types::{List, Symbol, Value};
