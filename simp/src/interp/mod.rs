//! Tree-walking interpreter for SIMP programs

mod env;
mod error;
mod eval;
pub mod output;
mod value;

pub use crate::config::ErrorPolicy;
pub use env::{Binding, CallFrame, Environment, Function, FunctionTable, Tracked};
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use output::Output;
pub use value::Value;
