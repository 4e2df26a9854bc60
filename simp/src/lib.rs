//! SIMP language front end and evaluator
//!
//! A small imperative language whose variables count their own reads and
//! writes. Source text goes through [`lexer::tokenize`], [`parser::parse`]
//! and finally [`interp::Interpreter::run`].

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod util;

pub use ast::Span;
pub use config::{Config, ErrorPolicy};
pub use error::{CompileError, Result};

/// Lex and parse a source file in one step
pub fn parse_source(filename: &str, source: &str) -> Result<ast::Program> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(filename, source, tokens)
}
