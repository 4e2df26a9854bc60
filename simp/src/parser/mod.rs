//! Parser implementation using lalrpop

use crate::ast::{BinOp, Expr, Program, Span, Spanned};
use crate::error::{CompileError, Result};
use crate::lexer::Token;
use lalrpop_util::ParseError;

#[cfg(test)]
mod tests;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar
);

/// Error raised from a grammar action
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarError {
    pub message: String,
    pub span: Span,
}

impl GrammarError {
    pub(crate) fn unknown_counter(name: &str, span: Span) -> Self {
        GrammarError {
            message: format!("unknown counter `{name}`, expected `c1` or `c2`"),
            span,
        }
    }
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse tokens into AST
pub fn parse(_filename: &str, _source: &str, tokens: Vec<(Token, Span)>) -> Result<Program> {
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    grammar::ProgramParser::new().parse(token_iter).map_err(|e| {
        let span = match &e {
            ParseError::InvalidToken { location } => Span::new(*location, *location + 1),
            ParseError::UnrecognizedEof { location, .. } => Span::new(*location, *location + 1),
            ParseError::UnrecognizedToken { token, .. } => Span::new(token.0, token.2),
            ParseError::ExtraToken { token } => Span::new(token.0, token.2),
            ParseError::User { error } => error.span,
        };
        CompileError::parser(e.to_string(), span)
    })
}

pub(crate) fn binary(left: Spanned<Expr>, op: BinOp, right: Spanned<Expr>, l: usize, r: usize) -> Spanned<Expr> {
    Spanned::new(
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        Span::new(l, r),
    )
}

/// `print(x.c1)` prints the counter rather than a value
pub(crate) fn print_node(value: Spanned<Expr>) -> Expr {
    match value.node {
        Expr::VarFunc { target, selector } => Expr::PrintCounter { target, selector },
        node => Expr::Print(Box::new(Spanned::new(node, value.span))),
    }
}

pub(crate) fn fileprint_node(file: Spanned<Expr>, payload: Spanned<Expr>) -> Expr {
    let file = Box::new(file);
    match payload.node {
        Expr::VarFunc { target, selector } => Expr::FilePrintCounter {
            file,
            target,
            selector,
        },
        node => Expr::FilePrint {
            file,
            payload: Box::new(Spanned::new(node, payload.span)),
        },
    }
}
