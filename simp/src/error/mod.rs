//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised before evaluation starts
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Config error: {message}")]
    Config { message: String },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Io { .. } | Self::Config { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
            Self::Io { message } => message,
            Self::Config { message } => message,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Parser { .. } => "Parser",
            Self::Io { .. } => "IO",
            Self::Config { .. } => "Config",
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// Report a compile error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    let title = format!("{} error", error.kind_label());
    render(filename, source, &title, error.message(), error.span());
}

/// Report a runtime error that aborted evaluation
pub fn report_runtime_error(filename: &str, source: &str, error: &RuntimeError) {
    render(filename, source, "Runtime error", &error.message, error.span);
}

fn render(filename: &str, source: &str, title: &str, message: &str, span: Option<Span>) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let printed = if let Some(span) = span {
        Report::build(ReportKind::Error, (filename, span.range()))
            .with_message(title)
            .with_label(
                Label::new((filename, span.range()))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .print((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{title}: {message}"))
            .finish()
            .print((filename, Source::from(source)))
    };

    if printed.is_err() {
        eprintln!("{title}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_has_span() {
        let err = CompileError::lexer("unexpected character: \"@\"", Span::new(3, 4));
        assert_eq!(err.span(), Some(Span::new(3, 4)));
        assert!(err.message().contains('@'));
    }

    #[test]
    fn test_config_error_has_no_span() {
        let err = CompileError::config("unknown field `foo`");
        assert_eq!(err.span(), None);
        assert_eq!(err.to_string(), "Config error: unknown field `foo`");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.simp");
        let err: CompileError = io.into();
        assert!(matches!(err, CompileError::Io { .. }));
        assert!(err.message().contains("missing.simp"));
    }
}
