//! Runtime errors for the interpreter

use crate::ast::{Span, TypeTag};
use std::fmt;

/// Runtime error during interpretation
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Source location of the node that failed, attached by the evaluator
    pub span: Option<Span>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Read of an unbound name
    UndefinedVariable,
    /// Call of an undeclared function
    UndefinedFunction,
    /// Argument count differs from the parameter count
    ArityMismatch,
    /// Declared or required type differs from the runtime type
    TypeMismatch,
    /// Index outside `0..len`
    IndexOutOfBounds,
    /// Arithmetic on a non-integer, division by zero, or overflow
    NonNumericOperand,
    /// Counter access on something that is not a variable
    CounterNotSupported,
    /// Output file could not be written
    FileOpenFailure,
    /// Call depth limit exceeded
    StackOverflow,
    /// Control flow: `return` unwinding to the enclosing call
    Return(Box<crate::interp::Value>),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        // Return carries a value but is compared by kind only
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl ErrorKind {
    /// Whether the best-effort policy may report the error and keep going
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::StackOverflow | ErrorKind::Return(_))
    }
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            span: None,
        }
    }

    pub fn undefined_variable(name: &str, hint: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            format!("undefined variable: `{name}`{hint}"),
        )
    }

    pub fn undefined_function(name: &str, hint: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedFunction,
            format!("undefined function: `{name}`{hint}"),
        )
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            format!("function `{name}` expects {expected} argument(s), got {got}"),
        )
    }

    pub fn type_mismatch(expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: expected {expected}, got {got}"),
        )
    }

    /// Typed declaration whose value does not fit the tag
    pub fn declared_type(name: &str, tag: TypeTag, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: `{name}` is declared {tag}, got {got}"),
        )
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("index {index} out of bounds for length {len}"),
        )
    }

    pub fn non_numeric(op: &str, left: &str, right: &str) -> Self {
        Self::new(
            ErrorKind::NonNumericOperand,
            format!("cannot apply `{op}` to {left} and {right}"),
        )
    }

    /// Unary operator or in-place update applied to a non-integer
    pub fn non_numeric_operand(op: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::NonNumericOperand,
            format!("cannot apply `{op}` to {got}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::NonNumericOperand, "division by zero".to_string())
    }

    pub fn overflow(op: &str) -> Self {
        Self::new(
            ErrorKind::NonNumericOperand,
            format!("integer overflow in `{op}`"),
        )
    }

    pub fn counter_not_supported(kind: &str) -> Self {
        Self::new(
            ErrorKind::CounterNotSupported,
            format!("counters are only tracked on variables, not on {kind}"),
        )
    }

    pub fn file_open_failure(path: &str, reason: &str) -> Self {
        Self::new(
            ErrorKind::FileOpenFailure,
            format!("cannot write `{path}`: {reason}"),
        )
    }

    pub fn stack_overflow(limit: usize) -> Self {
        Self::new(
            ErrorKind::StackOverflow,
            format!("stack overflow: call depth exceeded {limit}"),
        )
    }

    /// Control signal raised by `return`
    pub fn return_value(value: crate::interp::Value) -> Self {
        Self::new(ErrorKind::Return(Box::new(value)), "return".to_string())
    }

    /// Attach a location unless one is already set by a deeper node
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Value;

    #[test]
    fn test_undefined_variable() {
        let err = RuntimeError::undefined_variable("foo", "");
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert_eq!(err.message, "undefined variable: `foo`");
        assert!(err.span.is_none());
    }

    #[test]
    fn test_undefined_function_with_hint() {
        let err = RuntimeError::undefined_function("ad", " (did you mean `add`?)");
        assert_eq!(err.kind, ErrorKind::UndefinedFunction);
        assert!(err.message.ends_with("(did you mean `add`?)"));
    }

    #[test]
    fn test_arithmetic_failures_share_kind() {
        assert_eq!(RuntimeError::division_by_zero().kind, ErrorKind::NonNumericOperand);
        assert_eq!(RuntimeError::overflow("*").kind, ErrorKind::NonNumericOperand);
        assert_eq!(
            RuntimeError::non_numeric("+", "num", "str").kind,
            ErrorKind::NonNumericOperand
        );
    }

    #[test]
    fn test_declared_type() {
        let err = RuntimeError::declared_type("x", TypeTag::Num, "str");
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.message, "type mismatch: `x` is declared num, got str");
    }

    #[test]
    fn test_recoverable() {
        assert!(ErrorKind::TypeMismatch.is_recoverable());
        assert!(ErrorKind::FileOpenFailure.is_recoverable());
        assert!(!ErrorKind::StackOverflow.is_recoverable());
        assert!(!RuntimeError::return_value(Value::Int(1)).kind.is_recoverable());
    }

    #[test]
    fn test_with_span_keeps_innermost() {
        let err = RuntimeError::index_out_of_bounds(5, 3)
            .with_span(Span::new(4, 8))
            .with_span(Span::new(0, 20));
        assert_eq!(err.span, Some(Span::new(4, 8)));
    }

    #[test]
    fn test_return_compares_by_kind() {
        let a = ErrorKind::Return(Box::new(Value::Int(1)));
        let b = ErrorKind::Return(Box::new(Value::Int(2)));
        assert_eq!(a, b);
    }
}
