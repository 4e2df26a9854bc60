//! Byte offsets of nodes in the source text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Half-open byte range `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Span of nodes built by hand rather than parsed
    pub fn dummy() -> Self {
        Span::default()
    }

    /// The range ariadne labels expect
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// AST node paired with where it was parsed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Spanned { node, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_from_logos_range() {
        assert_eq!(Span::from(2..7), Span::new(2, 7));
        assert_eq!(Span::new(2, 7).range(), 2..7);
    }

    #[test]
    fn test_span_display_in_token_dump() {
        assert_eq!(Span::new(4, 9).to_string(), "4..9");
    }

    #[test]
    fn test_dummy_span_is_empty() {
        let span = Span::dummy();
        assert_eq!(span.range().len(), 0);
    }
}
