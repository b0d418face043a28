//! Source spans.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A half-open range of source offsets.
///
/// The start offset is inclusive and the end offset is exclusive, matching
/// the `start`/`end` pair an ESTree producer attaches to every node. Node
/// spans keep the producer's units; [`Span::slice`] expects byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: u64,
    /// End offset (exclusive).
    pub end: u64,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Create a span, returning `None` when `start > end`.
    pub fn try_new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Span { start, end })
    }

    /// Length of the span in offset units.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The text this span covers when read as byte offsets, or `None` if it
    /// falls outside the source or splits a UTF-8 sequence.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        let start = usize::try_from(self.start).ok()?;
        let end = usize::try_from(self.end).ok()?;
        source.get(start..end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_empty() {
        let span = Span::new(3, 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn test_span_try_new_rejects_inverted() {
        assert!(Span::try_new(5, 2).is_none());
        assert_eq!(Span::try_new(2, 5), Some(Span::new(2, 5)));
    }

    #[test]
    #[should_panic(expected = "must be <= end")]
    fn test_span_new_panics_on_inverted() {
        let _ = Span::new(9, 1);
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(0, 20);
        assert!(outer.contains(&Span::new(5, 10)));
        assert!(outer.contains(&outer));
        assert!(!Span::new(5, 10).contains(&outer));
    }

    #[test]
    fn test_span_slice() {
        let source = "let x = 'hi';";
        assert_eq!(Span::new(8, 12).slice(source), Some("'hi'"));
        assert_eq!(Span::new(8, 40).slice(source), None);
    }

    #[test]
    fn test_span_slice_rejects_split_char() {
        let source = "'é'";
        // 'é' is two bytes; offset 2 lands inside it.
        assert_eq!(Span::new(0, 2).slice(source), None);
        assert_eq!(Span::new(0, 4).slice(source), Some("'é'"));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(1, 4).to_string(), "[1, 4)");
    }
}
