use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Byte range into the expression text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Empty span at `pos`, used for end-of-input positions
    pub fn at(pos: usize) -> Self {
        Span::new(pos, pos)
    }

    pub fn merge(&self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The covered text, or "" if the span falls outside `source`
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.to_range()).unwrap_or("")
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let merged = Span::new(4, 6).merge(Span::new(0, 2));
        assert_eq!(merged, Span::new(0, 6));
    }

    #[test]
    fn test_span_text() {
        let source = "1 + $a";
        assert_eq!(Span::new(4, 6).text(source), "$a");
        assert_eq!(Span::at(6).text(source), "");
        assert_eq!(Span::new(4, 60).text(source), "");
    }
}
