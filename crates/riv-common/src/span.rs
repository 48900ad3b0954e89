//! Positions and spans.
//!
//! All source files share one global position space (see
//! [`SourceMap`](crate::source::SourceMap)): each file owns a disjoint range
//! of offsets, so a position or span pins down the file as well as the
//! location inside it. Tokens, AST nodes, and diagnostic labels carry plain
//! spans and nothing more.

use std::fmt;
use std::ops::Range;

/// A byte offset in the global position space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BytePos(pub u32);

impl BytePos {
    /// The offset as a slice index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for BytePos {
    #[inline]
    fn from(raw: u32) -> Self {
        BytePos(raw)
    }
}

impl fmt::Debug for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A half-open region `[start, end)` of the global position space.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: BytePos,
    pub end: BytePos,
}

impl Span {
    /// Builds a span from two positions, or from raw offsets.
    pub fn new(start: impl Into<BytePos>, end: impl Into<BytePos>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Extends this span through the end of `other`. This is how node spans
    /// are built: the first token's span run through the last one's.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    /// The smallest span covering both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Number of bytes covered.
    pub fn len(self) -> usize {
        self.to_range().len()
    }

    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Whether `pos` falls inside the span.
    pub fn contains(self, pos: BytePos) -> bool {
        (self.start.0..self.end.0).contains(&pos.0)
    }

    /// The span as a slice range.
    pub fn to_range(self) -> Range<usize> {
        self.start.index()..self.end.index()
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
