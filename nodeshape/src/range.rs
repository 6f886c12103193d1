//! Source positions and ranges
//!
//! This module defines the value types used to describe where a syntax node sits in
//! its source text, plus a small utility for converting byte offsets into positions.
//!
//! ## Types
//!
//! - [`SourcePosition`] - a byte index together with its line:column coordinates
//! - [`SourceRange`] - a half-open `from..to` range between two positions
//! - [`SourceLocation`] - converts byte offsets of one source text into positions
//!
//! ## Key Design
//!
//! - **Immutable values**: positions and ranges are produced once by the parser and only read
//!   afterwards, so both are `Copy`.
//! - **Half-open ranges**: a range covers `from.index <= i < to.index`. An empty range still
//!   has a location.
//! - **Unicode-aware**: line starts are computed over `char_indices()`, so multi-byte
//!   characters never split a line boundary.
//! - **Efficient conversion**: O(log n) binary search for byte-to-position conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A location in source text: byte index plus zero-based line and column
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourcePosition {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub from: SourcePosition,
    pub to: SourcePosition,
}

impl SourceRange {
    pub fn new(from: SourcePosition, to: SourcePosition) -> Self {
        Self { from, to }
    }

    /// Byte indices covered by this range
    pub fn span(&self) -> ByteRange<usize> {
        self.from.index..self.to.index
    }

    pub fn len(&self) -> usize {
        self.to.index.saturating_sub(self.from.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a position falls inside this range (end exclusive)
    pub fn contains(&self, pos: SourcePosition) -> bool {
        self.from.index <= pos.index && pos.index < self.to.index
    }

    /// Check if two ranges share at least one byte
    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.from.index < other.to.index && other.from.index < self.to.index
    }

    /// Build the smallest range that covers all provided ranges.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<SourceRange>
    where
        I: Iterator<Item = &'a SourceRange>,
    {
        let first = *ranges.next()?;
        Some(ranges.fold(first, |acc, range| {
            SourceRange::new(acc.from.min(range.from), acc.to.max(range.to))
        }))
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

/// Provides fast conversion from byte offsets to positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a position
    pub fn position_at(&self, byte_offset: usize) -> SourcePosition {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        SourcePosition::new(byte_offset, line, column)
    }

    /// Convert a byte range to a source range
    pub fn range(&self, range: &ByteRange<usize>) -> SourceRange {
        SourceRange::new(self.position_at(range.start), self.position_at(range.end))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}
