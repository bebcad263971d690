//! Source positions and ranges.
//!
//! Positions are 0-indexed. Columns are byte offsets within the line, as
//! reported by tree-sitter, so a column counts UTF-8 code units rather than
//! characters. Ranges are half-open: `start` is inside the range, `end` is
//! the first position after it.

use serde::{Deserialize, Serialize};

/// A point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: u32,
    /// Byte offset within the line (0-indexed)
    pub column: u32,
}

impl Position {
    /// Create a position from a 0-indexed line and column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<tree_sitter::Point> for Position {
    // Tree-sitter returns usize for positions, but we store u32 for compactness.
    #[allow(clippy::cast_possible_truncation)]
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row as u32, point.column as u32)
    }
}

/// A half-open `[start, end)` span in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// First position covered by the range
    pub start: Position,
    /// First position after the range (may be on a later line)
    pub end: Position,
}

impl Range {
    /// Create a range from its start and end positions.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether `position` falls inside this range.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Number of line breaks the range crosses.
    #[must_use]
    pub fn line_span(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line)
    }

    /// Column distance between start and end.
    ///
    /// Signed because a multi-line range can end at a smaller column than it
    /// starts at.
    #[must_use]
    pub fn column_span(&self) -> i64 {
        i64::from(self.end.column) - i64::from(self.start.column)
    }
}
