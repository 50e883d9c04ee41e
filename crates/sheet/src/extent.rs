use crate::a1_notation::{column_letters, parse_column, CellCoordinate};
use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// An inclusive, 1-based range of row or column indices
///
/// A span with `end < start` is degenerate and covers nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

/// Rows covered by a sheet or work unit.
pub type RowSpan = Span;
/// Columns covered by a sheet.
pub type ColSpan = Span;

impl Span {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of indices covered (0 for a degenerate span)
    #[must_use]
    pub fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.start <= index && index <= self.end
    }

    /// Iterate over every index in the span
    #[must_use]
    pub fn iter(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Parse a column span such as `"B"` or `"A:C"`
    pub fn parse_columns(notation: &str) -> Result<ColSpan> {
        let (start, end) = match notation.split_once(':') {
            Some((start, end)) => (parse_column(start.trim())?, parse_column(end.trim())?),
            None => {
                let col = parse_column(notation.trim())?;
                (col, col)
            }
        };

        if end < start {
            return Err(SheetError::InvalidSpan { start, end });
        }

        Ok(Span::new(start, end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The rectangular data extent of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub rows: RowSpan,
    pub cols: ColSpan,
}

impl Extent {
    #[must_use]
    pub fn new(rows: RowSpan, cols: ColSpan) -> Self {
        Self { rows, cols }
    }

    /// Build an extent from its top-left and bottom-right corners
    #[must_use]
    pub fn from_corners(top_left: CellCoordinate, bottom_right: CellCoordinate) -> Self {
        Self {
            rows: Span::new(top_left.row, bottom_right.row),
            cols: Span::new(top_left.col, bottom_right.col),
        }
    }

    /// Number of cells in the extent
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows.len()) * u64::from(self.cols.len())
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_letters(self.cols.start),
            self.rows.start,
            column_letters(self.cols.end),
            self.rows.end
        )
    }
}
