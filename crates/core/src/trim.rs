//! Dropping the unused tail of a sheet.
//!
//! A block of blank rows below the last real entry is the end of the data,
//! not a missing entry. These helpers find the last row that holds data and
//! discard every flagged row after it. When no row holds data at all the
//! flagged list is returned unchanged; callers report that case on its own.

use blankscan_sheet::{CellValue, RowSpan};

/// Highest row whose value is non-empty, given column values starting at `first_row`
///
/// `None` if nothing holds data or that row lies past `u32::MAX`.
#[must_use]
pub fn last_non_empty_row(first_row: u32, values: &[CellValue]) -> Option<u32> {
    values
        .iter()
        .rposition(|v| !v.is_empty())
        .and_then(|idx| u32::try_from(idx).ok())
        .and_then(|idx| first_row.checked_add(idx))
}

/// Keep the flagged rows at or before `last_non_empty`.
///
/// With `None` nothing holds data and the list is returned as is.
#[must_use]
pub fn trim_after(flagged: &[u32], last_non_empty: Option<u32>) -> Vec<u32> {
    match last_non_empty {
        Some(last) => flagged.iter().copied().filter(|&row| row <= last).collect(),
        None => flagged.to_vec(),
    }
}

/// Trim flagged rows using the column values they were derived from
#[must_use]
pub fn trim_trailing_blanks(first_row: u32, values: &[CellValue], flagged: &[u32]) -> Vec<u32> {
    trim_after(flagged, last_non_empty_row(first_row, values))
}

/// Trim the result of a row scan over `span`
///
/// Any row of `span` that is not flagged counts as holding data.
/// `flagged` must be sorted ascending.
#[must_use]
pub fn trim_trailing_empty_rows(span: RowSpan, flagged: &[u32]) -> Vec<u32> {
    debug_assert!(flagged.windows(2).all(|w| w[0] < w[1]), "flagged rows not sorted");
    trim_after(flagged, last_unflagged_row(span, flagged))
}

fn last_unflagged_row(span: RowSpan, flagged: &[u32]) -> Option<u32> {
    if span.is_empty() {
        return None;
    }
    // Walk the flagged tail backwards from the end of the span
    let mut candidate = span.end;
    for &row in flagged.iter().rev() {
        if row > candidate {
            continue;
        }
        if row < candidate {
            break;
        }
        if candidate == span.start {
            return None;
        }
        candidate -= 1;
    }
    Some(candidate)
}
