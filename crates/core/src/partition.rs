//! Splitting a sheet's rows into work units.

use crate::error::InvariantViolation;
use blankscan_sheet::{RowSpan, Span};
use serde::Serialize;

/// A contiguous slice of one sheet's rows, scanned by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WorkUnit {
    pub sheet: String,
    pub rows: RowSpan,
}

impl WorkUnit {
    pub fn new(sheet: impl Into<String>, rows: RowSpan) -> Self {
        Self {
            sheet: sheet.into(),
            rows,
        }
    }
}

/// Split `rows` into units of at most `chunk_size` rows.
///
/// Unit `i` covers `start + i*chunk_size ..= min(start + (i+1)*chunk_size - 1, end)`.
/// A degenerate span yields no units. A `chunk_size` of 0 is treated as 1.
#[must_use]
pub fn partition(sheet: &str, rows: RowSpan, chunk_size: u32) -> Vec<WorkUnit> {
    let mut units = Vec::new();
    if rows.is_empty() {
        return units;
    }

    let step = chunk_size.max(1) - 1;
    let mut current = rows.start;
    loop {
        let end = current.saturating_add(step).min(rows.end);
        units.push(WorkUnit::new(sheet, Span::new(current, end)));
        if end >= rows.end {
            break;
        }
        current = end + 1;
    }

    units
}

/// Check that `units` cover `rows` exactly, with no gap and no overlap.
pub fn verify_coverage(units: &[WorkUnit], rows: RowSpan) -> Result<(), InvariantViolation> {
    let mut spans: Vec<RowSpan> = units.iter().map(|u| u.rows).collect();
    spans.sort_by_key(|s| (s.start, s.end));

    if rows.is_empty() {
        return match spans.first() {
            Some(unit) => Err(InvariantViolation::Coverage {
                expected: rows.end,
                found: unit.end,
            }),
            None => Ok(()),
        };
    }

    let mut expected = rows.start;
    let mut previous_end: Option<u32> = None;
    for unit in spans {
        if unit.is_empty() {
            return Err(InvariantViolation::Degenerate { unit });
        }
        if let Some(prev) = previous_end {
            if unit.start <= prev {
                return Err(InvariantViolation::Overlap {
                    unit,
                    previous_end: prev,
                });
            }
        }
        if unit.start != expected {
            return Err(InvariantViolation::Gap {
                expected,
                found: unit.start,
            });
        }
        previous_end = Some(unit.end);
        expected = unit.end.saturating_add(1);
    }

    match previous_end {
        Some(end) if end == rows.end => Ok(()),
        Some(end) => Err(InvariantViolation::Coverage {
            expected: rows.end,
            found: end,
        }),
        None => Err(InvariantViolation::Gap {
            expected: rows.start,
            found: rows.end.saturating_add(1),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spans(units: &[WorkUnit]) -> Vec<(u32, u32)> {
        units.iter().map(|u| (u.rows.start, u.rows.end)).collect()
    }

    #[test]
    fn test_chunk_of_three_over_ten_rows() {
        let units = partition("S", Span::new(1, 10), 3);
        assert_eq!(spans(&units), vec![(1, 3), (4, 6), (7, 9), (10, 10)]);
        assert!(units.iter().all(|u| u.sheet == "S"));
    }

    #[test]
    fn test_chunk_larger_than_span() {
        let units = partition("S", Span::new(7, 12), 500);
        assert_eq!(spans(&units), vec![(7, 12)]);
    }

    #[test]
    fn test_exact_multiple() {
        let units = partition("S", Span::new(1, 6), 2);
        assert_eq!(spans(&units), vec![(1, 2), (3, 4), (5, 6)]);
    }

    #[test]
    fn test_degenerate_span_has_no_units() {
        assert!(partition("S", Span::new(5, 4), 3).is_empty());
        assert!(verify_coverage(&[], Span::new(5, 4)).is_ok());
    }

    #[test]
    fn test_zero_chunk_size_is_single_rows() {
        let units = partition("S", Span::new(1, 3), 0);
        assert_eq!(spans(&units), vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_span_at_u32_max() {
        let units = partition("S", Span::new(u32::MAX - 2, u32::MAX), 2);
        assert_eq!(
            spans(&units),
            vec![(u32::MAX - 2, u32::MAX - 1), (u32::MAX, u32::MAX)]
        );
        assert!(verify_coverage(&units, Span::new(u32::MAX - 2, u32::MAX)).is_ok());
    }

    #[test]
    fn test_verify_detects_gap() {
        let units = vec![
            WorkUnit::new("S", Span::new(1, 3)),
            WorkUnit::new("S", Span::new(5, 6)),
        ];
        assert_eq!(
            verify_coverage(&units, Span::new(1, 6)),
            Err(InvariantViolation::Gap {
                expected: 4,
                found: 5
            })
        );
    }

    #[test]
    fn test_verify_detects_overlap() {
        let units = vec![
            WorkUnit::new("S", Span::new(1, 4)),
            WorkUnit::new("S", Span::new(4, 6)),
        ];
        assert!(matches!(
            verify_coverage(&units, Span::new(1, 6)),
            Err(InvariantViolation::Overlap { previous_end: 4, .. })
        ));
    }

    #[test]
    fn test_verify_detects_short_coverage() {
        let units = vec![WorkUnit::new("S", Span::new(1, 4))];
        assert_eq!(
            verify_coverage(&units, Span::new(1, 6)),
            Err(InvariantViolation::Coverage {
                expected: 6,
                found: 4
            })
        );
        assert!(verify_coverage(&[], Span::new(1, 6)).is_err());
    }

    proptest! {
        #[test]
        fn prop_units_cover_span_exactly(
            start in 1u32..5_000,
            len in 1u32..5_000,
            chunk in 1u32..700,
        ) {
            let rows = Span::new(start, start + len - 1);
            let units = partition("S", rows, chunk);

            prop_assert!(verify_coverage(&units, rows).is_ok());
            prop_assert_eq!(units.len() as u32, len.div_ceil(chunk));

            let covered: u32 = units.iter().map(|u| u.rows.len()).sum();
            prop_assert_eq!(covered, len);
            prop_assert!(units.iter().all(|u| u.rows.len() <= chunk));
        }
    }
}
