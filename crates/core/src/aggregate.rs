//! Merging per-unit results into one sheet result.

use crate::config::ScanMode;
use crate::report::UnitFailure;
use crate::worker::{Findings, UnitOutcome};
use blankscan_sheet::CellCoordinate;

/// Merged, sorted result of every unit of one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub findings: Findings,
    /// Failed units, ordered by first row.
    pub failures: Vec<UnitFailure>,
    /// Exact duplicates dropped while merging. Non-zero means units overlapped.
    pub duplicates_removed: usize,
}

/// Collects unit outcomes for one sheet in whatever order they complete
#[derive(Debug)]
pub struct SheetAggregator {
    mode: ScanMode,
    cells: Vec<CellCoordinate>,
    rows: Vec<u32>,
    failures: Vec<UnitFailure>,
    units: usize,
}

impl SheetAggregator {
    #[must_use]
    pub fn new(mode: ScanMode) -> Self {
        Self {
            mode,
            cells: Vec::new(),
            rows: Vec::new(),
            failures: Vec::new(),
            units: 0,
        }
    }

    /// Number of outcomes received so far
    #[must_use]
    pub fn units(&self) -> usize {
        self.units
    }

    pub fn push(&mut self, outcome: UnitOutcome) {
        self.units += 1;
        match outcome.result {
            Ok(findings) => {
                debug_assert_eq!(findings.mode(), self.mode, "findings of the wrong mode");
                match findings {
                    Findings::Cells(cells) => self.cells.extend(cells),
                    Findings::Rows(rows) => self.rows.extend(rows),
                }
            }
            Err(error) => self.failures.push(UnitFailure {
                rows: outcome.unit.rows,
                error,
            }),
        }
    }

    /// Sort, drop duplicates and hand back the sheet result
    #[must_use]
    pub fn finish(self) -> Aggregate {
        let (findings, duplicates_removed) = match self.mode {
            ScanMode::Cell => {
                let (cells, removed) = sorted_unique(self.cells);
                (Findings::Cells(cells), removed)
            }
            ScanMode::Row => {
                let (rows, removed) = sorted_unique(self.rows);
                (Findings::Rows(rows), removed)
            }
        };

        let mut failures = self.failures;
        failures.sort_by_key(|f| (f.rows.start, f.rows.end));

        Aggregate {
            findings,
            failures,
            duplicates_removed,
        }
    }
}

fn sorted_unique<T: Ord>(mut items: Vec<T>) -> (Vec<T>, usize) {
    let before = items.len();
    items.sort_unstable();
    items.dedup();
    let removed = before - items.len();
    (items, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;
    use crate::partition::WorkUnit;
    use blankscan_sheet::Span;

    fn rows_outcome(start: u32, end: u32, rows: Vec<u32>) -> UnitOutcome {
        UnitOutcome {
            unit: WorkUnit::new("S", Span::new(start, end)),
            result: Ok(Findings::Rows(rows)),
        }
    }

    fn failed(start: u32, end: u32) -> UnitOutcome {
        UnitOutcome {
            unit: WorkUnit::new("S", Span::new(start, end)),
            result: Err(UnitError::Open("locked".to_string())),
        }
    }

    #[test]
    fn test_order_independent() {
        let outcomes = vec![
            rows_outcome(1, 3, vec![2]),
            rows_outcome(4, 6, vec![4, 6]),
            failed(7, 9),
            rows_outcome(10, 10, vec![10]),
        ];

        let mut forward = SheetAggregator::new(ScanMode::Row);
        for o in outcomes.iter().cloned() {
            forward.push(o);
        }
        let mut backward = SheetAggregator::new(ScanMode::Row);
        for o in outcomes.into_iter().rev() {
            backward.push(o);
        }
        assert_eq!(backward.units(), 4);

        let a = forward.finish();
        let b = backward.finish();
        assert_eq!(a, b);
        assert_eq!(a.findings, Findings::Rows(vec![2, 4, 6, 10]));
        assert_eq!(a.failures.len(), 1);
        assert_eq!(a.failures[0].rows, Span::new(7, 9));
        assert_eq!(a.duplicates_removed, 0);
    }

    #[test]
    fn test_cells_sorted_row_major() {
        let mut agg = SheetAggregator::new(ScanMode::Cell);
        agg.push(UnitOutcome {
            unit: WorkUnit::new("S", Span::new(3, 4)),
            result: Ok(Findings::Cells(vec![
                CellCoordinate::new(4, 1),
                CellCoordinate::new(3, 2),
            ])),
        });
        agg.push(UnitOutcome {
            unit: WorkUnit::new("S", Span::new(1, 2)),
            result: Ok(Findings::Cells(vec![
                CellCoordinate::new(2, 5),
                CellCoordinate::new(1, 9),
            ])),
        });

        let result = agg.finish();
        assert_eq!(
            result.findings.as_cells().unwrap(),
            &[
                CellCoordinate::new(1, 9),
                CellCoordinate::new(2, 5),
                CellCoordinate::new(3, 2),
                CellCoordinate::new(4, 1),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_counted() {
        let mut agg = SheetAggregator::new(ScanMode::Row);
        agg.push(rows_outcome(1, 4, vec![3, 4]));
        agg.push(rows_outcome(4, 6, vec![4, 5]));

        let result = agg.finish();
        assert_eq!(result.findings, Findings::Rows(vec![3, 4, 5]));
        assert_eq!(result.duplicates_removed, 1);
    }

    #[test]
    fn test_no_outcomes() {
        let result = SheetAggregator::new(ScanMode::Cell).finish();
        assert!(result.findings.is_empty());
        assert!(result.failures.is_empty());
    }
}
