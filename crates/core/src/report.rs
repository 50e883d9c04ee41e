//! Scan report types.

use crate::error::UnitError;
use crate::worker::Findings;
use blankscan_sheet::{ColSpan, RowSpan};
use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

/// A work unit that produced no findings because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub rows: RowSpan,
    pub error: UnitError,
}

/// Result of scanning one sheet that had data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetScan {
    /// Rows that were in scope.
    pub rows: RowSpan,
    /// Columns that were in scope.
    pub cols: ColSpan,
    pub findings: Findings,
    /// Units that failed; their rows were not checked.
    pub failures: Vec<UnitFailure>,
    /// Flagged rows dropped as trailing blanks.
    pub trimmed: usize,
}

impl SheetScan {
    /// True when some rows could not be checked
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// What happened to one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    Scanned(SheetScan),
    /// The sheet has no data extent (or nothing in the configured scope).
    NoData,
    /// The sheet could not be opened at all.
    Failed { reason: String },
}

impl SheetOutcome {
    /// Number of findings (0 for `NoData` and `Failed`)
    #[must_use]
    pub fn finding_count(&self) -> usize {
        match self {
            SheetOutcome::Scanned(scan) => scan.findings.len(),
            SheetOutcome::NoData | SheetOutcome::Failed { .. } => 0,
        }
    }

    /// True for failed sheets and partially scanned sheets
    #[must_use]
    pub fn has_error(&self) -> bool {
        match self {
            SheetOutcome::Scanned(scan) => scan.is_partial(),
            SheetOutcome::Failed { .. } => true,
            SheetOutcome::NoData => false,
        }
    }

    #[must_use]
    pub fn as_scan(&self) -> Option<&SheetScan> {
        match self {
            SheetOutcome::Scanned(scan) => Some(scan),
            _ => None,
        }
    }
}

/// Sheet name → outcome, in sheet enumeration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScanReport {
    sheets: IndexMap<String, SheetOutcome>,
}

impl ScanReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, sheet: String, outcome: SheetOutcome) {
        self.sheets.insert(sheet, outcome);
    }

    #[must_use]
    pub fn get(&self, sheet: &str) -> Option<&SheetOutcome> {
        self.sheets.get(sheet)
    }

    /// All sheets in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SheetOutcome)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sheets with at least one finding or an error
    pub fn flagged(&self) -> impl Iterator<Item = (&str, &SheetOutcome)> {
        self.iter()
            .filter(|(_, outcome)| outcome.finding_count() > 0 || outcome.has_error())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    #[must_use]
    pub fn total_findings(&self) -> usize {
        self.sheets.values().map(SheetOutcome::finding_count).sum()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.sheets.values().any(SheetOutcome::has_error)
    }
}

/// Everything a finished scan hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub total_findings: usize,
    pub elapsed: Duration,
}
