//! Error types for blankscan.

use blankscan_sheet::{RowSpan, SheetError};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that abort a whole workbook scan.
///
/// Sheet- and unit-level problems never show up here; they are recorded in
/// the report instead.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The workbook path does not exist or is not a file.
    #[error("Resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// The workbook exists but its sheet list cannot be read.
    #[error("Workbook unreadable: {0}")]
    WorkbookUnreadable(String),

    /// The scan configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<SheetError> for ScanError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::FileNotFound { path } => ScanError::ResourceNotFound { path },
            other => ScanError::WorkbookUnreadable(other.to_string()),
        }
    }
}

/// Why a single work unit produced no findings.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UnitError {
    /// The worker could not open its own handle on the sheet.
    #[error("failed to open sheet: {0}")]
    Open(String),

    /// A cell could not be read.
    #[error("failed to read cell: {0}")]
    Read(String),

    /// The unit ran past its deadline.
    #[error("deadline of {}ms exceeded", .0.as_millis())]
    DeadlineExceeded(Duration),

    /// The worker panicked.
    #[error("worker panicked: {0}")]
    Panicked(String),
}

/// A programming defect detected by a defensive check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("gap before row {found}: expected a unit starting at row {expected}")]
    Gap { expected: u32, found: u32 },

    #[error("unit {unit} overlaps the previous unit ending at row {previous_end}")]
    Overlap { unit: RowSpan, previous_end: u32 },

    #[error("unit {unit} is degenerate")]
    Degenerate { unit: RowSpan },

    #[error("units end at row {found}, expected row {expected}")]
    Coverage { expected: u32, found: u32 },

    #[error("{count} duplicate findings in sheet '{sheet}'")]
    DuplicateFindings { sheet: String, count: usize },
}
