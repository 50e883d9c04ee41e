//! # blankscan-core
//!
//! Parallel, partitioned scanner that finds empty cells and empty rows in
//! multi-sheet workbooks.
//!
//! A scan splits each sheet's rows into work units, runs the units on a
//! bounded worker pool (each worker opens its own handle on the workbook),
//! merges the unit results in a completion-order-independent way and
//! produces a [`ScanReport`]. Failures of a sheet or a single unit are kept
//! in the report instead of aborting the scan.
//!
//! ```
//! use blankscan_core::{Findings, ScanConfig, ScanMode, Scanner};
//! use blankscan_sheet::{CellValue, MemorySheet, MemoryWorkbook};
//!
//! let book = MemoryWorkbook::new().with_sheet(
//!     "Data",
//!     MemorySheet::from_rows(vec![
//!         vec![CellValue::from("a"), CellValue::from("b")],
//!         vec![CellValue::Absent, CellValue::from("  ")],
//!         vec![CellValue::from(1), CellValue::Absent],
//!     ]),
//! );
//!
//! let outcome = Scanner::new(ScanConfig::default().with_mode(ScanMode::Row))
//!     .scan(&book)
//!     .unwrap();
//! let scan = outcome.report.get("Data").unwrap().as_scan().unwrap();
//! assert_eq!(scan.findings, Findings::Rows(vec![2]));
//! ```

/// Merging unit results per sheet.
pub mod aggregate;
/// Scan options.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Diagnostic events.
pub mod events;
/// Row partitioning.
pub mod partition;
mod pool;
/// Report types.
pub mod report;
/// Rules that consume scan reports.
pub mod rules;
/// Scan orchestration.
pub mod scanner;
/// Trailing blank row trimming.
pub mod trim;
/// Per-unit scanning.
pub mod worker;

pub use aggregate::{Aggregate, SheetAggregator};
pub use config::{ScanConfig, ScanMode, DEFAULT_CHUNK_SIZE};
pub use error::{InvariantViolation, ScanError, ScanResult, UnitError};
pub use events::{EventLevel, ScanEvent, ScanEvents, TracingEvents};
pub use partition::{partition, verify_coverage, WorkUnit};
pub use report::{ScanOutcome, ScanReport, SheetOutcome, SheetScan, UnitFailure};
pub use rules::{IdCheck, IdPresenceRule};
pub use scanner::{ScanPhase, Scanner};
pub use worker::{scan_unit, Findings, UnitOutcome};
