//! Checks built on top of the scanner.

use crate::config::{ScanConfig, ScanMode, DEFAULT_CHUNK_SIZE};
use crate::report::{SheetOutcome, UnitFailure};
use crate::scanner::Scanner;
use crate::worker::Findings;
use blankscan_sheet::{Span, WorkbookSource};
use std::path::Path;

/// Result of checking one workbook's ID column.
#[derive(Debug, Clone, PartialEq)]
pub enum IdCheck {
    /// Every data row has an ID.
    Complete,
    /// These rows have no ID (trailing blank rows excluded).
    MissingIds(Vec<u32>),
    /// Some units failed; `rows` lists what the other units found.
    Partial {
        rows: Vec<u32>,
        failures: Vec<UnitFailure>,
    },
    /// The ID column has no value in any data row.
    ColumnEmpty,
    /// The sheet has no rows below the header.
    NoData,
    /// The workbook or sheet could not be read.
    Failed(String),
}

/// Checks that an ID column is filled in on every data row
///
/// Rows below the last filled ID are the unused tail of the sheet and are
/// not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPresenceRule {
    pub sheet: String,
    /// 1-based column holding the IDs.
    pub column: u32,
    /// First row below the header block.
    pub first_data_row: u32,
    pub chunk_size: u32,
    pub threads: Option<usize>,
}

impl Default for IdPresenceRule {
    fn default() -> Self {
        Self {
            sheet: "WKshenshou".to_string(),
            column: 2,
            first_data_row: 7,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
        }
    }
}

impl IdPresenceRule {
    fn scanner(&self) -> Scanner {
        let mut config = ScanConfig::default()
            .with_mode(ScanMode::Row)
            .with_trim_trailing(true)
            .with_sheets([self.sheet.as_str()])
            .with_first_row(self.first_data_row)
            .with_columns(Span::new(self.column, self.column))
            .with_chunk_size(self.chunk_size);
        config.threads = self.threads;
        Scanner::new(config)
    }

    /// Check a workbook file
    #[must_use]
    pub fn check_path<P: AsRef<Path>>(&self, path: P) -> IdCheck {
        match self.scanner().scan_path(path) {
            Ok(outcome) => self.interpret(outcome.report.get(&self.sheet)),
            Err(err) => IdCheck::Failed(err.to_string()),
        }
    }

    #[must_use]
    pub fn check(&self, source: &dyn WorkbookSource) -> IdCheck {
        match self.scanner().scan(source) {
            Ok(outcome) => self.interpret(outcome.report.get(&self.sheet)),
            Err(err) => IdCheck::Failed(err.to_string()),
        }
    }

    fn interpret(&self, outcome: Option<&SheetOutcome>) -> IdCheck {
        let scan = match outcome {
            Some(SheetOutcome::Scanned(scan)) => scan,
            Some(SheetOutcome::NoData) => return IdCheck::NoData,
            Some(SheetOutcome::Failed { reason }) => return IdCheck::Failed(reason.clone()),
            None => return IdCheck::Failed(format!("sheet not scanned: {}", self.sheet)),
        };

        let rows = match &scan.findings {
            Findings::Rows(rows) => rows.clone(),
            Findings::Cells(_) => return IdCheck::Failed("unexpected cell findings".to_string()),
        };

        if scan.is_partial() {
            return IdCheck::Partial {
                rows,
                failures: scan.failures.clone(),
            };
        }
        if rows.len() == scan.rows.len() as usize {
            return IdCheck::ColumnEmpty;
        }
        if rows.is_empty() {
            IdCheck::Complete
        } else {
            IdCheck::MissingIds(rows)
        }
    }
}
