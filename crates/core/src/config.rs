//! Scan configuration.

use crate::error::{ScanError, ScanResult};
use blankscan_sheet::ColSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Rows per work unit when nothing else is configured.
pub const DEFAULT_CHUNK_SIZE: u32 = 500;

/// What a scan reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Every empty cell in the scanned range.
    #[default]
    Cell,
    /// Every row whose cells are all empty.
    Row,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Cell => write!(f, "cell"),
            ScanMode::Row => write!(f, "row"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cell" => Ok(ScanMode::Cell),
            "row" => Ok(ScanMode::Row),
            other => Err(ScanError::InvalidConfig(format!(
                "unknown scan mode '{other}', expected 'cell' or 'row'"
            ))),
        }
    }
}

/// Options for a workbook scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Rows per work unit.
    pub chunk_size: u32,
    pub mode: ScanMode,
    /// Drop the run of empty rows after the last row with data (row mode only).
    pub trim_trailing: bool,
    /// Worker threads; `None` uses the available parallelism.
    pub threads: Option<usize>,
    /// Per-unit deadline; `None` lets units run to completion.
    pub unit_timeout: Option<Duration>,
    /// Only scan these sheets, in this order.
    pub sheets: Option<Vec<String>>,
    /// First row to scan; rows above it are treated as headers.
    pub first_row: Option<u32>,
    /// Restrict the scan to these columns instead of the sheet extent.
    pub columns: Option<ColSpan>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            mode: ScanMode::default(),
            trim_trailing: false,
            threads: None,
            unit_timeout: None,
            sheets: None,
            first_row: None,
            columns: None,
        }
    }
}

impl ScanConfig {
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_trim_trailing(mut self, trim: bool) -> Self {
        self.trim_trailing = trim;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    #[must_use]
    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_sheets<S: Into<String>>(mut self, sheets: impl IntoIterator<Item = S>) -> Self {
        self.sheets = Some(sheets.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_first_row(mut self, row: u32) -> Self {
        self.first_row = Some(row);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: ColSpan) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Check the options before a scan starts
    pub fn validate(&self) -> ScanResult<()> {
        if self.chunk_size == 0 {
            return Err(ScanError::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(ScanError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.first_row == Some(0) {
            return Err(ScanError::InvalidConfig(
                "first row is 1-based and must be at least 1".to_string(),
            ));
        }
        if let Some(cols) = self.columns {
            if cols.start == 0 || cols.is_empty() {
                return Err(ScanError::InvalidConfig(format!(
                    "invalid column span {cols}"
                )));
            }
        }
        Ok(())
    }

    /// Worker threads to start for `units` work units
    #[must_use]
    pub fn worker_count(&self, units: usize) -> usize {
        let available = self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1)
        });
        available.min(units).max(1)
    }
}
