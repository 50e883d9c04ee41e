use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a workbook
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Failed to read sheet '{name}': {message}")]
    SheetRead { name: String, message: String },

    #[error("Failed to read cell {cell} in sheet '{sheet}': {message}")]
    CellRead {
        sheet: String,
        cell: String,
        message: String,
    },

    #[error("Invalid cell notation: {0}")]
    InvalidCellNotation(String),

    #[error("Invalid span: {start}..={end}")]
    InvalidSpan { start: u32, end: u32 },
}

pub type Result<T> = std::result::Result<T, SheetError>;
