//! Read-only sheet access for blankscan
//!
//! Provides the cell value model, A1 notation helpers and the
//! [`WorkbookSource`] / [`SheetView`] abstraction that the scanner reads
//! through. Two sources ship with the crate: [`XlsxWorkbook`] for files on
//! disk and [`MemoryWorkbook`] for data already in memory.
//!
//! # Examples
//!
//! ```
//! use blankscan_sheet::{CellValue, MemorySheet, MemoryWorkbook, WorkbookSource};
//!
//! let book = MemoryWorkbook::new().with_sheet(
//!     "Data",
//!     MemorySheet::from_rows(vec![
//!         vec![CellValue::from("id"), CellValue::from("name")],
//!         vec![CellValue::from(1), CellValue::Absent],
//!     ]),
//! );
//!
//! let sheet = book.open_sheet("Data").unwrap();
//! assert_eq!(sheet.extent().unwrap().to_string(), "A1:B2");
//! assert!(sheet.cell_value(2, 2).unwrap().is_empty());
//! ```

mod a1_notation;
mod cell;
mod error;
mod extent;
mod memory;
mod source;
mod xlsx;

/// Re-export A1 notation helpers.
pub use a1_notation::{column_letters, parse_column, CellCoordinate};
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export extent types.
pub use extent::{ColSpan, Extent, RowSpan, Span};
/// Re-export in-memory sources.
pub use memory::{MemorySheet, MemoryWorkbook};
/// Re-export the source traits.
pub use source::{SheetView, WorkbookSource};
/// Re-export the file-backed source.
pub use xlsx::XlsxWorkbook;
