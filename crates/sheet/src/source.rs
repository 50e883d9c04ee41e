use crate::cell::CellValue;
use crate::error::Result;
use crate::extent::Extent;

/// A read-only workbook that can hand out independent sheet handles
///
/// Implementations must be shareable across threads: every call to
/// [`WorkbookSource::open_sheet`] produces a fresh handle that owns its own
/// reader state, so concurrent workers never share a mutable cursor.
pub trait WorkbookSource: Send + Sync {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Result<Vec<String>>;

    /// Open one sheet by name
    fn open_sheet(&self, name: &str) -> Result<Box<dyn SheetView>>;
}

/// An open, read-only view of one sheet
pub trait SheetView {
    /// The sheet's data extent, or `None` when the sheet holds no data
    fn extent(&self) -> Option<Extent>;

    /// Read the value at a 1-based position; positions outside the stored
    /// data are `CellValue::Absent`
    fn cell_value(&self, row: u32, col: u32) -> Result<CellValue>;
}
