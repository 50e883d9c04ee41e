use crate::a1_notation::CellCoordinate;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::extent::Extent;
use crate::source::{SheetView, WorkbookSource};
use indexmap::IndexMap;
use std::sync::Arc;

/// A rectangular block of cells held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySheet {
    origin: CellCoordinate,
    data: Vec<Vec<CellValue>>,
}

impl Default for MemorySheet {
    fn default() -> Self {
        Self {
            origin: CellCoordinate::new(1, 1),
            data: Vec::new(),
        }
    }
}

impl MemorySheet {
    /// Create a sheet whose first row/column sits at A1
    #[must_use]
    pub fn from_rows<T: Into<CellValue>>(rows: Vec<Vec<T>>) -> Self {
        Self::from_rows_at(CellCoordinate::new(1, 1), rows)
    }

    /// Create a sheet whose top-left cell sits at `origin`
    #[must_use]
    pub fn from_rows_at<T: Into<CellValue>>(origin: CellCoordinate, rows: Vec<Vec<T>>) -> Self {
        let data = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self { origin, data }
    }

    /// Create a single-column sheet starting at `origin`
    #[must_use]
    pub fn from_column_at<T: Into<CellValue>>(origin: CellCoordinate, values: Vec<T>) -> Self {
        Self::from_rows_at(origin, values.into_iter().map(|v| vec![v]).collect())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn extent(&self) -> Option<Extent> {
        let rows = u32::try_from(self.row_count()).ok()?;
        let cols = u32::try_from(self.col_count()).ok()?;
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Extent::from_corners(
            self.origin,
            CellCoordinate::new(self.origin.row + rows - 1, self.origin.col + cols - 1),
        ))
    }

    fn get(&self, row: u32, col: u32) -> CellValue {
        if row < self.origin.row || col < self.origin.col {
            return CellValue::Absent;
        }
        let r = (row - self.origin.row) as usize;
        let c = (col - self.origin.col) as usize;
        self.data
            .get(r)
            .and_then(|cells| cells.get(c))
            .cloned()
            .unwrap_or_default()
    }
}

/// An in-memory workbook (preserves sheet insertion order)
///
/// Sheets are shared behind an `Arc`, so opening a sheet is cheap and
/// handles never alias mutable state.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: IndexMap<String, Arc<MemorySheet>>,
}

impl MemoryWorkbook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet
    ///
    /// # Errors
    ///
    /// Returns error if a sheet with the same name already exists.
    pub fn add_sheet(&mut self, name: &str, sheet: MemorySheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetRead {
                name: name.to_string(),
                message: "sheet already exists".to_string(),
            });
        }
        self.sheets.insert(name.to_string(), Arc::new(sheet));
        Ok(())
    }

    /// Builder-style variant of [`MemoryWorkbook::add_sheet`] that replaces
    /// an existing sheet of the same name
    #[must_use]
    pub fn with_sheet(mut self, name: &str, sheet: MemorySheet) -> Self {
        self.sheets.insert(name.to_string(), Arc::new(sheet));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.sheets.keys().cloned().collect())
    }

    fn open_sheet(&self, name: &str) -> Result<Box<dyn SheetView>> {
        let sheet = self
            .sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })?;
        Ok(Box::new(MemorySheetView {
            sheet: Arc::clone(sheet),
        }))
    }
}

struct MemorySheetView {
    sheet: Arc<MemorySheet>,
}

impl SheetView for MemorySheetView {
    fn extent(&self) -> Option<Extent> {
        self.sheet.extent()
    }

    fn cell_value(&self, row: u32, col: u32) -> Result<CellValue> {
        Ok(self.sheet.get(row, col))
    }
}
