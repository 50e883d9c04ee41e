use crate::a1_notation::CellCoordinate;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::extent::Extent;
use crate::source::{SheetView, WorkbookSource};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Absent,
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Other(dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Other(s.clone()),
        Data::Error(e) => CellValue::Other(e.to_string()),
    }
}

/// A workbook file on disk (xlsx, xlsm, xls or ods)
///
/// Holds only the path. Every [`WorkbookSource::open_sheet`] call re-opens
/// the file, so handles given to different workers are fully independent
/// and are released when the worker drops them.
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    path: PathBuf,
}

impl XlsxWorkbook {
    /// Point at a workbook file
    ///
    /// # Errors
    ///
    /// Returns `SheetError::FileNotFound` if the path does not exist or is
    /// not a regular file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(SheetError::FileNotFound { path });
        }
        Ok(Self { path })
    }

    fn reader(&self) -> Result<Sheets<BufReader<File>>> {
        open_workbook_auto(&self.path).map_err(|e| SheetError::Workbook {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.reader()?.sheet_names())
    }

    fn open_sheet(&self, name: &str) -> Result<Box<dyn SheetView>> {
        let mut workbook = self.reader()?;

        if !workbook.sheet_names().iter().any(|n| n == name) {
            return Err(SheetError::SheetNotFound {
                name: name.to_string(),
            });
        }

        let range = workbook
            .worksheet_range(name)
            .map_err(|e| SheetError::SheetRead {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Box::new(XlsxSheet { range }))
    }
}

/// One loaded worksheet range
struct XlsxSheet {
    range: Range<Data>,
}

impl SheetView for XlsxSheet {
    fn extent(&self) -> Option<Extent> {
        if self.range.is_empty() {
            return None;
        }
        let (start_row, start_col) = self.range.start()?;
        let (end_row, end_col) = self.range.end()?;

        Some(Extent::from_corners(
            CellCoordinate::new(start_row + 1, start_col + 1),
            CellCoordinate::new(end_row + 1, end_col + 1),
        ))
    }

    fn cell_value(&self, row: u32, col: u32) -> Result<CellValue> {
        if row == 0 || col == 0 {
            return Ok(CellValue::Absent);
        }
        Ok(self
            .range
            .get_value((row - 1, col - 1))
            .map_or(CellValue::Absent, data_to_cell_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn test_data_conversion() {
        assert_eq!(data_to_cell_value(&Data::Empty), CellValue::Absent);
        assert_eq!(data_to_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            data_to_cell_value(&Data::String(" ".to_string())),
            CellValue::Text(" ".to_string())
        );
        assert_eq!(data_to_cell_value(&Data::Bool(false)), CellValue::Boolean(false));
        assert!(matches!(
            data_to_cell_value(&Data::DateTimeIso("2024-01-01".to_string())),
            CellValue::Other(s) if s == "2024-01-01"
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = XlsxWorkbook::open(dir.path().join("nope.xlsx")).unwrap_err();
        assert!(matches!(err, SheetError::FileNotFound { .. }));

        // A directory is not a workbook either
        let err = XlsxWorkbook::open(dir.path()).unwrap_err();
        assert!(matches!(err, SheetError::FileNotFound { .. }));
    }

    #[test]
    fn test_extent_and_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("extent.xlsx");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Data").unwrap();
        // B2 and D5, 0-based for the writer
        worksheet.write_string(1, 1, "id").unwrap();
        worksheet.write_number(4, 3, 0.0).unwrap();
        workbook.save(&path).unwrap();

        let book = XlsxWorkbook::open(&path).unwrap();
        assert_eq!(book.sheet_names().unwrap(), vec!["Data".to_string()]);

        let sheet = book.open_sheet("Data").unwrap();
        let extent = sheet.extent().unwrap();
        assert_eq!(extent.to_string(), "B2:D5");

        assert_eq!(sheet.cell_value(2, 2).unwrap(), CellValue::Text("id".to_string()));
        assert_eq!(sheet.cell_value(5, 4).unwrap(), CellValue::Number(0.0));
        assert_eq!(sheet.cell_value(3, 3).unwrap(), CellValue::Absent);
        assert_eq!(sheet.cell_value(100, 100).unwrap(), CellValue::Absent);
    }

    #[test]
    fn test_unknown_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheets.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Only").unwrap();
        workbook.save(&path).unwrap();

        let book = XlsxWorkbook::open(&path).unwrap();
        let err = book.open_sheet("Missing").err().unwrap();
        assert!(matches!(err, SheetError::SheetNotFound { name } if name == "Missing"));
    }

    #[test]
    fn test_empty_sheet_has_no_extent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Blank").unwrap();
        workbook.save(&path).unwrap();

        let book = XlsxWorkbook::open(&path).unwrap();
        let sheet = book.open_sheet("Blank").unwrap();
        assert!(sheet.extent().is_none());
    }
}
