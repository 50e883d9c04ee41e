use blankscan_core::{
    Findings, IdCheck, IdPresenceRule, ScanConfig, ScanMode, Scanner, SheetOutcome,
};
use blankscan_sheet::CellCoordinate;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::tempdir;

/// A register sheet: six header rows, then names in A and IDs in B from row 7
fn write_register(path: &Path, ids: &[Option<u32>]) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("WKshenshou").unwrap();
    sheet.write_string(0, 0, "Register").unwrap();
    sheet.write_string(5, 0, "Name").unwrap();
    sheet.write_string(5, 1, "ID").unwrap();
    for (i, id) in ids.iter().enumerate() {
        let row = 6 + u32::try_from(i).unwrap();
        sheet.write_string(row, 0, format!("person {i}")).unwrap();
        if let Some(id) = id {
            sheet.write_number(row, 1, f64::from(*id)).unwrap();
        }
    }

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "a").unwrap();
    notes.write_string(1, 1, "   ").unwrap();
    notes.write_boolean(2, 0, false).unwrap();

    workbook.add_worksheet().set_name("Blank").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn test_scan_workbook_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("register.xlsx");
    write_register(&path, &[Some(1), None, Some(3)]);

    let outcome = Scanner::new(ScanConfig::default().with_chunk_size(2))
        .scan_path(&path)
        .unwrap();

    let names: Vec<&str> = outcome.report.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["WKshenshou", "Notes", "Blank"]);
    assert_eq!(outcome.report.get("Blank"), Some(&SheetOutcome::NoData));

    let notes = outcome.report.get("Notes").unwrap().as_scan().unwrap();
    assert_eq!(
        notes.findings,
        Findings::Cells(vec![
            CellCoordinate::new(1, 2),
            CellCoordinate::new(2, 1),
            CellCoordinate::new(2, 2),
            CellCoordinate::new(3, 2),
        ])
    );
}

#[test]
fn test_row_scan_of_id_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("register.xlsx");
    write_register(&path, &[Some(1), None, Some(3), None]);

    let config = ScanConfig::default()
        .with_mode(ScanMode::Row)
        .with_sheets(["WKshenshou"])
        .with_first_row(7)
        .with_columns(blankscan_sheet::Span::new(2, 2));
    let outcome = Scanner::new(config).scan_path(&path).unwrap();

    let scan = outcome.report.get("WKshenshou").unwrap().as_scan().unwrap();
    assert_eq!(scan.findings, Findings::Rows(vec![8, 10]));
    assert_eq!(outcome.report.len(), 1);
}

#[test]
fn test_id_rule_on_file() {
    let dir = tempdir().unwrap();

    let gaps = dir.path().join("gaps.xlsx");
    write_register(&gaps, &[Some(1), None, Some(3), None, None]);
    let rule = IdPresenceRule {
        chunk_size: 2,
        ..IdPresenceRule::default()
    };
    // Rows 10 and 11 trail the last ID and are dropped
    assert_eq!(rule.check_path(&gaps), IdCheck::MissingIds(vec![8]));

    let full = dir.path().join("full.xlsx");
    write_register(&full, &[Some(1), Some(2)]);
    assert_eq!(rule.check_path(&full), IdCheck::Complete);

    let empty = dir.path().join("empty.xlsx");
    write_register(&empty, &[None, None, None]);
    assert_eq!(rule.check_path(&empty), IdCheck::ColumnEmpty);

    let header_only = dir.path().join("header.xlsx");
    write_register(&header_only, &[]);
    assert_eq!(rule.check_path(&header_only), IdCheck::NoData);
}
