//! Rendering scan results as text or JSON.

use blankscan_core::{Findings, ScanOutcome, ScanReport, SheetOutcome};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// The outcome of scanning one workbook file.
pub struct WorkbookResult {
    pub path: PathBuf,
    pub outcome: Result<ScanOutcome, String>,
}

#[derive(Serialize)]
struct JsonWorkbook<'a> {
    path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_findings: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheets: Option<&'a ScanReport>,
}

impl<'a> From<&'a WorkbookResult> for JsonWorkbook<'a> {
    fn from(result: &'a WorkbookResult) -> Self {
        match &result.outcome {
            Ok(outcome) => Self {
                path: &result.path,
                error: None,
                total_findings: Some(outcome.total_findings),
                elapsed_secs: Some(outcome.elapsed.as_secs_f64()),
                sheets: Some(&outcome.report),
            },
            Err(err) => Self {
                path: &result.path,
                error: Some(err),
                total_findings: None,
                elapsed_secs: None,
                sheets: None,
            },
        }
    }
}

pub fn render_json(results: &[WorkbookResult]) -> serde_json::Result<String> {
    let workbooks: Vec<JsonWorkbook<'_>> = results.iter().map(JsonWorkbook::from).collect();
    serde_json::to_string_pretty(&workbooks)
}

/// Plain-text report, one block per workbook.
pub fn render_text(results: &[WorkbookResult]) -> String {
    let mut out = String::new();
    for result in results {
        let _ = writeln!(out, "== {} ==", result.path.display());
        match &result.outcome {
            Ok(outcome) => render_outcome(&mut out, outcome),
            Err(err) => {
                let _ = writeln!(out, "ERROR: {err}");
            }
        }
        out.push('\n');
    }
    out
}

fn render_outcome(out: &mut String, outcome: &ScanOutcome) {
    for (sheet, sheet_outcome) in outcome.report.iter() {
        match sheet_outcome {
            SheetOutcome::Scanned(scan) => {
                if !scan.findings.is_empty() {
                    let _ = writeln!(
                        out,
                        "Sheet '{sheet}': {} {}",
                        scan.findings.len(),
                        finding_noun(&scan.findings)
                    );
                    let _ = writeln!(out, "  {}", list_findings(&scan.findings));
                }
                if scan.trimmed > 0 {
                    let _ = writeln!(
                        out,
                        "Sheet '{sheet}': {} trailing empty rows ignored",
                        scan.trimmed
                    );
                }
                for failure in &scan.failures {
                    let _ = writeln!(
                        out,
                        "PARTIAL: sheet '{sheet}' rows {}: {}",
                        failure.rows, failure.error
                    );
                }
            }
            SheetOutcome::NoData => {}
            SheetOutcome::Failed { reason } => {
                let _ = writeln!(out, "ERROR: sheet '{sheet}': {reason}");
            }
        }
    }
    let _ = writeln!(
        out,
        "Total: {} findings in {:.2}s",
        outcome.total_findings,
        outcome.elapsed.as_secs_f64()
    );
}

fn finding_noun(findings: &Findings) -> &'static str {
    match findings {
        Findings::Cells(_) => "empty cells",
        Findings::Rows(_) => "empty rows",
    }
}

fn list_findings(findings: &Findings) -> String {
    match findings {
        Findings::Cells(cells) => cells
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Findings::Rows(rows) => rows
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
