//! Scanning one work unit.

use crate::config::ScanMode;
use crate::error::UnitError;
use crate::events::{Emitter, EventLevel, ScanEvent};
use crate::partition::WorkUnit;
use blankscan_sheet::{CellCoordinate, ColSpan, SheetView, WorkbookSource};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Empty cells or empty rows found in some range of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Findings {
    Cells(Vec<CellCoordinate>),
    Rows(Vec<u32>),
}

impl Findings {
    /// An empty collection of the kind `mode` produces
    #[must_use]
    pub fn empty(mode: ScanMode) -> Self {
        match mode {
            ScanMode::Cell => Findings::Cells(Vec::new()),
            ScanMode::Row => Findings::Rows(Vec::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Findings::Cells(cells) => cells.len(),
            Findings::Rows(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn mode(&self) -> ScanMode {
        match self {
            Findings::Cells(_) => ScanMode::Cell,
            Findings::Rows(_) => ScanMode::Row,
        }
    }

    #[must_use]
    pub fn as_rows(&self) -> Option<&[u32]> {
        match self {
            Findings::Rows(rows) => Some(rows),
            Findings::Cells(_) => None,
        }
    }

    #[must_use]
    pub fn as_cells(&self) -> Option<&[CellCoordinate]> {
        match self {
            Findings::Cells(cells) => Some(cells),
            Findings::Rows(_) => None,
        }
    }
}

/// What one worker invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutcome {
    pub unit: WorkUnit,
    pub result: Result<Findings, UnitError>,
}

/// Inputs shared by every unit of one scan.
#[derive(Clone, Copy)]
pub(crate) struct WorkerContext<'a> {
    pub(crate) source: &'a dyn WorkbookSource,
    pub(crate) mode: ScanMode,
    pub(crate) timeout: Option<Duration>,
    pub(crate) events: Emitter<'a>,
}

/// Scan one unit against its own freshly opened sheet handle.
///
/// Every failure is caught here and returned in the outcome with no
/// findings; the handle is dropped on every path.
pub fn scan_unit(
    source: &dyn WorkbookSource,
    unit: &WorkUnit,
    columns: ColSpan,
    mode: ScanMode,
    timeout: Option<Duration>,
) -> UnitOutcome {
    let ctx = WorkerContext {
        source,
        mode,
        timeout,
        events: Emitter(None),
    };
    run_unit(&ctx, unit, columns)
}

pub(crate) fn run_unit(ctx: &WorkerContext<'_>, unit: &WorkUnit, columns: ColSpan) -> UnitOutcome {
    let started = Instant::now();
    let result = ctx
        .source
        .open_sheet(&unit.sheet)
        .map_err(|e| UnitError::Open(e.to_string()))
        .and_then(|view| {
            let deadline = ctx.timeout.map(|t| (started + t, t));
            scan_rows(view.as_ref(), unit, columns, ctx.mode, deadline)
        });

    match &result {
        Ok(findings) => ctx.events.emit(|| {
            ScanEvent::new(
                EventLevel::Debug,
                format!("{} findings in {:?}", findings.len(), started.elapsed()),
            )
            .sheet(&unit.sheet)
            .unit(unit.rows)
        }),
        Err(err) => ctx.events.emit(|| {
            ScanEvent::new(EventLevel::Warn, format!("unit failed: {err}"))
                .sheet(&unit.sheet)
                .unit(unit.rows)
        }),
    }

    UnitOutcome {
        unit: unit.clone(),
        result,
    }
}

fn scan_rows(
    view: &dyn SheetView,
    unit: &WorkUnit,
    columns: ColSpan,
    mode: ScanMode,
    deadline: Option<(Instant, Duration)>,
) -> Result<Findings, UnitError> {
    let read = |row: u32, col: u32| {
        view.cell_value(row, col)
            .map_err(|e| UnitError::Read(e.to_string()))
    };

    let mut findings = Findings::empty(mode);
    for row in unit.rows.iter() {
        if let Some((deadline, timeout)) = deadline {
            if Instant::now() > deadline {
                return Err(UnitError::DeadlineExceeded(timeout));
            }
        }

        match &mut findings {
            Findings::Cells(cells) => {
                for col in columns.iter() {
                    if read(row, col)?.is_empty() {
                        cells.push(CellCoordinate::new(row, col));
                    }
                }
            }
            Findings::Rows(rows) => {
                let mut row_empty = true;
                for col in columns.iter() {
                    if !read(row, col)?.is_empty() {
                        row_empty = false;
                        break;
                    }
                }
                if row_empty {
                    rows.push(row);
                }
            }
        }
    }

    Ok(findings)
}
