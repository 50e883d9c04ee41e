//! Workbook scan orchestration.
//!
//! A scan moves through `Idle → Enumerating → Dispatching → Collecting →
//! Aggregating → Done`. Only a workbook-level problem found while
//! enumerating (missing file, unreadable sheet list, bad configuration)
//! ends in `Failed`; a sheet that cannot be opened is recorded in the
//! report and the scan carries on.

use crate::aggregate::SheetAggregator;
use crate::config::{ScanConfig, ScanMode};
use crate::error::{InvariantViolation, ScanError, ScanResult, UnitError};
use crate::events::{Emitter, EventLevel, ScanEvent, ScanEvents};
use crate::partition::{partition, verify_coverage, WorkUnit};
use crate::pool::WorkerPool;
use crate::report::{ScanOutcome, ScanReport, SheetOutcome, SheetScan};
use crate::trim::trim_trailing_empty_rows;
use crate::worker::{run_unit, Findings, UnitOutcome, WorkerContext};
use blankscan_sheet::{ColSpan, RowSpan, Span, WorkbookSource, XlsxWorkbook};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Enumerating,
    Dispatching,
    Collecting,
    Aggregating,
    Done,
    Failed,
}

/// What the scanner decided for one sheet before dispatch.
enum SheetPlan {
    Ready {
        rows: RowSpan,
        cols: ColSpan,
        units: usize,
    },
    NoData,
    Failed(String),
}

/// Runs partitioned, parallel emptiness scans over a workbook
#[derive(Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
    events: Option<Arc<dyn ScanEvents>>,
}

impl Scanner {
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            events: None,
        }
    }

    /// Attach a diagnostics sink
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn ScanEvents>) -> Self {
        self.events = Some(events);
        self
    }

    /// Scan a workbook file
    ///
    /// # Errors
    ///
    /// Returns `ScanError::ResourceNotFound` if the path does not exist, and
    /// the errors of [`Scanner::scan`].
    pub fn scan_path<P: AsRef<Path>>(&self, path: P) -> ScanResult<ScanOutcome> {
        let emitter = self.emitter();
        emitter.phase(ScanPhase::Idle);
        let workbook = XlsxWorkbook::open(path.as_ref()).map_err(|e| {
            emitter.phase(ScanPhase::Failed);
            ScanError::from(e)
        })?;
        self.run(&workbook, emitter)
    }

    /// Scan every selected sheet of `source`
    ///
    /// # Errors
    ///
    /// Returns an error only for workbook-level failures: invalid
    /// configuration or an unreadable sheet list. Sheet and unit failures
    /// are recorded in the report.
    pub fn scan(&self, source: &dyn WorkbookSource) -> ScanResult<ScanOutcome> {
        let emitter = self.emitter();
        emitter.phase(ScanPhase::Idle);
        self.run(source, emitter)
    }

    /// Everything after `Idle`
    fn run(&self, source: &dyn WorkbookSource, emitter: Emitter<'_>) -> ScanResult<ScanOutcome> {
        let started = Instant::now();
        emitter.phase(ScanPhase::Enumerating);
        let names = match self.config.validate().and_then(|()| {
            source
                .sheet_names()
                .map_err(|e| ScanError::WorkbookUnreadable(e.to_string()))
        }) {
            Ok(names) => names,
            Err(err) => {
                emitter.emit(|| ScanEvent::new(EventLevel::Error, err.to_string()));
                emitter.phase(ScanPhase::Failed);
                return Err(err);
            }
        };
        emitter.emit(|| {
            ScanEvent::new(
                EventLevel::Info,
                format!("workbook has {} sheets: {}", names.len(), names.join(", ")),
            )
        });

        let mut plans: Vec<(String, SheetPlan)> = Vec::new();
        let mut jobs: Vec<(usize, WorkUnit, ColSpan)> = Vec::new();
        for (idx, sheet) in self.selected_sheets(&names).into_iter().enumerate() {
            let plan = if names.contains(&sheet) {
                self.plan_sheet(source, idx, &sheet, &mut jobs)
            } else {
                SheetPlan::Failed(format!("sheet not found: {sheet}"))
            };
            if let SheetPlan::Failed(reason) = &plan {
                emitter.emit(|| {
                    ScanEvent::new(EventLevel::Warn, format!("cannot scan sheet: {reason}"))
                        .sheet(&sheet)
                });
            }
            plans.push((sheet, plan));
        }

        emitter.phase(ScanPhase::Dispatching);
        let pool = WorkerPool::new(self.config.worker_count(jobs.len()));
        emitter.emit(|| {
            ScanEvent::new(
                EventLevel::Info,
                format!(
                    "dispatching {} units on {} workers",
                    jobs.len(),
                    pool.threads()
                ),
            )
        });

        let mut aggregators: Vec<Option<SheetAggregator>> = plans
            .iter()
            .map(|(_, plan)| match plan {
                SheetPlan::Ready { .. } => Some(SheetAggregator::new(self.config.mode)),
                SheetPlan::NoData | SheetPlan::Failed(_) => None,
            })
            .collect();
        let slots: Vec<(usize, WorkUnit)> = jobs
            .iter()
            .map(|(idx, unit, _)| (*idx, unit.clone()))
            .collect();

        emitter.phase(ScanPhase::Collecting);
        let ctx = WorkerContext {
            source,
            mode: self.config.mode,
            timeout: self.config.unit_timeout,
            events: emitter,
        };
        pool.run(
            jobs,
            |(_, unit, cols)| run_unit(&ctx, &unit, cols),
            |job, result| {
                let (sheet_idx, unit) = &slots[job];
                let outcome = result.unwrap_or_else(|panic| {
                    emitter.emit(|| {
                        ScanEvent::new(EventLevel::Error, format!("worker panicked: {panic}"))
                            .sheet(&unit.sheet)
                            .unit(unit.rows)
                    });
                    UnitOutcome {
                        unit: unit.clone(),
                        result: Err(UnitError::Panicked(panic)),
                    }
                });
                if let Some(Some(agg)) = aggregators.get_mut(*sheet_idx) {
                    agg.push(outcome);
                }
            },
        );

        emitter.phase(ScanPhase::Aggregating);
        let mut report = ScanReport::new();
        for ((sheet, plan), agg) in plans.into_iter().zip(aggregators) {
            let outcome = match (plan, agg) {
                (SheetPlan::Ready { rows, cols, units }, Some(agg)) => {
                    debug_assert_eq!(agg.units(), units, "lost unit outcomes");
                    SheetOutcome::Scanned(self.finish_sheet(&sheet, rows, cols, agg, emitter))
                }
                (SheetPlan::Failed(reason), _) => SheetOutcome::Failed { reason },
                _ => SheetOutcome::NoData,
            };
            report.insert(sheet, outcome);
        }

        let total_findings = report.total_findings();
        let elapsed = started.elapsed();
        emitter.emit(|| {
            ScanEvent::new(
                EventLevel::Info,
                format!("scan finished: {total_findings} findings in {elapsed:?}"),
            )
        });
        emitter.phase(ScanPhase::Done);

        Ok(ScanOutcome {
            report,
            total_findings,
            elapsed,
        })
    }

    fn emitter(&self) -> Emitter<'_> {
        Emitter(self.events.as_deref())
    }

    /// Sheets to scan, in report order, without repeats
    fn selected_sheets(&self, names: &[String]) -> Vec<String> {
        let Some(selected) = &self.config.sheets else {
            return names.to_vec();
        };
        let mut seen = Vec::with_capacity(selected.len());
        for name in selected {
            if !seen.contains(name) {
                seen.push(name.clone());
            }
        }
        seen
    }

    /// Open the sheet once to read its extent, then partition the scope.
    fn plan_sheet(
        &self,
        source: &dyn WorkbookSource,
        idx: usize,
        sheet: &str,
        jobs: &mut Vec<(usize, WorkUnit, ColSpan)>,
    ) -> SheetPlan {
        let extent = match source.open_sheet(sheet) {
            Ok(view) => view.extent(),
            Err(err) => return SheetPlan::Failed(err.to_string()),
        };
        let Some(extent) = extent else {
            self.emitter().emit(|| {
                ScanEvent::new(EventLevel::Info, "no data, skipped").sheet(sheet)
            });
            return SheetPlan::NoData;
        };
        if extent.rows.start == 0 || extent.cols.start == 0 {
            return SheetPlan::Failed(format!("malformed extent {extent}"));
        }
        if extent.rows.is_empty() || extent.cols.is_empty() {
            self.emitter().emit(|| {
                ScanEvent::new(EventLevel::Info, format!("degenerate extent {extent}, skipped"))
                    .sheet(sheet)
            });
            return SheetPlan::NoData;
        }

        let rows = Span::new(
            extent.rows.start.max(self.config.first_row.unwrap_or(0)),
            extent.rows.end,
        );
        let cols = self.config.columns.unwrap_or(extent.cols);
        if rows.is_empty() {
            return SheetPlan::NoData;
        }

        let units = partition(sheet, rows, self.config.chunk_size);
        debug_assert_eq!(verify_coverage(&units, rows), Ok(()));
        self.emitter().emit(|| {
            ScanEvent::new(
                EventLevel::Debug,
                format!("extent {extent}, scanning rows {rows} in {} units", units.len()),
            )
            .sheet(sheet)
        });

        let count = units.len();
        jobs.extend(units.into_iter().map(|unit| (idx, unit, cols)));
        SheetPlan::Ready {
            rows,
            cols,
            units: count,
        }
    }

    fn finish_sheet(
        &self,
        sheet: &str,
        rows: RowSpan,
        cols: ColSpan,
        agg: SheetAggregator,
        emitter: Emitter<'_>,
    ) -> SheetScan {
        let aggregate = agg.finish();
        if aggregate.duplicates_removed > 0 {
            let violation = InvariantViolation::DuplicateFindings {
                sheet: sheet.to_string(),
                count: aggregate.duplicates_removed,
            };
            emitter.emit(|| ScanEvent::new(EventLevel::Error, violation.to_string()).sheet(sheet));
            debug_assert_eq!(aggregate.duplicates_removed, 0, "{violation}");
        }

        let mut findings = aggregate.findings;
        let mut trimmed = 0;
        if self.config.trim_trailing && self.config.mode == ScanMode::Row {
            if let Findings::Rows(flagged) = &findings {
                let kept = trim_trailing_empty_rows(rows, flagged);
                trimmed = flagged.len() - kept.len();
                findings = Findings::Rows(kept);
            }
        }

        if !aggregate.failures.is_empty() {
            emitter.emit(|| {
                ScanEvent::new(
                    EventLevel::Warn,
                    format!("{} units failed, result is partial", aggregate.failures.len()),
                )
                .sheet(sheet)
            });
        }

        SheetScan {
            rows,
            cols,
            findings,
            failures: aggregate.failures,
            trimmed,
        }
    }
}
