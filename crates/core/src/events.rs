//! Diagnostic events emitted during a scan.
//!
//! The scanner never logs through a global. Callers hand it a [`ScanEvents`]
//! sink (for example [`TracingEvents`]) and the scanner threads that sink
//! down to its workers. Without a sink nothing is emitted and the scan
//! result is the same.

use crate::scanner::ScanPhase;
use blankscan_sheet::RowSpan;
use std::fmt;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One diagnostic event.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEvent {
    pub level: EventLevel,
    pub sheet: Option<String>,
    pub unit: Option<RowSpan>,
    pub message: String,
}

impl ScanEvent {
    pub fn new(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            sheet: None,
            unit: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn sheet(mut self, sheet: &str) -> Self {
        self.sheet = Some(sheet.to_string());
        self
    }

    #[must_use]
    pub fn unit(mut self, rows: RowSpan) -> Self {
        self.unit = Some(rows);
        self
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write!(f, "[{sheet}")?;
            if let Some(unit) = &self.unit {
                write!(f, " rows {unit}")?;
            }
            write!(f, "] ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// Receiver for scan diagnostics. Must tolerate concurrent calls from workers.
pub trait ScanEvents: Send + Sync {
    fn event(&self, event: ScanEvent);

    /// Called on every orchestrator state transition.
    fn phase_changed(&self, phase: ScanPhase) {
        self.event(ScanEvent::new(
            EventLevel::Debug,
            format!("phase -> {phase:?}"),
        ));
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl ScanEvents for TracingEvents {
    fn event(&self, event: ScanEvent) {
        let sheet = event.sheet.as_deref().unwrap_or("-");
        let unit = event.unit.map(|u| u.to_string()).unwrap_or_default();
        match event.level {
            EventLevel::Debug => tracing::debug!(sheet, unit, "{}", event.message),
            EventLevel::Info => tracing::info!(sheet, unit, "{}", event.message),
            EventLevel::Warn => tracing::warn!(sheet, unit, "{}", event.message),
            EventLevel::Error => tracing::error!(sheet, unit, "{}", event.message),
        }
    }
}

/// Optional sink reference passed through the scanner and workers.
#[derive(Clone, Copy)]
pub(crate) struct Emitter<'a>(pub(crate) Option<&'a dyn ScanEvents>);

impl Emitter<'_> {
    /// Build and send an event only when a sink is attached.
    pub(crate) fn emit(&self, build: impl FnOnce() -> ScanEvent) {
        if let Some(sink) = self.0 {
            sink.event(build());
        }
    }

    pub(crate) fn phase(&self, phase: ScanPhase) {
        if let Some(sink) = self.0 {
            sink.phase_changed(phase);
        }
    }
}
