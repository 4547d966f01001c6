use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ExplorerError;
use crate::types::CityId;

use super::csv::{DroppedCell, SkippedRow};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (a row or cell was dropped, the load continued).
    Warning,
    /// Error-level event (the load failed).
    Error,
    /// Critical error (typically I/O: the city file is missing or unreadable).
    Critical,
}

/// Context about one city file load.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub city: Option<CityId>,
    pub path: PathBuf,
}

impl LoadContext {
    fn label(&self) -> String {
        match self.city {
            Some(city) => city.to_string(),
            None => "-".to_string(),
        }
    }
}

/// Stats reported on a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of trips kept.
    pub rows: usize,
    /// Number of rows dropped by the skip policy.
    pub skipped: usize,
    /// Number of malformed optional cells read as absent.
    pub dropped: usize,
}

/// Observer interface for load outcomes.
pub trait LoadObserver: Send + Sync {
    /// Called when a city file loads.
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called for each row dropped under the skip policy.
    fn on_row_skipped(&self, _ctx: &LoadContext, _row: &SkippedRow) {}

    /// Called for each malformed optional cell on a kept row.
    fn on_cell_dropped(&self, _ctx: &LoadContext, _cell: &DroppedCell) {}

    /// Called when a city file fails to load.
    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &ExplorerError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_row_skipped(&self, ctx: &LoadContext, row: &SkippedRow) {
        for o in &self.observers {
            o.on_row_skipped(ctx, row);
        }
    }

    fn on_cell_dropped(&self, ctx: &LoadContext, cell: &DroppedCell) {
        for o in &self.observers {
            o.on_cell_dropped(ctx, cell);
        }
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs load events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[load][ok] city={} path={} rows={} skipped={} dropped={}",
            ctx.label(),
            ctx.path.display(),
            stats.rows,
            stats.skipped,
            stats.dropped
        );
    }

    fn on_row_skipped(&self, ctx: &LoadContext, row: &SkippedRow) {
        eprintln!(
            "[load][{:?}] city={} path={} row={} column='{}' raw='{}' err={}",
            LoadSeverity::Warning,
            ctx.label(),
            ctx.path.display(),
            row.row,
            row.column,
            row.raw,
            row.message
        );
    }

    fn on_cell_dropped(&self, ctx: &LoadContext, cell: &DroppedCell) {
        eprintln!(
            "[load][{:?}] city={} path={} row={} column='{}' raw='{}' dropped: {}",
            LoadSeverity::Warning,
            ctx.label(),
            ctx.path.display(),
            cell.row,
            cell.column,
            cell.raw,
            cell.message
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        eprintln!(
            "[load][{:?}] city={} path={} err={}",
            severity,
            ctx.label(),
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        eprintln!(
            "[ALERT][load][{:?}] city={} path={} err={}",
            severity,
            ctx.label(),
            ctx.path.display(),
            error
        );
    }
}

/// Appends load events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl LoadObserver for FileObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok city={} path={} rows={} skipped={} dropped={}",
            unix_ts(),
            ctx.label(),
            ctx.path.display(),
            stats.rows,
            stats.skipped,
            stats.dropped
        ));
    }

    fn on_row_skipped(&self, ctx: &LoadContext, row: &SkippedRow) {
        self.append_line(&format!(
            "{} skip city={} path={} row={} column='{}' err={}",
            unix_ts(),
            ctx.label(),
            ctx.path.display(),
            row.row,
            row.column,
            row.message
        ));
    }

    fn on_cell_dropped(&self, ctx: &LoadContext, cell: &DroppedCell) {
        self.append_line(&format!(
            "{} drop city={} path={} row={} column='{}' raw='{}' err={}",
            unix_ts(),
            ctx.label(),
            ctx.path.display(),
            cell.row,
            cell.column,
            cell.raw,
            cell.message
        ));
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        self.append_line(&format!(
            "{} fail severity={:?} city={} path={} err={}",
            unix_ts(),
            severity,
            ctx.label(),
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &ExplorerError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} city={} path={} err={}",
            unix_ts(),
            severity,
            ctx.label(),
            ctx.path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
