use std::fmt;
use std::time::Duration;

use crate::types::CityId;

use super::ReportKind;

/// Events emitted by a [`super::Session`] and its [`super::Explorer`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// City files were loaded and filtered.
    Opened {
        cities: Vec<CityId>,
        loaded_rows: usize,
        filtered_rows: usize,
        elapsed: Duration,
    },
    /// A report finished (successfully or not).
    ReportFinished {
        kind: ReportKind,
        ok: bool,
        elapsed: Duration,
    },
    /// A browse page was produced.
    PageEmitted {
        start: usize,
        rows: usize,
        end_of_table: bool,
    },
    /// The browse cursor was rewound.
    BrowseReset,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Opened {
                cities,
                loaded_rows,
                filtered_rows,
                elapsed,
            } => {
                let names: Vec<_> = cities.iter().map(|c| c.name()).collect();
                write!(
                    f,
                    "opened cities={names:?} loaded_rows={loaded_rows} filtered_rows={filtered_rows} elapsed={elapsed:?}"
                )
            }
            SessionEvent::ReportFinished { kind, ok, elapsed } => {
                write!(f, "report={} ok={ok} elapsed={elapsed:?}", kind.code())
            }
            SessionEvent::PageEmitted {
                start,
                rows,
                end_of_table,
            } => write!(f, "page start={start} rows={rows} end_of_table={end_of_table}"),
            SessionEvent::BrowseReset => f.write_str("browse reset"),
        }
    }
}

/// Observer hook for session events.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// A simple stderr logger for session events.
#[derive(Debug, Default)]
pub struct StdErrSessionObserver;

impl SessionObserver for StdErrSessionObserver {
    fn on_event(&self, event: &SessionEvent) {
        eprintln!("[session] {event}");
    }
}
