//! Session layer: one loaded, filtered table plus its browse cursor.
//!
//! This module sits "above" [`crate::ingestion`], [`crate::processing`], [`crate::stats`] and
//! [`crate::browse`] and provides:
//!
//! - [`Explorer`]: long-lived configuration, load options and observer, reused across restarts
//! - [`Session`]: one city/filter selection with an entry point per menu choice
//! - timing events for every report through a [`SessionObserver`]

mod observer;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::browse::{Browser, Page, SortSpec};
use crate::config::{ExplorerConfig, Vocabulary};
use crate::error::{ExplorerError, ExplorerResult};
use crate::ingestion::{load_cities, LoadOptions};
use crate::processing::{apply, FilterSpec};
use crate::stats::{
    duration_stats, routes_by_user_type, station_stats, time_stats, user_stats, DurationStats,
    RoutesByUserType, StationStats, TimeStats, UserStats,
};
use crate::types::{CityId, TripTable};

pub use observer::{SessionEvent, SessionObserver, StdErrSessionObserver};

/// The five aggregate reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Time,
    Station,
    Duration,
    User,
    RoutesByUserType,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Time,
        ReportKind::Station,
        ReportKind::Duration,
        ReportKind::User,
        ReportKind::RoutesByUserType,
    ];

    /// Menu code.
    pub fn code(self) -> &'static str {
        match self {
            ReportKind::Time => "ts",
            ReportKind::Station => "ss",
            ReportKind::Duration => "tds",
            ReportKind::User => "us",
            ReportKind::RoutesByUserType => "pr",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Time => "Time Stats",
            ReportKind::Station => "Station Stats",
            ReportKind::Duration => "Trip Duration Stats",
            ReportKind::User => "User Stats",
            ReportKind::RoutesByUserType => "Popular Routes by User Type",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReportKind::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExplorerError::invalid("report", s))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Result of any aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Time(TimeStats),
    Station(StationStats),
    Duration(DurationStats),
    User(UserStats),
    RoutesByUserType(RoutesByUserType),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Time(_) => ReportKind::Time,
            Report::Station(_) => ReportKind::Station,
            Report::Duration(_) => ReportKind::Duration,
            Report::User(_) => ReportKind::User,
            Report::RoutesByUserType(_) => ReportKind::RoutesByUserType,
        }
    }
}

/// Opens [`Session`]s against a fixed configuration.
pub struct Explorer {
    config: ExplorerConfig,
    vocabulary: Vocabulary,
    load_options: LoadOptions,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl fmt::Debug for Explorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Explorer")
            .field("config", &self.config)
            .field("load_options", &self.load_options)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Explorer {
    pub fn new(config: ExplorerConfig, load_options: LoadOptions) -> Self {
        Self {
            vocabulary: config.vocabulary(),
            config,
            load_options,
            observer: None,
        }
    }

    /// Attach an observer for session events.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Load `cities`, apply `filter` and start a session over the result.
    pub fn open(&self, cities: &[CityId], filter: FilterSpec) -> ExplorerResult<Session> {
        let start = Instant::now();
        let loaded = load_cities(cities, &self.config, &self.load_options)?;
        let loaded_rows = loaded.row_count();
        let mut session = Session::from_table(&loaded, filter);
        session.cities = cities.to_vec();
        session.observer = self.observer.clone();
        session.emit(SessionEvent::Opened {
            cities: session.cities.clone(),
            loaded_rows,
            filtered_rows: session.table.row_count(),
            elapsed: start.elapsed(),
        });
        Ok(session)
    }
}

/// A filtered table and the browse state that goes with it.
pub struct Session {
    cities: Vec<CityId>,
    filter: FilterSpec,
    table: TripTable,
    browser: Browser,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cities", &self.cities)
            .field("filter", &self.filter)
            .field("rows", &self.table.row_count())
            .field("browser", &self.browser)
            .finish()
    }
}

impl Session {
    /// Start a session over an already-loaded table.
    pub fn from_table(table: &TripTable, filter: FilterSpec) -> Self {
        Self {
            cities: Vec::new(),
            table: apply(table, &filter),
            filter,
            browser: Browser::new(),
            observer: None,
        }
    }

    /// Attach an observer for session events.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn cities(&self) -> &[CityId] {
        &self.cities
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The filtered table.
    pub fn table(&self) -> &TripTable {
        &self.table
    }

    /// Run one aggregate report.
    pub fn report(&self, kind: ReportKind) -> ExplorerResult<Report> {
        match kind {
            ReportKind::Time => self.time_stats().map(Report::Time),
            ReportKind::Station => self.station_stats().map(Report::Station),
            ReportKind::Duration => self.duration_stats().map(Report::Duration),
            ReportKind::User => self.user_stats().map(Report::User),
            ReportKind::RoutesByUserType => self.routes_by_user_type().map(Report::RoutesByUserType),
        }
    }

    pub fn time_stats(&self) -> ExplorerResult<TimeStats> {
        self.timed(ReportKind::Time, time_stats)
    }

    pub fn station_stats(&self) -> ExplorerResult<StationStats> {
        self.timed(ReportKind::Station, station_stats)
    }

    pub fn duration_stats(&self) -> ExplorerResult<DurationStats> {
        self.timed(ReportKind::Duration, duration_stats)
    }

    pub fn user_stats(&self) -> ExplorerResult<UserStats> {
        self.timed(ReportKind::User, user_stats)
    }

    pub fn routes_by_user_type(&self) -> ExplorerResult<RoutesByUserType> {
        self.timed(ReportKind::RoutesByUserType, routes_by_user_type)
    }

    fn timed<T>(
        &self,
        kind: ReportKind,
        aggregate: impl FnOnce(&TripTable) -> ExplorerResult<T>,
    ) -> ExplorerResult<T> {
        let start = Instant::now();
        let result = aggregate(&self.table);
        self.emit(SessionEvent::ReportFinished {
            kind,
            ok: result.is_ok(),
            elapsed: start.elapsed(),
        });
        result
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Whether the next browse starts with sort selection (cursor at 0).
    pub fn needs_sort_selection(&self) -> bool {
        self.browser.needs_sort_selection()
    }

    /// Choose the browse ordering and rewind.
    pub fn select_sort(&mut self, sort: Option<SortSpec>) -> ExplorerResult<()> {
        self.browser.select_sort(&self.table, sort)
    }

    /// Decline to resume: rewind to row 0 and forget the ordering.
    pub fn reset_browse(&mut self) {
        self.browser.reset();
        self.emit(SessionEvent::BrowseReset);
    }

    /// Next page of raw rows.
    pub fn next_page(&mut self) -> Page<'_> {
        let page = self.browser.next_page(&self.table);
        if let Some(obs) = &self.observer {
            obs.on_event(&SessionEvent::PageEmitted {
                start: page.start,
                rows: page.records.len(),
                end_of_table: page.end_of_table,
            });
        }
        page
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::types::{Column, TripRecord};
    use chrono::NaiveDate;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SessionEvent>>,
    }

    impl SessionObserver for Recorder {
        fn on_event(&self, event: &SessionEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn example_table() -> TripTable {
        let at = |min| {
            NaiveDate::from_ymd_opt(2017, 1, 1)
                .unwrap()
                .and_hms_opt(8, min, 0)
                .unwrap()
        };
        TripTable::new(
            Column::ALL,
            vec![
                TripRecord::new(at(0), 600.0, "A", "B"),
                TripRecord::new(at(5), 300.0, "A", "B"),
            ],
        )
    }

    #[test]
    fn reports_on_the_two_trip_example() {
        let session = Session::from_table(&example_table(), FilterSpec::all());
        let time = session.time_stats().unwrap();
        assert_eq!(time.most_common_month_name(), "january");
        assert_eq!(time.most_common_hour.value, 8);
        assert_eq!(
            session.station_stats().unwrap().most_common_route.value.to_string(),
            "A to B"
        );
        let d = session.duration_stats().unwrap();
        assert_eq!(d.total_seconds, 900.0);
        assert_eq!(d.mean_seconds, 450.0);
    }

    #[test]
    fn report_kind_codes_parse() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.code().parse::<ReportKind>().unwrap(), kind);
        }
        assert!("xx".parse::<ReportKind>().is_err());
    }

    #[test]
    fn observer_sees_report_and_page_events() {
        let rec = Arc::new(Recorder::default());
        let mut session =
            Session::from_table(&example_table(), FilterSpec::all()).with_observer(rec.clone());
        session.report(ReportKind::Duration).unwrap();
        session.select_sort(None).unwrap();
        let _ = session.next_page();
        session.reset_browse();

        let events = rec.events.lock().unwrap().clone();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            SessionEvent::ReportFinished { kind: ReportKind::Duration, ok: true, .. }
        ));
        assert!(matches!(
            events[1],
            SessionEvent::PageEmitted { start: 0, rows: 2, end_of_table: true }
        ));
        assert_eq!(events[2], SessionEvent::BrowseReset);
    }

    #[test]
    fn empty_filter_result_is_reported_not_panicked() {
        let filter = FilterSpec::all().with_month(6);
        let session = Session::from_table(&example_table(), filter);
        assert!(session.table().is_empty());
        for kind in ReportKind::ALL {
            assert!(matches!(session.report(kind), Err(ExplorerError::EmptyDataset)));
        }
    }
}
