//! Core data model types.
//!
//! Ingestion turns per-city CSV files into a [`TripTable`]: an ordered list of [`TripRecord`]s
//! plus the set of [`Column`]s that were present in at least one source file.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, ExplorerResult};

/// Full lowercase month names, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Lowercase month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

/// Lowercase full weekday name (`"monday"`, ...).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Supported city datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityId {
    Chicago,
    NewYorkCity,
    Washington,
}

impl CityId {
    /// All cities, in menu order.
    pub const ALL: [CityId; 3] = [CityId::Chicago, CityId::NewYorkCity, CityId::Washington];

    /// Human-facing lowercase name, as typed at the prompt.
    pub fn name(self) -> &'static str {
        match self {
            CityId::Chicago => "chicago",
            CityId::NewYorkCity => "new york city",
            CityId::Washington => "washington",
        }
    }

    /// File name used when no configuration overrides it.
    pub fn default_file_name(self) -> &'static str {
        match self {
            CityId::Chicago => "chicago.csv",
            CityId::NewYorkCity => "new_york_city.csv",
            CityId::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CityId {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CityId::ALL
            .into_iter()
            .find(|c| {
                c.name().eq_ignore_ascii_case(wanted)
                    || c.default_file_name()
                        .trim_end_matches(".csv")
                        .eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ExplorerError::invalid("city", wanted))
    }
}

/// Parse a comma-separated city list. `all` selects every city.
///
/// Duplicates are dropped; the first occurrence decides the load order.
pub fn parse_cities(input: &str) -> ExplorerResult<Vec<CityId>> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(CityId::ALL.to_vec());
    }

    let mut out = Vec::new();
    for part in trimmed.split(',') {
        let city: CityId = part.parse()?;
        if !out.contains(&city) {
            out.push(city);
        }
    }
    Ok(out)
}

/// A named column of a trip file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
}

impl Column {
    /// Every column in file order.
    pub const ALL: [Column; 8] = [
        Column::StartTime,
        Column::EndTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
        Column::UserType,
        Column::Gender,
        Column::BirthYear,
    ];

    /// CSV header text.
    pub fn header(self) -> &'static str {
        match self {
            Column::StartTime => "Start Time",
            Column::EndTime => "End Time",
            Column::TripDuration => "Trip Duration",
            Column::StartStation => "Start Station",
            Column::EndStation => "End Station",
            Column::UserType => "User Type",
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
        }
    }

    /// Whether a trip file without this column is rejected.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Column::StartTime | Column::TripDuration | Column::StartStation | Column::EndStation
        )
    }

    /// Look a column up by its CSV header (surrounding whitespace ignored).
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.header() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Calendar fields derived from a trip's start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Calendar {
    /// 1..=12
    pub month: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    /// 0..=23
    pub hour: u32,
}

impl Calendar {
    /// Derive month, weekday and hour from a timestamp.
    pub fn derive(start_time: NaiveDateTime) -> Self {
        Self {
            month: start_time.month(),
            weekday: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    /// Lowercase full weekday name.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

/// One bikeshare trip.
///
/// Fields are private so the cached [`Calendar`] can never drift from `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    city: Option<CityId>,
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    trip_duration: f64,
    start_station: String,
    end_station: String,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i64>,
    calendar: Calendar,
}

impl TripRecord {
    /// Create a trip with only the required fields set.
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            city: None,
            start_time,
            end_time: None,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            calendar: Calendar::derive(start_time),
        }
    }

    pub fn with_city(mut self, city: CityId) -> Self {
        self.city = Some(city);
        self
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_user_type(mut self, user_type: Option<impl Into<String>>) -> Self {
        self.user_type = user_type.map(Into::into);
        self
    }

    pub fn with_gender(mut self, gender: Option<impl Into<String>>) -> Self {
        self.gender = gender.map(Into::into);
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i64>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn city(&self) -> Option<CityId> {
        self.city
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    /// Trip duration in seconds.
    pub fn trip_duration(&self) -> f64 {
        self.trip_duration
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i64> {
        self.birth_year
    }

    /// Calendar fields cached at construction.
    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn month(&self) -> u32 {
        self.calendar.month
    }

    pub fn weekday_name(&self) -> &'static str {
        self.calendar.weekday_name()
    }

    pub fn start_hour(&self) -> u32 {
        self.calendar.hour
    }
}

/// In-memory trip table.
///
/// Records keep file order (concatenation order when several cities are loaded). The table is
/// never mutated after construction; filtering produces a new table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TripTable {
    columns: BTreeSet<Column>,
    records: Vec<TripRecord>,
}

impl TripTable {
    /// Create a table from the columns seen in its source(s) and its records.
    pub fn new(columns: impl IntoIterator<Item = Column>, records: Vec<TripRecord>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    /// Concatenate tables in order. The column set is the union of the inputs.
    pub fn concat(tables: impl IntoIterator<Item = TripTable>) -> Self {
        let mut out = TripTable::default();
        for table in tables {
            out.columns.extend(table.columns);
            out.records.extend(table.records);
        }
        out
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&TripRecord> {
        self.records.get(idx)
    }

    /// Whether any source file carried `column`.
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// [`ExplorerError::MissingColumn`] unless some source file carried `column`.
    pub fn require_column(&self, column: Column) -> ExplorerResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(ExplorerError::MissingColumn {
                column: column.header().to_owned(),
            })
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Create a new table containing only records that match `predicate`.
    ///
    /// The returned table keeps the source column set.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&TripRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            records,
        }
    }

    /// Reduce (fold) all records into an accumulator value.
    pub fn reduce_rows<A, F>(&self, init: A, reducer: F) -> A
    where
        F: FnMut(A, &TripRecord) -> A,
    {
        self.records.iter().fold(init, reducer)
    }
}

/// Result of a statistic over an optional column.
///
/// `Unavailable` means the column carried no values at all for the table; it is never used to
/// stand in for a zero count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Availability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Availability::Available(v),
            None => Availability::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn calendar_is_derived_on_construction() {
        let r = TripRecord::new(at(2017, 1, 1, 8, 0), 600.0, "A", "B");
        assert_eq!(r.month(), 1);
        assert_eq!(r.weekday_name(), "sunday");
        assert_eq!(r.start_hour(), 8);
        assert_eq!(r.calendar(), Calendar::derive(r.start_time()));
    }

    #[test]
    fn month_name_bounds() {
        assert_eq!(month_name(1), Some("january"));
        assert_eq!(month_name(12), Some("december"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn city_parse_is_case_insensitive() {
        assert_eq!("Chicago".parse::<CityId>().unwrap(), CityId::Chicago);
        assert_eq!(" NEW YORK CITY ".parse::<CityId>().unwrap(), CityId::NewYorkCity);
        assert_eq!("new_york_city".parse::<CityId>().unwrap(), CityId::NewYorkCity);
        let err = "boston".parse::<CityId>().unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidSelection { kind: "city", .. }));
    }

    #[test]
    fn parse_cities_handles_lists_and_all() {
        assert_eq!(parse_cities("all").unwrap(), CityId::ALL.to_vec());
        assert_eq!(
            parse_cities("washington, chicago, washington").unwrap(),
            vec![CityId::Washington, CityId::Chicago]
        );
        assert!(parse_cities("chicago, gotham").is_err());
    }

    #[test]
    fn concat_unions_columns_and_keeps_order() {
        let a = TripTable::new(
            [Column::StartTime, Column::Gender],
            vec![TripRecord::new(at(2017, 1, 1, 8, 0), 1.0, "A", "B")],
        );
        let b = TripTable::new(
            [Column::StartTime],
            vec![TripRecord::new(at(2017, 2, 1, 9, 0), 2.0, "C", "D")],
        );
        let t = TripTable::concat([a, b]);
        assert_eq!(t.row_count(), 2);
        assert!(t.has_column(Column::Gender));
        assert_eq!(t.records()[0].start_station(), "A");
        assert_eq!(t.records()[1].start_station(), "C");
    }

    #[test]
    fn column_headers_round_trip() {
        for c in Column::ALL {
            assert_eq!(Column::from_header(c.header()), Some(c));
        }
        assert_eq!(Column::from_header("Unnamed: 0"), None);
    }

    #[test]
    fn require_column_reports_missing_headers() {
        let t = TripTable::new([Column::StartTime, Column::TripDuration], Vec::new());
        assert!(t.require_column(Column::TripDuration).is_ok());
        match t.require_column(Column::EndTime) {
            Err(ExplorerError::MissingColumn { column }) => assert_eq!(column, "End Time"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn availability_is_eq_when_its_payload_is() {
        fn requires_eq<T: Eq>(_: &T) {}
        let a: Availability<Vec<u32>> = Availability::Available(vec![1]);
        requires_eq(&a);
        assert_eq!(a, Some(vec![1]).into());
        assert_ne!(a, Availability::Unavailable);
    }
}
