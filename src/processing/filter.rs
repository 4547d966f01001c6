//! Month/weekday filtering for [`crate::types::TripTable`].

use std::fmt;

use chrono::Weekday;

use crate::config::Vocabulary;
use crate::error::ExplorerResult;
use crate::types::{month_name, weekday_name, TripRecord, TripTable};

/// The user's month/weekday restriction.
///
/// An empty month (or weekday) set means "all". Both sets may be non-empty at once, in which
/// case a record must match both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    months: Vec<u32>,
    weekdays: Vec<Weekday>,
}

impl FilterSpec {
    /// No restriction.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse month and day selections.
    ///
    /// Each argument is `all` or a comma-separated list of names from `vocab`, compared
    /// case-insensitively.
    ///
    /// ```rust
    /// use bikeshare_explorer::config::Vocabulary;
    /// use bikeshare_explorer::processing::FilterSpec;
    ///
    /// let vocab = Vocabulary::default();
    /// let spec = FilterSpec::parse("March", "all", &vocab).unwrap();
    /// assert_eq!(spec.months(), &[3]);
    /// assert!(FilterSpec::parse("all", "someday", &vocab).is_err());
    /// ```
    pub fn parse(month: &str, day: &str, vocab: &Vocabulary) -> ExplorerResult<Self> {
        let mut spec = Self::all();
        if !is_all(month) {
            for name in month.split(',') {
                spec = spec.with_month(vocab.month_number(name)?);
            }
        }
        if !is_all(day) {
            for name in day.split(',') {
                spec = spec.with_weekday(vocab.weekday(name)?);
            }
        }
        Ok(spec)
    }

    /// Add a 1-based month number to the month set.
    pub fn with_month(mut self, month: u32) -> Self {
        if !self.months.contains(&month) {
            self.months.push(month);
        }
        self
    }

    /// Add a weekday to the weekday set.
    pub fn with_weekday(mut self, day: Weekday) -> Self {
        if !self.weekdays.contains(&day) {
            self.weekdays.push(day);
        }
        self
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// Whether this spec keeps every record.
    pub fn is_all(&self) -> bool {
        self.months.is_empty() && self.weekdays.is_empty()
    }

    /// Whether `record` passes both restrictions.
    pub fn matches(&self, record: &TripRecord) -> bool {
        let month_ok = self.months.is_empty() || self.months.contains(&record.month());
        let day_ok = self.weekdays.is_empty()
            || self
                .weekdays
                .iter()
                .any(|d| weekday_name(*d).eq_ignore_ascii_case(record.weekday_name()));
        month_ok && day_ok
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let months = if self.months.is_empty() {
            "all".to_string()
        } else {
            self.months
                .iter()
                .map(|m| month_name(*m).unwrap_or("?"))
                .collect::<Vec<_>>()
                .join(",")
        };
        let days = if self.weekdays.is_empty() {
            "all".to_string()
        } else {
            self.weekdays
                .iter()
                .map(|d| weekday_name(*d))
                .collect::<Vec<_>>()
                .join(",")
        };
        write!(f, "month={months} day={days}")
    }
}

fn is_all(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("all")
}

/// Returns a new [`TripTable`] containing only records matching `spec`.
///
/// Record order is preserved. An all/all spec returns a table equal to the input.
pub fn apply(table: &TripTable, spec: &FilterSpec) -> TripTable {
    if spec.is_all() {
        return table.clone();
    }
    table.filter_rows(|r| spec.matches(r))
}

/// Returns a new [`TripTable`] containing only records for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`TripTable::filter_rows`].
pub fn filter<F>(table: &TripTable, predicate: F) -> TripTable
where
    F: FnMut(&TripRecord) -> bool,
{
    table.filter_rows(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_table() -> TripTable {
        TripTable::new(
            [Column::StartTime, Column::TripDuration, Column::StartStation, Column::EndStation],
            vec![
                // 2017-01-02 is a Monday.
                TripRecord::new(at(1, 2, 8), 100.0, "A", "B"),
                TripRecord::new(at(2, 6, 9), 200.0, "B", "C"),
                TripRecord::new(at(3, 6, 10), 300.0, "C", "D"),
                TripRecord::new(at(3, 7, 11), 400.0, "D", "E"),
            ],
        )
    }

    #[test]
    fn all_all_is_identity() {
        let t = sample_table();
        assert_eq!(apply(&t, &FilterSpec::all()), t);
    }

    #[test]
    fn month_filter_keeps_matching_month() {
        let t = sample_table();
        let vocab = Vocabulary::default();
        for name in vocab.months() {
            let spec = FilterSpec::parse(name, "all", &vocab).unwrap();
            let expected = vocab.month_number(name).unwrap();
            let out = apply(&t, &spec);
            assert!(out.records().iter().all(|r| r.month() == expected));
        }
        let march = apply(&t, &FilterSpec::parse("march", "all", &vocab).unwrap());
        assert_eq!(march.row_count(), 2);
    }

    #[test]
    fn weekday_filter_is_case_insensitive() {
        let t = sample_table();
        let vocab = Vocabulary::default();
        let out = apply(&t, &FilterSpec::parse("all", "MONDAY", &vocab).unwrap());
        assert_eq!(out.row_count(), 3);
        assert!(out.records().iter().all(|r| r.weekday_name() == "monday"));
    }

    #[test]
    fn month_and_weekday_compose() {
        let t = sample_table();
        let vocab = Vocabulary::default();
        let out = apply(&t, &FilterSpec::parse("march", "monday", &vocab).unwrap());
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.records()[0].start_station(), "C");
    }

    #[test]
    fn month_lists_act_as_sets() {
        let t = sample_table();
        let vocab = Vocabulary::default();
        let spec = FilterSpec::parse("january, february, january", "all", &vocab).unwrap();
        assert_eq!(spec.months(), &[1, 2]);
        assert_eq!(apply(&t, &spec).row_count(), 2);
        assert_eq!(spec.to_string(), "month=january,february day=all");
    }

    #[test]
    fn unknown_names_are_invalid_selections() {
        let vocab = Vocabulary::default();
        assert!(FilterSpec::parse("july", "all", &vocab).is_err());
        assert!(FilterSpec::parse("all", "caturday", &vocab).is_err());
    }

    #[test]
    fn filter_can_return_empty_table() {
        let t = sample_table();
        let out = filter(&t, |_| false);
        assert!(out.is_empty());
        assert!(out.has_column(Column::StartStation));
    }
}
