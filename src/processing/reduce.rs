//! Reductions over [`crate::types::TripTable`] columns and record projections.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Column, TripRecord, TripTable};

/// A value together with how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Counted<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Counted<U> {
        Counted {
            value: f(self.value),
            count: self.count,
        }
    }
}

fn tally<T: Ord, I: IntoIterator<Item = T>>(values: I) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Frequency of each distinct value, most frequent first.
///
/// Equal counts are ordered by ascending value.
pub fn value_counts<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Vec<Counted<T>> {
    let mut out: Vec<Counted<T>> = tally(values)
        .into_iter()
        .map(|(value, count)| Counted { value, count })
        .collect();
    // Stable: ties keep the ascending key order from the map.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// The most frequent value.
///
/// Ties go to the smallest value in natural order. Returns `None` for an empty input.
pub fn mode<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Option<Counted<T>> {
    let mut best: Option<Counted<T>> = None;
    for (value, count) in tally(values) {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Counted { value, count });
        }
    }
    best
}

/// Built-in reduction operations over a single numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-absent values.
    Count,
    /// Sum values.
    Sum,
    /// Arithmetic mean.
    Mean,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
}

fn numeric_value(record: &TripRecord, column: Column) -> Option<f64> {
    match column {
        Column::TripDuration => Some(record.trip_duration()),
        Column::BirthYear => record.birth_year().map(|y| y as f64),
        _ => None,
    }
}

/// Reduce a numeric column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` is not numeric (`Trip Duration`, `Birth Year`).
/// - Absent values are ignored.
/// - `Count` returns `Some(0.0)` when nothing is present; the other ops return `None`.
pub fn reduce(table: &TripTable, column: Column, op: ReduceOp) -> Option<f64> {
    if !matches!(column, Column::TripDuration | Column::BirthYear) {
        return None;
    }

    let (count, sum, min, max) = table.reduce_rows(
        (0usize, 0.0f64, f64::INFINITY, f64::NEG_INFINITY),
        |(count, sum, min, max), record| match numeric_value(record, column) {
            Some(v) => (count + 1, sum + v, min.min(v), max.max(v)),
            None => (count, sum, min, max),
        },
    );

    match op {
        ReduceOp::Count => Some(count as f64),
        _ if count == 0 => None,
        ReduceOp::Sum => Some(sum),
        ReduceOp::Mean => Some(sum / count as f64),
        ReduceOp::Min => Some(min),
        ReduceOp::Max => Some(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table_with_years(years: &[Option<i64>]) -> TripTable {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = years
            .iter()
            .enumerate()
            .map(|(i, y)| {
                TripRecord::new(start, (i as f64 + 1.0) * 10.0, "A", "B").with_birth_year(*y)
            })
            .collect();
        TripTable::new([Column::StartTime, Column::TripDuration, Column::BirthYear], records)
    }

    #[test]
    fn mode_breaks_ties_by_smallest_value() {
        let m = mode(["b", "a", "b", "a", "c"]).unwrap();
        assert_eq!(m, Counted { value: "a", count: 2 });
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn value_counts_orders_by_count_then_value() {
        let counts = value_counts(["x", "y", "y", "z", "x", "y"]);
        assert_eq!(
            counts,
            vec![
                Counted { value: "y", count: 3 },
                Counted { value: "x", count: 2 },
                Counted { value: "z", count: 1 },
            ]
        );
    }

    #[test]
    fn reduce_ignores_absent_values() {
        let t = table_with_years(&[Some(1980), None, Some(1990)]);
        assert_eq!(reduce(&t, Column::BirthYear, ReduceOp::Count), Some(2.0));
        assert_eq!(reduce(&t, Column::BirthYear, ReduceOp::Min), Some(1980.0));
        assert_eq!(reduce(&t, Column::BirthYear, ReduceOp::Max), Some(1990.0));
        assert_eq!(reduce(&t, Column::TripDuration, ReduceOp::Sum), Some(60.0));
        assert_eq!(reduce(&t, Column::TripDuration, ReduceOp::Mean), Some(20.0));
    }

    #[test]
    fn reduce_returns_none_for_non_numeric_or_empty() {
        let t = table_with_years(&[None, None]);
        assert_eq!(reduce(&t, Column::StartStation, ReduceOp::Count), None);
        assert_eq!(reduce(&t, Column::BirthYear, ReduceOp::Sum), None);
        assert_eq!(reduce(&t, Column::BirthYear, ReduceOp::Count), Some(0.0));
    }
}
