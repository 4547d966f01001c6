//! Rider demographics.

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::{mode, reduce, value_counts, Counted, ReduceOp};
use crate::types::{Availability, Column, TripTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i64,
    pub most_recent: i64,
    pub most_common: Counted<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Trips per user type, most frequent first.
    pub user_types: Availability<Vec<Counted<String>>>,
    /// Trips per gender, most frequent first.
    pub genders: Availability<Vec<Counted<String>>>,
    pub birth_years: Availability<BirthYearStats>,
}

/// Counts of user types and genders, and birth year extremes/mode.
///
/// A column missing from every source file, or empty for every filtered trip, is
/// [`Availability::Unavailable`].
pub fn user_stats(table: &TripTable) -> ExplorerResult<UserStats> {
    if table.is_empty() {
        return Err(ExplorerError::EmptyDataset);
    }

    let user_types = if table.has_column(Column::UserType) {
        counts_of(table.records().iter().filter_map(|r| r.user_type()))
    } else {
        Availability::Unavailable
    };
    let genders = if table.has_column(Column::Gender) {
        counts_of(table.records().iter().filter_map(|r| r.gender()))
    } else {
        Availability::Unavailable
    };
    let birth_years = if table.has_column(Column::BirthYear) {
        birth_year_stats(table).into()
    } else {
        Availability::Unavailable
    };

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
    })
}

fn counts_of<'a>(values: impl Iterator<Item = &'a str>) -> Availability<Vec<Counted<String>>> {
    let counts = value_counts(values);
    if counts.is_empty() {
        return Availability::Unavailable;
    }
    Availability::Available(counts.into_iter().map(|c| c.map(str::to_owned)).collect())
}

fn birth_year_stats(table: &TripTable) -> Option<BirthYearStats> {
    let most_common = mode(table.records().iter().filter_map(|r| r.birth_year()))?;
    let earliest = reduce(table, Column::BirthYear, ReduceOp::Min)?;
    let most_recent = reduce(table, Column::BirthYear, ReduceOp::Max)?;
    Some(BirthYearStats {
        earliest: earliest as i64,
        most_recent: most_recent as i64,
        most_common,
    })
}
