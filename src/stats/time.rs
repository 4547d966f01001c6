//! Most frequent times of travel.

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::{map, mode, Counted};
use crate::types::{month_name, TripTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    /// 1-based month number.
    pub most_common_month: Counted<u32>,
    /// Lowercase weekday name.
    pub most_common_weekday: Counted<String>,
    /// Start hour, 0..=23.
    pub most_common_hour: Counted<u32>,
}

impl TimeStats {
    pub fn most_common_month_name(&self) -> &'static str {
        month_name(self.most_common_month.value).unwrap_or("unknown")
    }
}

/// Mode of the derived month, weekday and start hour.
///
/// Ties go to the smallest month/hour number and the alphabetically first weekday name.
pub fn time_stats(table: &TripTable) -> ExplorerResult<TimeStats> {
    let month = mode(map(table, |r| r.month())).ok_or(ExplorerError::EmptyDataset)?;
    let weekday = mode(map(table, |r| r.weekday_name())).ok_or(ExplorerError::EmptyDataset)?;
    let hour = mode(map(table, |r| r.start_hour())).ok_or(ExplorerError::EmptyDataset)?;

    Ok(TimeStats {
        most_common_month: month,
        most_common_weekday: weekday.map(str::to_owned),
        most_common_hour: hour,
    })
}
