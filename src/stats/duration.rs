//! Total and mean trip duration.

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::{reduce, ReduceOp};
use crate::types::{Column, TripTable};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

/// Whole-second split of a duration into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationBreakdown {
    /// Split `seconds` after truncating the fractional part.
    pub fn from_seconds(seconds: f64) -> Self {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.trunc() as u64
        } else {
            0
        };
        Self {
            days: total / SECS_PER_DAY,
            hours: (total % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    /// Whole seconds represented by this breakdown.
    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY + self.hours * SECS_PER_HOUR + self.minutes * SECS_PER_MINUTE + self.seconds
    }

    /// Whole minutes, not wrapped at the hour.
    pub fn total_minutes(&self) -> u64 {
        self.total_seconds() / SECS_PER_MINUTE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    pub total: DurationBreakdown,
    pub mean: DurationBreakdown,
}

/// Sum and mean of `Trip Duration`. A zero-row table is [`ExplorerError::EmptyDataset`].
pub fn duration_stats(table: &TripTable) -> ExplorerResult<DurationStats> {
    if table.is_empty() {
        return Err(ExplorerError::EmptyDataset);
    }
    let total_seconds = reduce(table, Column::TripDuration, ReduceOp::Sum).ok_or(ExplorerError::EmptyDataset)?;
    let mean_seconds = reduce(table, Column::TripDuration, ReduceOp::Mean).ok_or(ExplorerError::EmptyDataset)?;

    Ok(DurationStats {
        trips: table.row_count(),
        total_seconds,
        mean_seconds,
        total: DurationBreakdown::from_seconds(total_seconds),
        mean: DurationBreakdown::from_seconds(mean_seconds),
    })
}
