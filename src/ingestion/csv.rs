//! CSV ingestion of a single city trip file.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{CityId, Column, TripRecord, TripTable};

/// Timestamp layouts accepted for `Start Time` / `End Time`.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

const N_COLUMNS: usize = Column::ALL.len();

/// What to do with a row whose cells cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Fail the whole load with [`ExplorerError::ParseError`].
    #[default]
    Abort,
    /// Drop the row and keep going; the row is reported in [`CsvLoad::skipped`].
    SkipRow,
}

/// Result of reading one CSV source.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvLoad {
    pub table: TripTable,
    /// Rows dropped under [`ParsePolicy::SkipRow`], with the error that caused the drop.
    pub skipped: Vec<SkippedRow>,
    /// Malformed optional cells read as absent on rows that were kept.
    pub dropped: Vec<DroppedCell>,
}

/// A row that was dropped instead of aborting the load.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number (the header is line 1).
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub message: String,
}

/// An optional cell (`End Time`, `Birth Year`) that could not be parsed.
///
/// The trip is kept with that value absent under either [`ParsePolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedCell {
    /// 1-based line number (the header is line 1).
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub message: String,
}

impl DroppedCell {
    fn new(row: usize, column: Column, raw: &str, message: &str) -> Self {
        Self {
            row,
            column: column.header().to_owned(),
            raw: raw.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// Ingest a trip CSV file.
///
/// Rules:
///
/// - The file must have headers.
/// - `Start Time`, `Trip Duration`, `Start Station` and `End Station` are required; any other
///   known column is optional and unknown columns are ignored.
/// - Column order does not matter.
/// - A malformed required cell or `Start Time` is handled by `policy`. A malformed optional
///   cell leaves that value absent and is listed in [`CsvLoad::dropped`].
pub fn load_city_from_path(
    path: impl AsRef<Path>,
    city: Option<CityId>,
    policy: ParsePolicy,
) -> ExplorerResult<CsvLoad> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    load_trips_from_reader(&mut rdr, city, policy)
}

/// Ingest trips from an existing CSV reader.
pub fn load_trips_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    city: Option<CityId>,
    policy: ParsePolicy,
) -> ExplorerResult<CsvLoad> {
    let headers = rdr.headers()?.clone();

    // Column -> CSV index. Missing optional columns stay `None`.
    let mut col_idxs: [Option<usize>; N_COLUMNS] = [None; N_COLUMNS];
    for (idx, header) in headers.iter().enumerate() {
        if let Some(column) = Column::from_header(header) {
            col_idxs[column as usize].get_or_insert(idx);
        }
    }
    for column in Column::ALL.into_iter().filter(|c| c.is_required()) {
        if col_idxs[column as usize].is_none() {
            return Err(ExplorerError::SchemaMismatch {
                message: format!(
                    "missing required column '{column}'. headers={:?}",
                    headers.iter().collect::<Vec<_>>()
                ),
            });
        }
    }

    let present = Column::ALL
        .into_iter()
        .filter(|c| col_idxs[*c as usize].is_some())
        .collect::<Vec<_>>();
    let cells = RowCells { col_idxs };

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut dropped = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mark = dropped.len();
        match parse_trip(&cells, &record, user_row, city, &mut dropped) {
            Ok(trip) => records.push(trip),
            Err(ExplorerError::ParseError {
                row,
                column,
                raw,
                message,
            }) if policy == ParsePolicy::SkipRow => {
                dropped.truncate(mark);
                skipped.push(SkippedRow {
                    row,
                    column,
                    raw,
                    message,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(CsvLoad {
        table: TripTable::new(present, records),
        skipped,
        dropped,
    })
}

struct RowCells {
    col_idxs: [Option<usize>; N_COLUMNS],
}

impl RowCells {
    /// Trimmed cell text, `None` when the column is absent or the cell is empty.
    fn get<'r>(&self, record: &'r csv::StringRecord, column: Column) -> Option<&'r str> {
        let idx = self.col_idxs[column as usize]?;
        let raw = record.get(idx)?.trim();
        (!raw.is_empty()).then_some(raw)
    }

    fn required<'r>(
        &self,
        record: &'r csv::StringRecord,
        column: Column,
        row: usize,
    ) -> ExplorerResult<&'r str> {
        self.get(record, column)
            .ok_or_else(|| parse_error(row, column, "", "required value is empty"))
    }
}

fn parse_trip(
    cells: &RowCells,
    record: &csv::StringRecord,
    row: usize,
    city: Option<CityId>,
    dropped: &mut Vec<DroppedCell>,
) -> ExplorerResult<TripRecord> {
    let start_raw = cells.required(record, Column::StartTime, row)?;
    let start_time = parse_timestamp(start_raw)
        .ok_or_else(|| parse_error(row, Column::StartTime, start_raw, "unrecognized timestamp"))?;

    let end_time = cells.get(record, Column::EndTime).and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            dropped.push(DroppedCell::new(row, Column::EndTime, raw, "unrecognized timestamp"));
        }
        parsed
    });

    let duration_raw = cells.required(record, Column::TripDuration, row)?;
    let trip_duration = parse_duration(duration_raw)
        .map_err(|message| parse_error(row, Column::TripDuration, duration_raw, &message))?;

    let birth_year = cells
        .get(record, Column::BirthYear)
        .and_then(|raw| match parse_year(raw) {
            Ok(year) => Some(year),
            Err(message) => {
                dropped.push(DroppedCell::new(row, Column::BirthYear, raw, &message));
                None
            }
        });

    let mut trip = TripRecord::new(
        start_time,
        trip_duration,
        cells.required(record, Column::StartStation, row)?,
        cells.required(record, Column::EndStation, row)?,
    )
    .with_end_time(end_time)
    .with_user_type(cells.get(record, Column::UserType))
    .with_gender(cells.get(record, Column::Gender))
    .with_birth_year(birth_year);
    if let Some(city) = city {
        trip = trip.with_city(city);
    }
    Ok(trip)
}

/// Parse a trip timestamp in any of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_duration(raw: &str) -> Result<f64, String> {
    let v = raw.parse::<f64>().map_err(|e| e.to_string())?;
    if !v.is_finite() || v < 0.0 {
        return Err("expected a finite, non-negative number of seconds".to_string());
    }
    Ok(v)
}

// Birth years come through spreadsheets as `1992.0`.
fn parse_year(raw: &str) -> Result<i64, String> {
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    let v = raw.parse::<f64>().map_err(|e| e.to_string())?;
    if !v.is_finite() {
        return Err("expected a year".to_string());
    }
    Ok(v.trunc() as i64)
}

fn parse_error(row: usize, column: Column, raw: &str, message: &str) -> ExplorerError {
    ExplorerError::ParseError {
        row,
        column: column.header().to_owned(),
        raw: raw.to_owned(),
        message: message.to_owned(),
    }
}
