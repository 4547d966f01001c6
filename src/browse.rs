//! Raw row browsing: five trips at a time, optionally sorted, resumable.
//!
//! A [`Browser`] is a two-state machine:
//!
//! - **Sorting-selection** ([`Browser::needs_sort_selection`]): the cursor is at 0, so the caller
//!   picks an optional [`SortSpec`] through [`Browser::select_sort`].
//! - **Paging**: [`Browser::next_page`] returns up to [`PAGE_SIZE`] trips from the cursor and
//!   advances it. The cursor never moves past the end of the table.
//!
//! On re-entry with a non-zero cursor the caller either keeps paging (resume) or calls
//! [`Browser::reset`], which returns to Sorting-selection.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{Column, TripRecord, TripTable};

/// Trips per page.
pub const PAGE_SIZE: usize = 5;

/// Columns the browser can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::StartTime,
        SortKey::EndTime,
        SortKey::TripDuration,
        SortKey::StartStation,
        SortKey::EndStation,
    ];

    /// Short menu code (`st`, `et`, `td`, `ss`, `es`).
    pub fn code(self) -> &'static str {
        match self {
            SortKey::StartTime => "st",
            SortKey::EndTime => "et",
            SortKey::TripDuration => "td",
            SortKey::StartStation => "ss",
            SortKey::EndStation => "es",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortKey::StartTime => "start_time",
            SortKey::EndTime => "end_time",
            SortKey::TripDuration => "trip_duration",
            SortKey::StartStation => "start_station",
            SortKey::EndStation => "end_station",
        }
    }

    /// Table column the key reads.
    pub fn column(self) -> Column {
        match self {
            SortKey::StartTime => Column::StartTime,
            SortKey::EndTime => Column::EndTime,
            SortKey::TripDuration => Column::TripDuration,
            SortKey::StartStation => Column::StartStation,
            SortKey::EndStation => Column::EndStation,
        }
    }

    fn compare(self, a: &TripRecord, b: &TripRecord) -> Ordering {
        match self {
            SortKey::StartTime => a.start_time().cmp(&b.start_time()),
            SortKey::EndTime => a.end_time().cmp(&b.end_time()),
            SortKey::TripDuration => a.trip_duration().total_cmp(&b.trip_duration()),
            SortKey::StartStation => a.start_station().cmp(b.start_station()),
            SortKey::EndStation => a.end_station().cmp(b.end_station()),
        }
    }

    fn is_absent(self, record: &TripRecord) -> bool {
        self == SortKey::EndTime && record.end_time().is_none()
    }
}

impl FromStr for SortKey {
    type Err = ExplorerError;

    /// Accepts the menu code or the column name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(s) || k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExplorerError::invalid("sort key", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `d` / `desc` / `descending` sort descending; any other answer sorts ascending.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "d" | "desc" | "descending" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Parse the answers of the sort prompt. An empty key means "keep table order".
pub fn parse_sort(key: &str, direction: &str) -> ExplorerResult<Option<SortSpec>> {
    if key.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(SortSpec {
        key: key.parse()?,
        direction: SortDirection::from_answer(direction),
    }))
}

/// Stable permutation of `table` row indexes for `spec`.
///
/// Absent values (trips without an end time) go last in either direction.
pub fn sorted_order(table: &TripTable, spec: SortSpec) -> Vec<usize> {
    let records = table.records();
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&i, &j| {
        let (a, b) = (&records[i], &records[j]);
        match (spec.key.is_absent(a), spec.key.is_absent(b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = spec.key.compare(a, b);
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            }
        }
    });
    order
}

/// One batch of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'t> {
    /// Cursor position the page starts at.
    pub start: usize,
    pub records: Vec<&'t TripRecord>,
    /// Whether the cursor has reached the end of the table.
    pub end_of_table: bool,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Resumable browse state for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Browser {
    cursor: usize,
    sort: Option<SortSpec>,
    order: Option<Vec<usize>>,
}

impl Browser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sort currently applied, if any.
    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// A fresh browse session starts with sort selection.
    pub fn needs_sort_selection(&self) -> bool {
        self.cursor == 0
    }

    /// Choose the ordering for this browse session and rewind to the first row.
    ///
    /// Sorting by a column none of the source files carried is
    /// [`ExplorerError::MissingColumn`] and leaves the browser untouched.
    pub fn select_sort(&mut self, table: &TripTable, sort: Option<SortSpec>) -> ExplorerResult<()> {
        if let Some(spec) = sort {
            table.require_column(spec.key.column())?;
        }
        self.cursor = 0;
        self.sort = sort;
        self.order = sort.map(|spec| sorted_order(table, spec));
        Ok(())
    }

    /// Rewind to the first row and drop the ordering.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Return up to [`PAGE_SIZE`] rows from the cursor and advance it.
    ///
    /// At the end of the table this returns an empty page and leaves the cursor in place.
    pub fn next_page<'t>(&mut self, table: &'t TripTable) -> Page<'t> {
        let len = table.row_count();
        let start = self.cursor.min(len);
        let end = (start + PAGE_SIZE).min(len);

        let records = (start..end)
            .filter_map(|pos| {
                let idx = match &self.order {
                    Some(order) => *order.get(pos)?,
                    None => pos,
                };
                table.get(idx)
            })
            .collect();

        self.cursor = end;
        Page {
            start,
            records,
            end_of_table: end >= len,
        }
    }
}
