//! Derived projections of [`crate::types::TripTable`] records.
//!
//! Projections are computed into fresh vectors; the table itself never gains a derived column,
//! so two reports over the same table cannot see each other's intermediate state.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::types::{TripRecord, TripTable};

/// Separator between start and end station in a route label.
pub const ROUTE_SEPARATOR: &str = " to ";

/// Returns `mapper(record)` for every record, in table order.
pub fn map<'t, T, F>(table: &'t TripTable, mapper: F) -> Vec<T>
where
    F: FnMut(&'t TripRecord) -> T,
{
    table.records().iter().map(mapper).collect()
}

/// The route of every record, in table order.
pub fn routes(table: &TripTable) -> Vec<RouteRef<'_>> {
    map(table, RouteRef::of)
}

/// A borrowed `(start_station, end_station)` pair.
///
/// Equality and ordering follow the rendered label (`"start to end"`), so grouping and tie
/// breaking behave exactly as they would on the label text, without allocating it.
#[derive(Debug, Clone, Copy)]
pub struct RouteRef<'a> {
    pub start_station: &'a str,
    pub end_station: &'a str,
}

impl<'a> RouteRef<'a> {
    pub fn of(record: &'a TripRecord) -> Self {
        Self {
            start_station: record.start_station(),
            end_station: record.end_station(),
        }
    }

    fn label_bytes(self) -> impl Iterator<Item = u8> + 'a {
        self.start_station
            .bytes()
            .chain(ROUTE_SEPARATOR.bytes())
            .chain(self.end_station.bytes())
    }

    pub fn to_route(self) -> Route {
        Route {
            start_station: self.start_station.to_owned(),
            end_station: self.end_station.to_owned(),
        }
    }
}

impl PartialEq for RouteRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RouteRef<'_> {}

impl PartialOrd for RouteRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RouteRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label_bytes().cmp(other.label_bytes())
    }
}

impl fmt::Display for RouteRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ROUTE_SEPARATOR}{}", self.start_station, self.end_station)
    }
}

/// An owned route, as returned in report results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub start_station: String,
    pub end_station: String,
}

impl Route {
    pub fn new(start_station: impl Into<String>, end_station: impl Into<String>) -> Self {
        Self {
            start_station: start_station.into(),
            end_station: end_station.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ROUTE_SEPARATOR}{}", self.start_station, self.end_station)
    }
}
