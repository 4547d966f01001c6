//! Record store: loading city trip files into an in-memory [`crate::types::TripTable`].
//!
//! Most callers should use [`load_cities`] (from [`unified`]) which:
//!
//! - resolves each city's file through [`crate::config::ExplorerConfig`]
//! - loads and concatenates the files in the requested order
//! - optionally reports success/failure/alerts/skipped rows/dropped cells to a [`LoadObserver`]
//!
//! Single-file loading is available under [`csv`].

pub mod csv;
pub mod observability;
pub mod unified;

pub use csv::{
    load_city_from_path, load_trips_from_reader, parse_timestamp, CsvLoad, DroppedCell, ParsePolicy, SkippedRow,
};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, StdErrObserver,
};
pub use unified::{load_cities, LoadOptions};
