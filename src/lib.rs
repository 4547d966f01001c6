//! `bikeshare-explorer` loads per-city bikeshare trip files into an in-memory
//! [`types::TripTable`], narrows it by month and weekday, and answers a fixed set of descriptive
//! questions about the remaining trips.
//!
//! The primary entrypoint is [`session::Explorer::open`], which loads one or more cities via
//! [`ingestion::load_cities`], applies a [`processing::FilterSpec`] and returns a
//! [`session::Session`] holding the filtered table and a resumable browse cursor.
//!
//! ## Input files
//!
//! One CSV per city, header-driven. Columns:
//!
//! - **required**: `Start Time`, `Trip Duration`, `Start Station`, `End Station`
//! - **optional**: `End Time`, `User Type`, `Gender`, `Birth Year`
//!
//! Unknown columns (such as the unnamed leading index column) are ignored. Washington has no
//! `Gender` / `Birth Year`; reports over those columns come back as
//! [`types::Availability::Unavailable`] instead of a zero count.
//!
//! ## Quick example: load and report
//!
//! ```no_run
//! use bikeshare_explorer::config::ExplorerConfig;
//! use bikeshare_explorer::ingestion::LoadOptions;
//! use bikeshare_explorer::processing::FilterSpec;
//! use bikeshare_explorer::session::{Explorer, ReportKind};
//! use bikeshare_explorer::types::CityId;
//!
//! # fn main() -> Result<(), bikeshare_explorer::ExplorerError> {
//! let explorer = Explorer::new(ExplorerConfig::default(), LoadOptions::default());
//! let filter = FilterSpec::parse("march", "all", explorer.vocabulary())?;
//! let session = explorer.open(&[CityId::Chicago], filter)?;
//! let report = session.report(ReportKind::Station)?;
//! println!("{}", bikeshare_explorer::render::render_report(&report));
//! # Ok(())
//! # }
//! ```
//!
//! ## In-memory example
//!
//! ```rust
//! use bikeshare_explorer::processing::FilterSpec;
//! use bikeshare_explorer::session::Session;
//! use bikeshare_explorer::types::{Column, TripRecord, TripTable};
//! use chrono::NaiveDate;
//!
//! let at = |min| NaiveDate::from_ymd_opt(2017, 1, 1).unwrap().and_hms_opt(8, min, 0).unwrap();
//! let table = TripTable::new(
//!     Column::ALL,
//!     vec![
//!         TripRecord::new(at(0), 600.0, "A", "B"),
//!         TripRecord::new(at(5), 300.0, "A", "B"),
//!     ],
//! );
//!
//! let mut session = Session::from_table(&table, FilterSpec::all());
//! let d = session.duration_stats().unwrap();
//! assert_eq!((d.total_seconds, d.mean_seconds), (900.0, 450.0));
//! assert_eq!(session.station_stats().unwrap().most_common_route.value.to_string(), "A to B");
//!
//! session.select_sort(None).unwrap();
//! assert_eq!(session.next_page().records.len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: city file loading, parse policy and load observers
//! - [`types`]: trip records, the trip table and city/column identifiers
//! - [`config`]: file locations and the month/weekday vocabulary
//! - [`processing`]: filter/map/reduce over a trip table
//! - [`stats`]: the five aggregate reports
//! - [`browse`]: paged, sortable raw row browsing
//! - [`session`]: one loaded selection plus its browse state
//! - [`render`]: text and JSON output
//! - [`cli`]: the interactive menu loop
//! - [`error`]: the shared error type

pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod render;
pub mod session;
pub mod stats;
pub mod types;

pub use error::{ExplorerError, ExplorerResult};
