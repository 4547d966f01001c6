//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::TripTable`] values produced by ingestion.
//! Everything here is read-only over its input:
//!
//! - [`filter()`] / [`apply()`]: row filtering by predicate or by [`FilterSpec`]
//! - [`map()`] / [`routes()`]: derived projections, returned as new vectors
//! - [`reduce()`], [`mode()`], [`value_counts()`]: reductions
//!
//! ## Example: filter → project → reduce
//!
//! ```rust
//! use bikeshare_explorer::config::Vocabulary;
//! use bikeshare_explorer::processing::{apply, mode, reduce, routes, FilterSpec, ReduceOp};
//! use bikeshare_explorer::types::{Column, TripRecord, TripTable};
//! use chrono::NaiveDate;
//!
//! let at = |h| NaiveDate::from_ymd_opt(2017, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap();
//! let table = TripTable::new(
//!     Column::ALL,
//!     vec![
//!         TripRecord::new(at(8), 600.0, "A", "B"),
//!         TripRecord::new(at(9), 300.0, "A", "B"),
//!     ],
//! );
//!
//! let january = apply(&table, &FilterSpec::parse("january", "all", &Vocabulary::default()).unwrap());
//! let top = mode(routes(&january)).unwrap();
//! assert_eq!(top.value.to_string(), "A to B");
//! assert_eq!(reduce(&january, Column::TripDuration, ReduceOp::Sum), Some(900.0));
//! ```

pub mod filter;
pub mod map;
pub mod reduce;

pub use filter::{apply, filter, FilterSpec};
pub use map::{map, routes, Route, RouteRef, ROUTE_SEPARATOR};
pub use reduce::{mode, reduce, value_counts, Counted, ReduceOp};
