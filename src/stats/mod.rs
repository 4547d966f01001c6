//! Report aggregators.
//!
//! Each aggregator takes an (already filtered) [`crate::types::TripTable`] by shared reference
//! and returns a structured, serializable result. None of them mutates the table, and every one
//! returns [`crate::ExplorerError::EmptyDataset`] for a table without rows.
//!
//! - [`time_stats`]: most frequent month, weekday and start hour
//! - [`station_stats`]: most frequent start station, end station and route
//! - [`duration_stats`]: total and mean trip duration
//! - [`user_stats`]: user type / gender counts and birth year extremes
//! - [`routes_by_user_type`]: most frequent route for each user type

pub mod duration;
pub mod routes;
pub mod station;
pub mod time;
pub mod user;

pub use duration::{duration_stats, DurationBreakdown, DurationStats};
pub use routes::{routes_by_user_type, RoutesByUserType, UserTypeRoute};
pub use station::{station_stats, StationStats};
pub use time::{time_stats, TimeStats};
pub use user::{user_stats, BirthYearStats, UserStats};
