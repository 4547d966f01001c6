//! Most popular route per user type.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::{mode, Counted, Route, RouteRef};
use crate::types::{Availability, Column, TripTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTypeRoute {
    pub user_type: String,
    /// Trips taken by this user type.
    pub trips: usize,
    pub most_common_route: Counted<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutesByUserType {
    /// One entry per distinct user type, in order of first appearance.
    pub by_user_type: Availability<Vec<UserTypeRoute>>,
}

/// Group trips by user type and find each group's most frequent route.
///
/// Trips without a user type are left out. If the source files had no `User Type` column, or no
/// trip has one, the result is [`Availability::Unavailable`].
pub fn routes_by_user_type(table: &TripTable) -> ExplorerResult<RoutesByUserType> {
    if table.is_empty() {
        return Err(ExplorerError::EmptyDataset);
    }

    if !table.has_column(Column::UserType) {
        return Ok(RoutesByUserType {
            by_user_type: Availability::Unavailable,
        });
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<RouteRef<'_>>> = HashMap::new();
    for record in table.records() {
        let Some(user_type) = record.user_type() else {
            continue;
        };
        groups
            .entry(user_type)
            .or_insert_with(|| {
                order.push(user_type);
                Vec::new()
            })
            .push(RouteRef::of(record));
    }

    if order.is_empty() {
        return Ok(RoutesByUserType {
            by_user_type: Availability::Unavailable,
        });
    }

    let entries = order
        .into_iter()
        .filter_map(|user_type| {
            let group = groups.remove(user_type)?;
            let trips = group.len();
            let top = mode(group)?;
            Some(UserTypeRoute {
                user_type: user_type.to_owned(),
                trips,
                most_common_route: top.map(RouteRef::to_route),
            })
        })
        .collect();

    Ok(RoutesByUserType {
        by_user_type: Availability::Available(entries),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::routes;
    use crate::types::TripRecord;
    use chrono::NaiveDate;

    fn trip(user_type: Option<&str>, start: &str, end: &str) -> TripRecord {
        let at = NaiveDate::from_ymd_opt(2017, 6, 1)
            .unwrap()
            .and_hms_opt(17, 30, 0)
            .unwrap();
        TripRecord::new(at, 300.0, start, end).with_user_type(user_type)
    }

    #[test]
    fn one_entry_per_user_type_in_first_seen_order() {
        let t = TripTable::new(
            Column::ALL,
            vec![
                trip(Some("Customer"), "Lake", "Pier"),
                trip(Some("Subscriber"), "A", "B"),
                trip(Some("Subscriber"), "C", "D"),
                trip(Some("Subscriber"), "C", "D"),
                trip(Some("Customer"), "Lake", "Pier"),
                trip(None, "X", "Y"),
            ],
        );
        let out = routes_by_user_type(&t).unwrap();
        let entries = out.by_user_type.as_option().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_type, "Customer");
        assert_eq!(entries[0].trips, 2);
        assert_eq!(entries[0].most_common_route.value.to_string(), "Lake to Pier");
        assert_eq!(entries[1].user_type, "Subscriber");
        assert_eq!(entries[1].most_common_route.value, Route::new("C", "D"));
        assert_eq!(entries[1].most_common_route.count, 2);
    }

    #[test]
    fn each_entry_agrees_with_a_subset_mode() {
        let t = TripTable::new(
            Column::ALL,
            vec![
                trip(Some("Subscriber"), "B", "A"),
                trip(Some("Customer"), "A", "B"),
                trip(Some("Subscriber"), "A", "B"),
                trip(Some("Subscriber"), "B", "A"),
                trip(Some("Customer"), "B", "A"),
            ],
        );
        let out = routes_by_user_type(&t).unwrap();
        for entry in out.by_user_type.as_option().unwrap() {
            let subset = t.filter_rows(|r| r.user_type() == Some(entry.user_type.as_str()));
            let expected = mode(routes(&subset)).unwrap();
            assert_eq!(entry.most_common_route.value, expected.value.to_route());
            assert_eq!(entry.most_common_route.count, expected.count);
        }
    }

    #[test]
    fn no_user_types_is_unavailable() {
        let t = TripTable::new([Column::StartTime], vec![trip(None, "A", "B")]);
        let out = routes_by_user_type(&t).unwrap();
        assert_eq!(out.by_user_type, Availability::Unavailable);
    }

    #[test]
    fn tied_routes_go_to_the_smaller_label() {
        let t = TripTable::new(
            Column::ALL,
            vec![
                trip(Some("Customer"), "Pier", "Lake"),
                trip(Some("Customer"), "Lake", "Pier"),
            ],
        );
        let out = routes_by_user_type(&t).unwrap();
        let entry = &out.by_user_type.as_option().unwrap()[0];
        assert_eq!(entry.most_common_route.value.to_string(), "Lake to Pier");
        assert_eq!(entry.most_common_route.count, 1);
        assert_eq!(entry.trips, 2);
    }

    #[test]
    fn absent_user_type_column_is_unavailable() {
        let t = TripTable::new(
            [Column::StartTime, Column::TripDuration, Column::StartStation, Column::EndStation],
            vec![trip(Some("Subscriber"), "A", "B")],
        );
        let out = routes_by_user_type(&t).unwrap();
        assert_eq!(out.by_user_type, Availability::Unavailable);
    }
}
