//! Most popular stations and trip.

use serde::Serialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::processing::{map, mode, routes, Counted, Route};
use crate::types::TripTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub most_common_start_station: Counted<String>,
    pub most_common_end_station: Counted<String>,
    pub most_common_route: Counted<Route>,
}

pub fn station_stats(table: &TripTable) -> ExplorerResult<StationStats> {
    let start = mode(map(table, |r| r.start_station())).ok_or(ExplorerError::EmptyDataset)?;
    let end = mode(map(table, |r| r.end_station())).ok_or(ExplorerError::EmptyDataset)?;
    let route = mode(routes(table)).ok_or(ExplorerError::EmptyDataset)?;

    Ok(StationStats {
        most_common_start_station: start.map(str::to_owned),
        most_common_end_station: end.map(str::to_owned),
        most_common_route: route.map(|r| r.to_route()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, TripRecord};
    use chrono::NaiveDate;

    fn table(pairs: &[(&str, &str)]) -> TripTable {
        let start = NaiveDate::from_ymd_opt(2017, 5, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        TripTable::new(
            Column::ALL,
            pairs
                .iter()
                .map(|(s, e)| TripRecord::new(start, 1.0, *s, *e))
                .collect(),
        )
    }

    #[test]
    fn finds_popular_stations_and_route() {
        let t = table(&[("A", "B"), ("A", "C"), ("D", "B"), ("A", "B")]);
        let stats = station_stats(&t).unwrap();
        assert_eq!(stats.most_common_start_station, Counted { value: "A".to_string(), count: 3 });
        assert_eq!(stats.most_common_end_station, Counted { value: "B".to_string(), count: 3 });
        assert_eq!(stats.most_common_route.value.to_string(), "A to B");
        assert_eq!(stats.most_common_route.count, 2);
    }

    #[test]
    fn repeated_calls_see_the_same_table() {
        let t = table(&[("A", "B"), ("C", "D"), ("C", "D")]);
        let before = t.clone();
        let first = station_stats(&t).unwrap();
        let second = station_stats(&t).unwrap();
        assert_eq!(first, second);
        assert_eq!(t, before);
    }

    #[test]
    fn empty_table_is_an_error() {
        assert!(matches!(
            station_stats(&TripTable::default()),
            Err(ExplorerError::EmptyDataset)
        ));
    }
}
