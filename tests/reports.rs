use std::path::PathBuf;

use bikeshare_explorer::config::ExplorerConfig;
use bikeshare_explorer::ingestion::LoadOptions;
use bikeshare_explorer::processing::{apply, FilterSpec};
use bikeshare_explorer::render::{render_report, to_json};
use bikeshare_explorer::session::{Explorer, ReportKind, Session};
use bikeshare_explorer::stats::UserTypeRoute;
use bikeshare_explorer::types::{Availability, CityId};
use bikeshare_explorer::ExplorerError;
use chrono::Weekday;

fn explorer() -> Explorer {
    let config = ExplorerConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
        ..ExplorerConfig::default()
    };
    Explorer::new(config, LoadOptions::default())
}

fn open(cities: &[CityId], month: &str, day: &str) -> Session {
    let ex = explorer();
    let filter = FilterSpec::parse(month, day, ex.vocabulary()).unwrap();
    ex.open(cities, filter).unwrap()
}

#[test]
fn chicago_time_stats() {
    let s = open(&[CityId::Chicago], "all", "all");
    let t = s.time_stats().unwrap();
    assert_eq!(t.most_common_month_name(), "january");
    assert_eq!(t.most_common_month.count, 3);
    assert_eq!(t.most_common_weekday.value, "monday");
    assert_eq!(t.most_common_weekday.count, 5);
    assert_eq!(t.most_common_hour.value, 8);
    assert_eq!(t.most_common_hour.count, 4);
}

#[test]
fn chicago_station_stats() {
    let s = open(&[CityId::Chicago], "all", "all");
    let st = s.station_stats().unwrap();
    assert_eq!(st.most_common_start_station.value, "A St");
    assert_eq!(st.most_common_start_station.count, 3);
    assert_eq!(st.most_common_end_station.value, "B St");
    assert_eq!(st.most_common_route.value.to_string(), "A St to B St");
    assert_eq!(st.most_common_route.count, 3);
}

#[test]
fn chicago_duration_stats() {
    let s = open(&[CityId::Chicago], "all", "all");
    let d = s.duration_stats().unwrap();
    assert_eq!(d.trips, 6);
    assert_eq!(d.total_seconds, 4800.0);
    assert_eq!(d.mean_seconds, 800.0);
    assert_eq!((d.total.hours, d.total.minutes, d.total.seconds), (1, 20, 0));
    assert_eq!((d.mean.minutes, d.mean.seconds), (13, 20));
}

#[test]
fn chicago_user_stats() {
    let s = open(&[CityId::Chicago], "all", "all");
    let u = s.user_stats().unwrap();

    let types: Vec<_> = u
        .user_types
        .as_option()
        .unwrap()
        .iter()
        .map(|c| (c.value.as_str(), c.count))
        .collect();
    assert_eq!(types, vec![("Subscriber", 4), ("Customer", 2)]);

    // Equal counts list alphabetically.
    let genders: Vec<_> = u
        .genders
        .as_option()
        .unwrap()
        .iter()
        .map(|c| (c.value.as_str(), c.count))
        .collect();
    assert_eq!(genders, vec![("Female", 2), ("Male", 2)]);

    let years = u.birth_years.as_option().unwrap();
    assert_eq!(years.earliest, 1985);
    assert_eq!(years.most_recent, 1992);
    assert_eq!(years.most_common.value, 1990);
    assert_eq!(years.most_common.count, 2);
}

#[test]
fn washington_has_no_gender_or_birth_year() {
    let s = open(&[CityId::Washington], "all", "all");
    let u = s.user_stats().unwrap();
    assert!(u.user_types.is_available());
    assert_eq!(u.genders, Availability::Unavailable);
    assert_eq!(u.birth_years, Availability::Unavailable);

    let text = render_report(&s.report(ReportKind::User).unwrap());
    assert!(text.contains("Gender data not available."));
}

#[test]
fn chicago_routes_by_user_type() {
    let s = open(&[CityId::Chicago], "all", "all");
    let r = s.routes_by_user_type().unwrap();
    let entries: Vec<UserTypeRoute> = r.by_user_type.into_option().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].user_type, "Subscriber");
    assert_eq!(entries[0].trips, 4);
    // A St->B St and C St->A St both occur twice; the smaller label wins.
    assert_eq!(entries[0].most_common_route.value.to_string(), "A St to B St");
    assert_eq!(entries[0].most_common_route.count, 2);

    assert_eq!(entries[1].user_type, "Customer");
    assert_eq!(entries[1].trips, 2);
    assert_eq!(entries[1].most_common_route.value.to_string(), "A St to B St");
}

#[test]
fn month_filter_keeps_only_that_month() {
    let s = open(&[CityId::Chicago], "january", "all");
    assert_eq!(s.table().row_count(), 3);
    assert!(s.table().records().iter().all(|r| r.month() == 1));
}

#[test]
fn day_filter_keeps_only_that_weekday() {
    let s = open(&[CityId::Chicago], "all", "tuesday");
    assert_eq!(s.table().row_count(), 1);
    assert_eq!(s.table().get(0).unwrap().start_station(), "B St");
}

#[test]
fn month_and_day_lists_combine() {
    let s = open(&CityId::ALL, "january,april", "monday,tuesday");
    // chicago: 3 january trips (mon, mon, tue); washington: jan mon + 2 april tue.
    assert_eq!(s.table().row_count(), 6);
    for r in s.table().records() {
        assert!([1, 4].contains(&r.month()));
        assert!(["monday", "tuesday"].contains(&r.weekday_name()));
    }
}

#[test]
fn all_all_filter_is_identity() {
    let ex = explorer();
    let full = ex.open(&CityId::ALL, FilterSpec::all()).unwrap();
    let again = apply(full.table(), &FilterSpec::all());
    assert_eq!(&again, full.table());
}

#[test]
fn filter_matching_nothing_reports_empty_dataset() {
    let ex = explorer();
    let filter = FilterSpec::all().with_month(2).with_weekday(Weekday::Sat);
    let s = ex.open(&[CityId::Chicago], filter).unwrap();
    assert!(s.table().is_empty());
    for kind in ReportKind::ALL {
        assert!(matches!(s.report(kind), Err(ExplorerError::EmptyDataset)));
    }
}

#[test]
fn json_rendering_carries_report_tag() {
    let s = open(&[CityId::NewYorkCity], "all", "all");
    let json = to_json(&s.report(ReportKind::Time).unwrap()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["report"], "time");
    assert_eq!(v["most_common_weekday"]["value"], "monday");
}
