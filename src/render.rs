//! Text and JSON rendering of report results and browse pages.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::browse::Page;
use crate::error::ExplorerResult;
use crate::processing::Counted;
use crate::session::Report;
use crate::stats::{DurationBreakdown, DurationStats, RoutesByUserType, StationStats, TimeStats, UserStats};
use crate::types::{Availability, TripRecord};

/// Horizontal rule printed between sections.
pub const RULE: &str = "----------------------------------------";

/// Capitalize the first letter of every whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clock-style duration: `H:MM:SS`, or `N day(s), H:MM:SS` past 24 hours.
pub fn format_clock(seconds: f64) -> String {
    let b = DurationBreakdown::from_seconds(seconds);
    let clock = format!("{}:{:02}:{:02}", b.hours, b.minutes, b.seconds);
    match b.days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// `Xd Xh Xm Xs`
pub fn format_breakdown(b: &DurationBreakdown) -> String {
    format!("{}d {}h {}m {}s", b.days, b.hours, b.minutes, b.seconds)
}

/// `Xm Ys` with minutes not wrapped at the hour.
pub fn format_minutes_seconds(b: &DurationBreakdown) -> String {
    format!("{}m {}s", b.total_minutes(), b.seconds)
}

/// `This took N seconds.` footer.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("This took {:.6} seconds.", elapsed.as_secs_f64())
}

/// Pretty JSON for any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> ExplorerResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_report(report: &Report) -> String {
    match report {
        Report::Time(s) => render_time_stats(s),
        Report::Station(s) => render_station_stats(s),
        Report::Duration(s) => render_duration_stats(s),
        Report::User(s) => render_user_stats(s),
        Report::RoutesByUserType(s) => render_routes_by_user_type(s),
    }
}

pub fn render_time_stats(s: &TimeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "The month with the most travels is: {} ({} trips).",
        title_case(s.most_common_month_name()),
        s.most_common_month.count
    );
    let _ = writeln!(
        out,
        "The most common day of the week is: {} ({} trips).",
        title_case(&s.most_common_weekday.value),
        s.most_common_weekday.count
    );
    let _ = writeln!(
        out,
        "The most common start hour is: {} ({} trips).",
        s.most_common_hour.value, s.most_common_hour.count
    );
    out
}

pub fn render_station_stats(s: &StationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Most commonly used start station: {} ({} trips).",
        s.most_common_start_station.value, s.most_common_start_station.count
    );
    let _ = writeln!(
        out,
        "Most commonly used end station: {} ({} trips).",
        s.most_common_end_station.value, s.most_common_end_station.count
    );
    let _ = writeln!(
        out,
        "Most common trip: {} ({} trips).",
        s.most_common_route.value, s.most_common_route.count
    );
    out
}

pub fn render_duration_stats(s: &DurationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trips: {}", s.trips);
    let _ = writeln!(out, "The total travel time is: {}", format_clock(s.total_seconds));
    let _ = writeln!(out, "Details: {}", format_breakdown(&s.total));
    let _ = writeln!(out, "The mean travel time is: {}", format_clock(s.mean_seconds));
    let _ = writeln!(out, "Details: {}", format_minutes_seconds(&s.mean));
    out
}

fn write_counts(out: &mut String, heading: &str, counts: &[Counted<String>]) {
    let _ = writeln!(out, "{heading}:");
    let width = counts.iter().map(|c| c.value.len()).max().unwrap_or(0);
    for c in counts {
        let _ = writeln!(out, "  {:<width$}  {}", c.value, c.count);
    }
}

pub fn render_user_stats(s: &UserStats) -> String {
    let mut out = String::new();
    match &s.user_types {
        Availability::Available(counts) => write_counts(&mut out, "User Types", counts),
        Availability::Unavailable => out.push_str("User type data not available.\n"),
    }
    match &s.genders {
        Availability::Available(counts) => write_counts(&mut out, "Gender Counts", counts),
        Availability::Unavailable => out.push_str("Gender data not available.\n"),
    }
    match &s.birth_years {
        Availability::Available(b) => {
            let _ = writeln!(out, "Earliest birth year: {}", b.earliest);
            let _ = writeln!(out, "Most recent birth year: {}", b.most_recent);
            let _ = writeln!(
                out,
                "Most common birth year: {} ({} riders)",
                b.most_common.value, b.most_common.count
            );
        }
        Availability::Unavailable => out.push_str("Birth year data not available.\n"),
    }
    out
}

pub fn render_routes_by_user_type(s: &RoutesByUserType) -> String {
    let mut out = String::new();
    match &s.by_user_type {
        Availability::Available(entries) => {
            for e in entries {
                let _ = writeln!(
                    out,
                    "Most common route for {}: {} ({} of {} trips)",
                    e.user_type, e.most_common_route.value, e.most_common_route.count, e.trips
                );
            }
        }
        Availability::Unavailable => out.push_str("User type data not available.\n"),
    }
    out
}

const PAGE_HEADERS: [&str; 9] = [
    "#",
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
    "Gender",
    "Birth Year",
];

fn page_cells(pos: usize, r: &TripRecord) -> [String; 9] {
    let opt = |v: Option<&str>| v.unwrap_or("-").to_string();
    [
        pos.to_string(),
        r.start_time().to_string(),
        r.end_time().map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
        r.trip_duration().to_string(),
        r.start_station().to_string(),
        r.end_station().to_string(),
        opt(r.user_type()),
        opt(r.gender()),
        r.birth_year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
    ]
}

/// Fixed-width table of a browse page. Rows are numbered by cursor position.
pub fn render_page(page: &Page<'_>) -> String {
    if page.is_empty() {
        return "No more raw data to display.\n".to_string();
    }

    let rows: Vec<[String; 9]> = page
        .records
        .iter()
        .enumerate()
        .map(|(i, r)| page_cells(page.start + i, r))
        .collect();

    let mut widths = PAGE_HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &widths, PAGE_HEADERS.iter().copied());
    for row in &rows {
        write_row(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn write_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let joined = cells
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", joined.trim_end());
}
