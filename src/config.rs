//! Immutable configuration: where the city files live and which month/weekday names the filter
//! vocabulary accepts.
//!
//! Use [`Default`] for the stock datasets, or [`ExplorerConfig::from_json_path`] to load an
//! override file. Missing keys fall back to the defaults:
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "city_files": { "washington": "dc_trips.csv" },
//!   "months": ["january", "february", "march"]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::Deserialize;

use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{CityId, MONTH_NAMES};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Directory that relative city file names are resolved against.
    pub data_dir: PathBuf,
    /// City → file name overrides. Cities not listed use [`CityId::default_file_name`].
    pub city_files: BTreeMap<CityId, PathBuf>,
    /// Month names accepted by the filter, in calendar order starting at january.
    pub months: Vec<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            city_files: BTreeMap::new(),
            months: MONTH_NAMES[..6].iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ExplorerResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse configuration from JSON text and validate it.
    pub fn from_json_str(text: &str) -> ExplorerResult<Self> {
        let config: ExplorerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Months must be a non-empty prefix of the calendar (a month's filter number is its
    /// position in the list).
    pub fn validate(&self) -> ExplorerResult<()> {
        if self.months.is_empty() || self.months.len() > MONTH_NAMES.len() {
            return Err(ExplorerError::SchemaMismatch {
                message: format!("months must list 1..=12 names, got {}", self.months.len()),
            });
        }
        for (configured, expected) in self.months.iter().zip(MONTH_NAMES) {
            if !configured.trim().eq_ignore_ascii_case(expected) {
                return Err(ExplorerError::SchemaMismatch {
                    message: format!("months must start at january in order; found '{configured}' where '{expected}' was expected"),
                });
            }
        }
        Ok(())
    }

    /// Resolved path of a city's CSV file.
    pub fn city_path(&self, city: CityId) -> PathBuf {
        let file = self
            .city_files
            .get(&city)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(city.default_file_name()));
        if file.is_absolute() {
            file
        } else {
            self.data_dir.join(file)
        }
    }

    /// Filter vocabulary derived from this configuration.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary {
            months: self.months.iter().map(|m| m.trim().to_lowercase()).collect(),
        }
    }
}

/// Month and weekday names accepted by the filter engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    months: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        ExplorerConfig::default().vocabulary()
    }
}

impl Vocabulary {
    /// Weekdays in prompt order.
    pub const WEEKDAYS: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn months(&self) -> &[String] {
        &self.months
    }

    /// 1-based month number of a configured month name (case-insensitive).
    pub fn month_number(&self, name: &str) -> ExplorerResult<u32> {
        let name = name.trim();
        self.months
            .iter()
            .position(|m| m.eq_ignore_ascii_case(name))
            .map(|idx| idx as u32 + 1)
            .ok_or_else(|| ExplorerError::invalid("month", name))
    }

    /// Weekday for a full weekday name (case-insensitive).
    pub fn weekday(&self, name: &str) -> ExplorerResult<Weekday> {
        let name = name.trim();
        Self::WEEKDAYS
            .into_iter()
            .find(|d| crate::types::weekday_name(*d).eq_ignore_ascii_case(name))
            .ok_or_else(|| ExplorerError::invalid("day", name))
    }
}
