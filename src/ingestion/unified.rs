//! Multi-city load entrypoint.
//!
//! Most callers should use [`load_cities`], which reads every requested city file via
//! [`super::csv`] and concatenates the results into one [`crate::types::TripTable`].
//!
//! - Cities are loaded in the order given; each city's rows stay contiguous.
//! - Column sets may differ between cities (Washington has no `Gender` / `Birth Year`); the
//!   missing values are simply absent on that city's records.
//! - If a [`LoadObserver`] is configured, per-file success/failure/alerts are reported to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, ExplorerResult};
use crate::types::{CityId, TripTable};

use super::csv::{self, ParsePolicy};
use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};

/// Options controlling loading.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// Behavior on unparseable rows.
    pub on_parse_error: ParsePolicy,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("on_parse_error", &self.on_parse_error)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            on_parse_error: ParsePolicy::default(),
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load and concatenate the trip files of `cities`.
///
/// The first failing city aborts the load; nothing partial is returned.
///
/// ```no_run
/// use bikeshare_explorer::config::ExplorerConfig;
/// use bikeshare_explorer::ingestion::{load_cities, LoadOptions};
/// use bikeshare_explorer::types::CityId;
///
/// # fn main() -> Result<(), bikeshare_explorer::ExplorerError> {
/// let config = ExplorerConfig::default();
/// let table = load_cities(&[CityId::Chicago, CityId::Washington], &config, &LoadOptions::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_cities(
    cities: &[CityId],
    config: &ExplorerConfig,
    options: &LoadOptions,
) -> ExplorerResult<TripTable> {
    if cities.is_empty() {
        return Err(ExplorerError::invalid("city", ""));
    }

    let mut tables = Vec::with_capacity(cities.len());
    for &city in cities {
        tables.push(load_one(city, config.city_path(city), options)?);
    }
    Ok(TripTable::concat(tables))
}

fn load_one(city: CityId, path: PathBuf, options: &LoadOptions) -> ExplorerResult<TripTable> {
    let result = csv::load_city_from_path(&path, Some(city), options.on_parse_error);
    let ctx = LoadContext {
        city: Some(city),
        path,
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(load) => {
                for row in &load.skipped {
                    obs.on_row_skipped(&ctx, row);
                }
                for cell in &load.dropped {
                    obs.on_cell_dropped(&ctx, cell);
                }
                obs.on_success(
                    &ctx,
                    LoadStats {
                        rows: load.table.row_count(),
                        skipped: load.skipped.len(),
                        dropped: load.dropped.len(),
                    },
                );
            }
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result.map(|load| load.table)
}

fn severity_for_error(e: &ExplorerError) -> LoadSeverity {
    match e {
        ExplorerError::Io(_) => LoadSeverity::Critical,
        ExplorerError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => LoadSeverity::Critical,
            _ if error_chain_contains_io(err) => LoadSeverity::Critical,
            _ => LoadSeverity::Error,
        },
        _ => LoadSeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_city_list_is_invalid() {
        let err = load_cities(&[], &ExplorerConfig::default(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidSelection { kind: "city", .. }));
    }

    #[test]
    fn io_errors_are_critical() {
        let io = ExplorerError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(severity_for_error(&io), LoadSeverity::Critical);
        let schema = ExplorerError::SchemaMismatch {
            message: "x".to_string(),
        };
        assert_eq!(severity_for_error(&schema), LoadSeverity::Error);
    }
}
