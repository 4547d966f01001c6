use thiserror::Error;

/// Convenience result type used across the crate.
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Error type returned by loading, filtering and reporting functions.
///
/// This is a single error enum shared by the record store, the filter engine, the aggregators
/// and the browser. Nothing in the library panics or exits on bad input; every failure ends up
/// here for the caller to render or recover from.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Underlying I/O error (e.g. city file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The input file does not have the columns a trip table needs.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A cell could not be parsed (malformed timestamp, negative duration, ...).
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A user-supplied selection (city, month, day, sort key, menu choice) is not recognized.
    #[error("invalid {kind}: '{value}'")]
    InvalidSelection { kind: &'static str, value: String },

    /// An optional column a caller explicitly asked for is absent from the table.
    #[error("column '{column}' is not available for this dataset")]
    MissingColumn { column: String },

    /// The filtered table has no rows to aggregate.
    #[error("no trips match the current filters")]
    EmptyDataset,
}

impl ExplorerError {
    pub(crate) fn invalid(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidSelection {
            kind,
            value: value.into(),
        }
    }

    /// Whether an interactive caller should re-prompt instead of giving up.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelection { .. } | Self::MissingColumn { .. } | Self::EmptyDataset
        )
    }
}
