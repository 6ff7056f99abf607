use std::{io, path::PathBuf};

use thiserror::Error;

/// Everything that can abort a run. Cells that fail numeric coercion are
/// not errors; they are counted and left out of the means.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("input is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: timestamp `{value}` is not a millisecond count")]
    InvalidTimestamp { row: u64, value: String },

    #[error("timestamp {millis} is outside the supported date range")]
    TimestampOutOfRange { millis: i64 },

    #[error("failed to render {chart}: {message}")]
    Render { chart: &'static str, message: String },
}

impl TrendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TrendError> = std::result::Result<T, E>;
