use std::path::PathBuf;

use thiserror::Error;

/// The dataset could not be fetched or parsed. Fatal for the session.
#[derive(Debug, Error)]
pub enum DataUnavailableError {
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported data format: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed Arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': {reason}")]
    Coercion {
        row: usize,
        column: &'static str,
        reason: String,
    },
}
