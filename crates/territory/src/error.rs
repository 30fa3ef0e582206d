//! Territory error types

use std::path::PathBuf;
use wynnparse_core::WynnError;

/// Errors raised while fetching or reading territory data
#[derive(thiserror::Error, Debug)]
pub enum TerritoryError {
    #[error("Failed to read territory document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed territory document: {0}")]
    Document(#[from] serde_json::Error),
}

impl From<TerritoryError> for WynnError {
    fn from(err: TerritoryError) -> Self {
        match err {
            TerritoryError::Document(err) => WynnError::Json(err),
            err => WynnError::Source(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerritoryError>;
