// src/error.rs

/// Errors surfaced by root analysis and vocabulary persistence.
#[derive(thiserror::Error, Debug)]
pub enum RootError {
    /// The call itself cannot produce a result (empty rows, unknown mode, nothing generated).
    #[error("{0}")]
    InvalidInput(&'static str),
    /// The persisted vocabulary file parsed but holds unusable values.
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, RootError>;

pub(crate) const NO_ROWS: &str = "no keyword rows supplied";
pub(crate) const NO_TERMS: &str = "no terms generated from input";
pub(crate) const BAD_MODE: &str = "mode must be 'full' or 'simple'";
