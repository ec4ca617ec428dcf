use std::io;
use std::path::PathBuf;

/// Application-level errors.
///
/// Startup failures (`FileAccess`, `Schema`, `Csv`) abort the run; `Validation`
/// is recoverable at the collector boundary only, where the user is re-prompted.
#[derive(thiserror::Error, Debug)]
pub enum AssistantError {
    #[error("failed to access catalog file {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        source: io::Error,
    },

    #[error("catalog schema error: {0}")]
    Schema(String),

    #[error("failed to read catalog record: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("{0}")]
    Validation(String),
}

pub type AssistantResult<T> = Result<T, AssistantError>;
