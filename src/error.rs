//! Refresh cycle error types.

use thiserror::Error;

/// Anything that can go wrong inside one refresh cycle.
///
/// All variants are handled by the same cycle-level catch: the error is
/// logged and the last-update slot is set to the fixed error text. There
/// is no field-level granularity and no rollback of previously rendered
/// content.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("status request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status document did not match the expected shape: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
    #[error("failed to write rendered page: {0}")]
    Io(#[from] std::io::Error),
}
