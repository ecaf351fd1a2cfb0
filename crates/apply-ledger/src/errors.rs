//! Ledger error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger connection error: {0}")]
    Connection(String),

    #[error("ledger query error: {0}")]
    Query(String),
}

impl From<tokio_rusqlite::Error> for LedgerError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        LedgerError::Query(err.to_string())
    }
}
