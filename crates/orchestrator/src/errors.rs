//! Worker error types.

use thiserror::Error;

use crate::model::RunSummary;

/// The only failure that escapes `Worker::run`. Everything recoverable
/// becomes a ledger entry and a log line instead.
#[derive(Debug, Error, Clone)]
pub enum WorkerError {
    /// Browser process died mid-run. The supervisor restarts the worker with
    /// a fresh session; resumption is safe because the ledger is idempotent.
    #[error("session crashed after {summary}: {reason}")]
    SessionCrashed { reason: String, summary: RunSummary },
}

impl WorkerError {
    /// Counts accumulated before the crash.
    pub fn summary(&self) -> RunSummary {
        match self {
            WorkerError::SessionCrashed { summary, .. } => *summary,
        }
    }
}
