//! Top-level error facade.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Ledger(#[from] apply_ledger::LedgerError),

    #[error(transparent)]
    Worker(#[from] applypilot_orchestrator::WorkerError),
}
