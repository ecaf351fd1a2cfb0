//! Error types for interaction execution.

use thiserror::Error;

/// The executor folds every recoverable failure into the returned
/// [`crate::InteractionOutcome`]; only a dead browser escapes as an error.
#[derive(Debug, Error, Clone)]
pub enum InteractError {
    #[error("session crashed during interaction: {0}")]
    SessionCrashed(String),
}
