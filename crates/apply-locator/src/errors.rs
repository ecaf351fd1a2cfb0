//! Error types for the locator system.

use browser_adapter::SessionError;
use thiserror::Error;

/// Locator failures. An empty candidate list is not an error; only the
/// session boundary can fail a `locate` call.
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Snapshot query failed at the session boundary.
    #[error("session failure during locate: {0}")]
    Session(#[from] SessionError),
}

impl LocatorError {
    /// Whether the owning worker must stop (browser process gone).
    pub fn is_crash(&self) -> bool {
        match self {
            LocatorError::Session(err) => err.is_crash(),
        }
    }
}
