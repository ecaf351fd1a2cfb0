//! Error types for the browser port boundary.

use thiserror::Error;

/// Failures surfaced by a [`crate::BrowserPort`] implementation.
#[derive(Debug, Error, Clone)]
pub enum PortError {
    /// Referenced node no longer exists (navigation, re-render, removal).
    #[error("node gone: {0}")]
    NodeGone(String),

    /// A bounded wait elapsed before the browser settled.
    #[error("port timeout: {0}")]
    Timeout(String),

    /// The dispatched operation was refused by the page (intercepted click,
    /// read-only field, covered element).
    #[error("dispatch refused: {0}")]
    DispatchRefused(String),

    /// Transport-level failure talking to the browser.
    #[error("port I/O error: {0}")]
    Io(String),

    /// The browser process terminated; the owning session is dead.
    #[error("browser process gone: {0}")]
    BrowserGone(String),
}

impl PortError {
    /// Whether the owning session must be considered crashed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PortError::BrowserGone(_))
    }
}

/// Session-level failures.
#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// Underlying browser process died. Fatal to the owning worker.
    #[error("session crashed: {0}")]
    Crashed(String),

    #[error("port failure: {0}")]
    Port(PortError),
}

impl From<PortError> for SessionError {
    fn from(err: PortError) -> Self {
        if err.is_fatal() {
            SessionError::Crashed(err.to_string())
        } else {
            SessionError::Port(err)
        }
    }
}

impl SessionError {
    pub fn is_crash(&self) -> bool {
        matches!(self, SessionError::Crashed(_))
    }
}
