//! Core types for the verification gate.

use browser_adapter::FormInventory;
use serde::{Deserialize, Serialize};

/// Which heuristic produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Url,
    Title,
    DomText,
    FormPresence,
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::Url => "url",
            SignalKind::Title => "title",
            SignalKind::DomText => "dom-text",
            SignalKind::FormPresence => "form-presence",
        }
    }
}

/// The matched signal backing a confirmed verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub kind: SignalKind,
    pub value: String,
    /// When the signal was observed.
    pub at: chrono::DateTime<chrono::Utc>,
}

impl Evidence {
    pub fn new(kind: SignalKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            at: chrono::Utc::now(),
        }
    }
}

/// Final classification of an interaction.
///
/// `Inconclusive` is a first-class verdict: it is recorded as a failure and
/// is never upgraded to `Confirmed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationResult {
    Confirmed(Evidence),
    Rejected { reason: String },
    Inconclusive,
}

impl VerificationResult {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, VerificationResult::Confirmed(_))
    }
}

/// Internal machine states. `Confirmed`/`Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyState {
    Unknown,
    Navigating,
    FormDetected,
    SubmissionSent,
    Confirmed,
    Rejected,
}

impl VerifyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerifyState::Confirmed | VerifyState::Rejected)
    }
}

/// Page facts captured before the interaction, diffed against on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBaseline {
    pub url: String,
    pub title: String,
    pub forms: FormInventory,
}

/// Verification pacing. All waits are bounded by `timeout_ms`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyConfig {
    #[serde(default = "VerifyConfig::default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "VerifyConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl VerifyConfig {
    fn default_timeout_ms() -> u64 {
        10_000
    }

    fn default_poll_interval_ms() -> u64 {
        400
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::default_timeout_ms(),
            poll_interval_ms: Self::default_poll_interval_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(VerifyState::Confirmed.is_terminal());
        assert!(VerifyState::Rejected.is_terminal());
        assert!(!VerifyState::SubmissionSent.is_terminal());
        assert!(!VerifyState::Unknown.is_terminal());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(SignalKind::DomText.name(), "dom-text");
        assert_eq!(SignalKind::FormPresence.name(), "form-presence");
    }
}
