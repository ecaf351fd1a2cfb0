//! Worker configuration, per-job outcomes and the run summary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pacing and stop conditions for one worker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Jittered inter-candidate delay bounds.
    #[serde(default = "WorkerConfig::default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "WorkerConfig::default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Stop early after this many confirmed applications.
    #[serde(default)]
    pub success_target: Option<u32>,
    /// Ask the operator gate before each interaction.
    #[serde(default)]
    pub require_operator_ack: bool,
}

impl WorkerConfig {
    fn default_min_delay_ms() -> u64 {
        2000
    }

    fn default_max_delay_ms() -> u64 {
        5000
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: Self::default_min_delay_ms(),
            max_delay_ms: Self::default_max_delay_ms(),
            success_target: None,
            require_operator_ack: false,
        }
    }
}

/// Why an attempted job ended up recorded as failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    LocatorNotFound,
    InteractionExhausted,
    Inconclusive,
    Rejected(String),
    /// Navigation or baseline capture failed; the page never became workable.
    PageUnavailable(String),
    OperatorSkipped,
    Ledger(String),
}

impl FailReason {
    /// Short label stored in the ledger's confirmation column.
    pub fn message(&self) -> String {
        match self {
            FailReason::LocatorNotFound => "no apply control found".to_string(),
            FailReason::InteractionExhausted => "all click strategies exhausted".to_string(),
            FailReason::Inconclusive => "verification inconclusive".to_string(),
            FailReason::Rejected(reason) => format!("rejected: {}", reason),
            FailReason::PageUnavailable(detail) => format!("page unavailable: {}", detail),
            FailReason::OperatorSkipped => "skipped by operator".to_string(),
            FailReason::Ledger(err) => format!("ledger unavailable: {}", err),
        }
    }
}

/// Terminal state of one job candidate inside a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    /// Pre-check found a terminal ledger row; nothing attempted.
    SkippedDuplicate,
    /// Verified and recorded as applied.
    Applied,
    Failed(FailReason),
    /// Lost the upsert race to another worker after a confirmed attempt.
    LostRace,
}

/// Counts reported at the end of a run. This, not a stack trace, is the
/// user-visible output of a worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub attempted: u32,
    pub confirmed: u32,
    pub failed: u32,
    pub skipped_duplicates: u32,
}

impl RunSummary {
    pub fn absorb(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::SkippedDuplicate => self.skipped_duplicates += 1,
            JobOutcome::Applied => self.confirmed += 1,
            JobOutcome::Failed(_) => self.failed += 1,
            JobOutcome::LostRace => self.skipped_duplicates += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted={} confirmed={} failed={} skipped-duplicate={}",
            self.attempted, self.confirmed, self.failed, self.skipped_duplicates
        )
    }
}
