//! Types for interaction execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to do with the target element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Click,
    Fill(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Fill(_) => "fill",
        }
    }
}

/// Dispatch method, tried in fixed order until one sticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchStrategy {
    /// Native input-device dispatch.
    Native,
    /// Bubbling DOM event.
    DomEvent,
    /// Programmatic invocation (`element.click()` / value assignment).
    Programmatic,
    /// Synthetic pointer press/release sequence.
    PointerSequence,
}

impl DispatchStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            DispatchStrategy::Native => "native",
            DispatchStrategy::DomEvent => "dom-event",
            DispatchStrategy::Programmatic => "programmatic",
            DispatchStrategy::PointerSequence => "pointer-sequence",
        }
    }

    /// Chain for a click.
    pub fn click_chain() -> Vec<DispatchStrategy> {
        vec![
            DispatchStrategy::Native,
            DispatchStrategy::DomEvent,
            DispatchStrategy::Programmatic,
            DispatchStrategy::PointerSequence,
        ]
    }

    /// Chain for a fill. Pointer/event dispatch cannot set field values, so
    /// the chain is shorter.
    pub fn fill_chain() -> Vec<DispatchStrategy> {
        vec![DispatchStrategy::Native, DispatchStrategy::Programmatic]
    }
}

/// How a single strategy dispatch ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Succeeded,
    Exception(String),
    TimedOut(String),
}

/// One strategy dispatch during one round. Transient: held only while the
/// interaction call runs, then folded into the final outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InteractionAttempt {
    pub strategy: DispatchStrategy,
    pub at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
}

impl InteractionAttempt {
    pub fn new(strategy: DispatchStrategy, outcome: AttemptOutcome) -> Self {
        Self {
            strategy,
            at: Utc::now(),
            outcome,
        }
    }
}

/// Final result of an interaction. Exhaustion is a value, not an error: the
/// caller skips the job and moves on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionOutcome {
    /// Some strategy dispatched without throwing. Provisional success; the
    /// verification engine decides what actually happened.
    Completed {
        strategy: DispatchStrategy,
        /// Rounds used, counting the successful one.
        attempts: u32,
        latency_ms: u64,
    },
    /// Every strategy failed on every round.
    Exhausted { attempts: u32 },
}

impl InteractionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, InteractionOutcome::Completed { .. })
    }
}

/// Retry policy for the whole round (overlay pass + scroll + chain).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total rounds attempted, counting the first.
    #[serde(default = "RetryPolicy::default_max_retries")]
    pub max_retries: u32,
    /// Backoff base; the first inter-round delay is drawn uniformly from
    /// `[base, 2*base]`, then doubles per round.
    #[serde(default = "RetryPolicy::default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "RetryPolicy::default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
}

impl RetryPolicy {
    fn default_max_retries() -> u32 {
        5
    }

    fn default_backoff_base_ms() -> u64 {
        1000
    }

    fn default_backoff_cap_ms() -> u64 {
        30_000
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Self::default_max_retries(),
            backoff_base_ms: Self::default_backoff_base_ms(),
            backoff_cap_ms: Self::default_backoff_cap_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_chain_order() {
        let chain = DispatchStrategy::click_chain();
        assert_eq!(chain.first(), Some(&DispatchStrategy::Native));
        assert_eq!(chain.last(), Some(&DispatchStrategy::PointerSequence));
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.backoff_base_ms, 1000);
        assert_eq!(policy.backoff_cap_ms, 30_000);
    }
}
