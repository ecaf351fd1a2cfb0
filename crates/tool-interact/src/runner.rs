//! Interaction executor: retries the full round (overlay pass, scroll,
//! strategy chain) with exponential backoff.

use std::time::Instant;

use apply_locator::Candidate;
use browser_adapter::{NodeHandle, PortError, Session};
use rand::Rng;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::errors::InteractError;
use crate::model::{
    Action, AttemptOutcome, DispatchStrategy, InteractionAttempt, InteractionOutcome, RetryPolicy,
};
use crate::overlay;

/// Executes clicks and fills against located candidates.
pub struct InteractionExecutor {
    policy: RetryPolicy,
}

impl InteractionExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Perform `action` on `candidate`.
    ///
    /// Never surfaces a recoverable failure: after `max_retries` rounds the
    /// result is [`InteractionOutcome::Exhausted`]. The only error is a dead
    /// browser, which the caller must treat as a session crash.
    pub async fn interact(
        &self,
        session: &Session,
        candidate: &Candidate,
        action: &Action,
    ) -> Result<InteractionOutcome, InteractError> {
        let started = Instant::now();
        let rounds = self.policy.max_retries.max(1);
        let mut attempts: Vec<InteractionAttempt> = Vec::new();

        for round in 1..=rounds {
            debug!(
                round,
                action = action.name(),
                target = ?candidate.handle,
                "interaction round start"
            );

            overlay::dismiss_blocking_overlays(session).await?;

            if let Err(err) = session.port().scroll_into_view(candidate.handle).await {
                if err.is_fatal() {
                    return Err(InteractError::SessionCrashed(err.to_string()));
                }
                // Not worth failing the round; dispatch may still land.
                warn!("scroll into view failed: {}", err);
            }

            match self
                .run_strategy_chain(session, candidate.handle, action, &mut attempts)
                .await?
            {
                Some(strategy) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    info!(
                        strategy = strategy.name(),
                        round, latency_ms, "interaction dispatched"
                    );
                    return Ok(InteractionOutcome::Completed {
                        strategy,
                        attempts: round,
                        latency_ms,
                    });
                }
                None => {
                    if round < rounds {
                        let delay = self.backoff_delay(round);
                        debug!(round, delay_ms = delay.as_millis() as u64, "round failed, backing off");
                        sleep(delay).await;
                    }
                }
            }
        }

        warn!(
            attempts = attempts.len(),
            rounds, "interaction exhausted all strategies"
        );
        Ok(InteractionOutcome::Exhausted { attempts: rounds })
    }

    /// Try every strategy once. Returns the first that dispatched cleanly.
    async fn run_strategy_chain(
        &self,
        session: &Session,
        target: NodeHandle,
        action: &Action,
        attempts: &mut Vec<InteractionAttempt>,
    ) -> Result<Option<DispatchStrategy>, InteractError> {
        let chain = match action {
            Action::Click => DispatchStrategy::click_chain(),
            Action::Fill(_) => DispatchStrategy::fill_chain(),
        };

        for strategy in chain {
            match self.dispatch(session, target, action, strategy).await {
                Ok(()) => {
                    attempts.push(InteractionAttempt::new(strategy, AttemptOutcome::Succeeded));
                    return Ok(Some(strategy));
                }
                Err(err) => {
                    if err.is_fatal() {
                        return Err(InteractError::SessionCrashed(err.to_string()));
                    }
                    let outcome = match &err {
                        PortError::Timeout(msg) => AttemptOutcome::TimedOut(msg.clone()),
                        other => AttemptOutcome::Exception(other.to_string()),
                    };
                    debug!(strategy = strategy.name(), "strategy failed: {}", err);
                    attempts.push(InteractionAttempt::new(strategy, outcome));
                }
            }
        }
        Ok(None)
    }

    async fn dispatch(
        &self,
        session: &Session,
        target: NodeHandle,
        action: &Action,
        strategy: DispatchStrategy,
    ) -> Result<(), PortError> {
        let port = session.port();
        match (action, strategy) {
            (Action::Click, DispatchStrategy::Native) => port.click(target).await,
            (Action::Click, DispatchStrategy::DomEvent) => port.dispatch_click_event(target).await,
            (Action::Click, DispatchStrategy::Programmatic) => port.invoke_click(target).await,
            (Action::Click, DispatchStrategy::PointerSequence) => port.pointer_click(target).await,
            (Action::Fill(value), DispatchStrategy::Native) => {
                port.fill_native(target, value).await
            }
            (Action::Fill(value), _) => port.fill_scripted(target, value).await,
        }
    }

    /// Jittered exponential backoff: uniform in [base, 2*base], doubled per
    /// completed round, capped.
    fn backoff_delay(&self, completed_rounds: u32) -> Duration {
        let base = self.policy.backoff_base_ms.max(1);
        let spread = rand::thread_rng().gen_range(base..=base.saturating_mul(2));
        let factor = 1u64 << completed_rounds.saturating_sub(1).min(16);
        let delay = spread.saturating_mul(factor).min(self.policy.backoff_cap_ms);
        Duration::from_millis(delay)
    }
}

impl Default for InteractionExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
