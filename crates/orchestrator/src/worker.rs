//! The worker loop: one session, one candidate sequence, one summary.

use std::sync::Arc;

use apply_gate::{VerificationEngine, VerificationResult, VerifyError};
use apply_ledger::{ApplicationRecord, ApplicationStatus, Ledger, UpsertOutcome};
use apply_locator::{ElementLocator, Intent};
use applypilot_core_types::{DedupKey, JobCandidate, WorkerId};
use browser_adapter::Session;
use rand::Rng;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tool_interact::{Action, InteractError, InteractionExecutor, InteractionOutcome};
use tracing::{debug, info, warn};

use crate::errors::WorkerError;
use crate::model::{FailReason, JobOutcome, RunSummary, WorkerConfig};
use crate::ports::{CapturePhase, EvidenceCapture, OperatorDecision, OperatorGate};

enum StepResult {
    Done(JobOutcome),
    OperatorAbort,
}

/// One orchestrator worker.
///
/// Owns its session exclusively; the ledger is the only resource shared with
/// other workers. The loop is partial-failure tolerant: every recoverable
/// problem becomes a ledger entry plus a log line, and only a dead browser
/// aborts the run.
pub struct Worker {
    id: WorkerId,
    session: Session,
    locator: ElementLocator,
    executor: InteractionExecutor,
    verifier: VerificationEngine,
    ledger: Arc<Ledger>,
    config: WorkerConfig,
    cancel: CancellationToken,
    evidence: Option<Arc<dyn EvidenceCapture>>,
    operator: Option<Arc<dyn OperatorGate>>,
}

impl Worker {
    pub fn new(
        session: Session,
        locator: ElementLocator,
        executor: InteractionExecutor,
        verifier: VerificationEngine,
        ledger: Arc<Ledger>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            id: WorkerId::new(),
            session,
            locator,
            executor,
            verifier,
            ledger,
            config,
            cancel: CancellationToken::new(),
            evidence: None,
            operator: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_evidence(mut self, evidence: Arc<dyn EvidenceCapture>) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn with_operator(mut self, operator: Arc<dyn OperatorGate>) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    /// Process the supplied candidates in order.
    ///
    /// Cancellation is honored only between candidates; an in-flight
    /// interaction is never interrupted. Returns the final counts, or
    /// [`WorkerError::SessionCrashed`] carrying the counts so far.
    pub async fn run(
        &self,
        jobs: impl IntoIterator<Item = JobCandidate>,
    ) -> Result<RunSummary, WorkerError> {
        let mut summary = RunSummary::default();

        for job in jobs {
            if self.cancel.is_cancelled() {
                info!(worker = %self.id, "cancelled, stopping before next candidate");
                break;
            }
            if let Some(target) = self.config.success_target {
                if summary.confirmed >= target {
                    info!(worker = %self.id, target, "success target reached");
                    break;
                }
            }

            let key = DedupKey::derive(&job);
            match self.ledger.exists(&key).await {
                Ok(true) => {
                    debug!(key = %key, "duplicate, skipping");
                    summary.absorb(&JobOutcome::SkippedDuplicate);
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    warn!("duplicate pre-check failed: {}", err);
                    summary.attempted += 1;
                    summary.absorb(&JobOutcome::Failed(FailReason::Ledger(err.to_string())));
                    continue;
                }
            }

            summary.attempted += 1;
            match self.process_one(&job).await {
                Ok(StepResult::Done(outcome)) => {
                    info!(worker = %self.id, job = %job.url, outcome = ?outcome, "job finished");
                    summary.absorb(&outcome);
                }
                Ok(StepResult::OperatorAbort) => {
                    info!(worker = %self.id, "operator aborted the run");
                    break;
                }
                Err(reason) => {
                    return Err(WorkerError::SessionCrashed { reason, summary });
                }
            }

            self.pace().await;
        }

        info!(worker = %self.id, %summary, "run finished");
        Ok(summary)
    }

    /// Attempt one job. `Err` carries a crash reason; everything else is a
    /// typed outcome.
    async fn process_one(&self, job: &JobCandidate) -> Result<StepResult, String> {
        let pending = ApplicationRecord::pending(job, self.session.id());
        if let Err(err) = self.ledger.record_pending(&pending).await {
            warn!("could not record pending row: {}", err);
            return Ok(StepResult::Done(JobOutcome::Failed(FailReason::Ledger(
                err.to_string(),
            ))));
        }

        if self.config.require_operator_ack {
            if let Some(gate) = &self.operator {
                match gate.await_confirmation(job).await {
                    OperatorDecision::Proceed => {}
                    OperatorDecision::Skip => {
                        return self
                            .record_failure(pending, FailReason::OperatorSkipped, None)
                            .await;
                    }
                    OperatorDecision::Abort => return Ok(StepResult::OperatorAbort),
                }
            }
        }

        if let Err(err) = self.session.navigate(&job.url).await {
            if err.is_crash() {
                return Err(err.to_string());
            }
            return self
                .record_failure(pending, FailReason::PageUnavailable(err.to_string()), None)
                .await;
        }

        let candidates = match self.locator.locate(&self.session, &Intent::submit_control()).await
        {
            Ok(candidates) => candidates,
            Err(err) => return Err(err.to_string()),
        };
        let best = match candidates.first() {
            Some(best) => best,
            None => {
                return self
                    .record_failure(pending, FailReason::LocatorNotFound, None)
                    .await;
            }
        };

        let baseline = match self.verifier.baseline(&self.session).await {
            Ok(baseline) => baseline,
            Err(VerifyError::SessionCrashed(reason)) => return Err(reason),
            Err(VerifyError::Baseline(detail)) => {
                return self
                    .record_failure(pending, FailReason::PageUnavailable(detail), None)
                    .await;
            }
        };

        let mut evidence_path = self.capture(CapturePhase::BeforeInteraction).await;

        let dispatched = self
            .executor
            .interact(&self.session, best, &Action::Click)
            .await
            .map_err(|err| match err {
                InteractError::SessionCrashed(reason) => reason,
            })?;
        if let Some(path) = self.capture(CapturePhase::AfterInteraction).await {
            evidence_path = Some(path);
        }

        if let InteractionOutcome::Exhausted { attempts } = dispatched {
            debug!(attempts, "interaction exhausted");
            return self
                .record_failure(pending, FailReason::InteractionExhausted, evidence_path)
                .await;
        }

        let verdict = match self.verifier.evaluate(&self.session, &baseline).await {
            Ok(verdict) => verdict,
            Err(VerifyError::SessionCrashed(reason)) => return Err(reason),
            Err(VerifyError::Baseline(detail)) => {
                warn!("unexpected baseline failure during evaluate: {}", detail);
                VerificationResult::Inconclusive
            }
        };
        if let Some(path) = self.capture(CapturePhase::AfterVerification).await {
            evidence_path = Some(path);
        }

        match verdict {
            VerificationResult::Confirmed(evidence) => {
                let mut record = pending
                    .finish(ApplicationStatus::Applied)
                    .with_confirmation(evidence.value);
                if let Some(path) = evidence_path {
                    record = record.with_evidence_path(path);
                }
                match self.ledger.upsert(&record).await {
                    Ok(UpsertOutcome::Applied) => Ok(StepResult::Done(JobOutcome::Applied)),
                    Ok(UpsertOutcome::Duplicate) => Ok(StepResult::Done(JobOutcome::LostRace)),
                    Err(err) => Ok(StepResult::Done(JobOutcome::Failed(FailReason::Ledger(
                        err.to_string(),
                    )))),
                }
            }
            VerificationResult::Rejected { reason } => {
                self.record_failure(pending, FailReason::Rejected(reason), evidence_path)
                    .await
            }
            // Never guessed as success.
            VerificationResult::Inconclusive => {
                self.record_failure(pending, FailReason::Inconclusive, evidence_path)
                    .await
            }
        }
    }

    async fn record_failure(
        &self,
        pending: ApplicationRecord,
        reason: FailReason,
        evidence_path: Option<String>,
    ) -> Result<StepResult, String> {
        let mut record = pending
            .finish(ApplicationStatus::Failed)
            .with_confirmation(reason.message());
        if let Some(path) = evidence_path {
            record = record.with_evidence_path(path);
        }
        match self.ledger.upsert(&record).await {
            Ok(UpsertOutcome::Applied) => Ok(StepResult::Done(JobOutcome::Failed(reason))),
            Ok(UpsertOutcome::Duplicate) => Ok(StepResult::Done(JobOutcome::LostRace)),
            Err(err) => {
                warn!("failure record not persisted: {}", err);
                Ok(StepResult::Done(JobOutcome::Failed(FailReason::Ledger(
                    err.to_string(),
                ))))
            }
        }
    }

    async fn capture(&self, phase: CapturePhase) -> Option<String> {
        match &self.evidence {
            Some(capture) => capture.capture(self.session.id(), phase).await,
            None => None,
        }
    }

    /// Jittered inter-candidate delay, for pacing and throttle avoidance.
    async fn pace(&self) {
        let min = self.config.min_delay_ms;
        let max = self.config.max_delay_ms.max(min);
        if max == 0 {
            return;
        }
        let delay = rand::thread_rng().gen_range(min..=max);
        sleep(Duration::from_millis(delay)).await;
    }

    /// Tear down the owned session. Call when the run is over or after a
    /// crash, before restarting with a fresh session.
    pub fn teardown(self) {
        self.session.teardown();
    }
}
