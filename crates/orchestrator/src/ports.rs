//! Collaborator ports owned by callers, consumed by the worker.

use applypilot_core_types::{JobCandidate, SessionId};
use async_trait::async_trait;

/// Well-defined phases at which the external capture collaborator may take a
/// screenshot. The worker only records the returned path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapturePhase {
    BeforeInteraction,
    AfterInteraction,
    AfterVerification,
}

impl CapturePhase {
    pub fn name(&self) -> &'static str {
        match self {
            CapturePhase::BeforeInteraction => "before-interaction",
            CapturePhase::AfterInteraction => "after-interaction",
            CapturePhase::AfterVerification => "after-verification",
        }
    }
}

/// External evidence collaborator. `None` means no artifact was produced;
/// the worker never fails a job over missing evidence.
#[async_trait]
pub trait EvidenceCapture: Send + Sync {
    async fn capture(&self, session: &SessionId, phase: CapturePhase) -> Option<String>;
}

/// Operator decision for a job awaiting manual confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorDecision {
    Proceed,
    Skip,
    /// Stop pulling further candidates; the run ends cleanly.
    Abort,
}

/// External operator interface. Replaces in-loop "keep the browser open for
/// N seconds" sleeps with an explicit awaiting-confirmation state.
#[async_trait]
pub trait OperatorGate: Send + Sync {
    async fn await_confirmation(&self, job: &JobCandidate) -> OperatorDecision;
}
