//! Orchestrator: composes locator, executor, verifier and ledger into a
//! per-worker loop over a supplied job sequence.
//!
//! Many workers may run in parallel, each with its own session; the ledger's
//! uniqueness constraint gives at-most-once semantics across all of them.

pub mod errors;
pub mod model;
pub mod ports;
pub mod worker;

pub use errors::WorkerError;
pub use model::{FailReason, JobOutcome, RunSummary, WorkerConfig};
pub use ports::{CapturePhase, EvidenceCapture, OperatorDecision, OperatorGate};
pub use worker::Worker;
