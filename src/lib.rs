//! ApplyPilot: a reusable browser-automation engine for driving "apply"-like
//! flows with verified, deduplicated outcomes.
//!
//! The engine is four components behind one composition root:
//! a capability-based element locator, an interaction executor with
//! retry/backoff and overlay dismissal, a heuristic verification state
//! machine, and a persistent idempotent ledger that concurrent workers share
//! safely. Job discovery, login flows, document generation and reporting are
//! collaborators, not residents.

pub mod config;
pub mod engine;
pub mod errors;
pub mod telemetry;

pub use config::{load_config_from_path, parse_config_str, ConfigError, EngineConfig};
pub use engine::Engine;
pub use errors::Error;
pub use telemetry::init_tracing;

pub use apply_gate::{
    Evidence, PageBaseline, SignalKind, VerificationEngine, VerificationResult, VerifyConfig,
};
pub use apply_ledger::{
    ApplicationRecord, ApplicationStatus, Ledger, LedgerError, RecordFilter, UpsertOutcome,
};
pub use apply_locator::{Candidate, ElementLocator, Intent, IntentKind, LocatorError, StrategyKind};
pub use applypilot_core_types::{DedupKey, JobCandidate, Platform, SessionId, WorkerId};
pub use applypilot_orchestrator::{
    CapturePhase, EvidenceCapture, FailReason, JobOutcome, OperatorDecision, OperatorGate,
    RunSummary, Worker, WorkerConfig, WorkerError,
};
pub use browser_adapter::{
    BrowserPort, ElementNode, NodeHandle, PageSnapshot, PageState, PortError, Session,
    SessionConfig, SessionError,
};
pub use tool_interact::{
    Action, DispatchStrategy, InteractError, InteractionExecutor, InteractionOutcome, RetryPolicy,
};
