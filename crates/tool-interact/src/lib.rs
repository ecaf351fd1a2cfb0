//! Interaction executor: overlay dismissal, ordered dispatch strategies,
//! bounded retries with jittered exponential backoff.
//!
//! The executor never judges whether the page accepted the action; that is
//! the verification engine's job. Its contract is narrower: get a dispatch
//! through, or report typed exhaustion.

pub mod errors;
pub mod model;
pub mod overlay;
pub mod runner;

pub use errors::InteractError;
pub use model::{
    Action, AttemptOutcome, DispatchStrategy, InteractionAttempt, InteractionOutcome, RetryPolicy,
};
pub use overlay::{dismiss_blocking_overlays, CLOSE_CONTROL_TEXT, OVERLAY_KEYWORDS};
pub use runner::InteractionExecutor;
