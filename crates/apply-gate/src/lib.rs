//! Heuristic verification gate.
//!
//! Classifies an interaction as `Confirmed`, `Rejected` or `Inconclusive`
//! from observable page facts only. There is no other path to a confirmed
//! outcome anywhere in the engine.

pub mod machine;
pub mod signals;
pub mod types;

pub use machine::{VerificationEngine, VerifyError};
pub use signals::{
    contains_any, CONFIRMATION_PHRASES, REJECTION_PHRASES, TITLE_APPLY_TOKENS, URL_APPLY_TOKENS,
    URL_CONFIRM_TOKENS,
};
pub use types::{
    Evidence, PageBaseline, SignalKind, VerificationResult, VerifyConfig, VerifyState,
};
