//! Durable, idempotent ledger of application outcomes.
//!
//! At most one terminal row per dedup key, ever — enforced by the storage
//! layer, so concurrent workers need no extra coordination.

pub mod errors;
pub mod model;
pub mod schema;
pub mod store;

pub use errors::LedgerError;
pub use model::{ApplicationRecord, ApplicationStatus, RecordFilter, UpsertOutcome};
pub use schema::init_schema;
pub use store::Ledger;
