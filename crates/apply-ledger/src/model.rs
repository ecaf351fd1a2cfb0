//! Ledger row model.

use applypilot_core_types::{DedupKey, JobCandidate, Platform, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a ledger row. `Pending` is the only non-terminal status; a
/// row reaches exactly one terminal status, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Failed,
    Duplicate,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Failed => "failed",
            ApplicationStatus::Duplicate => "duplicate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(ApplicationStatus::Pending),
            "applied" => Some(ApplicationStatus::Applied),
            "failed" => Some(ApplicationStatus::Failed),
            "duplicate" => Some(ApplicationStatus::Duplicate),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

/// One application outcome. Created pending before the attempt, mutated to a
/// terminal status exactly once by the store's upsert, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Row id, `None` until persisted.
    pub id: Option<i64>,
    pub dedup_key: DedupKey,
    pub platform: Platform,
    pub job_title: String,
    pub company: String,
    pub job_url: String,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
    pub confirmation_message: Option<String>,
    /// Path to an externally captured screenshot, if any.
    pub evidence_path: Option<String>,
    pub session_id: Option<String>,
}

impl ApplicationRecord {
    /// Fresh pending row for a job about to be attempted.
    pub fn pending(job: &JobCandidate, session: &SessionId) -> Self {
        Self {
            id: None,
            dedup_key: DedupKey::derive(job),
            platform: job.platform.clone(),
            job_title: job.title.clone(),
            company: job.company.clone(),
            job_url: job.url.clone(),
            status: ApplicationStatus::Pending,
            applied_at: None,
            confirmation_message: None,
            evidence_path: None,
            session_id: Some(session.0.clone()),
        }
    }

    /// Move this record to a terminal status, stamping the outcome time.
    pub fn finish(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self.applied_at = Some(Utc::now());
        self
    }

    pub fn with_confirmation(mut self, message: impl Into<String>) -> Self {
        self.confirmation_message = Some(message.into());
        self
    }

    pub fn with_evidence_path(mut self, path: impl Into<String>) -> Self {
        self.evidence_path = Some(path.into());
        self
    }
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The row was inserted or its pending state was finalized.
    Applied,
    /// A terminal row already existed; nothing was mutated.
    Duplicate,
}

/// Query filter for the reporting collaborator. `after_id` gives keyset
/// restartability: pass the last seen row id to resume a read.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub platform: Option<Platform>,
    pub status: Option<ApplicationStatus>,
    pub after_id: Option<i64>,
    pub limit: Option<u32>,
}

impl RecordFilter {
    pub fn by_status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
