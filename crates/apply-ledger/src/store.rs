//! SQLite-backed ledger store.
//!
//! The store is the only shared mutable resource between workers. Atomicity
//! comes from the storage layer itself: the UNIQUE constraint on `dedup_key`
//! plus a conditional upsert, not from application-level locking.

use std::path::Path;

use applypilot_core_types::{DedupKey, Platform};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::errors::LedgerError;
use crate::model::{ApplicationRecord, ApplicationStatus, RecordFilter, UpsertOutcome};
use crate::schema::init_schema;

const SELECT_COLUMNS: &str = "id, dedup_key, platform, job_title, company, job_url, status, \
     applied_at, confirmation_message, evidence_path, session_id";

/// Insert-or-finalize. The conditional update only ever touches a pending
/// row, so a terminal row can never be rewritten.
const UPSERT_SQL: &str = "\
INSERT INTO applications \
    (dedup_key, platform, job_title, company, job_url, status, applied_at, \
     confirmation_message, evidence_path, session_id) \
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
ON CONFLICT(dedup_key) DO UPDATE SET \
    status = excluded.status, \
    applied_at = excluded.applied_at, \
    confirmation_message = excluded.confirmation_message, \
    evidence_path = excluded.evidence_path, \
    session_id = excluded.session_id \
WHERE applications.status = 'pending'";

/// Durable, idempotent record of application outcomes.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    /// In-memory store, for tests and dry runs.
    pub async fn in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;
        conn.call(|conn| init_schema(conn)).await?;
        Ok(Self { conn })
    }

    /// File-backed store shared by all workers.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(path)
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;
        conn.call(|conn| init_schema(conn)).await?;
        Ok(Self { conn })
    }

    /// Whether a terminal outcome is already recorded for this key.
    ///
    /// Pending rows do not count: a crash between `record_pending` and the
    /// terminal upsert must not block the retry on resume.
    pub async fn exists(&self, key: &DedupKey) -> Result<bool, LedgerError> {
        let key = key.0.clone();
        let found = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT 1 FROM applications WHERE dedup_key = ?1 AND status != 'pending'",
                )?;
                Ok(stmt.exists(params![key])?)
            })
            .await?;
        Ok(found)
    }

    /// Insert the pending row if no row exists for the key yet.
    pub async fn record_pending(&self, record: &ApplicationRecord) -> Result<(), LedgerError> {
        let r = record.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO applications \
                         (dedup_key, platform, job_title, company, job_url, status, session_id) \
                     VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
                    params![
                        r.dedup_key.0,
                        r.platform.0,
                        r.job_title,
                        r.company,
                        r.job_url,
                        r.session_id,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Atomic insert-or-finalize keyed on `dedup_key`.
    ///
    /// Returns [`UpsertOutcome::Duplicate`] and mutates nothing when a
    /// terminal row already exists — including when this call lost a race:
    /// the loser simply observes the return value.
    pub async fn upsert(&self, record: &ApplicationRecord) -> Result<UpsertOutcome, LedgerError> {
        let r = record.clone();
        let applied_at = r.applied_at.map(|t| t.to_rfc3339());
        let outcome = self
            .conn
            .call(move |conn| {
                let result = conn.execute(
                    UPSERT_SQL,
                    params![
                        r.dedup_key.0,
                        r.platform.0,
                        r.job_title,
                        r.company,
                        r.job_url,
                        r.status.as_str(),
                        applied_at,
                        r.confirmation_message,
                        r.evidence_path,
                        r.session_id,
                    ],
                );
                match result {
                    Ok(0) => Ok(UpsertOutcome::Duplicate),
                    Ok(_) => Ok(UpsertOutcome::Applied),
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        // Lost a concurrent race on the same key.
                        Ok(UpsertOutcome::Duplicate)
                    }
                    Err(err) => Err(err.into()),
                }
            })
            .await?;
        debug!(key = %record.dedup_key, outcome = ?outcome, "ledger upsert");
        Ok(outcome)
    }

    /// Fetch one record by key.
    pub async fn get(&self, key: &DedupKey) -> Result<Option<ApplicationRecord>, LedgerError> {
        let key = key.0.clone();
        let record = self
            .conn
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM applications WHERE dedup_key = ?1",
                    SELECT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                Ok(stmt
                    .query_row(params![key], row_to_record)
                    .optional()?)
            })
            .await?;
        Ok(record)
    }

    /// Restartable read for the reporting collaborator. Rows come back in id
    /// order; pass the last seen id as `after_id` to resume.
    pub async fn query(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<ApplicationRecord>, LedgerError> {
        let records = self
            .conn
            .call(move |conn| {
                let mut sql = format!(
                    "SELECT {} FROM applications WHERE 1=1",
                    SELECT_COLUMNS
                );
                let mut values: Vec<Value> = Vec::new();
                if let Some(platform) = &filter.platform {
                    sql.push_str(" AND platform = ?");
                    values.push(Value::from(platform.0.clone()));
                }
                if let Some(status) = filter.status {
                    sql.push_str(" AND status = ?");
                    values.push(Value::from(status.as_str().to_string()));
                }
                if let Some(after) = filter.after_id {
                    sql.push_str(" AND id > ?");
                    values.push(Value::from(after));
                }
                sql.push_str(" ORDER BY id ASC");
                if let Some(limit) = filter.limit {
                    sql.push_str(" LIMIT ?");
                    values.push(Value::from(i64::from(limit)));
                }

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(values.into_iter()), row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(records)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ApplicationRecord> {
    let status_raw: String = row.get(6)?;
    let applied_raw: Option<String> = row.get(7)?;
    Ok(ApplicationRecord {
        id: Some(row.get(0)?),
        dedup_key: DedupKey(row.get(1)?),
        platform: Platform(row.get(2)?),
        job_title: row.get(3)?,
        company: row.get(4)?,
        job_url: row.get(5)?,
        status: ApplicationStatus::parse(&status_raw).unwrap_or(ApplicationStatus::Failed),
        applied_at: applied_raw
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        confirmation_message: row.get(8)?,
        evidence_path: row.get(9)?,
        session_id: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use applypilot_core_types::{JobCandidate, SessionId};

    fn job(n: u32) -> JobCandidate {
        JobCandidate::new(
            format!("Engineer {}", n),
            "Acme",
            format!("https://jobs.acme.dev/{}", n),
            Platform::new("acme"),
        )
    }

    fn terminal(n: u32, status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord::pending(&job(n), &SessionId::new()).finish(status)
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_per_key() {
        let ledger = Ledger::in_memory().await.unwrap();
        let record = terminal(1, ApplicationStatus::Applied);

        assert!(matches!(
            ledger.upsert(&record).await.unwrap(),
            UpsertOutcome::Applied
        ));
        assert!(matches!(
            ledger.upsert(&record).await.unwrap(),
            UpsertOutcome::Duplicate
        ));

        let rows = ledger.query(RecordFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_row_is_never_rewritten() {
        let ledger = Ledger::in_memory().await.unwrap();
        let applied = terminal(1, ApplicationStatus::Applied).with_confirmation("all good");
        ledger.upsert(&applied).await.unwrap();
        let stored = ledger.get(&applied.dedup_key).await.unwrap().unwrap();

        // A later failure report for the same key must not win.
        let failed = terminal(1, ApplicationStatus::Failed);
        assert!(matches!(
            ledger.upsert(&failed).await.unwrap(),
            UpsertOutcome::Duplicate
        ));

        let after = ledger.get(&applied.dedup_key).await.unwrap().unwrap();
        assert_eq!(after.status, ApplicationStatus::Applied);
        assert_eq!(after.applied_at, stored.applied_at);
        assert_eq!(after.confirmation_message.as_deref(), Some("all good"));
    }

    #[tokio::test]
    async fn test_pending_row_is_finalized_not_duplicated() {
        let ledger = Ledger::in_memory().await.unwrap();
        let session = SessionId::new();
        let pending = ApplicationRecord::pending(&job(1), &session);
        ledger.record_pending(&pending).await.unwrap();

        // Pending rows do not satisfy the duplicate pre-check.
        assert!(!ledger.exists(&pending.dedup_key).await.unwrap());

        let outcome = ledger
            .upsert(&pending.clone().finish(ApplicationStatus::Applied))
            .await
            .unwrap();
        assert!(matches!(outcome, UpsertOutcome::Applied));
        assert!(ledger.exists(&pending.dedup_key).await.unwrap());

        let rows = ledger.query(RecordFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, ApplicationStatus::Applied);
    }

    #[tokio::test]
    async fn test_record_pending_is_a_noop_on_existing_row() {
        let ledger = Ledger::in_memory().await.unwrap();
        let applied = terminal(1, ApplicationStatus::Applied);
        ledger.upsert(&applied).await.unwrap();

        let pending = ApplicationRecord::pending(&job(1), &SessionId::new());
        ledger.record_pending(&pending).await.unwrap();

        let stored = ledger.get(&applied.dedup_key).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Applied);
    }

    #[tokio::test]
    async fn test_query_filters_and_keyset_restart() {
        let ledger = Ledger::in_memory().await.unwrap();
        for n in 1..=5 {
            let status = if n % 2 == 0 {
                ApplicationStatus::Failed
            } else {
                ApplicationStatus::Applied
            };
            ledger.upsert(&terminal(n, status)).await.unwrap();
        }

        let applied = ledger
            .query(RecordFilter::by_status(ApplicationStatus::Applied))
            .await
            .unwrap();
        assert_eq!(applied.len(), 3);

        let first_page = ledger
            .query(RecordFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first_page.len(), 2);

        let rest = ledger
            .query(RecordFilter {
                after_id: first_page.last().unwrap().id,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rest.len(), 3);
    }

    #[tokio::test]
    async fn test_file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        {
            let ledger = Ledger::open(&path).await.unwrap();
            ledger
                .upsert(&terminal(1, ApplicationStatus::Applied))
                .await
                .unwrap();
        }

        let reopened = Ledger::open(&path).await.unwrap();
        let rows = reopened.query(RecordFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, ApplicationStatus::Applied);
    }
}
