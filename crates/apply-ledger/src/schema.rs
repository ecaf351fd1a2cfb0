//! Ledger schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Initialize the ledger schema.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// The uniqueness constraint on `dedup_key` is the engine's core guarantee:
/// at most one terminal outcome per job, regardless of worker interleaving.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dedup_key TEXT NOT NULL UNIQUE,
    platform TEXT NOT NULL,
    job_title TEXT NOT NULL,
    company TEXT NOT NULL,
    job_url TEXT NOT NULL,
    status TEXT NOT NULL,
    applied_at TEXT,
    confirmation_message TEXT,
    evidence_path TEXT,
    session_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);
CREATE INDEX IF NOT EXISTS idx_applications_platform ON applications(platform);
"#;
