use std::path::{Path, PathBuf};

use careers_core::Job;
use careers_logging::{careers_debug, careers_info, careers_warn};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::persist::{ensure_dir, PersistError};
use crate::InsertOutcome;

const CREATE_JOBS_TABLE: &str = r#"
    CREATE TABLE jobs (
        link TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        published DATETIME NOT NULL
    )
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store directory unavailable: {0}")]
    Dir(#[from] PersistError),
    #[error("store already closed")]
    Closed,
}

/// SQLite-backed table of accepted jobs, keyed by link.
///
/// All writes of one handle happen inside a single transaction. It is made
/// durable by [`JobStore::commit_and_close`]; dropping the handle instead
/// rolls the transaction back and closes the connection.
#[derive(Debug)]
pub struct JobStore {
    conn: Option<Connection>,
    path: PathBuf,
}

impl JobStore {
    /// Open the store at `path`, creating the file and its table on first use.
    ///
    /// The table is only created when the file did not exist beforehand; an
    /// existing file is trusted to carry it.
    pub fn initialize(path: &Path) -> Result<Self, StoreError> {
        let existed = path.exists();
        if !existed {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        if !existed {
            conn.execute_batch(CREATE_JOBS_TABLE)?;
            careers_info!("Created job store at {:?}", path);
        }
        conn.execute_batch("BEGIN IMMEDIATE")?;

        Ok(Self {
            conn: Some(conn),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Up to `limit` jobs, newest `published` first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT link, title, published FROM jobs ORDER BY published DESC, rowid DESC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            let published: DateTime<Utc> = row.get(2)?;
            Ok(Job {
                link: row.get(0)?,
                title: row.get(1)?,
                published,
            })
        })?;
        let jobs = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    /// Insert `job` unless its link is already stored. Existing rows are never updated.
    pub fn insert(&self, job: &Job) -> Result<InsertOutcome, StoreError> {
        let changed = self.conn()?.execute(
            "INSERT OR IGNORE INTO jobs (link, title, published) VALUES (?1, ?2, ?3)",
            params![job.link, job.title, job.published],
        )?;
        if changed == 0 {
            careers_debug!("Job {} already stored", job.link);
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    pub fn contains(&self, link: &str) -> Result<bool, StoreError> {
        let found = self
            .conn()?
            .query_row("SELECT 1 FROM jobs WHERE link = ?1", params![link], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Commit pending inserts and release the connection.
    pub fn commit_and_close(mut self) -> Result<(), StoreError> {
        let conn = self.conn.take().ok_or(StoreError::Closed)?;
        conn.execute_batch("COMMIT")?;
        conn.close().map_err(|(_, err)| StoreError::Sqlite(err))?;
        careers_debug!("Committed and closed job store {:?}", self.path);
        Ok(())
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }
}

impl Drop for JobStore {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if !conn.is_autocommit() {
                if let Err(err) = conn.execute_batch("ROLLBACK") {
                    careers_warn!("Failed to roll back job store {:?}: {}", self.path, err);
                } else {
                    careers_warn!("Rolled back uncommitted changes to {:?}", self.path);
                }
            }
        }
    }
}
