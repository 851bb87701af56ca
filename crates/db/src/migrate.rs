//! SQL migration runner backed by a ledger table.
//!
//! Migrations are plain `.sql` files named `<timestamp>_<label>.sql` in a
//! single directory, applied in ascending timestamp order. The ledger
//! (`pgmigrations` by default) records one row per applied file and is the
//! only source of truth for what has run.
//!
//! Each file is applied in its own transaction together with its ledger row,
//! so the ledger can never disagree with the schema. The ledger's unique
//! `name` column guards against two runners applying the same file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sqlx::{Connection, PgConnection};
use tabula_core::clock::Clock;
use tabula_core::types::Timestamp;

use crate::models::migration::{AppliedMigration, MigrationDescriptor};

/// Ledger table used when none is configured.
pub const DEFAULT_LEDGER_TABLE: &str = "pgmigrations";

/// PostgreSQL advisory lock ID held while the ledger table is created.
/// `CREATE TABLE IF NOT EXISTS` is not safe against a concurrent create.
pub const LEDGER_LOCK_ID: i64 = 918_273_646;

static FILE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_[A-Za-z0-9_\-]+\.sql$").expect("valid regex"));

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Failed to read migrations at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration file name `{0}` does not match `<timestamp>_<label>.sql`")]
    InvalidFileName(String),

    #[error("Invalid ledger table name `{0}`")]
    InvalidLedgerTable(String),

    /// A migration's statements failed. Nothing from it was committed and
    /// later migrations were not attempted.
    #[error("Migration `{name}` failed: {source}")]
    Failed {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Lists and applies pending migrations from one directory.
///
/// The runner holds no connection; every call borrows the caller's
/// dedicated connection for its whole duration.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    dir: PathBuf,
    ledger_table: String,
}

impl MigrationRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Use a different ledger table. The name is interpolated into SQL, so
    /// only lowercase identifiers are accepted.
    pub fn with_ledger_table(mut self, table: &str) -> Result<Self, MigrationError> {
        if !IDENTIFIER_RE.is_match(table) {
            return Err(MigrationError::InvalidLedgerTable(table.to_string()));
        }
        self.ledger_table = table.to_string();
        Ok(self)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All migration files in the directory, ascending by timestamp prefix
    /// then file name.
    ///
    /// Files without a `.sql` extension and subdirectories are ignored.
    pub async fn discover(&self) -> Result<Vec<MigrationDescriptor>, MigrationError> {
        let io_err = |source| MigrationError::Io {
            path: self.dir.display().to_string(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;
        let mut migrations = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            if !entry.file_type().await.map_err(io_err)?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(".sql") {
                continue;
            }
            let (name, timestamp) = parse_file_name(&file_name)?;
            migrations.push(MigrationDescriptor {
                path: entry.path().display().to_string(),
                name,
                timestamp,
            });
        }

        migrations.sort_by(|a, b| (a.timestamp, &a.name).cmp(&(b.timestamp, &b.name)));
        Ok(migrations)
    }

    /// Migrations present on disk but absent from the ledger, ascending.
    ///
    /// Read-only: a missing ledger table means nothing has been applied.
    pub async fn list_pending(
        &self,
        conn: &mut PgConnection,
    ) -> Result<Vec<MigrationDescriptor>, MigrationError> {
        let applied = self.applied_names(conn).await?;
        let pending = self
            .discover()
            .await?
            .into_iter()
            .filter(|m| !applied.contains(&m.name))
            .collect();
        Ok(pending)
    }

    /// Apply every pending migration in order, one transaction each.
    ///
    /// Returns the migrations applied by this call; empty when there was
    /// nothing to do. Stops at the first failing migration.
    pub async fn apply(
        &self,
        conn: &mut PgConnection,
        clock: &dyn Clock,
    ) -> Result<Vec<AppliedMigration>, MigrationError> {
        self.ensure_ledger(conn).await?;

        let pending = self.list_pending(conn).await?;
        let mut applied = Vec::with_capacity(pending.len());

        for migration in pending {
            match self.apply_one(conn, migration, clock).await? {
                Some(done) => {
                    tracing::info!(name = %done.migration.name, "Applied migration");
                    applied.push(done);
                }
                None => {
                    tracing::debug!("Migration already applied by another runner, skipping");
                }
            }
        }

        Ok(applied)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn applied_names(
        &self,
        conn: &mut PgConnection,
    ) -> Result<HashSet<String>, MigrationError> {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(&self.ledger_table)
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Ok(HashSet::new());
        }

        let query = format!("SELECT name FROM {}", self.ledger_table);
        let names: Vec<String> = sqlx::query_scalar(&query).fetch_all(&mut *conn).await?;
        Ok(names.into_iter().collect())
    }

    async fn ensure_ledger(&self, conn: &mut PgConnection) -> Result<(), MigrationError> {
        let mut tx = conn.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(LEDGER_LOCK_ID)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                run_on TIMESTAMPTZ NOT NULL
             )",
            self.ledger_table
        );
        sqlx::query(&query).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Apply one migration. `None` means another runner holds its ledger row.
    async fn apply_one(
        &self,
        conn: &mut PgConnection,
        migration: MigrationDescriptor,
        clock: &dyn Clock,
    ) -> Result<Option<AppliedMigration>, MigrationError> {
        let sql = tokio::fs::read_to_string(&migration.path)
            .await
            .map_err(|source| MigrationError::Io {
                path: migration.path.clone(),
                source,
            })?;

        let mut tx = conn.begin().await?;

        // Claim the ledger row first; a concurrent runner blocks here until
        // the claimant commits or rolls back.
        let insert = format!(
            "INSERT INTO {} (name, run_on) VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING
             RETURNING run_on",
            self.ledger_table
        );
        let run_on: Option<Timestamp> = sqlx::query_scalar(&insert)
            .bind(&migration.name)
            .bind(clock.now())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(run_on) = run_on else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Err(source) = sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(&sql)).await {
            tracing::error!(name = %migration.name, error = %source, "Migration failed");
            tx.rollback().await?;
            return Err(MigrationError::Failed {
                name: migration.name,
                source,
            });
        }

        tx.commit().await?;
        Ok(Some(AppliedMigration { migration, run_on }))
    }
}

/// Split a migration file name into `(name, timestamp)`.
fn parse_file_name(file_name: &str) -> Result<(String, i64), MigrationError> {
    let invalid = || MigrationError::InvalidFileName(file_name.to_string());

    let captures = FILE_NAME_RE.captures(file_name).ok_or_else(invalid)?;
    let timestamp = captures[1].parse::<i64>().map_err(|_| invalid())?;
    let name = file_name.trim_end_matches(".sql").to_string();
    Ok((name, timestamp))
}
