//! Migration descriptors returned by the migration runner.

use serde::Serialize;
use tabula_core::types::Timestamp;

/// A migration file discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationDescriptor {
    /// Path of the SQL file, as found under the migrations directory.
    pub path: String,
    /// File stem; the key recorded in the ledger.
    pub name: String,
    /// Numeric prefix of the file name.
    pub timestamp: i64,
}

/// A migration applied by this runner invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedMigration {
    #[serde(flatten)]
    pub migration: MigrationDescriptor,
    pub run_on: Timestamp,
}
