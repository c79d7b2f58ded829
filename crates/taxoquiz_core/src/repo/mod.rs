//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the read-only catalog queries the quiz services depend on.
//! - Define the per-session score store with an atomic upsert.
//! - Keep SQL details away from selection/scoring/resolution logic.
//!
//! # Invariants
//! - SQLite repositories only accept connections migrated to the latest
//!   schema version.
//! - Store failures are returned unchanged; repositories never retry.

pub mod score_repo;
pub mod taxon_repo;

use crate::db::migrations::{current_version, latest_version};
use rusqlite::Connection;
use taxon_repo::{RepoError, RepoResult};

pub(crate) fn ensure_schema_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }
    Ok(())
}
