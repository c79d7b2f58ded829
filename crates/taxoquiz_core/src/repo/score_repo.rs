//! Per-session score store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read learner scores keyed by `(session_id, taxon_id)`.
//! - Create-or-update a score atomically for the scorer.
//!
//! # Invariants
//! - At most one row per `(session_id, taxon_id)`.
//! - `upsert` reads, applies the update and writes inside one IMMEDIATE
//!   transaction, so concurrent updates of one key are serialized.

use super::taxon_repo::{RepoError, RepoResult};
use crate::model::score::{ScoreRecord, SessionId};
use crate::model::taxon::TaxonId;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SCORE_SELECT_SQL: &str = "SELECT
    session_id,
    taxon_id,
    score,
    created_at,
    updated_at
FROM user_scores";

/// Mutable learner scores.
pub trait ScoreStore {
    fn get(&self, session_id: &SessionId, taxon_id: TaxonId) -> RepoResult<Option<ScoreRecord>>;
    /// Creates the record with `create_score`, or replaces an existing score
    /// with `update(current)`. Atomic per key.
    fn upsert<F>(
        &self,
        session_id: &SessionId,
        taxon_id: TaxonId,
        create_score: i64,
        update: F,
    ) -> RepoResult<ScoreRecord>
    where
        F: FnOnce(i64) -> i64;
    /// Every record of one session, ordered by taxon id.
    fn list_for_session(&self, session_id: &SessionId) -> RepoResult<Vec<ScoreRecord>>;
}

/// SQLite-backed score store.
#[derive(Clone, Copy)]
pub struct SqliteScoreStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScoreStore<'conn> {
    /// Creates store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        super::ensure_schema_ready(conn, "user_scores")?;
        Ok(Self { conn })
    }
}

impl ScoreStore for SqliteScoreStore<'_> {
    fn get(&self, session_id: &SessionId, taxon_id: TaxonId) -> RepoResult<Option<ScoreRecord>> {
        load_record(self.conn, session_id, taxon_id)
    }

    fn upsert<F>(
        &self,
        session_id: &SessionId,
        taxon_id: TaxonId,
        create_score: i64,
        update: F,
    ) -> RepoResult<ScoreRecord>
    where
        F: FnOnce(i64) -> i64,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let taxon_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM taxons WHERE id = ?1);",
            [taxon_id],
            |row| row.get(0),
        )?;
        if taxon_exists == 0 {
            return Err(RepoError::NotFound(taxon_id));
        }

        let current: Option<i64> = tx
            .query_row(
                "SELECT score FROM user_scores WHERE session_id = ?1 AND taxon_id = ?2;",
                params![session_id.as_str(), taxon_id],
                |row| row.get(0),
            )
            .optional()?;

        match current {
            None => {
                tx.execute(
                    "INSERT INTO user_scores (session_id, taxon_id, score)
                     VALUES (?1, ?2, ?3);",
                    params![session_id.as_str(), taxon_id, create_score],
                )?;
            }
            Some(score) => {
                tx.execute(
                    "UPDATE user_scores
                     SET
                        score = ?3,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE session_id = ?1 AND taxon_id = ?2;",
                    params![session_id.as_str(), taxon_id, update(score)],
                )?;
            }
        }

        let record = load_record(&tx, session_id, taxon_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "score row vanished after upsert for taxon {taxon_id}"
            ))
        })?;
        tx.commit()?;

        debug!(
            "event=score_upsert module=repo status=ok session={} taxon_id={} created={} score={}",
            session_id.short(),
            taxon_id,
            current.is_none(),
            record.score
        );
        Ok(record)
    }

    fn list_for_session(&self, session_id: &SessionId) -> RepoResult<Vec<ScoreRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SCORE_SELECT_SQL} WHERE session_id = ?1 ORDER BY taxon_id ASC;"
        ))?;
        let mut rows = stmt.query([session_id.as_str()])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_score_row(row)?);
        }
        Ok(records)
    }
}

fn load_record(
    conn: &Connection,
    session_id: &SessionId,
    taxon_id: TaxonId,
) -> RepoResult<Option<ScoreRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{SCORE_SELECT_SQL} WHERE session_id = ?1 AND taxon_id = ?2;"
    ))?;
    let mut rows = stmt.query(params![session_id.as_str(), taxon_id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_score_row(row)?));
    }
    Ok(None)
}

fn parse_score_row(row: &Row<'_>) -> RepoResult<ScoreRecord> {
    let session_text: String = row.get("session_id")?;
    let session_id = SessionId::new(session_text).map_err(|_| {
        RepoError::InvalidData("blank session_id in user_scores.session_id".to_string())
    })?;

    Ok(ScoreRecord {
        session_id,
        taxon_id: row.get("taxon_id")?,
        score: row.get("score")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
