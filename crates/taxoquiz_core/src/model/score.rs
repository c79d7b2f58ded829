//! Per-learner score records.
//!
//! # Invariants
//! - At most one `ScoreRecord` exists per `(SessionId, TaxonId)` pair.
//! - Records are created lazily and never deleted by the core.

use super::taxon::TaxonId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque learner identifier threaded through every scored call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

/// Rejected session identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankSessionIdError;

impl Display for BlankSessionIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "session id must not be blank")
    }
}

impl Error for BlankSessionIdError {}

impl SessionId {
    /// Wraps an externally issued id.
    pub fn new(value: impl Into<String>) -> Result<Self, BlankSessionIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(BlankSessionIdError);
        }
        Ok(Self(value))
    }

    /// Mints a fresh random id for a new learner.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(index, _)| index);
        &self.0[..end]
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = BlankSessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

/// Learner score for one taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub session_id: SessionId,
    pub taxon_id: TaxonId,
    /// May be negative after wrong-guess penalties.
    pub score: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}
