//! Transient per-learner quiz state.
//!
//! # Responsibility
//! - Track the one active question of a learner and its running award.
//! - Apply hint costs to the running award.
//!
//! # Invariants
//! - At most one active question per session.
//! - Skipping or answering clears the active question entirely.
//! - The running award is never floored; heavy hint use can push it below zero.
//!
//! The caller owns this value (cookie, cache, memory); the core never
//! stores it.

use super::score::SessionId;
use super::taxon::TaxonId;
use crate::config::QuizConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hint a learner can buy with points from the running award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    /// Reveal the multiple-choice propositions.
    Propositions,
    /// Show additional pictures of the taxon.
    MoreImages,
}

impl HintKind {
    /// Point cost for this hint under `config`.
    pub fn cost(self, config: &QuizConfig) -> i64 {
        match self {
            Self::Propositions => config.propositions_cost,
            Self::MoreImages => config.more_images_cost,
        }
    }
}

/// Question currently shown to a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuestion {
    pub taxon_id: TaxonId,
    /// Points a correct answer will award.
    pub score_to_award: i64,
    /// Hints bought so far, in order.
    pub hints: Vec<HintKind>,
}

/// Session-level misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NoActiveQuestion,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveQuestion => write!(f, "no active question"),
        }
    }
}

impl Error for SessionError {}

/// Learner state between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    pub session_id: SessionId,
    active: Option<ActiveQuestion>,
}

impl QuizSession {
    /// Creates an idle session for `session_id`.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&ActiveQuestion> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// Starts a question, replacing any previous one.
    pub fn begin(&mut self, taxon_id: TaxonId, max_score: i64) -> &ActiveQuestion {
        self.active.insert(ActiveQuestion {
            taxon_id,
            score_to_award: max_score,
            hints: Vec::new(),
        })
    }

    /// Deducts the cost of `kind` and returns the remaining award.
    pub fn apply_hint(&mut self, kind: HintKind, config: &QuizConfig) -> Result<i64, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveQuestion)?;
        active.score_to_award -= kind.cost(config);
        active.hints.push(kind);
        Ok(active.score_to_award)
    }

    /// Drops the active question without scoring it.
    pub fn skip(&mut self) -> Option<ActiveQuestion> {
        self.active.take()
    }

    /// Takes the active question out once it has been scored.
    pub fn finish(&mut self) -> Result<ActiveQuestion, SessionError> {
        self.active.take().ok_or(SessionError::NoActiveQuestion)
    }
}
