//! Answer scoring.
//!
//! # Responsibility
//! - Compare a submitted answer to the current taxon.
//! - Reward the taxon on a match, penalize the confused taxon otherwise.
//!
//! # Invariants
//! - A blank submission mutates nothing.
//! - Rewards accumulate on top of the existing score.
//! - Penalties never push a score below `QuizConfig::score_floor`.
//! - A wrong answer never changes the correct taxon's score.

use crate::config::{ConfigError, QuizConfig};
use crate::model::score::SessionId;
use crate::model::taxon::{Taxon, TaxonId};
use crate::repo::score_repo::ScoreStore;
use crate::repo::taxon_repo::{RepoResult, TaxonRepository};
use log::info;
use serde::{Deserialize, Serialize};

/// Result of one submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// Blank submission; nothing recorded.
    NoAnswer,
    /// Matched; `score` is the taxon's new cumulative score.
    Correct { score: i64 },
    /// Did not match. `penalized` names the catalog taxon the learner
    /// confused it with, when the submission was one.
    Incorrect { penalized: Option<TaxonId> },
}

/// Applies answer outcomes to the score store.
pub struct Scorer<T: TaxonRepository, S: ScoreStore> {
    taxa: T,
    scores: S,
    config: QuizConfig,
}

impl<T: TaxonRepository, S: ScoreStore> Scorer<T, S> {
    /// Creates a scorer after checking `config`.
    pub fn try_new(taxa: T, scores: S, config: QuizConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            taxa,
            scores,
            config,
        })
    }

    /// Scores `submitted_text` against `correct` for `session_id`.
    ///
    /// `awarded_score` is the caller's running award for this question.
    pub fn apply_answer(
        &self,
        session_id: &SessionId,
        correct: &Taxon,
        submitted_text: &str,
        awarded_score: i64,
    ) -> RepoResult<AnswerOutcome> {
        let trimmed = submitted_text.trim();
        if trimmed.is_empty() {
            return Ok(AnswerOutcome::NoAnswer);
        }

        if normalize_answer(trimmed) == normalize_answer(&correct.vernacular_name) {
            let record = self.scores.upsert(session_id, correct.id, awarded_score, |score| {
                score.saturating_add(awarded_score)
            })?;
            info!(
                "event=answer module=scorer status=correct session={} taxon_id={} awarded={} score={}",
                session_id.short(),
                correct.id,
                awarded_score,
                record.score
            );
            return Ok(AnswerOutcome::Correct {
                score: record.score,
            });
        }

        let penalized = match self.taxa.find_by_vernacular_name(trimmed)? {
            Some(guessed) => {
                let floor = self.config.score_floor;
                let penalty = self.config.wrong_guess_penalty;
                self.scores.upsert(session_id, guessed.id, floor, |score| {
                    score.saturating_sub(penalty).max(floor)
                })?;
                Some(guessed.id)
            }
            None => None,
        };

        info!(
            "event=answer module=scorer status=incorrect session={} taxon_id={} penalized={}",
            session_id.short(),
            correct.id,
            penalized.map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        Ok(AnswerOutcome::Incorrect { penalized })
    }
}

/// Trimmed, case-folded answer text.
pub fn normalize_answer(value: &str) -> String {
    value.trim().to_lowercase()
}
