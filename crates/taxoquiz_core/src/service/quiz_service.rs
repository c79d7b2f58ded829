//! Quiz session flow.
//!
//! # Responsibility
//! - Drive one learner through pick → hints → answer/skip.
//! - Feed the session's running award into the scorer.
//!
//! # Invariants
//! - An answered question clears the session; a blank answer keeps it.
//! - Every call carries the learner's `QuizSession` explicitly.

use crate::config::{ConfigError, QuizConfig};
use crate::model::session::{HintKind, QuizSession, SessionError};
use crate::model::taxon::{Taxon, TaxonId};
use crate::repo::score_repo::ScoreStore;
use crate::repo::taxon_repo::{RepoError, TaxonRepository};
use crate::service::scorer::{AnswerOutcome, Scorer};
use crate::service::selector::{build_propositions, Selector};
use log::{info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from quiz flow operations.
#[derive(Debug)]
pub enum QuizServiceError {
    /// Hint or answer without a current question.
    NoActiveQuestion,
    /// The session points at a taxon the catalog no longer has.
    TaxonNotFound(TaxonId),
    Repo(RepoError),
}

impl Display for QuizServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveQuestion => write!(f, "no active question"),
            Self::TaxonNotFound(id) => write!(f, "current taxon not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuizServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for QuizServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SessionError> for QuizServiceError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::NoActiveQuestion => Self::NoActiveQuestion,
        }
    }
}

/// A question ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub taxon: Taxon,
    /// Correct answer and distractors in shuffled order.
    pub propositions: Vec<String>,
    pub score_to_award: i64,
}

/// Facade over selector and scorer for one quiz flow.
pub struct QuizService<T: TaxonRepository + Clone, S: ScoreStore + Clone> {
    taxa: T,
    selector: Selector<T, S>,
    scorer: Scorer<T, S>,
    config: QuizConfig,
}

impl<T: TaxonRepository + Clone, S: ScoreStore + Clone> QuizService<T, S> {
    /// Wires selector and scorer; rejects an out-of-range `config`.
    pub fn try_new(taxa: T, scores: S, config: QuizConfig) -> Result<Self, ConfigError> {
        let scorer = Scorer::try_new(taxa.clone(), scores.clone(), config.clone())?;
        Ok(Self {
            selector: Selector::new(taxa.clone(), scores),
            scorer,
            taxa,
            config,
        })
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Starts the next question for `session` using the thread RNG.
    pub fn next_question(
        &self,
        session: &mut QuizSession,
    ) -> Result<Option<Question>, QuizServiceError> {
        self.next_question_with_rng(session, &mut rand::thread_rng())
    }

    /// Starts the next question; `None` when the catalog is empty.
    ///
    /// Any previous question of the session is discarded.
    pub fn next_question_with_rng<R>(
        &self,
        session: &mut QuizSession,
        rng: &mut R,
    ) -> Result<Option<Question>, QuizServiceError>
    where
        R: Rng + ?Sized,
    {
        session.skip();
        let Some(taxon) = self.selector.pick_next_taxon(&session.session_id, rng)? else {
            warn!(
                "event=next_question module=quiz status=empty session={}",
                session.session_id.short()
            );
            return Ok(None);
        };

        let distractors =
            self.selector
                .build_distractors(&taxon, self.config.distractor_count, rng)?;
        let propositions = build_propositions(&taxon, &distractors, rng);
        let score_to_award = session.begin(taxon.id, self.config.max_score).score_to_award;

        info!(
            "event=next_question module=quiz status=ok session={} taxon_id={} propositions={}",
            session.session_id.short(),
            taxon.id,
            propositions.len()
        );
        Ok(Some(Question {
            taxon,
            propositions,
            score_to_award,
        }))
    }

    /// Charges the propositions hint; returns the remaining award.
    pub fn reveal_propositions(&self, session: &mut QuizSession) -> Result<i64, QuizServiceError> {
        Ok(session.apply_hint(HintKind::Propositions, &self.config)?)
    }

    /// Charges the extra-pictures hint; returns the remaining award.
    pub fn request_more_images(&self, session: &mut QuizSession) -> Result<i64, QuizServiceError> {
        Ok(session.apply_hint(HintKind::MoreImages, &self.config)?)
    }

    /// Scores `submitted_text` against the session's current question.
    pub fn submit_answer(
        &self,
        session: &mut QuizSession,
        submitted_text: &str,
    ) -> Result<AnswerOutcome, QuizServiceError> {
        let active = session
            .active()
            .cloned()
            .ok_or(QuizServiceError::NoActiveQuestion)?;
        let taxon = self
            .taxa
            .find_by_id(active.taxon_id)?
            .ok_or(QuizServiceError::TaxonNotFound(active.taxon_id))?;

        let outcome = self.scorer.apply_answer(
            &session.session_id,
            &taxon,
            submitted_text,
            active.score_to_award,
        )?;
        if outcome != AnswerOutcome::NoAnswer {
            session.finish()?;
        }
        Ok(outcome)
    }

    /// Drops the current question without scoring.
    pub fn skip(&self, session: &mut QuizSession) {
        if let Some(active) = session.skip() {
            info!(
                "event=skip module=quiz status=ok session={} taxon_id={}",
                session.session_id.short(),
                active.taxon_id
            );
        }
    }
}
