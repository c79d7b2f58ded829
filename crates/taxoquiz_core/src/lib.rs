//! Core decision logic for the adaptive taxonomy quiz.
//! This crate owns selection, scoring and taxonomy-resolution invariants;
//! transport and rendering live elsewhere.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, QuizConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::level::{TaxonLevel, UnknownLevelError};
pub use model::score::{BlankSessionIdError, ScoreRecord, SessionId};
pub use model::selection::{OptionsByLevel, ResolvedSelection, TaxonomySelection};
pub use model::session::{ActiveQuestion, HintKind, QuizSession, SessionError};
pub use model::taxon::{Lineage, NewTaxon, Taxon, TaxonId, TaxonValidationError};
pub use repo::score_repo::{ScoreStore, SqliteScoreStore};
pub use repo::taxon_repo::{
    LineageFilter, RepoError, RepoResult, SqliteTaxonRepository, TaxonRepository,
};
pub use service::quiz_service::{Question, QuizService, QuizServiceError};
pub use service::resolver::TaxonomyResolver;
pub use service::scorer::{normalize_answer, AnswerOutcome, Scorer};
pub use service::selector::{build_propositions, Selector, PROXIMITY_CASCADE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
