//! Domain model for the taxonomy quiz.
//!
//! # Responsibility
//! - Define the catalog record (`Taxon`) and its ordered lineage levels.
//! - Define per-learner score records and the transient quiz session.
//! - Define the partial selection edited by a taxonomy filter.
//!
//! # Invariants
//! - Lineage levels are totally ordered from `kingdom` to `vernacular_name`.
//! - Every learner-scoped value is keyed by an explicit `SessionId`.

pub mod level;
pub mod score;
pub mod selection;
pub mod session;
pub mod taxon;
