//! Tunable quiz parameters.
//!
//! # Invariants
//! - Every scoring and selection constant is read from `QuizConfig`.
//! - A validated config has a positive award, a non-positive floor and
//!   non-negative costs.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Quiz scoring and selection parameters.
///
/// Missing fields in a deserialized document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Wrong choices offered next to the correct answer.
    pub distractor_count: usize,
    /// Starting award of every question.
    pub max_score: i64,
    /// Subtracted from a confused taxon on each wrong guess.
    pub wrong_guess_penalty: i64,
    /// Lowest score a wrong guess can leave behind; also its first score.
    pub score_floor: i64,
    /// Award cost of revealing the propositions.
    pub propositions_cost: i64,
    /// Award cost of requesting more pictures.
    pub more_images_cost: i64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            distractor_count: 3,
            max_score: 10,
            wrong_guess_penalty: 5,
            score_floor: -1,
            propositions_cost: 5,
            more_images_cost: 2,
        }
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroDistractors,
    NonPositiveMaxScore(i64),
    NegativeValue { field: &'static str, value: i64 },
    PositiveScoreFloor(i64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDistractors => write!(f, "distractor_count must be at least 1"),
            Self::NonPositiveMaxScore(value) => {
                write!(f, "max_score must be positive, got {value}")
            }
            Self::NegativeValue { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::PositiveScoreFloor(value) => {
                write!(f, "score_floor must not be positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl QuizConfig {
    /// Checks value ranges; returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.distractor_count == 0 {
            return Err(ConfigError::ZeroDistractors);
        }
        if self.max_score <= 0 {
            return Err(ConfigError::NonPositiveMaxScore(self.max_score));
        }
        for (field, value) in [
            ("wrong_guess_penalty", self.wrong_guess_penalty),
            ("propositions_cost", self.propositions_cost),
            ("more_images_cost", self.more_images_cost),
        ] {
            if value < 0 {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }
        if self.score_floor > 0 {
            return Err(ConfigError::PositiveScoreFloor(self.score_floor));
        }
        Ok(())
    }
}
