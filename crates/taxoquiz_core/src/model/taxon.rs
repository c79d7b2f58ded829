//! Taxon catalog record.
//!
//! # Responsibility
//! - Define the read-only catalog record the quiz is built from.
//! - Define the write model used to seed a catalog.
//!
//! # Invariants
//! - `vernacular_name` is non-blank and unique across the catalog.
//! - Blank lineage values mean "unknown at this rank", never an error.

use super::level::TaxonLevel;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable catalog identifier.
pub type TaxonId = i64;

const TRAIT_SEPARATOR: &str = " + ";

/// Seven-rank classification path. Blank strings are unset ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Lineage {
    pub kingdom: String,
    pub phylum: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
}

impl Lineage {
    /// Value at `level`.
    ///
    /// The display level is not part of a lineage and always reads blank.
    pub fn get(&self, level: TaxonLevel) -> &str {
        match level {
            TaxonLevel::Kingdom => &self.kingdom,
            TaxonLevel::Phylum => &self.phylum,
            TaxonLevel::Class => &self.class,
            TaxonLevel::Order => &self.order,
            TaxonLevel::Family => &self.family,
            TaxonLevel::Genus => &self.genus,
            TaxonLevel::Species => &self.species,
            TaxonLevel::VernacularName => "",
        }
    }

    /// Replaces the value at `level`. No-op for the display level.
    pub fn set(&mut self, level: TaxonLevel, value: impl Into<String>) {
        let slot = match level {
            TaxonLevel::Kingdom => &mut self.kingdom,
            TaxonLevel::Phylum => &mut self.phylum,
            TaxonLevel::Class => &mut self.class,
            TaxonLevel::Order => &mut self.order,
            TaxonLevel::Family => &mut self.family,
            TaxonLevel::Genus => &mut self.genus,
            TaxonLevel::Species => &mut self.species,
            TaxonLevel::VernacularName => return,
        };
        *slot = value.into();
    }

    /// Whether no rank carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        TaxonLevel::RANKS
            .iter()
            .all(|level| self.get(*level).trim().is_empty())
    }
}

/// Immutable catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    pub id: TaxonId,
    pub lineage: Lineage,
    /// Answer label shown to learners.
    pub vernacular_name: String,
    /// `" + "`-delimited hints consumed by image lookup.
    pub distinguishing_trait: String,
}

impl Taxon {
    /// Value at any level, including the display level.
    pub fn value(&self, level: TaxonLevel) -> &str {
        match level {
            TaxonLevel::VernacularName => &self.vernacular_name,
            rank => self.lineage.get(rank),
        }
    }

    /// Non-blank sub-traits of `distinguishing_trait`.
    pub fn trait_parts(&self) -> Vec<&str> {
        self.distinguishing_trait
            .split(TRAIT_SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// Binomial name when species is known, else the most specific rank.
    pub fn scientific_name(&self) -> String {
        let lineage = &self.lineage;
        if !lineage.species.is_empty() {
            return format!("{} {}", lineage.genus, lineage.species)
                .trim()
                .to_string();
        }
        TaxonLevel::RANKS
            .iter()
            .rev()
            .map(|level| lineage.get(*level))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// Validation failure for catalog writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonValidationError {
    BlankVernacularName,
}

impl Display for TaxonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankVernacularName => write!(f, "vernacular name must not be blank"),
        }
    }
}

impl Error for TaxonValidationError {}

/// Write model for seeding a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxon {
    #[serde(default)]
    pub lineage: Lineage,
    pub vernacular_name: String,
    #[serde(default)]
    pub distinguishing_trait: String,
}

impl NewTaxon {
    /// Starts a record with only its answer label set.
    pub fn new(vernacular_name: impl Into<String>) -> Self {
        Self {
            vernacular_name: vernacular_name.into(),
            ..Self::default()
        }
    }

    /// Sets one rank, returning `self` for chaining.
    pub fn with(mut self, level: TaxonLevel, value: impl Into<String>) -> Self {
        self.lineage.set(level, value);
        self
    }

    /// Sets the distinguishing trait text.
    pub fn with_trait(mut self, value: impl Into<String>) -> Self {
        self.distinguishing_trait = value.into();
        self
    }

    /// Checks write invariants before persistence.
    pub fn validate(&self) -> Result<(), TaxonValidationError> {
        if self.vernacular_name.trim().is_empty() {
            return Err(TaxonValidationError::BlankVernacularName);
        }
        Ok(())
    }
}
