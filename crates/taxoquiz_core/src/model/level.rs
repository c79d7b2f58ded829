//! Ordered taxonomy levels.
//!
//! Seven ranks followed by the terminal display level. The derived `Ord`
//! follows specificity, so `a < b` means `a` encloses `b`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One selectable level of a taxon lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonLevel {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
    /// Terminal display level; the quiz answer label.
    VernacularName,
}

impl TaxonLevel {
    /// The seven lineage ranks, least specific first.
    pub const RANKS: [TaxonLevel; 7] = [
        Self::Kingdom,
        Self::Phylum,
        Self::Class,
        Self::Order,
        Self::Family,
        Self::Genus,
        Self::Species,
    ];

    /// Every level including the display level, least specific first.
    pub const ALL: [TaxonLevel; 8] = [
        Self::Kingdom,
        Self::Phylum,
        Self::Class,
        Self::Order,
        Self::Family,
        Self::Genus,
        Self::Species,
        Self::VernacularName,
    ];

    /// Stable snake_case name shared with serde and `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kingdom => "kingdom",
            Self::Phylum => "phylum",
            Self::Class => "class",
            Self::Order => "order",
            Self::Family => "family",
            Self::Genus => "genus",
            Self::Species => "species",
            Self::VernacularName => "vernacular_name",
        }
    }

    /// Whether this level is one of the seven lineage ranks.
    pub fn is_rank(self) -> bool {
        self != Self::VernacularName
    }

    /// Position in [`TaxonLevel::ALL`].
    pub fn depth(self) -> usize {
        self as usize
    }

    /// Immediately enclosing level, `None` for `Kingdom`.
    pub fn parent(self) -> Option<TaxonLevel> {
        self.depth().checked_sub(1).map(|index| Self::ALL[index])
    }

    /// Levels strictly less specific than `self`.
    pub fn ancestors(self) -> &'static [TaxonLevel] {
        &Self::ALL[..self.depth()]
    }

    /// Levels strictly more specific than `self`.
    pub fn descendants(self) -> &'static [TaxonLevel] {
        &Self::ALL[self.depth() + 1..]
    }

    /// Quoted SQL identifier of the backing `taxons` column.
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Kingdom => "kingdom",
            Self::Phylum => "phylum",
            Self::Class => "class",
            Self::Order => "\"order\"",
            Self::Family => "family",
            Self::Genus => "genus",
            Self::Species => "species",
            Self::VernacularName => "vernacular_name",
        }
    }
}

impl Display for TaxonLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a level name is not one of the eight known levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevelError(pub String);

impl Display for UnknownLevelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown taxonomy level `{}`", self.0)
    }
}

impl Error for UnknownLevelError {}

impl FromStr for TaxonLevel {
    type Err = UnknownLevelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| UnknownLevelError(normalized.to_string()))
    }
}
