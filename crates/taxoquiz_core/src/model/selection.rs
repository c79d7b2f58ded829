//! Partial lineage selection edited through a taxonomy filter.

use super::level::TaxonLevel;
use super::taxon::{Lineage, Taxon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values chosen so far at each level; blank means "not chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomySelection {
    #[serde(flatten)]
    pub lineage: Lineage,
    pub vernacular_name: String,
}

impl TaxonomySelection {
    pub fn get(&self, level: TaxonLevel) -> &str {
        match level {
            TaxonLevel::VernacularName => &self.vernacular_name,
            rank => self.lineage.get(rank),
        }
    }

    pub fn set(&mut self, level: TaxonLevel, value: impl Into<String>) {
        match level {
            TaxonLevel::VernacularName => self.vernacular_name = value.into(),
            rank => self.lineage.set(rank, value),
        }
    }

    pub fn clear(&mut self, level: TaxonLevel) {
        self.set(level, String::new());
    }

    /// Whether `level` has no usable value (empty or whitespace).
    pub fn is_blank(&self, level: TaxonLevel) -> bool {
        self.get(level).trim().is_empty()
    }

    /// Builder form of [`TaxonomySelection::set`].
    pub fn with(mut self, level: TaxonLevel, value: impl Into<String>) -> Self {
        self.set(level, value);
        self
    }

    /// Copy with surrounding whitespace removed at every level.
    pub fn trimmed(&self) -> Self {
        TaxonLevel::ALL
            .into_iter()
            .fold(Self::default(), |selection, level| {
                selection.with(level, self.get(level).trim())
            })
    }

    /// Copies every rank of `taxon` listed in `levels` into this selection.
    pub(crate) fn copy_from(&mut self, taxon: &Taxon, levels: &[TaxonLevel]) {
        for level in levels {
            self.set(*level, taxon.value(*level));
        }
    }
}

/// Distinct valid values per level, each sorted and without blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsByLevel {
    options: BTreeMap<TaxonLevel, Vec<String>>,
}

impl OptionsByLevel {
    pub(crate) fn insert(&mut self, level: TaxonLevel, values: Vec<String>) {
        self.options.insert(level, values);
    }

    /// Options for `level`; empty when the catalog has none.
    pub fn get(&self, level: TaxonLevel) -> &[String] {
        self.options
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaxonLevel, &[String])> {
        self.options
            .iter()
            .map(|(level, values)| (*level, values.as_slice()))
    }
}

/// Output of one filter edit: the consistent selection plus its options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    pub selection: TaxonomySelection,
    pub options: OptionsByLevel,
}

#[cfg(test)]
mod tests {
    use super::{OptionsByLevel, TaxonomySelection};
    use crate::model::level::TaxonLevel;

    #[test]
    fn get_and_set_cover_every_level() {
        let mut selection = TaxonomySelection::default();
        for (index, level) in TaxonLevel::ALL.into_iter().enumerate() {
            selection.set(level, format!("value-{index}"));
        }
        for (index, level) in TaxonLevel::ALL.into_iter().enumerate() {
            assert_eq!(selection.get(level), format!("value-{index}"));
        }
        selection.clear(TaxonLevel::Order);
        assert!(selection.is_blank(TaxonLevel::Order));
    }

    #[test]
    fn trimmed_strips_every_level() {
        let selection = TaxonomySelection::default()
            .with(TaxonLevel::Species, " leo ")
            .with(TaxonLevel::VernacularName, "Lion\n")
            .with(TaxonLevel::Family, "   ");

        let trimmed = selection.trimmed();
        assert_eq!(trimmed.get(TaxonLevel::Species), "leo");
        assert_eq!(trimmed.get(TaxonLevel::VernacularName), "Lion");
        assert_eq!(trimmed.get(TaxonLevel::Family), "");
    }

    #[test]
    fn missing_options_read_as_empty() {
        let options = OptionsByLevel::default();
        assert!(options.get(TaxonLevel::Genus).is_empty());
    }
}
