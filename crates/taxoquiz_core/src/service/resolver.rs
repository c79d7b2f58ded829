//! Taxonomy filter constraint propagation.
//!
//! # Responsibility
//! - Turn a partially edited lineage selection into a consistent one.
//! - List the valid values at every level for a selection.
//!
//! # Invariants
//! - Editing a rank clears every more specific level, display name included.
//! - A chosen level whose immediate parent is blank receives the full
//!   ancestor lineage of a witness taxon.
//! - `resolve(resolve(s, level), None) == resolve(s, level)`.
//!
//! Selection values are trimmed before any lookup. Witness lookups take the lowest-id match; taxa sharing a value are
//! assumed to share ancestors.

use crate::model::level::TaxonLevel;
use crate::model::selection::{OptionsByLevel, ResolvedSelection, TaxonomySelection};
use crate::repo::taxon_repo::{LineageFilter, RepoResult, TaxonRepository};
use log::debug;

/// Resolves taxonomy filter edits against the catalog.
pub struct TaxonomyResolver<T: TaxonRepository> {
    taxa: T,
}

impl<T: TaxonRepository> TaxonomyResolver<T> {
    pub fn new(taxa: T) -> Self {
        Self { taxa }
    }

    /// Applies downward reset for `changed_level`, then upward inference.
    pub fn resolve(
        &self,
        selection: &TaxonomySelection,
        changed_level: Option<TaxonLevel>,
    ) -> RepoResult<TaxonomySelection> {
        let mut resolved = selection.trimmed();

        match changed_level {
            Some(TaxonLevel::VernacularName) => {
                if !resolved.is_blank(TaxonLevel::VernacularName) {
                    let name = resolved.vernacular_name.clone();
                    if let Some(taxon) = self.taxa.find_by_vernacular_name(&name)? {
                        resolved.copy_from(&taxon, &TaxonLevel::RANKS);
                    }
                }
            }
            Some(rank) => {
                for level in rank.descendants() {
                    resolved.clear(*level);
                }
            }
            None => {}
        }

        for level in TaxonLevel::RANKS.iter().rev() {
            let Some(parent) = level.parent() else {
                continue;
            };
            if resolved.is_blank(*level) || !resolved.is_blank(parent) {
                continue;
            }
            let filter = LineageFilter::matching(*level, resolved.get(*level)).limit(1);
            if let Some(witness) = self.taxa.filter_by(&filter)?.into_iter().next() {
                resolved.copy_from(&witness, level.ancestors());
            }
        }

        debug!(
            "event=taxonomy_resolve module=resolver status=ok changed_level={} deepest={}",
            changed_level.map_or("none", TaxonLevel::as_str),
            deepest_chosen(&resolved).map_or("none", TaxonLevel::as_str)
        );
        Ok(resolved)
    }

    /// Distinct values per level, each filtered by every strictly less
    /// specific non-blank level of `selection`.
    pub fn available_options(&self, selection: &TaxonomySelection) -> RepoResult<OptionsByLevel> {
        let selection = selection.trimmed();
        let mut options = OptionsByLevel::default();
        for level in TaxonLevel::ALL {
            let filter = LineageFilter::from_selection(&selection, level.ancestors());
            options.insert(level, self.taxa.distinct_values(level, &filter)?);
        }
        Ok(options)
    }

    /// One filter edit: resolve the selection, then list its options.
    pub fn resolve_with_options(
        &self,
        selection: &TaxonomySelection,
        changed_level: Option<TaxonLevel>,
    ) -> RepoResult<ResolvedSelection> {
        let selection = self.resolve(selection, changed_level)?;
        let options = self.available_options(&selection)?;
        Ok(ResolvedSelection { selection, options })
    }
}

fn deepest_chosen(selection: &TaxonomySelection) -> Option<TaxonLevel> {
    TaxonLevel::ALL
        .into_iter()
        .rev()
        .find(|level| !selection.is_blank(*level))
}
