//! Next-question selection and distractor generation.
//!
//! # Responsibility
//! - Pick the taxon a learner is weakest on.
//! - Build wrong-answer choices from taxonomically close taxa.
//!
//! # Invariants
//! - Unseen taxa count as score 0.
//! - Ties on the minimum score are broken uniformly at random.
//! - Distractors never include the correct taxon and never repeat.

use crate::model::level::TaxonLevel;
use crate::model::score::SessionId;
use crate::model::taxon::{Taxon, TaxonId};
use crate::repo::score_repo::ScoreStore;
use crate::repo::taxon_repo::{LineageFilter, RepoResult, TaxonRepository};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Ranks tried for distractors, closest relatives first.
pub const PROXIMITY_CASCADE: [TaxonLevel; 5] = [
    TaxonLevel::Genus,
    TaxonLevel::Family,
    TaxonLevel::Order,
    TaxonLevel::Class,
    TaxonLevel::Phylum,
];

/// Chooses quiz taxa and their distractors.
pub struct Selector<T: TaxonRepository, S: ScoreStore> {
    taxa: T,
    scores: S,
}

impl<T: TaxonRepository, S: ScoreStore> Selector<T, S> {
    pub fn new(taxa: T, scores: S) -> Self {
        Self { taxa, scores }
    }

    /// Returns a minimum-score taxon for `session_id`, or `None` for an
    /// empty catalog.
    pub fn pick_next_taxon<R>(&self, session_id: &SessionId, rng: &mut R) -> RepoResult<Option<Taxon>>
    where
        R: Rng + ?Sized,
    {
        let known: HashMap<TaxonId, i64> = self
            .scores
            .list_for_session(session_id)?
            .into_iter()
            .map(|record| (record.taxon_id, record.score))
            .collect();
        let scored: Vec<(Taxon, i64)> = self
            .taxa
            .all()?
            .into_iter()
            .map(|taxon| {
                let score = known.get(&taxon.id).copied().unwrap_or(0);
                (taxon, score)
            })
            .collect();

        let Some(min_score) = scored.iter().map(|(_, score)| *score).min() else {
            info!(
                "event=pick_next module=selector status=empty session={}",
                session_id.short()
            );
            return Ok(None);
        };

        let weakest: Vec<Taxon> = scored
            .into_iter()
            .filter(|(_, score)| *score == min_score)
            .map(|(taxon, _)| taxon)
            .collect();
        let tie_count = weakest.len();
        let picked = weakest.choose(rng).cloned();

        debug!(
            "event=pick_next module=selector status=ok session={} min_score={} ties={} taxon_id={}",
            session_id.short(),
            min_score,
            tie_count,
            picked.as_ref().map_or(0, |taxon| taxon.id)
        );
        Ok(picked)
    }

    /// Returns up to `count` wrong vernacular names for `correct`.
    ///
    /// Candidates accumulate over [`PROXIMITY_CASCADE`], skipping blank
    /// ranks. A pool still short of `count` is topped up with every other
    /// taxon. The result is a uniform sample of the whole accumulated pool.
    pub fn build_distractors<R>(
        &self,
        correct: &Taxon,
        count: usize,
        rng: &mut R,
    ) -> RepoResult<Vec<String>>
    where
        R: Rng + ?Sized,
    {
        let mut pool: Vec<Taxon> = Vec::new();
        let mut seen: HashSet<TaxonId> = HashSet::from([correct.id]);

        for level in PROXIMITY_CASCADE {
            if pool.len() >= count {
                break;
            }
            let value = correct.value(level);
            if value.trim().is_empty() {
                continue;
            }
            let filter = LineageFilter::matching(level, value).excluding(seen.iter().copied());
            let relatives = self.taxa.filter_by(&filter)?;
            seen.extend(relatives.iter().map(|taxon| taxon.id));
            pool.extend(relatives);
        }

        // A short pool takes in every remaining taxon, so relatives found
        // by the cascade compete with the whole catalog in the final draw.
        if pool.len() < count {
            let exclude: Vec<TaxonId> = seen.iter().copied().collect();
            let fillers = self.taxa.random_sample(usize::MAX, &exclude)?;
            pool.extend(fillers.into_iter().filter(|taxon| seen.insert(taxon.id)));
        }

        let pool_size = pool.len();
        let distractors: Vec<String> = pool
            .choose_multiple(rng, count.min(pool_size))
            .map(|taxon| taxon.vernacular_name.clone())
            .collect();

        debug!(
            "event=build_distractors module=selector status=ok taxon_id={} pool={} picked={}",
            correct.id,
            pool_size,
            distractors.len()
        );
        Ok(distractors)
    }
}

/// Correct answer plus distractors, shuffled.
pub fn build_propositions<R>(correct: &Taxon, distractors: &[String], rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut propositions = Vec::with_capacity(distractors.len() + 1);
    propositions.push(correct.vernacular_name.clone());
    propositions.extend(distractors.iter().cloned());
    propositions.shuffle(rng);
    propositions
}
