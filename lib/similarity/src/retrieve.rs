//! k-nearest retrieval
//!
//! Scores every case of the base against a query with any [`Scorer`], sorts
//! closest-first and returns the top-k. Candidates sharing the query's
//! identity are skipped (leave-one-out).

use crate::scorer::Scorer;
use ahash::AHashSet;
use casebase_core::{Case, CaseBase, Result};
use rayon::prelude::*;

/// Extra neighbors fetched by [`Retriever::recommend`] to absorb filtering and dedupe
pub const RECOMMEND_OVERFETCH: usize = 3;

/// A retrieved case with its score (similarity or distance)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub score: f64,
    pub case: &'a Case,
}

impl<'a> Neighbor<'a> {
    pub fn new(score: f64, case: &'a Case) -> Self {
        Self { score, case }
    }

    /// Get the case ID as a string
    pub fn id_string(&self) -> String {
        self.case.id.to_string()
    }
}

/// Ranks a case base against queries with one scoring strategy
#[derive(Debug, Clone, Copy)]
pub struct Retriever<'a, S> {
    base: &'a CaseBase,
    scorer: S,
}

impl<'a, S: Scorer> Retriever<'a, S> {
    pub fn new(base: &'a CaseBase, scorer: S) -> Self {
        Self { base, scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Every eligible candidate, closest first
    ///
    /// Scoring runs in parallel; `collect` keeps case-base order, and the
    /// stable sort then leaves tied scores in that order.
    pub fn rank_all(&self, query: &Case) -> Result<Vec<Neighbor<'a>>> {
        let base = self.base;
        let scorer = &self.scorer;

        let mut neighbors = base
            .cases()
            .par_iter()
            .filter(|candidate| candidate.id != query.id)
            .map(|candidate| {
                scorer
                    .score(base, query, candidate)
                    .map(|score| Neighbor::new(score, candidate))
            })
            .collect::<Result<Vec<_>>>()?;

        let direction = scorer.direction();
        neighbors.sort_by(|a, b| direction.compare(a.score, b.score));
        Ok(neighbors)
    }

    /// The `k` closest candidates (`k` is clamped to at least 1)
    ///
    /// Returns fewer results when the base has fewer eligible cases.
    pub fn retrieve(&self, query: &Case, k: usize) -> Result<Vec<Neighbor<'a>>> {
        let mut neighbors = self.rank_all(query)?;
        neighbors.truncate(k.max(1));
        Ok(neighbors)
    }

    /// Similar cases with distinct display keys, excluding the query's own key
    ///
    /// Fetches `top_k + RECOMMEND_OVERFETCH` neighbors, so fewer than `top_k`
    /// results come back when filtering removes more than the overfetch.
    pub fn recommend(&self, target: &Case, top_k: usize) -> Result<Vec<Neighbor<'a>>> {
        let top_k = top_k.max(1);
        let fetched = self.retrieve(target, top_k.saturating_add(RECOMMEND_OVERFETCH))?;
        let own_key = target.normalized_display_key();

        let mut results = unique_by_display_key(
            fetched
                .into_iter()
                .filter(|n| own_key.is_none() || n.case.normalized_display_key() != own_key),
        );
        results.truncate(top_k);

        tracing::debug!(target_id = %target.id, returned = results.len(), "recommendations");
        Ok(results)
    }
}

/// Keep the first (closest) neighbor per display key
///
/// Display keys compare trimmed and case-insensitively. Neighbors without a
/// display key are never treated as duplicates of each other.
pub fn unique_by_display_key<'a>(neighbors: impl IntoIterator<Item = Neighbor<'a>>) -> Vec<Neighbor<'a>> {
    let mut seen = AHashSet::new();
    neighbors
        .into_iter()
        .filter(|n| match n.case.normalized_display_key() {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}
