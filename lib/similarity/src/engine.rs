//! Weighted multi-attribute case engine
//!
//! Retrieval and prediction over named, typed attributes. The engine owns
//! no cases: it is handed an already-built [`CaseBase`] and a [`WeightMap`].

use crate::explain::ExplainedNeighbor;
use crate::predict::{predict_target, Prediction};
use crate::retrieve::{Neighbor, Retriever};
use crate::scorer::WeightedSimilarity;
use crate::weights::WeightMap;
use casebase_core::{Case, CaseBase, Result};
use std::sync::Arc;

/// Case-based reasoning engine over weighted attribute similarity
#[derive(Debug, Clone)]
pub struct CaseEngine {
    base: Arc<CaseBase>,
    weights: WeightMap,
}

impl CaseEngine {
    /// Create an engine over a built case base
    pub fn new(base: Arc<CaseBase>, weights: WeightMap) -> Self {
        Self { base, weights }
    }

    pub fn base(&self) -> &CaseBase {
        &self.base
    }

    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    /// Engine sharing the same case base with some weights replaced
    ///
    /// Attributes not named in `overrides` keep their current weight.
    pub fn with_weights(&self, overrides: &WeightMap) -> CaseEngine {
        CaseEngine::new(Arc::clone(&self.base), self.weights.merged(overrides))
    }

    fn scorer<'w>(&'w self, exclude_target: Option<&'w str>) -> WeightedSimilarity<'w> {
        WeightedSimilarity::new(&self.weights).excluding(exclude_target)
    }

    /// Aggregate similarity between two cases
    pub fn similarity(&self, query: &Case, candidate: &Case, exclude_target: Option<&str>) -> f64 {
        self.scorer(exclude_target).aggregate(&self.base, query, candidate)
    }

    /// The `k` most similar cases to `query`, most similar first
    ///
    /// `query` itself is skipped when it comes from the base. When
    /// `exclude_target` names an attribute, that attribute does not take part
    /// in the similarity so a later prediction of it cannot leak.
    pub fn retrieve_neighbors(
        &self,
        query: &Case,
        k: usize,
        exclude_target: Option<&str>,
    ) -> Result<Vec<Neighbor<'_>>> {
        let neighbors = Retriever::new(&self.base, self.scorer(exclude_target)).retrieve(query, k)?;
        tracing::debug!(
            query_id = %query.id,
            k,
            returned = neighbors.len(),
            best = ?neighbors.first().map(|n| n.score),
            "neighbors retrieved"
        );
        Ok(neighbors)
    }

    /// Predict `target` from already retrieved neighbors
    pub fn predict(&self, neighbors: &[Neighbor<'_>], target: &str) -> Prediction {
        predict_target(neighbors, target)
    }

    /// Retrieve with the target excluded, then predict it
    pub fn retrieve_and_predict(
        &self,
        query: &Case,
        k: usize,
        target: &str,
    ) -> Result<(Vec<Neighbor<'_>>, Prediction)> {
        let neighbors = self.retrieve_neighbors(query, k, Some(target))?;
        let prediction = self.predict(&neighbors, target);
        Ok((neighbors, prediction))
    }

    /// Similar cases with distinct display keys
    pub fn recommend_similar(&self, target: &Case, top_k: usize) -> Result<Vec<Neighbor<'_>>> {
        Retriever::new(&self.base, self.scorer(None)).recommend(target, top_k)
    }

    /// Per-attribute breakdown of each neighbor's score
    pub fn explain(
        &self,
        query: &Case,
        neighbors: &[Neighbor<'_>],
        exclude_target: Option<&str>,
    ) -> Vec<ExplainedNeighbor> {
        let scorer = self.scorer(exclude_target);
        neighbors
            .iter()
            .map(|n| {
                let (_, contributions) = scorer.compute_structured_score(&self.base, query, n.case);
                ExplainedNeighbor::from_neighbor(n, contributions.into_iter().collect())
            })
            .collect()
    }
}
