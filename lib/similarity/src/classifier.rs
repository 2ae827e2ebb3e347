//! k-NN label classifier over dense feature vectors
//!
//! Ranks by Euclidean distance and predicts by majority vote. A frequency
//! tie goes to the tied label seen first in ascending-distance order, which
//! is the label of the nearest tied neighbor.

use crate::retrieve::{Neighbor, Retriever};
use crate::scorer::EuclideanDistance;
use ahash::AHashMap;
use casebase_core::{Case, CaseBase, Error, Result};
use std::sync::Arc;

/// Label voted for a neighbor whose case carries none
pub const UNLABELED: &str = casebase_core::record::UNKNOWN_LABEL;

/// k-nearest-neighbor classifier (`k = 1` is classic 1-NN)
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    base: Option<Arc<CaseBase>>,
}

impl KnnClassifier {
    /// Create an unfitted classifier
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when `k` is zero.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(Error::InvalidConfig("k must be >= 1".to_string()));
        }
        Ok(Self { k, base: None })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn is_fitted(&self) -> bool {
        self.base.is_some()
    }

    pub fn base(&self) -> Option<&Arc<CaseBase>> {
        self.base.as_ref()
    }

    /// Load the case base; cases without a feature vector are left out
    ///
    /// There is no parametric training: the cases are the model.
    pub fn fit(&mut self, cases: Vec<Case>) -> Result<()> {
        let usable: Vec<Case> = cases.into_iter().filter(|c| c.features.is_some()).collect();
        self.base = Some(Arc::new(CaseBase::build(usable)?));
        Ok(())
    }

    /// Use an already-built case base
    ///
    /// # Errors
    ///
    /// [`Error::MissingFeatures`] if any case lacks a feature vector.
    pub fn fit_base(&mut self, base: Arc<CaseBase>) -> Result<()> {
        if let Some(case) = base.iter().find(|c| c.features.is_none()) {
            return Err(Error::MissingFeatures(case.id.to_string()));
        }
        self.base = Some(base);
        Ok(())
    }

    fn fitted(&self) -> Result<&CaseBase> {
        self.base.as_deref().ok_or(Error::NotFitted)
    }

    /// The `top_n` nearest cases with their distances, nearest first
    pub fn nearest_neighbors(&self, query: &Case, top_n: usize) -> Result<Vec<Neighbor<'_>>> {
        Retriever::new(self.fitted()?, EuclideanDistance).retrieve(query, top_n)
    }

    /// Predict the label of `query` from its `k` nearest neighbors
    ///
    /// # Errors
    ///
    /// [`Error::NotFitted`] before [`KnnClassifier::fit`], [`Error::NoNeighbors`]
    /// when nothing can be retrieved, [`Error::DimensionMismatch`] when the
    /// query vector has the wrong length.
    pub fn predict_label(&self, query: &Case) -> Result<String> {
        let neighbors = self.nearest_neighbors(query, self.k)?;
        vote(&neighbors)
    }

    /// Predict every query in order
    pub fn predict_batch(&self, queries: &[Case]) -> Result<Vec<String>> {
        queries.iter().map(|q| self.predict_label(q)).collect()
    }

    /// Similar cases with distinct display keys, nearest first
    pub fn recommend_similar(&self, target: &Case, top_k: usize) -> Result<Vec<Neighbor<'_>>> {
        Retriever::new(self.fitted()?, EuclideanDistance).recommend(target, top_k)
    }
}

/// Majority vote over distance-sorted neighbors
///
/// Scanning in ascending-distance order and returning the first label with
/// the top frequency yields the strict winner when there is one, and the
/// nearest tied label otherwise.
pub fn vote(neighbors: &[Neighbor<'_>]) -> Result<String> {
    let label_of = |n: &Neighbor<'_>| n.case.label.clone().unwrap_or_else(|| UNLABELED.to_string());

    let mut counts: AHashMap<String, usize> = AHashMap::new();
    for neighbor in neighbors {
        *counts.entry(label_of(neighbor)).or_insert(0) += 1;
    }

    let top = counts.values().copied().max().ok_or(Error::NoNeighbors)?;
    neighbors
        .iter()
        .map(label_of)
        .find(|label| counts.get(label) == Some(&top))
        .ok_or(Error::NoNeighbors)
}
