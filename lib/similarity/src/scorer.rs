//! Scoring strategies
//!
//! A [`Scorer`] turns a (query, candidate) pair into an ordering key. The
//! weighted multi-attribute mode produces a similarity (higher is closer),
//! the dense-vector mode a Euclidean distance (lower is closer). Retrieval
//! only sees the trait, so ranking logic exists once.

use crate::distance::attribute_similarity;
use crate::weights::WeightMap;
use ahash::AHashMap;
use casebase_core::{AttributeKind, Case, CaseBase, Error, Result};
use std::cmp::Ordering;

/// Which way a score points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    /// Similarity: larger scores rank first
    HigherIsCloser,
    /// Distance: smaller scores rank first
    LowerIsCloser,
}

impl ScoreDirection {
    /// Ordering that puts the closer score first
    #[inline]
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            ScoreDirection::HigherIsCloser => b.total_cmp(&a),
            ScoreDirection::LowerIsCloser => a.total_cmp(&b),
        }
    }
}

/// Capability shared by both engine variants: score(query, candidate) -> ordering key
pub trait Scorer: Sync {
    fn direction(&self) -> ScoreDirection;

    fn score(&self, base: &CaseBase, query: &Case, candidate: &Case) -> Result<f64>;
}

/// Weighted average of per-attribute similarities
///
/// Iterates the case base schema, skipping attributes whose effective weight
/// is `<= 0` and the optional target attribute, so the value being predicted
/// never leaks into the neighbor ranking.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSimilarity<'w> {
    weights: &'w WeightMap,
    target: Option<&'w str>,
}

impl<'w> WeightedSimilarity<'w> {
    pub fn new(weights: &'w WeightMap) -> Self {
        Self { weights, target: None }
    }

    /// Exclude an attribute from aggregation
    #[must_use]
    pub fn excluding(mut self, target: Option<&'w str>) -> Self {
        self.target = target;
        self
    }

    fn active_attributes<'b>(
        &'b self,
        base: &'b CaseBase,
    ) -> impl Iterator<Item = (&'b String, AttributeKind, f64)> + 'b {
        base.schema().iter().filter_map(move |(name, kind)| {
            if self.target == Some(name.as_str()) {
                return None;
            }
            let weight = self.weights.weight_for(name, *kind);
            (weight > 0.0).then_some((name, *kind, weight))
        })
    }

    /// Aggregate similarity in [0, 1]; 0.0 when no attribute is active
    pub fn aggregate(&self, base: &CaseBase, query: &Case, candidate: &Case) -> f64 {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for (name, kind, weight) in self.active_attributes(base) {
            let similarity = attribute_similarity(
                kind,
                query.attribute(name),
                candidate.attribute(name),
                base.attribute_range(name),
            );
            weighted_sum += weight * similarity;
            weight_sum += weight;
        }

        if weight_sum > 0.0 { weighted_sum / weight_sum } else { 0.0 }
    }

    /// Aggregate similarity plus per-attribute contributions
    ///
    /// Each contribution is `weight * similarity / weight_sum`, so the
    /// contributions add up to the aggregate.
    pub fn compute_structured_score(
        &self,
        base: &CaseBase,
        query: &Case,
        candidate: &Case,
    ) -> (f64, AHashMap<String, f64>) {
        let mut contributions = AHashMap::new();
        let mut weight_sum = 0.0;

        for (name, kind, weight) in self.active_attributes(base) {
            let similarity = attribute_similarity(
                kind,
                query.attribute(name),
                candidate.attribute(name),
                base.attribute_range(name),
            );
            contributions.insert(name.clone(), weight * similarity);
            weight_sum += weight;
        }

        if weight_sum <= 0.0 {
            return (0.0, contributions);
        }

        let mut total = 0.0;
        for contribution in contributions.values_mut() {
            *contribution /= weight_sum;
            total += *contribution;
        }
        (total, contributions)
    }
}

impl Scorer for WeightedSimilarity<'_> {
    fn direction(&self) -> ScoreDirection {
        ScoreDirection::HigherIsCloser
    }

    fn score(&self, base: &CaseBase, query: &Case, candidate: &Case) -> Result<f64> {
        Ok(self.aggregate(base, query, candidate))
    }
}

/// Euclidean distance over the dense feature vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl Scorer for EuclideanDistance {
    fn direction(&self) -> ScoreDirection {
        ScoreDirection::LowerIsCloser
    }

    fn score(&self, _base: &CaseBase, query: &Case, candidate: &Case) -> Result<f64> {
        let a = query
            .features
            .as_ref()
            .ok_or_else(|| Error::MissingFeatures(query.id.to_string()))?;
        let b = candidate
            .features
            .as_ref()
            .ok_or_else(|| Error::MissingFeatures(candidate.id.to_string()))?;
        a.euclidean_distance(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebase_core::AttributeValue;

    fn movie(id: u64, rating: f64, genres: &[&str], cert: &str) -> Case {
        Case::new(id)
            .with_attribute("IMDB_Rating", rating)
            .with_attribute("Genre", AttributeValue::multi(genres.iter().copied()))
            .with_attribute("Certificate", cert)
    }

    fn test_base() -> CaseBase {
        CaseBase::build(vec![
            movie(1, 8.0, &["Drama"], "R"),
            movie(2, 9.0, &["Drama", "Crime"], "PG"),
            movie(3, 7.0, &["Comedy"], "R"),
        ])
        .unwrap()
    }

    #[test]
    fn test_identical_cases_score_one() {
        let base = test_base();
        let weights = WeightMap::new().with_weight("Certificate", 1.0);
        let scorer = WeightedSimilarity::new(&weights);
        let case = base.get(1).unwrap();
        assert!((scorer.aggregate(&base, case, case) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_average() {
        let base = test_base();
        let weights = WeightMap::new();
        let scorer = WeightedSimilarity::new(&weights);

        // rating range 7..9: |8-9|/2 = 0.5 -> 0.5; genres {drama} vs {drama, crime} -> 0.5
        // certificate is off by default
        let s = scorer.aggregate(&base, base.get(0).unwrap(), base.get(1).unwrap());
        assert!((s - 0.5).abs() < 1e-12);

        let weights = WeightMap::new().with_weight("IMDB_Rating", 3.0);
        let s = WeightedSimilarity::new(&weights).aggregate(&base, base.get(0).unwrap(), base.get(1).unwrap());
        assert!((s - (3.0 * 0.5 + 0.5) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_excluded_from_sum() {
        let base = test_base();
        let weights = WeightMap::new().with_weight("Genre", 0.0);
        let s = WeightedSimilarity::new(&weights).aggregate(&base, base.get(0).unwrap(), base.get(1).unwrap());
        assert!((s - 0.5).abs() < 1e-12);

        let weights = WeightMap::new().with_weight("Genre", -2.0);
        let s = WeightedSimilarity::new(&weights).aggregate(&base, base.get(0).unwrap(), base.get(2).unwrap());
        assert!((s - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_target_is_excluded() {
        let base = test_base();
        let weights = WeightMap::new();
        let scorer = WeightedSimilarity::new(&weights).excluding(Some("Genre"));
        let s = scorer.aggregate(&base, base.get(0).unwrap(), base.get(1).unwrap());
        assert!((s - 0.5).abs() < 1e-12);

        let (_, contributions) = scorer.compute_structured_score(&base, base.get(0).unwrap(), base.get(1).unwrap());
        assert!(!contributions.contains_key("Genre"));
    }

    #[test]
    fn test_no_active_attribute_scores_zero() {
        let base = test_base();
        let weights = WeightMap::new()
            .with_weight("IMDB_Rating", 0.0)
            .with_weight("Genre", 0.0);
        let case = base.get(0).unwrap();
        assert_eq!(WeightedSimilarity::new(&weights).aggregate(&base, case, case), 0.0);
    }

    #[test]
    fn test_infinite_weight_keeps_scores_finite() {
        let base = test_base();
        let weights = WeightMap::new().with_weight("IMDB_Rating", f64::INFINITY);
        let scorer = WeightedSimilarity::new(&weights);

        for candidate in base.iter() {
            let s = scorer.aggregate(&base, base.get(0).unwrap(), candidate);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_contributions_sum_to_aggregate() {
        let base = test_base();
        let weights = WeightMap::new().with_weight("Certificate", 0.5);
        let scorer = WeightedSimilarity::new(&weights);
        let (query, candidate) = (base.get(0).unwrap(), base.get(2).unwrap());

        let (total, contributions) = scorer.compute_structured_score(&base, query, candidate);
        let sum: f64 = contributions.values().sum();
        assert_eq!(contributions.len(), 3);
        assert!((total - sum).abs() < 1e-12);
        assert!((total - scorer.aggregate(&base, query, candidate)).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_scorer() {
        let base = CaseBase::build(vec![
            Case::new(1u64).with_features(vec![0.0, 0.0]),
            Case::new(2u64).with_features(vec![3.0, 4.0]),
        ])
        .unwrap();
        let d = EuclideanDistance
            .score(&base, base.get(0).unwrap(), base.get(1).unwrap())
            .unwrap();
        assert!((d - 5.0).abs() < 1e-12);

        let bare = Case::transient();
        assert!(matches!(
            EuclideanDistance.score(&base, &bare, base.get(0).unwrap()),
            Err(Error::MissingFeatures(_))
        ));
    }

    #[test]
    fn test_direction_ordering() {
        assert_eq!(ScoreDirection::HigherIsCloser.compare(0.9, 0.1), Ordering::Less);
        assert_eq!(ScoreDirection::LowerIsCloser.compare(0.9, 0.1), Ordering::Greater);
    }
}
