//! Explainability for retrieval and prediction results
//!
//! Provides output structures that explain how neighbor scores and
//! predictions were obtained, showing per-attribute contributions and the
//! vote distribution for transparency.

use crate::predict::Prediction;
use crate::retrieve::Neighbor;
use casebase_core::CaseId;
use serde::Serialize;
use std::collections::BTreeMap;

/// A neighbor with its per-attribute score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedNeighbor {
    pub id: CaseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_key: Option<String>,
    /// Similarity (weighted mode) or distance (vector mode)
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Per-attribute contributions, already weighted; empty in vector mode
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub explain: BTreeMap<String, f64>,
}

impl ExplainedNeighbor {
    pub fn from_neighbor(neighbor: &Neighbor<'_>, explain: BTreeMap<String, f64>) -> Self {
        Self {
            id: neighbor.case.id.clone(),
            display_key: neighbor.case.display_key.clone(),
            score: neighbor.score,
            label: neighbor.case.label.clone(),
            explain,
        }
    }

    /// Explained results without a breakdown
    pub fn from_neighbors(neighbors: &[Neighbor<'_>]) -> Vec<Self> {
        neighbors
            .iter()
            .map(|n| Self::from_neighbor(n, BTreeMap::new()))
            .collect()
    }
}

/// Summary statistics for a retrieval
#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    pub avg_score: f64,
    /// Score of the first (closest) result
    pub best_score: f64,
    /// Attribute that contributed most to the best result
    pub top_contributing_attribute: Option<String>,
}

impl NeighborhoodStats {
    /// Compute stats from closest-first results
    pub fn compute(results: &[ExplainedNeighbor], candidates_count: usize) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_attribute: None,
            };
        };

        let avg_score = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
        let top_contributing_attribute = best
            .explain
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, _)| name.clone());

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_attribute,
        }
    }
}

/// Share of one value in a categorical vote
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueShare {
    pub value: String,
    pub weight: f64,
    /// Percentage of the total vote weight
    pub percent: f64,
}

/// Serializable form of a [`Prediction`]
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionReport {
    Numeric { value: f64 },
    /// Distribution sorted by weight, heaviest first
    Categorical { label: String, distribution: Vec<ValueShare> },
    None,
}

impl From<&Prediction> for PredictionReport {
    fn from(prediction: &Prediction) -> Self {
        match prediction {
            Prediction::Numeric(value) => PredictionReport::Numeric { value: *value },
            Prediction::Categorical { label, distribution } => {
                let total: f64 = distribution.iter().map(|(_, w)| w).sum();
                let total = if total > 0.0 { total } else { 1.0 };
                let mut shares: Vec<ValueShare> = distribution
                    .iter()
                    .map(|(value, weight)| ValueShare {
                        value: value.clone(),
                        weight: *weight,
                        percent: 100.0 * weight / total,
                    })
                    .collect();
                shares.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                PredictionReport::Categorical {
                    label: label.clone(),
                    distribution: shares,
                }
            }
            Prediction::None => PredictionReport::None,
        }
    }
}

/// Response structure for a retrieval, optionally with a prediction
#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub result: Vec<ExplainedNeighbor>,
    pub stats: NeighborhoodStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionReport>,
}

impl NeighborhoodResponse {
    pub fn new(query: Option<String>, result: Vec<ExplainedNeighbor>, candidates_count: usize) -> Self {
        let stats = NeighborhoodStats::compute(&result, candidates_count);
        Self {
            query,
            result,
            stats,
            prediction: None,
        }
    }

    #[must_use]
    pub fn with_prediction(mut self, prediction: &Prediction) -> Self {
        self.prediction = Some(PredictionReport::from(prediction));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebase_core::Case;

    fn explained(id: u64, score: f64) -> ExplainedNeighbor {
        let mut explain = BTreeMap::new();
        explain.insert("Genre".to_string(), 0.4);
        explain.insert("IMDB_Rating".to_string(), 0.25);
        explain.insert("Runtime".to_string(), 0.15);

        ExplainedNeighbor {
            id: CaseId::Integer(id),
            display_key: Some(format!("Movie {}", id)),
            score,
            label: None,
            explain,
        }
    }

    #[test]
    fn test_from_neighbor() {
        let case = Case::new("m1").with_display_key("Heat").with_label("Crime");
        let explained = ExplainedNeighbor::from_neighbor(&Neighbor::new(0.85, &case), BTreeMap::new());

        assert_eq!(explained.id, CaseId::String("m1".to_string()));
        assert_eq!(explained.score, 0.85);
        assert_eq!(explained.label.as_deref(), Some("Crime"));
        assert!(explained.explain.is_empty());
    }

    #[test]
    fn test_neighborhood_stats() {
        let results = vec![explained(1, 0.95), explained(2, 0.85), explained(3, 0.75)];
        let stats = NeighborhoodStats::compute(&results, 10);

        assert_eq!(stats.candidates_count, 10);
        assert_eq!(stats.results_count, 3);
        assert_eq!(stats.best_score, 0.95);
        assert!((stats.avg_score - 0.85).abs() < 1e-9);
        assert_eq!(stats.top_contributing_attribute, Some("Genre".to_string()));
    }

    #[test]
    fn test_empty_stats() {
        let stats = NeighborhoodStats::compute(&[], 5);
        assert_eq!(stats.candidates_count, 5);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
        assert!(stats.top_contributing_attribute.is_none());
    }

    #[test]
    fn test_prediction_report_shares() {
        let prediction = Prediction::Categorical {
            label: "R".to_string(),
            distribution: vec![("PG".to_string(), 1.0), ("R".to_string(), 3.0)],
        };
        match PredictionReport::from(&prediction) {
            PredictionReport::Categorical { label, distribution } => {
                assert_eq!(label, "R");
                assert_eq!(distribution[0].value, "R");
                assert!((distribution[0].percent - 75.0).abs() < 1e-9);
                assert!((distribution[1].percent - 25.0).abs() < 1e-9);
            }
            other => panic!("expected categorical report, got {:?}", other),
        }
    }

    #[test]
    fn test_response_serialization() {
        let response = NeighborhoodResponse::new(
            Some("Heat".to_string()),
            vec![explained(1, 0.95), explained(2, 0.85)],
            4,
        )
        .with_prediction(&Prediction::Numeric(8.1));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["query"], "Heat");
        assert_eq!(json["result"][0]["id"], 1);
        assert_eq!(json["stats"]["results_count"], 2);
        assert_eq!(json["prediction"]["kind"], "numeric");
        assert_eq!(json["prediction"]["value"], 8.1);
        assert!(json["result"][0].get("label").is_none());
    }

    #[test]
    fn test_no_prediction_serializes_kind() {
        let json = serde_json::to_string(&PredictionReport::from(&Prediction::None)).unwrap();
        assert_eq!(json, r#"{"kind":"none"}"#);
    }
}
