//! Target prediction from retrieved neighbors
//!
//! The kind of the target attribute is inferred once per call from the first
//! neighbor that has a value for it, then a numeric target gets a
//! similarity-weighted mean and a categorical one a similarity-weighted vote.

use crate::retrieve::Neighbor;
use casebase_core::AttributeValue;

/// Floor applied to neighbor similarities before weighting
///
/// A zero-similarity neighbor still contributes negligibly; when every
/// similarity is zero all neighbors weigh the same.
pub const SIMILARITY_FLOOR: f64 = 1e-9;

/// How the target attribute is treated for one prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Numeric,
    Categorical,
    /// No neighbor has a value for the target
    Unknown,
}

impl TargetKind {
    /// Inspect neighbors in order; the first non-missing value decides
    pub fn infer(neighbors: &[Neighbor<'_>], target: &str) -> Self {
        neighbors
            .iter()
            .filter_map(|n| n.case.attribute(target))
            .find(|value| !value.is_missing())
            .map(|value| {
                if numeric_value(value).is_some() {
                    TargetKind::Numeric
                } else {
                    TargetKind::Categorical
                }
            })
            .unwrap_or(TargetKind::Unknown)
    }
}

/// Outcome of a target prediction
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// Similarity-weighted mean
    Numeric(f64),
    /// Weighted vote winner and the accumulated weight of every value, in first-seen order
    Categorical {
        label: String,
        distribution: Vec<(String, f64)>,
    },
    /// Neighbors carry no usable value for the target
    None,
}

impl Prediction {
    pub fn is_none(&self) -> bool {
        matches!(self, Prediction::None)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Prediction::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Prediction::Categorical { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }
}

/// Predict `target` from a ranked neighbor list
pub fn predict_target(neighbors: &[Neighbor<'_>], target: &str) -> Prediction {
    match TargetKind::infer(neighbors, target) {
        TargetKind::Numeric => weighted_mean(neighbors, target),
        TargetKind::Categorical => weighted_vote(neighbors, target),
        TargetKind::Unknown => Prediction::None,
    }
}

fn weighted_mean(neighbors: &[Neighbor<'_>], target: &str) -> Prediction {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighbors {
        let Some(value) = neighbor.case.attribute(target).and_then(numeric_value) else {
            continue;
        };
        let weight = neighbor.score.max(SIMILARITY_FLOOR);
        numerator += weight * value;
        denominator += weight;
    }

    if denominator > 0.0 {
        Prediction::Numeric(numerator / denominator)
    } else {
        Prediction::None
    }
}

fn weighted_vote(neighbors: &[Neighbor<'_>], target: &str) -> Prediction {
    let mut distribution: Vec<(String, f64)> = Vec::new();

    for neighbor in neighbors {
        let Some(label) = neighbor.case.attribute(target).and_then(label_value) else {
            continue;
        };
        let weight = neighbor.score.max(SIMILARITY_FLOOR);
        match distribution.iter_mut().find(|(value, _)| *value == label) {
            Some((_, total)) => *total += weight,
            None => distribution.push((label, weight)),
        }
    }

    // first-seen value wins an exact tie
    let mut winner: Option<&(String, f64)> = None;
    for entry in &distribution {
        if winner.map_or(true, |best| entry.1 > best.1) {
            winner = Some(entry);
        }
    }

    match winner {
        Some((label, _)) => Prediction::Categorical {
            label: label.clone(),
            distribution: distribution.clone(),
        },
        None => Prediction::None,
    }
}

/// Numeric reading of a value: a number, or a string that parses as one
fn numeric_value(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Numeric(_) => value.as_number(),
        AttributeValue::Categorical(Some(s)) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
        _ => None,
    }
}

/// Label reading of a value; multi-valued values vote on their joined tokens
fn label_value(value: &AttributeValue) -> Option<String> {
    let label = match value {
        AttributeValue::Numeric(_) => value.as_number()?.to_string(),
        AttributeValue::Categorical(v) => v.as_deref()?.trim().to_string(),
        AttributeValue::MultiValued(tokens) => tokens
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    };
    (!label.is_empty()).then_some(label)
}
