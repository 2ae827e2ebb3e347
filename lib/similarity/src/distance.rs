//! Per-attribute similarity functions
//!
//! All functions return a similarity score in range [0.0, 1.0] where 1.0 means identical.
//! Missing values never fail: they contribute 0.0.

use ahash::AHashSet;
use casebase_core::{AttributeKind, AttributeValue};

/// Min-max normalized numeric similarity
///
/// `1 - clamp(|a - b| / (max - min), 0, 1)`. A column without variance
/// (`max <= min`) does not discriminate, so every pair scores 1.0.
pub fn numeric_similarity(a: Option<f64>, b: Option<f64>, range: (f64, f64)) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => (a, b),
        _ => return 0.0,
    };
    let (min, max) = range;
    if max <= min {
        return 1.0;
    }
    let distance = (a - b).abs() / (max - min);
    1.0 - distance.clamp(0.0, 1.0)
}

/// Case-insensitive, whitespace-trimmed equality
pub fn categorical_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.trim().to_lowercase() == b.trim().to_lowercase() => 1.0,
        _ => 0.0,
    }
}

/// Jaccard similarity between two multi-valued attributes
///
/// Two empty sets are identical; exactly one empty set scores 0.0.
pub fn set_similarity(a: &[String], b: &[String]) -> f64 {
    let set_a = token_set(a);
    let set_b = token_set(b);

    match (set_a.is_empty(), set_b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    if union == 0 { 0.0 } else { intersection as f64 / union as f64 }
}

/// Lower-cased tokens, split on `,` or `|`, blanks dropped
pub fn token_set(values: &[String]) -> AHashSet<String> {
    values
        .iter()
        .flat_map(|v| v.split([',', '|']))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Similarity of one attribute of the given kind
///
/// An attribute absent from a case counts as a missing value; for
/// multi-valued attributes that is the empty set. A value whose kind differs
/// from `kind` scores 0.0.
pub fn attribute_similarity(
    kind: AttributeKind,
    query: Option<&AttributeValue>,
    candidate: Option<&AttributeValue>,
    range: (f64, f64),
) -> f64 {
    match kind {
        AttributeKind::Numeric => numeric_similarity(
            query.and_then(AttributeValue::as_number),
            candidate.and_then(AttributeValue::as_number),
            range,
        ),
        AttributeKind::Categorical => categorical_similarity(
            query.and_then(AttributeValue::as_category),
            candidate.and_then(AttributeValue::as_category),
        ),
        AttributeKind::MultiValued => {
            match (tokens_of(query), tokens_of(candidate)) {
                (Some(a), Some(b)) => set_similarity(a, b),
                _ => 0.0,
            }
        }
    }
}

fn tokens_of(value: Option<&AttributeValue>) -> Option<&[String]> {
    match value {
        None => Some(&[]),
        Some(v) => v.as_tokens(),
    }
}
