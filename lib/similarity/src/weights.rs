//! Attribute weights
//!
//! A [`WeightMap`] assigns a non-negative weight to attribute names. Any
//! attribute without an explicit weight falls back to a default chosen by its
//! kind: numeric and multi-valued attributes count with weight 1.0,
//! categorical attributes are off (0.0) until opted in.
//!
//! Weights at or below zero remove the attribute from aggregation entirely.

use ahash::AHashMap;
use casebase_core::AttributeKind;
use serde::{Deserialize, Serialize};

/// Default weight of an attribute of the given kind
pub fn default_weight(kind: AttributeKind) -> f64 {
    match kind {
        AttributeKind::Numeric | AttributeKind::MultiValued => 1.0,
        AttributeKind::Categorical => 0.0,
    }
}

/// Per-attribute weight overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeightMap {
    weights: AHashMap<String, f64>,
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weight(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.set(name, weight);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, weight: f64) {
        self.weights.insert(name.into(), weight);
    }

    /// Explicit weight, if one was given
    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    /// Effective weight of an attribute: explicit, else the kind default
    ///
    /// A non-finite explicit weight disables the attribute.
    #[inline]
    pub fn weight_for(&self, name: &str, kind: AttributeKind) -> f64 {
        match self.get(name) {
            Some(weight) if weight.is_finite() => weight,
            Some(_) => 0.0,
            None => default_weight(kind),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Apply overrides on top of this map
    #[must_use]
    pub fn merged(&self, overrides: &WeightMap) -> WeightMap {
        let mut merged = self.clone();
        for (name, weight) in &overrides.weights {
            merged.set(name.clone(), *weight);
        }
        merged
    }

    /// Parse `"IMDB_Rating=2;Genre=1.5;Runtime=0.5"`
    ///
    /// Malformed entries are skipped with a warning.
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for entry in entries(text) {
            match parse_entry(entry) {
                Ok((name, weight)) => map.set(name, weight),
                Err(err) => tracing::warn!(entry, error = %err, "ignoring weight entry"),
            }
        }
        map
    }

    /// Strict variant of [`WeightMap::parse`] that rejects malformed entries
    pub fn try_parse(text: &str) -> Result<Self, WeightError> {
        let mut map = Self::new();
        for entry in entries(text) {
            let (name, weight) = parse_entry(entry)?;
            map.set(name, weight);
        }
        Ok(map)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for WeightMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(name, w)| (name.into(), w)).collect(),
        }
    }
}

fn entries(text: &str) -> impl Iterator<Item = &str> {
    text.split(';').map(str::trim).filter(|e| !e.is_empty())
}

fn parse_entry(entry: &str) -> Result<(String, f64), WeightError> {
    let (name, value) = entry
        .split_once('=')
        .ok_or_else(|| WeightError::MissingSeparator(entry.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(WeightError::EmptyName(entry.to_string()));
    }
    let weight = value
        .trim()
        .parse::<f64>()
        .map_err(|_| WeightError::InvalidWeight(name.to_string(), value.trim().to_string()))?;
    if !weight.is_finite() {
        return Err(WeightError::InvalidWeight(name.to_string(), value.trim().to_string()));
    }
    Ok((name.to_string(), weight))
}

/// Errors raised by strict weight parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("Weight entry '{0}' is missing '='")]
    MissingSeparator(String),

    #[error("Weight entry '{0}' has no attribute name")]
    EmptyName(String),

    #[error("Attribute '{0}' has invalid weight '{1}'")]
    InvalidWeight(String, String),
}
