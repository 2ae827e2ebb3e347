//! Raw record preprocessing
//!
//! Turns already-parsed movie rows into cases for the dense-vector variant:
//! the feature vector is `[imdb_rating, meta_score / 10]` and the label is the
//! first listed genre. Rows missing either rating are dropped.

use crate::{AttributeValue, Case, CaseId, Vector};
use serde::{Deserialize, Serialize};

/// Label used when a record has no genre
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One raw row as handed over by the loader
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    #[serde(default)]
    pub id: Option<CaseId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub meta_score: Option<f64>,
}

impl CaseRecord {
    /// Build a case, or `None` when a required rating is missing.
    ///
    /// A record without an id gets [`row_id`]`(position)`.
    pub fn into_case(self, position: usize) -> Option<Case> {
        let features = build_parameters(self.imdb_rating, self.meta_score)?;
        let label = first_genre(self.genre.as_deref());

        let mut case = Case::new(self.id.unwrap_or_else(|| row_id(position)))
            .with_features(features)
            .with_label(label)
            .with_attribute("imdb_rating", AttributeValue::Numeric(self.imdb_rating))
            .with_attribute("meta_score", AttributeValue::Numeric(self.meta_score))
            .with_attribute("year", AttributeValue::Numeric(self.year.map(|y| y as f64)))
            .with_attribute(
                "genre",
                AttributeValue::MultiValued(self.genre.as_deref().map(split_multi_valued).unwrap_or_default()),
            );
        case.display_key = self.title;
        Some(case)
    }
}

/// Identity of an id-less row
///
/// Kept in a `row-<n>` string namespace so it cannot equal an explicit
/// integer id carried by another row.
pub fn row_id(position: usize) -> CaseId {
    CaseId::String(format!("row-{}", position))
}

/// Convert rows to cases, dropping rows without both ratings
pub fn cases_from_records(records: Vec<CaseRecord>) -> Vec<Case> {
    let total = records.len();
    let cases: Vec<Case> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| record.into_case(position))
        .collect();

    if cases.len() < total {
        tracing::debug!(dropped = total - cases.len(), kept = cases.len(), "records without ratings dropped");
    }
    cases
}

/// Feature vector `[imdb_rating, meta_score / 10]`
///
/// Metascore (0..100) is rescaled to the rating's 0..10 scale.
pub fn build_parameters(imdb_rating: Option<f64>, meta_score: Option<f64>) -> Option<Vector> {
    match (imdb_rating, meta_score) {
        (Some(rating), Some(meta)) if !rating.is_nan() && !meta.is_nan() => {
            Some(Vector::new(vec![rating, meta / 10.0]))
        }
        _ => None,
    }
}

/// First comma-separated genre, or [`UNKNOWN_LABEL`]
pub fn first_genre(genres: Option<&str>) -> String {
    genres
        .and_then(|g| g.split(',').next())
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(UNKNOWN_LABEL)
        .to_string()
}

/// Split a multi-valued field on `,` or `|`, dropping blank tokens
pub fn split_multi_valued(text: &str) -> Vec<String> {
    text.split([',', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce loosely formatted numbers such as `"$28.3M"`, `"1,234,567"` or `"142 min"`
pub fn parse_number(text: &str) -> Option<f64> {
    let raw = text.trim();
    if raw.is_empty() {
        return None;
    }

    let mut normalized: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ' ' | ','))
        .collect();

    let multiplier = match normalized.chars().last() {
        Some('k' | 'K') => 1e3,
        Some('m' | 'M') => 1e6,
        Some('b' | 'B') => 1e9,
        _ => 1.0,
    };
    if multiplier != 1.0 {
        normalized.pop();
    }

    normalized
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
        .or_else(|| first_embedded_number(raw))
}

/// First `[-+]?digits(.digits)?` run inside a string
fn first_embedded_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let start = (0..bytes.len()).find(|&i| {
        bytes[i].is_ascii_digit()
            || (matches!(bytes[i], b'-' | b'+') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    })?;

    let mut end = start + 1;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    text[start..end].parse().ok()
}
