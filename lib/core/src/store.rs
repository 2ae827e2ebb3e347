//! Immutable case store
//!
//! A [`CaseBase`] is built once from an already-normalized case collection.
//! Construction validates the shared attribute schema, checks feature-vector
//! lengths and caches the (min, max) range of every numeric attribute.
//! Nothing mutates it afterwards, so it can be shared behind an `Arc` by any
//! number of concurrent readers.

use crate::{AttributeKind, Case, CaseId, Error, Result};
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

/// Range used for numeric attributes without any observed value
pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

const UNTITLED: &str = "(untitled)";

/// The case collection plus schema-derived statistics
#[derive(Debug, Clone)]
pub struct CaseBase {
    cases: Vec<Case>,
    schema: BTreeMap<String, AttributeKind>,
    ranges: AHashMap<String, (f64, f64)>,
    feature_dim: Option<usize>,
}

impl CaseBase {
    /// Build the case base
    ///
    /// Fails with [`Error::EmptyBase`] on an empty collection, with
    /// [`Error::SchemaMismatch`] when cases disagree on attribute names or
    /// kinds, with [`Error::DimensionMismatch`] when feature vectors differ
    /// in length, and with [`Error::DuplicateCaseId`] when two cases share an
    /// identity. No partial case base is ever returned.
    pub fn build(cases: Vec<Case>) -> Result<Self> {
        let first = cases.first().ok_or(Error::EmptyBase)?;

        let schema: BTreeMap<String, AttributeKind> = first
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.kind()))
            .collect();
        let mut feature_dim = None;
        let mut ids: AHashSet<&CaseId> = AHashSet::with_capacity(cases.len());

        for case in &cases {
            Self::check_schema(&schema, case)?;

            if !ids.insert(&case.id) {
                return Err(Error::DuplicateCaseId(case.id.to_string()));
            }

            if let Some(features) = &case.features {
                match feature_dim {
                    None => feature_dim = Some(features.dim()),
                    Some(expected) if expected != features.dim() => {
                        return Err(Error::DimensionMismatch {
                            expected,
                            actual: features.dim(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let ranges = Self::compute_ranges(&schema, &cases);

        tracing::debug!(
            cases = cases.len(),
            attributes = schema.len(),
            numeric = ranges.len(),
            feature_dim = ?feature_dim,
            "case base built"
        );

        Ok(Self {
            cases,
            schema,
            ranges,
            feature_dim,
        })
    }

    fn check_schema(schema: &BTreeMap<String, AttributeKind>, case: &Case) -> Result<()> {
        if case.attributes.len() != schema.len() {
            let attribute = case
                .attributes
                .keys()
                .find(|name| !schema.contains_key(*name))
                .or_else(|| schema.keys().find(|name| !case.attributes.contains_key(*name)))
                .cloned()
                .unwrap_or_default();
            return Err(Error::SchemaMismatch {
                attribute,
                reason: format!(
                    "case {} has {} attributes, expected {}",
                    case.id,
                    case.attributes.len(),
                    schema.len()
                ),
            });
        }

        for (name, value) in &case.attributes {
            match schema.get(name) {
                None => {
                    return Err(Error::SchemaMismatch {
                        attribute: name.clone(),
                        reason: format!("unknown attribute on case {}", case.id),
                    });
                }
                Some(kind) if *kind != value.kind() => {
                    return Err(Error::SchemaMismatch {
                        attribute: name.clone(),
                        reason: format!("case {} has kind {}, expected {}", case.id, value.kind(), kind),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn compute_ranges(
        schema: &BTreeMap<String, AttributeKind>,
        cases: &[Case],
    ) -> AHashMap<String, (f64, f64)> {
        schema
            .iter()
            .filter(|(_, kind)| **kind == AttributeKind::Numeric)
            .map(|(name, _)| {
                let range = cases
                    .iter()
                    .filter_map(|case| case.attribute(name).and_then(|v| v.as_number()))
                    .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                        None => Some((v, v)),
                        Some((min, max)) => Some((min.min(v), max.max(v))),
                    })
                    .unwrap_or(DEFAULT_RANGE);
                (name.clone(), range)
            })
            .collect()
    }

    /// Cached (min, max) of a numeric attribute, or `(0.0, 1.0)` if none was computed
    #[inline]
    pub fn attribute_range(&self, name: &str) -> (f64, f64) {
        self.ranges.get(name).copied().unwrap_or(DEFAULT_RANGE)
    }

    /// Attribute names and kinds, in name order
    pub fn schema(&self) -> &BTreeMap<String, AttributeKind> {
        &self.schema
    }

    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.schema.get(name).copied()
    }

    /// Length shared by every feature vector, if any case has one
    pub fn feature_dim(&self) -> Option<usize> {
        self.feature_dim
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Always false for a built case base
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Case> {
        self.cases.iter()
    }

    pub fn get(&self, index: usize) -> Result<&Case> {
        self.cases
            .get(index)
            .ok_or_else(|| Error::CaseNotFound(format!("index {} out of range (0..{})", index, self.cases.len())))
    }

    pub fn get_by_id(&self, id: &CaseId) -> Option<&Case> {
        self.cases.iter().find(|case| &case.id == id)
    }

    /// First case whose display key contains `term` (case-insensitive)
    pub fn find_by_display_key(&self, term: &str) -> Result<&Case> {
        let needle = term.trim().to_lowercase();
        self.cases
            .iter()
            .find(|case| {
                case.display_key
                    .as_deref()
                    .is_some_and(|key| key.to_lowercase().contains(&needle))
            })
            .ok_or_else(|| Error::CaseNotFound(format!("no case matching '{}'", term)))
    }

    /// Display key of a case, or a placeholder when it has none
    pub fn display_key_of<'a>(&self, case: &'a Case) -> &'a str {
        case.display_key.as_deref().unwrap_or(UNTITLED)
    }
}

impl<'a> IntoIterator for &'a CaseBase {
    type Item = &'a Case;
    type IntoIter = std::slice::Iter<'a, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
