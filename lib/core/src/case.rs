use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use crate::value::AttributeValue;
use crate::vector::Vector;

/// A single case (record) of the case base
///
/// Attributes are keyed by name and iterate in name order. The feature
/// vector and label are only used by the dense-vector variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub id: CaseId,
    /// Human-facing key (e.g. a title) used to dedupe recommendations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_key: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseId {
    Uuid(Uuid),
    String(String),
    Integer(u64),
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseId::Uuid(u) => write!(f, "{}", u),
            CaseId::String(s) => write!(f, "{}", s),
            CaseId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for CaseId {
    fn from(s: String) -> Self {
        CaseId::String(s)
    }
}

impl From<&str> for CaseId {
    fn from(s: &str) -> Self {
        CaseId::String(s.to_string())
    }
}

impl From<u64> for CaseId {
    fn from(i: u64) -> Self {
        CaseId::Integer(i)
    }
}

impl From<Uuid> for CaseId {
    fn from(u: Uuid) -> Self {
        CaseId::Uuid(u)
    }
}

impl Case {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<CaseId>) -> Self {
        Self {
            id: id.into(),
            display_key: None,
            attributes: BTreeMap::new(),
            features: None,
            label: None,
        }
    }

    /// Create a query case with a fresh identity
    ///
    /// A transient case never matches a stored case, so nothing is excluded
    /// from its neighbors.
    #[inline]
    #[must_use]
    pub fn transient() -> Self {
        Self::new(Uuid::new_v4())
    }

    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_display_key(mut self, key: impl Into<String>) -> Self {
        self.display_key = Some(key.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_features(mut self, features: impl Into<Vector>) -> Self {
        self.features = Some(features.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Display key trimmed and lower-cased, for dedupe comparisons
    pub fn normalized_display_key(&self) -> Option<String> {
        self.display_key
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
    }
}
