//! Typed attribute values
//!
//! Every attribute of a case holds exactly one of three kinds of value.
//! Absence is part of the value itself (`Numeric(None)`, `Categorical(None)`,
//! an empty token set) so that missing data never becomes an error.

use serde::{Deserialize, Serialize};

/// Kind of an attribute, shared by every case in a case base
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Real-valued scalar compared with min-max normalization
    Numeric,
    /// Single label compared case-insensitively
    Categorical,
    /// Set of tokens compared with Jaccard similarity
    MultiValued,
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeKind::Numeric => write!(f, "numeric"),
            AttributeKind::Categorical => write!(f, "categorical"),
            AttributeKind::MultiValued => write!(f, "multi_valued"),
        }
    }
}

/// Value of one attribute of a case
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Numeric(Option<f64>),
    Categorical(Option<String>),
    MultiValued(Vec<String>),
}

impl AttributeValue {
    #[inline]
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Numeric(_) => AttributeKind::Numeric,
            AttributeValue::Categorical(_) => AttributeKind::Categorical,
            AttributeValue::MultiValued(_) => AttributeKind::MultiValued,
        }
    }

    /// Numeric value, treating NaN as missing
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Numeric(Some(v)) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            AttributeValue::Categorical(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            AttributeValue::MultiValued(tokens) => Some(tokens.as_slice()),
            _ => None,
        }
    }

    /// True when the value carries no usable data.
    ///
    /// Blank categorical strings and token lists with only blank tokens
    /// count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            AttributeValue::Numeric(v) => v.map_or(true, f64::is_nan),
            AttributeValue::Categorical(v) => v.as_deref().map_or(true, |s| s.trim().is_empty()),
            AttributeValue::MultiValued(tokens) => tokens.iter().all(|t| t.trim().is_empty()),
        }
    }

    pub fn numeric(value: f64) -> Self {
        AttributeValue::Numeric(Some(value))
    }

    pub fn categorical(value: impl Into<String>) -> Self {
        AttributeValue::Categorical(Some(value.into()))
    }

    pub fn multi<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::MultiValued(tokens.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Numeric(Some(v)) => write!(f, "{}", v),
            AttributeValue::Categorical(Some(s)) => write!(f, "{}", s),
            AttributeValue::MultiValued(tokens) if !tokens.is_empty() => write!(f, "{}", tokens.join(", ")),
            _ => write!(f, "n/a"),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Numeric(Some(v))
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Categorical(Some(s.to_string()))
    }
}
