//! # casebase
//!
//! A case-based reasoning engine over tabular records.
//!
//! casebase retrieves the most similar past cases to a query case and uses
//! them to predict an attribute, classify a label, or recommend similar
//! items with distinct titles.
//!
//! ## Quick Start
//!
//! ### From the Command Line
//!
//! ```bash
//! casebase --cases movies.json retrieve --title "godfather" --k 5 --predict Certificate
//! casebase --cases movies.json recommend --index 0 --top-k 3 --weights "Genre=2;Runtime=0.5"
//! casebase --records rows.json classify --title "heat" --k 3
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use casebase::prelude::*;
//! use std::sync::Arc;
//!
//! let base = CaseBase::build(vec![
//!     Case::new(1u64)
//!         .with_display_key("Heat")
//!         .with_attribute("Runtime", 170.0)
//!         .with_attribute("Certificate", "R"),
//!     Case::new(2u64)
//!         .with_display_key("Collateral")
//!         .with_attribute("Runtime", 120.0)
//!         .with_attribute("Certificate", "R"),
//!     Case::new(3u64)
//!         .with_display_key("Up")
//!         .with_attribute("Runtime", 96.0)
//!         .with_attribute("Certificate", "PG"),
//! ])
//! .unwrap();
//!
//! let engine = CaseEngine::new(Arc::new(base), WeightMap::new());
//! let query = engine.base().get(0).unwrap();
//! let (neighbors, prediction) = engine.retrieve_and_predict(query, 1, "Certificate").unwrap();
//!
//! assert_eq!(neighbors[0].case.display_key.as_deref(), Some("Collateral"));
//! assert_eq!(prediction.as_label(), Some("R"));
//! ```
//!
//! ## Crate Structure
//!
//! casebase is composed of several crates:
//!
//! - [`casebase-core`](https://docs.rs/casebase-core) - Core data structures (Case, AttributeValue, Vector, CaseBase, record preprocessing)
//! - [`casebase-similarity`](https://docs.rs/casebase-similarity) - Similarity, retrieval, prediction, classification and explanations
//!
//! ## Features
//!
//! - **Weighted Similarity**: Numeric, categorical and multi-valued attributes with per-attribute weights
//! - **Leave-One-Out Retrieval**: Queries drawn from the base never retrieve themselves
//! - **Prediction**: Similarity-weighted mean or vote for any attribute
//! - **k-NN Classification**: Euclidean distance over feature vectors with majority vote
//! - **Recommendations**: Similar cases with distinct display keys
//! - **Explainability**: Per-attribute contribution breakdown

use std::fs;
use std::path::Path;

// Re-export core types
pub use casebase_core::{
    AttributeKind, AttributeValue,
    Case, CaseBase, CaseId, CaseRecord,
    Vector,
    Error, Result,
};

// Re-export similarity engines
pub use casebase_similarity::{
    CaseEngine, KnnClassifier,
    Neighbor, Prediction, Retriever,
    WeightMap,
};

pub mod prelude {
    pub use casebase_core::{AttributeKind, AttributeValue, Case, CaseBase, CaseId, Error, Result, Vector};
    pub use casebase_similarity::{
        CaseEngine, EuclideanDistance, ExplainedNeighbor, KnnClassifier, Neighbor, NeighborhoodResponse,
        Prediction, Retriever, Scorer, WeightMap, WeightedSimilarity,
    };
}

/// Load cases from a JSON array of [`Case`]
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<Case>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let cases: Vec<Case> = serde_json::from_str(&text)?;
    tracing::debug!(path = %path.display(), count = cases.len(), "cases loaded");
    Ok(cases)
}

/// Load raw rows from a JSON array of [`CaseRecord`] and convert them
///
/// Rows missing a required rating are dropped.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Case>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let records: Vec<CaseRecord> = serde_json::from_str(&text)?;
    let total = records.len();
    let cases = casebase_core::cases_from_records(records);
    tracing::debug!(path = %path.display(), rows = total, cases = cases.len(), "records loaded");
    Ok(cases)
}
