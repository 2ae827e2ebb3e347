//! # casebase Similarity
//!
//! Similarity scoring, k-nearest retrieval and prediction over a
//! [`casebase_core::CaseBase`].
//!
//! This crate provides two engines on one retrieval core:
//!
//! ## Features
//!
//! - **Weighted Similarity**: Range-normalized numeric, exact categorical and Jaccard set similarity, combined by per-attribute weights
//! - **Vector Variant**: Euclidean-distance k-NN over dense feature vectors with majority vote
//! - **Leave-One-Out Retrieval**: A query taken from the base never retrieves itself
//! - **Target Prediction**: Similarity-weighted mean or vote for a chosen attribute
//! - **Recommendations**: Neighbors with distinct display keys
//! - **Explainability**: Per-attribute contribution breakdown for transparency
//!
//! ## Example
//!
//! ```rust
//! use casebase_core::{AttributeValue, Case, CaseBase};
//! use casebase_similarity::{CaseEngine, WeightMap};
//! use std::sync::Arc;
//!
//! let base = CaseBase::build(vec![
//!     Case::new(1u64)
//!         .with_display_key("Heat")
//!         .with_attribute("IMDB_Rating", 8.3)
//!         .with_attribute("Genre", AttributeValue::multi(["Crime", "Drama"])),
//!     Case::new(2u64)
//!         .with_display_key("Ronin")
//!         .with_attribute("IMDB_Rating", 7.2)
//!         .with_attribute("Genre", AttributeValue::multi(["Action", "Crime"])),
//!     Case::new(3u64)
//!         .with_display_key("Up")
//!         .with_attribute("IMDB_Rating", 8.2)
//!         .with_attribute("Genre", AttributeValue::multi(["Animation"])),
//! ])
//! .unwrap();
//!
//! let engine = CaseEngine::new(Arc::new(base), WeightMap::parse("IMDB_Rating=0.5;Genre=2"));
//! let query = engine.base().get(0).unwrap();
//! let neighbors = engine.retrieve_neighbors(query, 2, None).unwrap();
//!
//! assert_eq!(neighbors.len(), 2);
//! assert_eq!(neighbors[0].case.display_key.as_deref(), Some("Ronin"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Weights   │────>│   Scorer    │<────│  CaseBase   │
//! │ (per attr)  │     │ (sim/dist)  │     │  (ranges)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Retriever  │
//!                     │  (top-k)    │
//!                     └─────────────┘
//!                       │         │
//!              ┌─────────────┐ ┌─────────────┐
//!              │   Predict   │ │  Classify   │
//!              │ (mean/vote) │ │ (majority)  │
//!              └─────────────┘ └─────────────┘
//!                       │
//!                ┌─────────────┐
//!                │  Explain    │
//!                │  (results)  │
//!                └─────────────┘
//! ```

pub mod classifier;
pub mod distance;
pub mod engine;
pub mod explain;
pub mod predict;
pub mod retrieve;
pub mod scorer;
pub mod weights;

// Re-export main types for convenience
pub use classifier::{vote, KnnClassifier, UNLABELED};
pub use distance::{attribute_similarity, categorical_similarity, numeric_similarity, set_similarity};
pub use engine::CaseEngine;
pub use explain::{ExplainedNeighbor, NeighborhoodResponse, NeighborhoodStats, PredictionReport, ValueShare};
pub use predict::{predict_target, Prediction, TargetKind, SIMILARITY_FLOOR};
pub use retrieve::{unique_by_display_key, Neighbor, Retriever, RECOMMEND_OVERFETCH};
pub use scorer::{EuclideanDistance, ScoreDirection, Scorer, WeightedSimilarity};
pub use weights::{default_weight, WeightError, WeightMap};
