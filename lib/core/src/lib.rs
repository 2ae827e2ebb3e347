//! # casebase Core
//!
//! Core library for the casebase case-based-reasoning engine.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`Case`] - A record with typed, named attributes and an identity
//! - [`AttributeValue`] - Numeric, categorical or multi-valued attribute value
//! - [`Vector`] - Dense feature vector for the vector variant
//! - [`CaseBase`] - Immutable case store with cached numeric ranges
//! - [`CaseRecord`] - Raw row preprocessing for the vector variant
//!
//! ## Example
//!
//! ```rust
//! use casebase_core::{AttributeValue, Case, CaseBase};
//!
//! let cases = vec![
//!     Case::new(1u64)
//!         .with_display_key("Inception")
//!         .with_attribute("Runtime", 148.0)
//!         .with_attribute("Genre", AttributeValue::multi(["Action", "Sci-Fi"])),
//!     Case::new(2u64)
//!         .with_display_key("Up")
//!         .with_attribute("Runtime", 96.0)
//!         .with_attribute("Genre", AttributeValue::multi(["Animation"])),
//! ];
//!
//! let base = CaseBase::build(cases).unwrap();
//! assert_eq!(base.attribute_range("Runtime"), (96.0, 148.0));
//! ```

pub mod case;
pub mod error;
pub mod record;
pub mod store;
pub mod value;
pub mod vector;

pub use case::{Case, CaseId};
pub use error::{Error, Result};
pub use record::{build_parameters, cases_from_records, first_genre, parse_number, row_id, split_multi_valued, CaseRecord};
pub use store::{CaseBase, DEFAULT_RANGE};
pub use value::{AttributeKind, AttributeValue};
pub use vector::Vector;
