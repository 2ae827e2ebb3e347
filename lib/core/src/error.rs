use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Case base is empty: no usable cases")]
    EmptyBase,

    #[error("Engine not fitted: build or fit a case base before retrieving")]
    NotFitted,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No neighbors retrieved")]
    NoNeighbors,

    #[error("Schema mismatch on attribute '{attribute}': {reason}")]
    SchemaMismatch { attribute: String, reason: String },

    #[error("Duplicate case id: {0}")]
    DuplicateCaseId(String),

    #[error("Case {0} has no feature vector")]
    MissingFeatures(String),

    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
