//! Clustering error types.

use thiserror::Error;

use crate::model::Label;

/// Errors raised by the clustering core.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown feature column: {name}")]
    UnknownFeature { name: String },

    #[error("Non-finite value in column {column} at row {key}")]
    NonFiniteValue { key: String, column: String },

    #[error("Duplicate row key: {key}")]
    DuplicateKey { key: String },

    #[error("Row {key} has {got} values, expected {expected}")]
    DimensionMismatch {
        key: String,
        expected: usize,
        got: usize,
    },

    #[error("Illegal label transition at row {row}: Cluster({from}) -> {to:?}")]
    IllegalTransition { row: usize, from: u32, to: Label },
}

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
