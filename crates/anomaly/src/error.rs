//! Anomaly flagging error types.

use thiserror::Error;

/// Errors raised by the statistical flagger and the comparison report.
#[derive(Debug, Error)]
pub enum AnomalyError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown feature column: {name}")]
    UnknownFeature { name: String },

    #[error("Flag result covers {got} rows, table has {expected}")]
    LengthMismatch { expected: usize, got: usize },
}

/// Result type for anomaly flagging operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let error = AnomalyError::InvalidParameter {
            name: "n_std".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid parameter: n_std - must be positive");
    }

    #[test]
    fn test_length_mismatch_display() {
        let error = AnomalyError::LengthMismatch {
            expected: 10,
            got: 3,
        };
        assert_eq!(error.to_string(), "Flag result covers 3 rows, table has 10");
    }
}
