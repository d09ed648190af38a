//! Data layer error types.

use thiserror::Error;

/// Errors raised while loading, deriving, or persisting data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table error: {0}")]
    Table(#[from] cluster_spi::ClusterError),

    #[error("Missing column: {name}")]
    MissingColumn { name: String },

    #[error("Invalid numeric value '{value}' in column {column} at row {key}")]
    InvalidValue {
        key: String,
        column: String,
        value: String,
    },

    #[error("Missing credential: set the {name} environment variable")]
    MissingCredential { name: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No data returned")]
    NoData,
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_display() {
        let error = DataError::MissingColumn {
            name: "close".to_string(),
        };
        assert_eq!(error.to_string(), "Missing column: close");
    }

    #[test]
    fn test_invalid_value_display() {
        let error = DataError::InvalidValue {
            key: "2024-01-01".to_string(),
            column: "btc_price".to_string(),
            value: "n/a".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid numeric value 'n/a' in column btc_price at row 2024-01-01"
        );
    }

    #[test]
    fn test_table_error_conversion() {
        let inner = cluster_spi::ClusterError::DuplicateKey {
            key: "k".to_string(),
        };
        let error: DataError = inner.into();
        assert!(matches!(error, DataError::Table(_)));
    }
}
