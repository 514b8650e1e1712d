//! Error types for kolosal-tabular

use thiserror::Error;

/// Result type alias for tabular operations
pub type Result<T> = std::result::Result<T, TabularError>;

/// Main error type for tabular preprocessing
#[derive(Error, Debug)]
pub enum TabularError {
    #[error("Invalid column type for '{column}': {dtype}")]
    InvalidColumnType { column: String, dtype: String },

    #[error("Range overflow in column '{column}': [{min}, {max}] does not fit {widest}")]
    RangeOverflow {
        column: String,
        min: String,
        max: String,
        widest: String,
    },

    #[error("Non-finite value in column '{column}'")]
    NonFiniteValue { column: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Length mismatch in column '{column}': expected {expected}, got {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Join key of primary row {row} matches several secondary rows")]
    DuplicateJoinKey { row: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for TabularError {
    fn from(err: polars::error::PolarsError) -> Self {
        TabularError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for TabularError {
    fn from(err: serde_json::Error) -> Self {
        TabularError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TabularError::ColumnNotFound("price".to_string());
        assert_eq!(err.to_string(), "Column not found: price");
    }

    #[test]
    fn test_range_overflow_display() {
        let err = TabularError::RangeOverflow {
            column: "id".to_string(),
            min: "0".to_string(),
            max: i64::MAX.to_string(),
            widest: "Int64".to_string(),
        };
        assert!(err.to_string().contains("does not fit Int64"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: TabularError = json_err.into();
        assert!(matches!(err, TabularError::SerializationError(_)));
    }
}
