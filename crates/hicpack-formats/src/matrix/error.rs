//! Error types for matrix construction and text parsing

use thiserror::Error;

/// Errors that can occur when building or parsing a square matrix
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// The input contained no data rows
    #[error("Matrix text contains no rows")]
    Empty,

    /// A token could not be parsed as a floating point number
    #[error("Invalid number '{token}' on line {line}")]
    InvalidNumber {
        /// 1-based line number in the source text
        line: usize,
        /// The offending token
        token: String,
    },

    /// A row has a different number of columns than the first row
    #[error("Row on line {line} has {actual} columns, expected {expected}")]
    RaggedRow {
        /// 1-based line number in the source text
        line: usize,
        /// Column count of the first row
        expected: usize,
        /// Column count of this row
        actual: usize,
    },

    /// The matrix has a different number of rows and columns
    #[error("Matrix is not square: {rows} rows x {cols} columns")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// A flat value buffer does not hold side * side elements
    #[error("Value count mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected element count
        expected: usize,
        /// Actual element count
        actual: usize,
    },
}

/// Result type alias for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatrixError::InvalidNumber {
            line: 3,
            token: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid number 'abc' on line 3");

        let err = MatrixError::NotSquare { rows: 2, cols: 3 };
        assert!(err.to_string().contains("2 rows x 3 columns"));

        let err = MatrixError::RaggedRow {
            line: 2,
            expected: 4,
            actual: 3,
        };
        assert!(err.to_string().contains("line 2"));
    }
}
