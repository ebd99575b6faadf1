//! Error types for the matrix container format

use crate::matrix::MatrixError;
use thiserror::Error;

/// Errors that can occur when encoding or decoding a container
#[derive(Debug, Error)]
pub enum ContainerError {
    /// No source resource produced a valid matrix during size discovery
    #[error("No valid matrix found for distance '{distance}' after {attempted} candidates")]
    NoValidMatrix {
        /// Distance category being processed
        distance: String,
        /// Number of (row, col) pairs tried
        attempted: usize,
    },

    /// Key list was empty
    #[error("Key set is empty")]
    EmptyKeySet,

    /// The same key appeared more than once in the key list
    #[error("Duplicate key '{0}' in key set")]
    DuplicateKey(String),

    /// Key count does not fit the format's 32-bit fields
    #[error("Too many keys: {0}")]
    TooManyKeys(usize),

    /// Key is not part of the key map
    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    /// Index outside `0..key_count`
    #[error("Index {index} out of range for {count} keys")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of keys
        count: usize,
    },

    /// Serialized key map is structurally invalid
    #[error("Invalid key map: {0}")]
    InvalidKeyMap(String),

    /// Key map JSON could not be encoded or decoded
    #[error("Key map JSON error: {0}")]
    KeyMapJson(#[from] serde_json::Error),

    /// Header carries a type code this implementation does not know
    #[error("Unsupported element type code: {0}")]
    UnsupportedElementType(u32),

    /// Matrix side length of zero
    #[error("Matrix size must be non-zero")]
    ZeroMatrixSize,

    /// Matrix side length or key map length does not fit a 32-bit header field
    #[error("{field} value {value} does not fit in 32 bits")]
    HeaderOverflow {
        /// Header field name
        field: &'static str,
        /// Value that overflowed
        value: usize,
    },

    /// Matrix size or key count makes the container size overflow `u64`
    #[error("Container size overflows for matrix size {matrix_size} with {key_count} keys")]
    SizeOverflow {
        /// Matrix side length from the header
        matrix_size: u32,
        /// Number of keys
        key_count: usize,
    },

    /// A matrix handed to the writer does not have the container's shape
    #[error("Matrix shape mismatch: expected {expected}x{expected}, got {actual}x{actual}")]
    ShapeMismatch {
        /// Container side length
        expected: usize,
        /// Side length of the offending matrix
        actual: usize,
    },

    /// Writer finished with the wrong number of matrices
    #[error("Matrix count mismatch: expected {expected}, wrote {actual}")]
    MatrixCountMismatch {
        /// key_count squared
        expected: usize,
        /// Matrices actually written
        actual: usize,
    },

    /// Data ends before the payload does
    #[error("Truncated data: expected {expected} bytes, got {actual} bytes")]
    TruncatedData {
        /// Expected total size
        expected: u64,
        /// Actual size
        actual: u64,
    },

    /// Data continues after the last matrix
    #[error("Trailing data: expected {expected} bytes, got {actual} bytes")]
    TrailingData {
        /// Expected total size
        expected: u64,
        /// Actual size
        actual: u64,
    },

    /// Matrix payload error
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// Binary read/write error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// IO error during encoding or decoding
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for ContainerError {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::BinRead(other.to_string()),
        }
    }
}

/// Result type alias for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;
