//! Packed matrix container format
//!
//! A container stores one square `f32` matrix for every ordered pair of keys
//! in a closed key set.
//!
//! # Format Overview
//!
//! ```text
//! +----------------------+  offset 0
//! | header (12 bytes)    |  keymap_len, matrix_size, element_type (u32 LE)
//! +----------------------+  offset 12
//! | key map (JSON)       |  keymap_len bytes, {"KEY":index,...}
//! +----------------------+  offset 12 + keymap_len
//! | matrix (0, 0)        |  matrix_size² little-endian f32, row-major
//! | matrix (0, 1)        |
//! | ...                  |  row key outer, column key inner
//! | matrix (n-1, n-1)    |
//! +----------------------+
//! ```
//!
//! # Usage
//!
//! ```rust
//! use hicpack_formats::container::{Container, KeyMap};
//! use hicpack_formats::matrix::Matrix;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = KeyMap::new(["A", "B"])?;
//! let matrices = vec![Matrix::zeros(2); keys.pair_count()];
//! let container = Container::new(keys, 2, matrices)?;
//!
//! let data = container.build()?;
//! let parsed = Container::parse(&data)?;
//! assert_eq!(parsed, container);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod header;
pub mod keymap;
pub mod reader;
pub mod writer;

pub use error::{ContainerError, Result};
pub use header::{ContainerHeader, ElementType, HEADER_SIZE};
pub use keymap::KeyMap;
pub use reader::ContainerReader;
pub use writer::ContainerWriter;

use crate::matrix::Matrix;
use std::io::Cursor;

/// Fully decoded container held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Key to index mapping
    pub keys: KeyMap,
    /// Side length of every matrix
    pub matrix_size: usize,
    /// Matrices in payload order (row key outer, column key inner)
    pub matrices: Vec<Matrix>,
}

impl Container {
    /// Create a container, checking matrix count and shapes
    pub fn new(keys: KeyMap, matrix_size: usize, matrices: Vec<Matrix>) -> Result<Self> {
        let container = Self {
            keys,
            matrix_size,
            matrices,
        };
        container.validate()?;
        Ok(container)
    }

    /// Parse a complete container from bytes
    ///
    /// Unlike [`ContainerReader`], bytes after the last matrix are an error.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let reader = ContainerReader::open(Cursor::new(data))?;
        let expected = reader.expected_len();
        let actual = data.len() as u64;
        if actual > expected {
            return Err(ContainerError::TrailingData { expected, actual });
        }
        reader.read_all()
    }

    /// Encode the container to bytes
    pub fn build(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut writer = ContainerWriter::new(Vec::new(), &self.keys, self.matrix_size)?;
        for matrix in &self.matrices {
            writer.write_matrix(matrix)?;
        }
        writer.finish()
    }

    /// Matrix for index pair `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<&Matrix> {
        let n = self.keys.len();
        if row >= n || col >= n {
            return None;
        }
        self.matrices.get(row * n + col)
    }

    /// Matrix for the pair of keys `(row_key, col_key)`
    pub fn matrix(&self, row_key: &str, col_key: &str) -> Option<&Matrix> {
        let row = self.keys.index_of(row_key)?;
        let col = self.keys.index_of(col_key)?;
        self.get(row, col)
    }

    /// Check matrix count and shapes
    pub fn validate(&self) -> Result<()> {
        if self.matrix_size == 0 {
            return Err(ContainerError::ZeroMatrixSize);
        }
        if self.matrices.len() != self.keys.pair_count() {
            return Err(ContainerError::MatrixCountMismatch {
                expected: self.keys.pair_count(),
                actual: self.matrices.len(),
            });
        }
        if let Some(bad) = self.matrices.iter().find(|m| m.size() != self.matrix_size) {
            return Err(ContainerError::ShapeMismatch {
                expected: self.matrix_size,
                actual: bad.size(),
            });
        }
        Ok(())
    }
}
