//! Square `f32` matrices, the unit of payload in a container
//!
//! Every matrix stored in a container is square, row-major, and encoded as
//! little-endian IEEE 754 single precision floats with no per-matrix header.
//! Source resources are whitespace-delimited text (see [`text`]).

pub mod error;
pub mod text;

pub use error::{MatrixError, Result};
pub use text::{parse_text, write_text};

use std::io::{Read, Write};

/// Size in bytes of one encoded element
pub const ELEMENT_SIZE: usize = 4;

/// Square matrix of `f32` values stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    values: Vec<f32>,
}

impl Matrix {
    /// Create a `size` x `size` matrix filled with zeros
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Create a matrix from a flat row-major buffer
    pub fn from_values(size: usize, values: Vec<f32>) -> Result<Self> {
        let expected = size * size;
        if values.len() != expected {
            return Err(MatrixError::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { size, values })
    }

    /// Create a matrix from a list of rows
    ///
    /// All rows must have the same length and the row count must equal the
    /// column count.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(MatrixError::Empty);
        };
        let cols = first.as_ref().len();

        let mut values = Vec::with_capacity(rows.len() * cols);
        for (idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixError::RaggedRow {
                    line: idx + 1,
                    expected: cols,
                    actual: row.len(),
                });
            }
            values.extend_from_slice(row);
        }

        if rows.len() != cols {
            return Err(MatrixError::NotSquare {
                rows: rows.len(),
                cols,
            });
        }

        Ok(Self {
            size: cols,
            values,
        })
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }

    /// Flat row-major values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at `(row, col)`, or `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.values.get(row * self.size + col).copied()
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on 0, and a 0x0 matrix has no rows anyway
        self.values.chunks_exact(self.size.max(1))
    }

    /// True when every element is exactly zero
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Number of bytes a `size` x `size` matrix occupies when encoded, or
    /// `None` if that does not fit in `usize`
    pub fn encoded_len(size: usize) -> Option<usize> {
        size.checked_mul(size)?.checked_mul(ELEMENT_SIZE)
    }

    /// Encode to little-endian `f32` bytes
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.values.len() * ELEMENT_SIZE);
        for value in &self.values {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf
    }

    /// Write the encoded matrix to `writer`
    pub fn write_le<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }

    /// Decode a `size` x `size` matrix from little-endian `f32` bytes
    pub fn from_le_bytes(size: usize, data: &[u8]) -> Result<Self> {
        let expected = Self::encoded_len(size);
        if expected != Some(data.len()) {
            return Err(MatrixError::LengthMismatch {
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }

        let values = data
            .chunks_exact(ELEMENT_SIZE)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self { size, values })
    }

    /// Read one encoded `size` x `size` matrix from `reader`
    pub fn read_le<R: Read>(reader: &mut R, size: usize) -> std::io::Result<Self> {
        let len = Self::encoded_len(size).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("matrix size {size} is too large"),
            )
        })?;
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;
        Self::from_le_bytes(size, &buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
