//! Streaming container writer
//!
//! The writer emits the header and key map on construction, then accepts
//! exactly `key_count²` matrices in payload order. Each matrix is encoded and
//! written immediately; nothing beyond the current matrix is buffered.

use crate::container::error::{ContainerError, Result};
use crate::container::header::ContainerHeader;
use crate::container::keymap::KeyMap;
use crate::matrix::Matrix;
use std::io::Write;

/// Low-level writer for one container
pub struct ContainerWriter<'a, W: Write> {
    writer: W,
    keys: &'a KeyMap,
    matrix_size: usize,
    written: usize,
}

impl<'a, W: Write> ContainerWriter<'a, W> {
    /// Write the header and key map to `writer`
    pub fn new(mut writer: W, keys: &'a KeyMap, matrix_size: usize) -> Result<Self> {
        if matrix_size == 0 {
            return Err(ContainerError::ZeroMatrixSize);
        }
        let size_field = u32::try_from(matrix_size).map_err(|_| ContainerError::HeaderOverflow {
            field: "matrix_size",
            value: matrix_size,
        })?;

        let keymap_bytes = keys.to_json_bytes()?;
        let keymap_len =
            u32::try_from(keymap_bytes.len()).map_err(|_| ContainerError::HeaderOverflow {
                field: "keymap_len",
                value: keymap_bytes.len(),
            })?;

        let header = ContainerHeader::new(keymap_len, size_field);
        header.total_size(keys.len())?;
        if Matrix::encoded_len(matrix_size).is_none() {
            return Err(ContainerError::SizeOverflow {
                matrix_size: size_field,
                key_count: keys.len(),
            });
        }
        writer.write_all(&header.to_bytes()?)?;
        writer.write_all(&keymap_bytes)?;

        Ok(Self {
            writer,
            keys,
            matrix_size,
            written: 0,
        })
    }

    /// Side length every matrix must have
    pub fn matrix_size(&self) -> usize {
        self.matrix_size
    }

    /// Matrices written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// `(row, col)` index pair the next matrix is stored under
    pub fn next_pair(&self) -> Option<(usize, usize)> {
        let n = self.keys.len();
        (self.written < self.keys.pair_count()).then(|| (self.written / n, self.written % n))
    }

    /// Append one matrix
    pub fn write_matrix(&mut self, matrix: &Matrix) -> Result<()> {
        if matrix.size() != self.matrix_size {
            return Err(ContainerError::ShapeMismatch {
                expected: self.matrix_size,
                actual: matrix.size(),
            });
        }
        if self.written >= self.keys.pair_count() {
            return Err(ContainerError::MatrixCountMismatch {
                expected: self.keys.pair_count(),
                actual: self.written + 1,
            });
        }

        matrix.write_le(&mut self.writer)?;
        self.written += 1;
        Ok(())
    }

    /// Append an all-zero matrix
    pub fn write_zeros(&mut self) -> Result<()> {
        self.write_matrix(&Matrix::zeros(self.matrix_size))
    }

    /// Check that every pair was written, flush, and return the inner writer
    pub fn finish(mut self) -> Result<W> {
        if self.written != self.keys.pair_count() {
            return Err(ContainerError::MatrixCountMismatch {
                expected: self.keys.pair_count(),
                actual: self.written,
            });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::container::header::HEADER_SIZE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writes_header_and_keymap_up_front() {
        let keys = KeyMap::new(["A", "B"]).unwrap();
        let writer = ContainerWriter::new(Vec::new(), &keys, 2).unwrap();
        assert_eq!(writer.next_pair(), Some((0, 0)));

        let buf = writer.writer;
        let keymap = br#"{"A":0,"B":1}"#;
        assert_eq!(buf.len(), HEADER_SIZE + keymap.len());
        assert_eq!(&buf[0..4], &(keymap.len() as u32).to_le_bytes());
        assert_eq!(&buf[4..8], &2u32.to_le_bytes());
        assert_eq!(&buf[8..12], &1u32.to_le_bytes());
        assert_eq!(&buf[12..], keymap);
    }

    #[test]
    fn test_pair_order_and_finish() {
        let keys = KeyMap::new(["A", "B"]).unwrap();
        let mut writer = ContainerWriter::new(Vec::new(), &keys, 1).unwrap();

        let mut seen = Vec::new();
        while let Some(pair) = writer.next_pair() {
            seen.push(pair);
            writer.write_zeros().unwrap();
        }
        assert_eq!(seen, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        let buf = writer.finish().unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + 13 + 4 * 4);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let keys = KeyMap::new(["A"]).unwrap();
        let mut writer = ContainerWriter::new(Vec::new(), &keys, 2).unwrap();
        let err = writer.write_matrix(&Matrix::zeros(3)).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::ShapeMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(writer.written(), 0);
    }

    #[test]
    fn test_rejects_extra_matrix() {
        let keys = KeyMap::new(["A"]).unwrap();
        let mut writer = ContainerWriter::new(Vec::new(), &keys, 1).unwrap();
        writer.write_zeros().unwrap();
        assert!(matches!(
            writer.write_zeros(),
            Err(ContainerError::MatrixCountMismatch { .. })
        ));
    }

    #[test]
    fn test_finish_requires_all_pairs() {
        let keys = KeyMap::new(["A", "B"]).unwrap();
        let mut writer = ContainerWriter::new(Vec::new(), &keys, 1).unwrap();
        writer.write_zeros().unwrap();
        assert!(matches!(
            writer.finish(),
            Err(ContainerError::MatrixCountMismatch {
                expected: 4,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_rejects_oversized_matrix() {
        let keys = KeyMap::new(["A"]).unwrap();
        let mut buf = Vec::new();
        assert!(matches!(
            ContainerWriter::new(&mut buf, &keys, u32::MAX as usize),
            Err(ContainerError::SizeOverflow { .. })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_rejects_zero_size() {
        let keys = KeyMap::new(["A"]).unwrap();
        assert!(matches!(
            ContainerWriter::new(Vec::new(), &keys, 0),
            Err(ContainerError::ZeroMatrixSize)
        ));
    }
}
