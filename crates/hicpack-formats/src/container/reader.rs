//! Random-access container reader
//!
//! The reader decodes the header and key map once, then seeks straight to
//! any pair's matrix: pair `(i, j)` starts at
//! `data_offset + (i * key_count + j) * matrix_bytes`.

use crate::container::Container;
use crate::container::error::{ContainerError, Result};
use crate::container::header::{ContainerHeader, ElementType};
use crate::container::keymap::KeyMap;
use crate::matrix::Matrix;
use std::io::{Read, Seek, SeekFrom};
use tracing::warn;

/// Reader over an encoded container
pub struct ContainerReader<R> {
    reader: R,
    header: ContainerHeader,
    keys: KeyMap,
    matrix_bytes: u64,
    expected_len: u64,
    stream_len: u64,
}

impl<R: Read + Seek> ContainerReader<R> {
    /// Decode the header and key map and check the payload length
    pub fn open(mut reader: R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if stream_len < crate::container::HEADER_SIZE as u64 {
            return Err(ContainerError::TruncatedData {
                expected: crate::container::HEADER_SIZE as u64,
                actual: stream_len,
            });
        }

        let header = ContainerHeader::read_from(&mut reader)?;
        header.validate()?;
        let matrix_bytes = header.matrix_bytes()?;

        if stream_len < header.data_offset() {
            return Err(ContainerError::TruncatedData {
                expected: header.data_offset(),
                actual: stream_len,
            });
        }

        let mut keymap_bytes = vec![0u8; header.keymap_len as usize];
        reader.read_exact(&mut keymap_bytes)?;
        let keys = KeyMap::from_json_bytes(&keymap_bytes)?;

        let expected = header.total_size(keys.len())?;
        if stream_len < expected {
            return Err(ContainerError::TruncatedData {
                expected,
                actual: stream_len,
            });
        }
        if stream_len > expected {
            warn!(
                "Container has {} trailing bytes after the last matrix",
                stream_len - expected
            );
        }

        Ok(Self {
            reader,
            header,
            keys,
            matrix_bytes,
            expected_len: expected,
            stream_len,
        })
    }

    /// Decoded header
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Decoded key map
    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    /// Matrix side length
    pub fn matrix_size(&self) -> usize {
        self.header.matrix_size as usize
    }

    /// Payload element type
    pub fn element_type(&self) -> Result<ElementType> {
        self.header.element_type()
    }

    /// Encoded size of one matrix in bytes
    pub fn matrix_bytes(&self) -> u64 {
        self.matrix_bytes
    }

    /// Length implied by the header and key map
    pub fn expected_len(&self) -> u64 {
        self.expected_len
    }

    /// Total length of the underlying stream
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Byte offset of pair `(row, col)`
    pub fn pair_offset(&self, row: usize, col: usize) -> Result<u64> {
        let count = self.keys.len();
        for index in [row, col] {
            if index >= count {
                return Err(ContainerError::IndexOutOfRange { index, count });
            }
        }
        let position = (row * count + col) as u64;
        Ok(self.header.data_offset() + position * self.matrix_bytes)
    }

    /// Read the matrix stored for index pair `(row, col)`
    pub fn read_matrix(&mut self, row: usize, col: usize) -> Result<Matrix> {
        let offset = self.pair_offset(row, col)?;
        let size = self.matrix_size();
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(Matrix::read_le(&mut self.reader, size)?)
    }

    /// Read the matrix stored for the pair of keys `(row_key, col_key)`
    pub fn read_matrix_by_keys(&mut self, row_key: &str, col_key: &str) -> Result<Matrix> {
        let row = self.keys.require_index(row_key)?;
        let col = self.keys.require_index(col_key)?;
        self.read_matrix(row, col)
    }

    /// Decode every matrix into memory
    pub fn read_all(mut self) -> Result<Container> {
        let size = self.matrix_size();
        self.reader.seek(SeekFrom::Start(self.header.data_offset()))?;

        let mut matrices = Vec::with_capacity(self.keys.pair_count());
        for _ in 0..self.keys.pair_count() {
            matrices.push(Matrix::read_le(&mut self.reader, size)?);
        }

        Ok(Container {
            keys: self.keys,
            matrix_size: size,
            matrices,
        })
    }

    /// Return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::container::writer::ContainerWriter;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample() -> Vec<u8> {
        let keys = KeyMap::new(["A", "B", "C"]).unwrap();
        let mut writer = ContainerWriter::new(Vec::new(), &keys, 2).unwrap();
        for k in 0..9 {
            let v = k as f32;
            writer
                .write_matrix(&Matrix::from_values(2, vec![v, v + 0.5, -v, 0.0]).unwrap())
                .unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_random_access() {
        let mut reader = ContainerReader::open(Cursor::new(sample())).unwrap();
        assert_eq!(reader.keys().len(), 3);
        assert_eq!(reader.matrix_size(), 2);
        assert_eq!(reader.element_type().unwrap(), ElementType::Float32);

        // (1, 2) is the sixth matrix in row-major order
        let m = reader.read_matrix(1, 2).unwrap();
        assert_eq!(m.values(), &[5.0, 5.5, -5.0, 0.0]);

        let m = reader.read_matrix_by_keys("C", "A").unwrap();
        assert_eq!(m.values(), &[6.0, 6.5, -6.0, 0.0]);

        // Going backwards works too
        let m = reader.read_matrix(0, 0).unwrap();
        assert_eq!(m.values(), &[0.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_and_unknown_key() {
        let mut reader = ContainerReader::open(Cursor::new(sample())).unwrap();
        assert!(matches!(
            reader.read_matrix(3, 0),
            Err(ContainerError::IndexOutOfRange { index: 3, count: 3 })
        ));
        assert!(matches!(
            reader.read_matrix_by_keys("A", "Z"),
            Err(ContainerError::UnknownKey(k)) if k == "Z"
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = sample();
        data.truncate(data.len() - 1);
        assert!(matches!(
            ContainerReader::open(Cursor::new(data)),
            Err(ContainerError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            ContainerReader::open(Cursor::new(vec![0u8; 5])),
            Err(ContainerError::TruncatedData {
                expected: 12,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_oversized_header_is_an_error() {
        let keymap = br#"{"A":0}"#;
        let mut data = Vec::new();
        data.extend_from_slice(&(keymap.len() as u32).to_le_bytes());
        data.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(keymap);

        assert!(matches!(
            ContainerReader::open(Cursor::new(data.clone())),
            Err(ContainerError::SizeOverflow {
                matrix_size: 0xFFFF_FFFF,
                ..
            })
        ));
        assert!(Container::parse(&data).is_err());

        // Side length that fits per matrix but not across every pair
        data[4..8].copy_from_slice(&(1u32 << 30).to_le_bytes());
        assert!(matches!(
            ContainerReader::open(Cursor::new(data)),
            Err(ContainerError::TruncatedData { .. } | ContainerError::SizeOverflow { .. })
        ));
    }

    #[test]
    fn test_expected_len_matches_stream() {
        let data = sample();
        let reader = ContainerReader::open(Cursor::new(data.clone())).unwrap();
        assert_eq!(reader.expected_len(), data.len() as u64);
        assert_eq!(reader.matrix_bytes(), 16);
        assert_eq!(reader.pair_offset(2, 2).unwrap(), data.len() as u64 - 16);
    }

    #[test]
    fn test_unknown_element_type() {
        let mut data = sample();
        data[8..12].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(
            ContainerReader::open(Cursor::new(data)),
            Err(ContainerError::UnsupportedElementType(9))
        ));
    }

    #[test]
    fn test_read_all() {
        let container = ContainerReader::open(Cursor::new(sample()))
            .unwrap()
            .read_all()
            .unwrap();
        assert_eq!(container.matrices.len(), 9);
        assert_eq!(container.matrix("B", "B").unwrap().get(0, 0), Some(4.0));
    }
}
