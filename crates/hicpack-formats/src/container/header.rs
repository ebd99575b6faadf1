//! Fixed 12-byte container header
//!
//! Three little-endian `u32` fields, in order:
//!
//! | Offset | Field        | Meaning                                   |
//! |--------|--------------|-------------------------------------------|
//! | 0      | keymap_len   | Byte length of the serialized key map     |
//! | 4      | matrix_size  | Side length of every matrix payload       |
//! | 8      | element_type | Payload element encoding (`1` = `f32`)    |

use crate::container::error::{ContainerError, Result};
use crate::matrix::ELEMENT_SIZE;
use binrw::{BinRead, BinWrite};
use std::io::{Cursor, Read, Seek};

/// Header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Payload element encoding identified by the header type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 4-byte IEEE 754 float, little-endian
    Float32,
}

impl ElementType {
    /// Numeric code written to the header
    pub const fn code(self) -> u32 {
        match self {
            Self::Float32 => 1,
        }
    }

    /// Encoded size of one element in bytes
    pub const fn element_size(self) -> usize {
        match self {
            Self::Float32 => 4,
        }
    }
}

impl TryFrom<u32> for ElementType {
    type Error = ContainerError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            1 => Ok(Self::Float32),
            other => Err(ContainerError::UnsupportedElementType(other)),
        }
    }
}

/// Container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ContainerHeader {
    /// Byte length of the serialized key map that follows the header
    pub keymap_len: u32,
    /// Side length of every matrix in the payload
    pub matrix_size: u32,
    /// Element type code
    pub element_type: u32,
}

impl ContainerHeader {
    /// Create a header for an `f32` payload
    pub fn new(keymap_len: u32, matrix_size: u32) -> Self {
        Self {
            keymap_len,
            matrix_size,
            element_type: ElementType::Float32.code(),
        }
    }

    /// Decode the element type code
    pub fn element_type(&self) -> Result<ElementType> {
        ElementType::try_from(self.element_type)
    }

    /// Validate header fields
    pub fn validate(&self) -> Result<()> {
        self.element_type()?;
        if self.matrix_size == 0 {
            return Err(ContainerError::ZeroMatrixSize);
        }
        Ok(())
    }

    /// Byte offset of the first matrix
    pub fn data_offset(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.keymap_len)
    }

    /// Encoded size of a single matrix in bytes
    pub fn matrix_bytes(&self) -> Result<u64> {
        let side = u64::from(self.matrix_size);
        side.checked_mul(side)
            .and_then(|elements| elements.checked_mul(ELEMENT_SIZE as u64))
            .ok_or(ContainerError::SizeOverflow {
                matrix_size: self.matrix_size,
                key_count: 1,
            })
    }

    /// Total container size for `key_count` keys
    pub fn total_size(&self, key_count: usize) -> Result<u64> {
        let overflow = ContainerError::SizeOverflow {
            matrix_size: self.matrix_size,
            key_count,
        };
        let keys = key_count as u64;
        keys.checked_mul(keys)
            .and_then(|pairs| pairs.checked_mul(self.matrix_bytes().ok()?))
            .and_then(|payload| payload.checked_add(self.data_offset()))
            .ok_or(overflow)
    }

    /// Read a header from `reader`
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let header = Self::read_options(reader, binrw::Endian::Little, ())?;
        Ok(header)
    }

    /// Serialize the header to its 12-byte form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(HEADER_SIZE);
        let mut cursor = Cursor::new(&mut buffer);
        self.write_options(&mut cursor, binrw::Endian::Little, ())?;
        Ok(buffer)
    }
}
