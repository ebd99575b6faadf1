//! Whole-container encoding from a matrix source
//!
//! [`ContainerEncoder`] drives a [`ContainerWriter`] over every pair of
//! keys, loading each source matrix and substituting an all-zero matrix of
//! the agreed size when the source is missing, unreadable, malformed, or the
//! wrong shape. Substitutions are not errors; they are reported in the
//! returned [`WriteSummary`]. Write failures on the output stream are fatal.

use crate::container::{ContainerWriter, KeyMap, Result};
use crate::discovery::{DiscoveredSize, discover_matrix_size};
use crate::source::{LoadError, MatrixSource};
use std::fmt;
use std::io::Write;
use tracing::{debug, info, warn};

/// Why a pair was written as zeros
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionReason {
    /// The source had no resource for the pair
    Missing,
    /// The resource could not be read
    Unreadable,
    /// The resource was not a valid square matrix
    Malformed,
    /// The resource parsed but its size differs from the container's
    ShapeMismatch {
        /// Container side length
        expected: usize,
        /// Side length of the source matrix
        actual: usize,
    },
}

impl From<&LoadError> for SubstitutionReason {
    fn from(err: &LoadError) -> Self {
        match err {
            LoadError::Missing { .. } => Self::Missing,
            LoadError::Io { .. } => Self::Unreadable,
            LoadError::Parse { .. } => Self::Malformed,
        }
    }
}

impl fmt::Display for SubstitutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Unreadable => f.write_str("unreadable"),
            Self::Malformed => f.write_str("malformed"),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape {actual}x{actual}, expected {expected}x{expected}")
            }
        }
    }
}

/// One pair that was written as zeros
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Row key
    pub row_key: String,
    /// Column key
    pub col_key: String,
    /// Why the source matrix was not used
    pub reason: SubstitutionReason,
}

/// Result of encoding one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Total matrices written, including substitutions
    pub matrices_written: usize,
    /// Pairs written as zeros
    pub substitutions: Vec<Substitution>,
}

impl WriteSummary {
    /// Matrices taken from the source as-is
    pub fn loaded(&self) -> usize {
        self.matrices_written - self.substitutions.len()
    }

    /// Count substitutions with the given reason kind
    pub fn count_where(&self, predicate: impl Fn(&SubstitutionReason) -> bool) -> usize {
        self.substitutions
            .iter()
            .filter(|s| predicate(&s.reason))
            .count()
    }
}

/// Encodes one distance category from a matrix source
pub struct ContainerEncoder<'a, S: ?Sized> {
    keys: &'a KeyMap,
    source: &'a S,
    distance: &'a str,
}

impl<'a, S: MatrixSource + ?Sized> ContainerEncoder<'a, S> {
    /// Create an encoder for `distance`
    pub fn new(keys: &'a KeyMap, source: &'a S, distance: &'a str) -> Self {
        Self {
            keys,
            source,
            distance,
        }
    }

    /// Run size discovery for this encoder's distance
    pub fn discover(&self) -> Result<DiscoveredSize> {
        discover_matrix_size(self.keys, self.distance, self.source)
    }

    /// Encode the container into `writer`
    pub fn encode<W: Write>(&self, writer: W, matrix_size: usize) -> Result<(W, WriteSummary)> {
        self.encode_with_progress(writer, matrix_size, |_, _| {})
    }

    /// Encode the container, calling `on_row(done, total)` after each row key
    pub fn encode_with_progress<W, F>(
        &self,
        writer: W,
        matrix_size: usize,
        mut on_row: F,
    ) -> Result<(W, WriteSummary)>
    where
        W: Write,
        F: FnMut(usize, usize),
    {
        let mut out = ContainerWriter::new(writer, self.keys, matrix_size)?;
        let mut summary = WriteSummary::default();
        let total_rows = self.keys.len();

        for (row, row_key) in self.keys.iter() {
            for (col, col_key) in self.keys.iter() {
                let reason = match self.source.load(self.distance, row_key, col_key) {
                    Ok(matrix) if matrix.size() == matrix_size => {
                        out.write_matrix(&matrix)?;
                        None
                    }
                    Ok(matrix) => Some(SubstitutionReason::ShapeMismatch {
                        expected: matrix_size,
                        actual: matrix.size(),
                    }),
                    Err(e) => {
                        debug!("{}", e);
                        Some(SubstitutionReason::from(&e))
                    }
                };

                if let Some(reason) = reason {
                    debug!(
                        "Writing zeros for {}/{} in '{}': {}",
                        row_key, col_key, self.distance, reason
                    );
                    out.write_zeros()?;
                    summary.substitutions.push(Substitution {
                        row,
                        col,
                        row_key: row_key.to_string(),
                        col_key: col_key.to_string(),
                        reason,
                    });
                }
                summary.matrices_written += 1;
            }
            on_row(row + 1, total_rows);
        }

        let writer = out.finish()?;

        if summary.substitutions.is_empty() {
            info!(
                "Encoded {} matrices of size {} for '{}'",
                summary.matrices_written, matrix_size, self.distance
            );
        } else {
            warn!(
                "Encoded {} matrices of size {} for '{}'; {} written as zeros",
                summary.matrices_written,
                matrix_size,
                self.distance,
                summary.substitutions.len()
            );
        }

        Ok((writer, summary))
    }
}
