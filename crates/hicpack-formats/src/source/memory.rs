//! In-memory matrix source

use crate::matrix::{Matrix, MatrixError, parse_text};
use crate::source::MatrixSource;
use crate::source::error::LoadError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Entry {
    Valid(Matrix),
    Invalid(MatrixError),
}

/// Matrix source backed by a map of `(distance, row, col)` entries
///
/// Pairs without an entry load as [`LoadError::Missing`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<(String, String, String), Entry>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a matrix for a pair
    pub fn insert(&mut self, distance: &str, row_key: &str, col_key: &str, matrix: Matrix) {
        self.entries
            .insert(key(distance, row_key, col_key), Entry::Valid(matrix));
    }

    /// Store matrix text for a pair; text that fails to parse loads as
    /// [`LoadError::Parse`]
    pub fn insert_text(&mut self, distance: &str, row_key: &str, col_key: &str, text: &str) {
        let entry = match parse_text(text) {
            Ok(matrix) => Entry::Valid(matrix),
            Err(err) => Entry::Invalid(err),
        };
        self.entries.insert(key(distance, row_key, col_key), entry);
    }

    /// Builder-style [`MemorySource::insert`]
    #[must_use]
    pub fn with(mut self, distance: &str, row_key: &str, col_key: &str, matrix: Matrix) -> Self {
        self.insert(distance, row_key, col_key, matrix);
        self
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key(distance: &str, row_key: &str, col_key: &str) -> (String, String, String) {
    (
        distance.to_string(),
        row_key.to_string(),
        col_key.to_string(),
    )
}

impl MatrixSource for MemorySource {
    fn load(&self, distance: &str, row_key: &str, col_key: &str) -> Result<Matrix, LoadError> {
        let location = format!("memory:{distance}/{row_key}/{col_key}");
        match self.entries.get(&key(distance, row_key, col_key)) {
            Some(Entry::Valid(matrix)) => Ok(matrix.clone()),
            Some(Entry::Invalid(err)) => Err(LoadError::Parse {
                location,
                source: err.clone(),
            }),
            None => Err(LoadError::Missing { location }),
        }
    }
}
