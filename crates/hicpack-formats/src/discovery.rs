//! Matrix size discovery
//!
//! Scans pairs in payload order (row key outer, column key inner) and takes
//! the side length of the first source matrix that loads. Later pairs are
//! not consulted, even if their size differs.

use crate::container::{ContainerError, KeyMap, Result};
use crate::source::MatrixSource;
use tracing::{debug, trace};

/// Outcome of a successful discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredSize {
    /// Side length to use for every matrix in the container
    pub matrix_size: usize,
    /// Row index of the pair that supplied the size
    pub row: usize,
    /// Column index of the pair that supplied the size
    pub col: usize,
    /// Number of pairs tried, including the successful one
    pub attempted: usize,
}

/// Find the matrix side length for `distance`
///
/// Fails with [`ContainerError::NoValidMatrix`] when no pair loads.
pub fn discover_matrix_size<S: MatrixSource + ?Sized>(
    keys: &KeyMap,
    distance: &str,
    source: &S,
) -> Result<DiscoveredSize> {
    let mut attempted = 0;

    for (row, col) in keys.pairs() {
        attempted += 1;
        let row_key = keys.key_at(row).unwrap_or_default();
        let col_key = keys.key_at(col).unwrap_or_default();

        match source.load(distance, row_key, col_key) {
            Ok(matrix) if matrix.size() > 0 => {
                debug!(
                    "Discovered matrix size {} for '{}' from {}/{} after {} candidates",
                    matrix.size(),
                    distance,
                    row_key,
                    col_key,
                    attempted
                );
                return Ok(DiscoveredSize {
                    matrix_size: matrix.size(),
                    row,
                    col,
                    attempted,
                });
            }
            Ok(_) => trace!("Skipping empty matrix for {}/{}", row_key, col_key),
            Err(e) => trace!("Skipping candidate: {}", e),
        }
    }

    Err(ContainerError::NoValidMatrix {
        distance: distance.to_string(),
        attempted,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use crate::source::{LoadError, MemorySource};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Records every load request
    struct Recording<'a> {
        inner: &'a MemorySource,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl MatrixSource for Recording<'_> {
        fn load(&self, distance: &str, row: &str, col: &str) -> std::result::Result<Matrix, LoadError> {
            self.calls
                .borrow_mut()
                .push((row.to_string(), col.to_string()));
            self.inner.load(distance, row, col)
        }
    }

    #[test]
    fn test_first_valid_pair_wins_and_stops() {
        let keys = KeyMap::new(["A", "B", "C"]).unwrap();
        let mut source = MemorySource::new();
        source.insert_text("d", "A", "B", "not a number\n");
        source.insert("d", "B", "A", Matrix::zeros(5));
        source.insert("d", "C", "C", Matrix::zeros(7));

        let recording = Recording {
            inner: &source,
            calls: RefCell::new(Vec::new()),
        };
        let found = discover_matrix_size(&keys, "d", &recording).unwrap();

        assert_eq!(
            found,
            DiscoveredSize {
                matrix_size: 5,
                row: 1,
                col: 0,
                attempted: 4
            }
        );
        let calls = recording.calls.borrow();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls.last().unwrap(), &("B".to_string(), "A".to_string()));
    }

    #[test]
    fn test_last_pair_only() {
        let keys = KeyMap::new(["A", "B"]).unwrap();
        let source = MemorySource::new().with("d", "B", "B", Matrix::zeros(3));
        let found = discover_matrix_size(&keys, "d", &source).unwrap();
        assert_eq!(found.matrix_size, 3);
        assert_eq!(found.attempted, 4);
    }

    #[test]
    fn test_no_valid_matrix() {
        let keys = KeyMap::new(["A", "B"]).unwrap();
        let mut source = MemorySource::new();
        source.insert_text("d", "A", "A", "1 2\n");
        source.insert("other", "A", "A", Matrix::zeros(2));

        let err = discover_matrix_size(&keys, "d", &source).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::NoValidMatrix { ref distance, attempted: 4 } if distance == "d"
        ));
    }

    #[test]
    fn test_zero_sized_matrix_is_skipped() {
        let keys = KeyMap::new(["A", "B"]).unwrap();
        let source = MemorySource::new()
            .with("d", "A", "A", Matrix::zeros(0))
            .with("d", "A", "B", Matrix::zeros(2));
        let found = discover_matrix_size(&keys, "d", &source).unwrap();
        assert_eq!((found.row, found.col), (0, 1));
    }
}
