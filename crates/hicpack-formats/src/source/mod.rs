//! Matrix sources: where the per-pair matrices come from
//!
//! A [`MatrixSource`] resolves `(distance, row_key, col_key)` to a matrix or
//! a [`LoadError`]. Encoding treats every `LoadError` as "write zeros here";
//! size discovery treats it as "try the next pair".

pub mod directory;
pub mod error;
pub mod memory;
pub mod template;

pub use directory::{DEFAULT_SOURCE_TEMPLATE, DirectorySource};
pub use error::{LoadError, TemplateError};
pub use memory::MemorySource;
pub use template::{PathTemplate, Placeholder};

use crate::matrix::Matrix;

/// Resolver for per-pair source matrices
pub trait MatrixSource {
    /// Load the matrix for `(row_key, col_key)` in `distance`
    fn load(&self, distance: &str, row_key: &str, col_key: &str) -> Result<Matrix, LoadError>;
}

impl<S: MatrixSource + ?Sized> MatrixSource for &S {
    fn load(&self, distance: &str, row_key: &str, col_key: &str) -> Result<Matrix, LoadError> {
        (**self).load(distance, row_key, col_key)
    }
}

impl<S: MatrixSource + ?Sized> MatrixSource for Box<S> {
    fn load(&self, distance: &str, row_key: &str, col_key: &str) -> Result<Matrix, LoadError> {
        (**self).load(distance, row_key, col_key)
    }
}
