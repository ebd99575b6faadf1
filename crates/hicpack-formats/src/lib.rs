//! Packed matrix container format
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format fields
#![allow(clippy::cast_precision_loss)] // f64 text values narrow to f32 payloads
#![allow(clippy::doc_markdown)] // Field names in tables don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::float_cmp)] // Zero checks compare exact values
//! This crate converts per-pair square matrices into a single binary
//! container and reads them back. A container covers a closed, ordered key
//! set; for every ordered pair of keys it stores one `N x N` matrix of
//! little-endian `f32` values.
//!
//! # Modules
//!
//! - **matrix**: square `f32` matrices and the whitespace-delimited text format
//! - **container**: header, key map, streaming writer, random-access reader
//! - **source**: resolvers that load the matrix for a `(distance, row, col)` pair
//! - **discovery**: picks the container's matrix size from the first loadable pair
//! - **encode**: writes a whole container from a source with zero-fallback
//!
//! # Example
//!
//! ```rust
//! use hicpack_formats::container::{Container, KeyMap};
//! use hicpack_formats::encode::ContainerEncoder;
//! use hicpack_formats::matrix::Matrix;
//! use hicpack_formats::source::MemorySource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = KeyMap::new(["A", "B"])?;
//! let source = MemorySource::new()
//!     .with("intra.short", "A", "A", Matrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.0]])?);
//!
//! let encoder = ContainerEncoder::new(&keys, &source, "intra.short");
//! let size = encoder.discover()?;
//! let (data, summary) = encoder.encode(Vec::new(), size.matrix_size)?;
//! assert_eq!(summary.substitutions.len(), 3);
//!
//! let container = Container::parse(&data)?;
//! assert_eq!(container.matrix("A", "A").and_then(|m| m.get(1, 0)), Some(3.0));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod container;
pub mod discovery;
pub mod encode;
pub mod matrix;
pub mod source;

pub use container::{Container, ContainerError, ContainerReader, ContainerWriter, KeyMap};
pub use discovery::{DiscoveredSize, discover_matrix_size};
pub use encode::{ContainerEncoder, Substitution, SubstitutionReason, WriteSummary};
pub use matrix::{Matrix, MatrixError};
pub use source::{DirectorySource, LoadError, MatrixSource, MemorySource};
