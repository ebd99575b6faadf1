//! Error types for the hicpack tool.
//!
//! All errors use thiserror for consistent error handling across the codebase.

use hicpack_formats::container::ContainerError;
use hicpack_formats::source::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration value
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// A configured path does not exist
    #[error("{what} not found: {path}")]
    PathNotFound {
        /// Which setting the path belongs to
        what: &'static str,
        /// The missing path
        path: PathBuf,
    },

    /// Invalid source or output template
    #[error("Invalid template: {0}")]
    Template(#[from] TemplateError),

    /// The same distance category was requested twice
    #[error("Distance '{0}' requested more than once")]
    DuplicateDistance(String),
}

/// Errors loading the key list.
#[derive(Debug, Error)]
pub enum KeyListError {
    /// Failed to read the key list file
    #[error("Failed to read key list {path}: {source}")]
    Read {
        /// Key list path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Key list looked like JSON but did not parse as an array of strings
    #[error("Invalid JSON key list: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Keys were read but do not form a valid key set
    #[error("Invalid key set: {0}")]
    Keys(#[from] ContainerError),
}

/// Errors while building containers.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key list error
    #[error("Key list error: {0}")]
    Keys(#[from] KeyListError),

    /// Failed to create the output directory
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        /// Output directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or truncate a container file
    #[error("Failed to create container {path}: {source}")]
    CreateOutput {
        /// Container path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Discovery or writing failed for one distance category
    #[error("Distance '{distance}' failed: {source}")]
    Category {
        /// Distance category label
        distance: String,
        /// Underlying container error
        #[source]
        source: ContainerError,
    },

    /// One or more categories failed while continuing past failures
    #[error("{} of {total} distance categories failed: {}", .failed.len(), .failed.join(", "))]
    CategoriesFailed {
        /// Labels of the failed categories
        failed: Vec<String>,
        /// Number of categories attempted
        total: usize,
    },
}

/// Errors while inspecting an existing container.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Failed to open the container file
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Container path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Container decoding error
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Failed to write output
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
