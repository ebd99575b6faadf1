//! Error types for matrix source resolution

use crate::matrix::MatrixError;
use thiserror::Error;

/// Failure to load one source matrix
///
/// These are recoverable during encoding: the pair is written as zeros.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No resource exists for the pair
    #[error("Matrix resource not found: {location}")]
    Missing {
        /// Where the resource was expected
        location: String,
    },

    /// The resource exists but could not be read
    #[error("Failed to read {location}: {source}")]
    Io {
        /// Resource location
        location: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The resource was read but is not a valid square matrix
    #[error("Failed to parse {location}: {source}")]
    Parse {
        /// Resource location
        location: String,
        /// Parse failure
        #[source]
        source: MatrixError,
    },
}

impl LoadError {
    /// Location of the resource that failed
    pub fn location(&self) -> &str {
        match self {
            Self::Missing { location } | Self::Io { location, .. } | Self::Parse { location, .. } => {
                location
            }
        }
    }
}

/// Errors in a path template
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{name}` placeholder that is not recognized
    #[error("Unknown placeholder '{{{0}}}' in template '{1}'")]
    UnknownPlaceholder(String, String),

    /// An opening brace without a closing one
    #[error("Unclosed placeholder in template '{0}'")]
    Unclosed(String),

    /// A placeholder the caller requires is absent
    #[error("Template '{template}' must contain '{{{placeholder}}}'")]
    MissingPlaceholder {
        /// The template text
        template: String,
        /// Name of the missing placeholder
        placeholder: &'static str,
    },

    /// A placeholder the caller cannot fill is present
    #[error("Template '{template}' must not contain '{{{placeholder}}}'")]
    UnexpectedPlaceholder {
        /// The template text
        template: String,
        /// Name of the unexpected placeholder
        placeholder: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::Missing {
            location: "results/x.txt".to_string(),
        };
        assert_eq!(err.to_string(), "Matrix resource not found: results/x.txt");
        assert_eq!(err.location(), "results/x.txt");

        let err = TemplateError::UnknownPlaceholder("foo".to_string(), "a/{foo}".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown placeholder '{foo}' in template 'a/{foo}'"
        );

        let err = TemplateError::MissingPlaceholder {
            template: "x.txt".to_string(),
            placeholder: "row",
        };
        assert_eq!(err.to_string(), "Template 'x.txt' must contain '{row}'");
    }
}
