//! File-system matrix source
//!
//! Resolves each pair to a text file under a root directory using a
//! [`PathTemplate`]. The default layout is
//! `<root>/<distance>/hep_<distance>_<row>_<col>.txt`.

use crate::matrix::{Matrix, parse_text};
use crate::source::MatrixSource;
use crate::source::error::{LoadError, TemplateError};
use crate::source::template::{PathTemplate, Placeholder};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Default source file layout relative to the results root
pub const DEFAULT_SOURCE_TEMPLATE: &str = "{distance}/hep_{distance}_{row}_{col}.txt";

/// Matrix source backed by text files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    template: PathTemplate,
}

impl DirectorySource {
    /// Source using [`DEFAULT_SOURCE_TEMPLATE`]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            template: PathTemplate::per_pair_default(),
        }
    }

    /// Source using a custom template
    ///
    /// The template must contain `{row}` and `{col}`.
    pub fn with_template(root: impl AsRef<Path>, template: &str) -> Result<Self, TemplateError> {
        let template = PathTemplate::parse(template)?;
        template.require(&[Placeholder::Row, Placeholder::Col])?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            template,
        })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path template
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Path of the source file for a pair
    pub fn resolve(&self, distance: &str, row_key: &str, col_key: &str) -> PathBuf {
        self.root
            .join(self.template.render(distance, row_key, col_key))
    }
}

impl MatrixSource for DirectorySource {
    fn load(&self, distance: &str, row_key: &str, col_key: &str) -> Result<Matrix, LoadError> {
        let path = self.resolve(distance, row_key, col_key);
        let location = path.display().to_string();
        trace!("Loading matrix from {}", location);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoadError::Missing { location });
            }
            Err(source) => return Err(LoadError::Io { location, source }),
        };

        parse_text(&text).map_err(|source| LoadError::Parse { location, source })
    }
}
