//! Build configuration.
//!
//! Configuration for the `build` command comes from CLI arguments with
//! environment variable fallbacks (`HICPACK_KEYS`, `HICPACK_RESULTS_DIR`,
//! `HICPACK_OUTPUT_DIR`, `HICPACK_DISTANCES`) and defaults that reproduce the
//! conventional layout:
//!
//! ```text
//! results/<distance>/hep_<distance>_<row>_<col>.txt  ->  binary/hic_data_<distance>.bin
//! ```

use crate::error::ConfigError;
use clap::Args;
use hicpack_formats::source::{DEFAULT_SOURCE_TEMPLATE, PathTemplate, Placeholder};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default container file name template
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "hic_data_{distance}.bin";

/// Default distance category
pub const DEFAULT_DISTANCE: &str = "intra.short";

/// Options for the `build` command.
#[derive(Debug, Clone, Args)]
pub struct BuildConfig {
    /// Key list file (JSON array or one key per line)
    #[arg(long, env = "HICPACK_KEYS")]
    pub keys: PathBuf,

    /// Root directory of the per-pair matrix text files
    #[arg(long, env = "HICPACK_RESULTS_DIR", default_value = "results")]
    pub results_dir: PathBuf,

    /// Directory containers are written to (created if absent)
    #[arg(long, env = "HICPACK_OUTPUT_DIR", default_value = "binary")]
    pub output_dir: PathBuf,

    /// Distance category to process; repeat or comma-separate for several
    #[arg(
        long = "distance",
        env = "HICPACK_DISTANCES",
        value_delimiter = ',',
        default_value = DEFAULT_DISTANCE
    )]
    pub distances: Vec<String>,

    /// Source file path relative to the results directory
    #[arg(long, default_value = DEFAULT_SOURCE_TEMPLATE)]
    pub source_template: String,

    /// Container file name relative to the output directory
    #[arg(long, default_value = DEFAULT_OUTPUT_TEMPLATE)]
    pub output_template: String,

    /// Continue with the next distance category after a fatal error
    #[arg(long)]
    pub keep_going: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl BuildConfig {
    /// Create a configuration with default paths and templates.
    #[must_use]
    pub fn new(keys: impl Into<PathBuf>) -> Self {
        Self {
            keys: keys.into(),
            results_dir: PathBuf::from("results"),
            output_dir: PathBuf::from("binary"),
            distances: vec![DEFAULT_DISTANCE.to_string()],
            source_template: DEFAULT_SOURCE_TEMPLATE.to_string(),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            keep_going: false,
            no_progress: false,
        }
    }

    /// Parse and check the output template.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Template` if the template is malformed, refers
    /// to `{row}`/`{col}`, or lacks `{distance}` while several distances
    /// would write to the same file.
    pub fn output_template(&self) -> Result<PathTemplate, ConfigError> {
        let template = PathTemplate::parse(&self.output_template)?;
        template.forbid(&[Placeholder::Row, Placeholder::Col])?;
        if self.distances.len() > 1 {
            template.require(&[Placeholder::Distance])?;
        }
        Ok(template)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The keys file or results directory doesn't exist
    /// - No distance is given, or a distance is repeated
    /// - A template is malformed or lacks a required placeholder
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.keys.is_file() {
            return Err(ConfigError::PathNotFound {
                what: "Keys file",
                path: self.keys.clone(),
            });
        }

        if !self.results_dir.is_dir() {
            return Err(ConfigError::PathNotFound {
                what: "Results directory",
                path: self.results_dir.clone(),
            });
        }

        if self.distances.is_empty() {
            return Err(ConfigError::MissingRequired(
                "at least one distance category".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for distance in &self.distances {
            if distance.trim().is_empty() {
                return Err(ConfigError::MissingRequired(
                    "distance label cannot be empty".to_string(),
                ));
            }
            if !seen.insert(distance.as_str()) {
                return Err(ConfigError::DuplicateDistance(distance.clone()));
            }
        }

        PathTemplate::parse(&self.source_template)?.require(&[Placeholder::Row, Placeholder::Col])?;
        self.output_template()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hicpack_formats::source::TemplateError;
    use tempfile::TempDir;

    fn valid_config(dir: &TempDir) -> BuildConfig {
        let keys = dir.path().join("keys.txt");
        std::fs::write(&keys, "A\nB\n").unwrap();
        let mut config = BuildConfig::new(keys);
        config.results_dir = dir.path().to_path_buf();
        config.output_dir = dir.path().join("out");
        config
    }

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("keys.txt");
        assert_eq!(config.distances, vec!["intra.short".to_string()]);
        assert_eq!(config.output_template, "hic_data_{distance}.bin");
        assert!(!config.keep_going);
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        assert!(valid_config(&dir).validate().is_ok());
    }

    #[test]
    fn test_validate_missing_paths() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.results_dir = dir.path().join("missing");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PathNotFound {
                what: "Results directory",
                ..
            })
        ));

        let config = BuildConfig::new(dir.path().join("nokeys.txt"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PathNotFound {
                what: "Keys file",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_distances() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.distances = vec!["inter".to_string(), "inter".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateDistance(d)) if d == "inter"
        ));

        config.distances.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_output_template_needs_distance_for_many() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.output_template = "all.bin".to_string();
        assert!(config.validate().is_ok());

        config.distances = vec!["inter".to_string(), "intra.long".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Template(TemplateError::MissingPlaceholder { .. }))
        ));

        config.output_template = "{distance}_{row}.bin".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Template(TemplateError::UnexpectedPlaceholder { .. }))
        ));
    }

    #[test]
    fn test_source_template_needs_row_and_col() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.source_template = "{distance}/{row}.txt".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Template(_))
        ));
    }
}
