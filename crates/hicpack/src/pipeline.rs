//! Container build pipeline.
//!
//! Distance categories are processed one at a time. For each category the
//! matrix size is discovered first; the container file is only created or
//! truncated once discovery has succeeded, so a category with no usable
//! source matrix leaves no file behind. A write failure after that point
//! leaves a partial file in place.
//!
//! A run always hands back the reports of the categories that were written,
//! whether or not a later category failed.

use crate::config::BuildConfig;
use crate::error::{BuildError, ConfigError};
use crate::keys::load_keys;
use hicpack_formats::container::{ContainerError, KeyMap};
use hicpack_formats::discovery::DiscoveredSize;
use hicpack_formats::encode::{ContainerEncoder, WriteSummary};
use hicpack_formats::source::{DirectorySource, PathTemplate};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome for one distance category.
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// Distance category label
    pub distance: String,
    /// Container file written
    pub output: PathBuf,
    /// How the matrix size was found
    pub discovered: DiscoveredSize,
    /// Matrices written and substitutions made
    pub summary: WriteSummary,
}

/// A distance category that failed.
#[derive(Debug)]
pub struct CategoryFailure {
    /// Distance category label
    pub distance: String,
    /// Why it failed
    pub error: BuildError,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Categories whose containers were written, in processing order
    pub reports: Vec<CategoryReport>,
    /// Categories that failed
    pub failures: Vec<CategoryFailure>,
    /// Categories not attempted because an earlier one failed
    pub skipped: Vec<String>,
}

impl RunReport {
    /// True when every category was written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    /// Labels of the failed categories.
    pub fn failed(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.distance.clone()).collect()
    }

    /// Number of categories in the run.
    pub fn total(&self) -> usize {
        self.reports.len() + self.failures.len() + self.skipped.len()
    }

    /// Turn the run into its reports, or an error if any category failed.
    ///
    /// A single failure is returned as is; several are summarized as
    /// `BuildError::CategoriesFailed`.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` if any category failed.
    pub fn into_result(mut self) -> Result<Vec<CategoryReport>, BuildError> {
        match self.failures.len() {
            0 => Ok(self.reports),
            1 => Err(self.failures.remove(0).error),
            _ => Err(BuildError::CategoriesFailed {
                failed: self.failed(),
                total: self.total(),
            }),
        }
    }
}

/// Everything needed to build the containers for a run.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    keys: KeyMap,
    distances: Vec<String>,
    source: DirectorySource,
    output_dir: PathBuf,
    output_template: PathTemplate,
    keep_going: bool,
    show_progress: bool,
}

impl BuildPlan {
    /// Create a plan with progress display off and stop-on-first-failure.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Template` if `output_template` is malformed.
    pub fn new(
        keys: KeyMap,
        distances: Vec<String>,
        source: DirectorySource,
        output_dir: impl Into<PathBuf>,
        output_template: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            keys,
            distances,
            source,
            output_dir: output_dir.into(),
            output_template: PathTemplate::parse(output_template)?,
            keep_going: false,
            show_progress: false,
        })
    }

    /// Validate `config`, load the key list, and build a plan.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` if validation fails or the key list is invalid.
    pub fn from_config(config: &BuildConfig) -> Result<Self, BuildError> {
        config.validate()?;

        let keys = load_keys(&config.keys)?;
        let source = DirectorySource::with_template(&config.results_dir, &config.source_template)
            .map_err(ConfigError::from)?;

        Ok(Self {
            keys,
            distances: config.distances.clone(),
            source,
            output_dir: config.output_dir.clone(),
            output_template: config.output_template()?,
            keep_going: config.keep_going,
            show_progress: !config.no_progress,
        })
    }

    /// Continue with later categories after a failure.
    #[must_use]
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Show a progress bar while writing.
    #[must_use]
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Key map shared by every category.
    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    /// Distance categories in processing order.
    pub fn distances(&self) -> &[String] {
        &self.distances
    }

    /// Container path for `distance`.
    pub fn output_path(&self, distance: &str) -> PathBuf {
        self.output_dir
            .join(self.output_template.render(distance, "", ""))
    }

    /// Build every category.
    ///
    /// Without `keep_going`, the first failing category stops the run and
    /// the rest are listed as skipped. With it, every category is attempted.
    /// Either way the reports of written categories are kept; use
    /// [`RunReport::into_result`] to turn failures into an error.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::CreateDir` if the output directory cannot be
    /// created.
    pub fn run(&self) -> Result<RunReport, BuildError> {
        ensure_dir(&self.output_dir)?;

        let mut run = RunReport {
            reports: Vec::with_capacity(self.distances.len()),
            ..RunReport::default()
        };

        for (idx, distance) in self.distances.iter().enumerate() {
            match self.build_category(distance) {
                Ok(report) => run.reports.push(report),
                Err(error) => {
                    error!("{}", error);
                    run.failures.push(CategoryFailure {
                        distance: distance.clone(),
                        error,
                    });
                    if !self.keep_going {
                        run.skipped = self.distances[idx + 1..].to_vec();
                        break;
                    }
                }
            }
        }

        Ok(run)
    }

    /// Discover the matrix size for `distance` and write its container.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Category` if discovery or writing fails, and
    /// `BuildError::CreateOutput` if the file cannot be created.
    pub fn build_category(&self, distance: &str) -> Result<CategoryReport, BuildError> {
        let category_err = |source: ContainerError| BuildError::Category {
            distance: distance.to_string(),
            source,
        };

        let encoder = ContainerEncoder::new(&self.keys, &self.source, distance);
        let discovered = encoder.discover().map_err(category_err)?;
        info!(
            "Using matrix size {} for '{}' ({} keys)",
            discovered.matrix_size,
            distance,
            self.keys.len()
        );

        let output = self.output_path(distance);
        let file = File::create(&output).map_err(|source| BuildError::CreateOutput {
            path: output.clone(),
            source,
        })?;

        let progress = self.progress_bar(distance);
        let (_, summary) = encoder
            .encode_with_progress(BufWriter::new(file), discovered.matrix_size, |done, _| {
                progress.set_position(done as u64);
            })
            .map_err(|e| {
                progress.abandon();
                category_err(e)
            })?;
        progress.finish_and_clear();

        info!("Wrote {}", output.display());

        Ok(CategoryReport {
            distance: distance.to_string(),
            output,
            discovered,
            summary,
        })
    }

    fn progress_bar(&self, distance: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(self.keys.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
        pb.set_style(style);
        pb.set_message(format!("Processing {distance}"));
        pb
    }
}

/// Create `dir` and its parents if missing.
fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(dir).map_err(|source| BuildError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
