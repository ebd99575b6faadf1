//! Packed matrix container builder.
//!
//! This crate is the tool around [`hicpack_formats`]: it reads a key list,
//! walks a directory of per-pair matrix text files, and writes one container
//! per distance category. It also inspects and extracts from existing
//! containers.
//!
//! # Architecture
//!
//! - `config`: CLI/environment configuration and validation
//! - `keys`: key list loading
//! - `pipeline`: per-category discovery and container writing
//! - `inspect`: header summaries and single-pair extraction
//! - `score`: centre/corner peak scores over stored pairs
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use hicpack::{BuildConfig, BuildPlan};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = BuildConfig::new("stems.txt");
//!     config.distances = vec!["intra.short".into(), "inter".into()];
//!
//!     for report in BuildPlan::from_config(&config)?.run()?.into_result()? {
//!         println!(
//!             "{}: {} matrices, {} zero-filled",
//!             report.output.display(),
//!             report.summary.matrices_written,
//!             report.summary.substitutions.len()
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod inspect;
pub mod keys;
pub mod pipeline;
pub mod score;

pub use config::BuildConfig;
pub use error::{BuildError, ConfigError, InspectError, KeyListError};
pub use inspect::{ContainerSummary, ExtractArgs, InspectArgs, OutputFormat};
pub use keys::{load_keys, parse_key_list};
pub use pipeline::{BuildPlan, CategoryFailure, CategoryReport, RunReport};
pub use score::{PairScore, ScoreArgs};
