//! Aggregate peak scores for stored matrices.
//!
//! For a matrix of side `n` with corner size `c = n / 4`:
//!
//! - the score is the mean of the centre rows `n/2 - 2 ..= n/2 + 2` (clamped
//!   to the matrix) divided by the mean of the lower-left `c x c` block, or
//!   `0` when that block is empty or its mean is zero
//! - the colour limit is three times the mean of the upper-right `c x c`
//!   block, or `0` when that block is empty
//!
//! Scores are computed over every ordered pair of the selected keys, reading
//! each matrix directly from the container.

use crate::error::InspectError;
use crate::inspect::{OutputFormat, open};
use clap::Args;
use hicpack_formats::matrix::Matrix;
use serde::Serialize;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Rows on each side of the centre row that count towards the score
pub const CENTER_HALF_WIDTH: usize = 2;

/// Scale applied to the upper-right corner mean for the colour limit
pub const COLOR_LIMIT_SCALE: f64 = 3.0;

/// Options for the `score` command.
#[derive(Debug, Clone, Args)]
pub struct ScoreArgs {
    /// Container file
    pub container: PathBuf,

    /// Key to include; repeat or comma-separate. All keys when omitted.
    #[arg(long = "key", value_delimiter = ',')]
    pub keys: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Score of one stored pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    /// Row key
    pub row: String,
    /// Column key
    pub col: String,
    /// Centre mean over lower-left corner mean
    pub score: f64,
    /// Upper bound for colour scaling
    pub color_limit: f64,
}

/// Side length of the corner blocks for a matrix of side `size`.
pub const fn corner_size(size: usize) -> usize {
    size / 4
}

#[allow(clippy::cast_precision_loss)]
fn block_mean(matrix: &Matrix, rows: Range<usize>, cols: Range<usize>) -> Option<f64> {
    let count = rows.len() * cols.len();
    if count == 0 {
        return None;
    }
    let sum: f64 = matrix
        .rows()
        .skip(rows.start)
        .take(rows.len())
        .flat_map(|row| row[cols.clone()].iter())
        .map(|v| f64::from(*v))
        .sum();
    Some(sum / count as f64)
}

/// Centre-to-corner enrichment of a matrix.
#[allow(clippy::float_cmp)]
pub fn peak_score(matrix: &Matrix) -> f64 {
    let n = matrix.size();
    let corner = corner_size(n);
    let corner_mean = match block_mean(matrix, n - corner..n, 0..corner) {
        Some(mean) if mean != 0.0 => mean,
        _ => return 0.0,
    };

    let mid = n / 2;
    let rows = mid.saturating_sub(CENTER_HALF_WIDTH)..(mid + CENTER_HALF_WIDTH + 1).min(n);
    let center_mean = block_mean(matrix, rows, 0..n).unwrap_or(0.0);
    center_mean / corner_mean
}

/// Colour scale limit of a matrix.
pub fn color_limit(matrix: &Matrix) -> f64 {
    let n = matrix.size();
    let corner = corner_size(n);
    block_mean(matrix, 0..corner, n - corner..n).map_or(0.0, |mean| COLOR_LIMIT_SCALE * mean)
}

/// Score every ordered pair of `keys` stored in the container at `path`.
///
/// An empty `keys` selects every key in index order. Repeated keys are
/// scored once.
///
/// # Errors
///
/// Returns `InspectError` if the container is invalid or a key is unknown.
pub fn score_pairs(path: &Path, keys: &[String]) -> Result<Vec<PairScore>, InspectError> {
    let mut reader = open(path)?;

    let mut selected: Vec<String> = Vec::new();
    if keys.is_empty() {
        selected.extend(reader.keys().keys().iter().cloned());
    } else {
        for key in keys {
            if !selected.contains(key) {
                selected.push(key.clone());
            }
        }
    }

    let mut scores = Vec::with_capacity(selected.len() * selected.len());
    for row in &selected {
        for col in &selected {
            let matrix = reader.read_matrix_by_keys(row, col)?;
            scores.push(PairScore {
                row: row.clone(),
                col: col.clone(),
                score: peak_score(&matrix),
                color_limit: color_limit(&matrix),
            });
        }
    }
    Ok(scores)
}

/// Print pair scores in the requested format.
///
/// # Errors
///
/// Returns `InspectError` if the container is invalid, a key is unknown, or
/// output fails.
pub fn score<W: Write>(args: &ScoreArgs, out: &mut W) -> Result<(), InspectError> {
    let scores = score_pairs(&args.container, &args.keys)?;
    match args.format {
        OutputFormat::Text => {
            writeln!(out, "row\tcol\tscore\tcolor_limit")?;
            for s in &scores {
                writeln!(
                    out,
                    "{}\t{}\t{:.6}\t{:.6}",
                    s.row, s.col, s.score, s.color_limit
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &scores).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}
