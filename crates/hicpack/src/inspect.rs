//! Inspection of existing containers.

use crate::error::InspectError;
use clap::{Args, ValueEnum};
use hicpack_formats::container::ContainerReader;
use hicpack_formats::matrix::{Matrix, write_text};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Output format for `inspect`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON object
    Json,
}

/// Options for the `inspect` command.
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// Container file
    pub container: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Options for the `extract` command.
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Container file
    pub container: PathBuf,

    /// Row key
    #[arg(long)]
    pub row: String,

    /// Column key
    #[arg(long)]
    pub col: String,
}

/// Header and layout facts about a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    /// Container path
    pub path: PathBuf,
    /// Serialized key map length in bytes
    pub keymap_len: u32,
    /// Matrix side length
    pub matrix_size: u32,
    /// Element type code from the header
    pub element_type: u32,
    /// Number of keys
    pub key_count: usize,
    /// Offset of the first matrix
    pub data_offset: u64,
    /// Bytes per matrix
    pub matrix_bytes: u64,
    /// Size implied by the header and key map
    pub expected_size: u64,
    /// Size on disk
    pub actual_size: u64,
    /// Keys in index order
    pub keys: Vec<String>,
}

pub(crate) fn open(path: &Path) -> Result<ContainerReader<BufReader<File>>, InspectError> {
    let file = File::open(path).map_err(|source| InspectError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ContainerReader::open(BufReader::new(file))?)
}

/// Read the header and key map of a container.
///
/// # Errors
///
/// Returns `InspectError` if the file cannot be opened or is not a valid
/// container.
pub fn summarize(path: &Path) -> Result<ContainerSummary, InspectError> {
    let reader = open(path)?;
    let header = *reader.header();
    let keys = reader.keys();

    Ok(ContainerSummary {
        path: path.to_path_buf(),
        keymap_len: header.keymap_len,
        matrix_size: header.matrix_size,
        element_type: header.element_type,
        key_count: keys.len(),
        data_offset: header.data_offset(),
        matrix_bytes: reader.matrix_bytes(),
        expected_size: reader.expected_len(),
        actual_size: reader.stream_len(),
        keys: keys.keys().to_vec(),
    })
}

/// Render a summary as text.
pub fn render_text(summary: &ContainerSummary) -> String {
    const SHOWN_KEYS: usize = 10;

    let mut out = String::new();
    let _ = writeln!(out, "Container:    {}", summary.path.display());
    let _ = writeln!(out, "Key map:      {} bytes", summary.keymap_len);
    let _ = writeln!(
        out,
        "Matrix size:  {0}x{0}",
        summary.matrix_size
    );
    let _ = writeln!(out, "Element type: {} (f32)", summary.element_type);
    let _ = writeln!(out, "Keys:         {}", summary.key_count);
    let _ = writeln!(out, "Data offset:  {}", summary.data_offset);
    let _ = writeln!(out, "Matrix bytes: {}", summary.matrix_bytes);
    let _ = writeln!(
        out,
        "File size:    {} (expected {})",
        summary.actual_size, summary.expected_size
    );

    let mut shown: Vec<&str> = summary
        .keys
        .iter()
        .take(SHOWN_KEYS)
        .map(String::as_str)
        .collect();
    if summary.keys.len() > SHOWN_KEYS {
        shown.push("...");
    }
    let _ = writeln!(out, "Key order:    {}", shown.join(", "));
    out
}

/// Print a summary in the requested format.
///
/// # Errors
///
/// Returns `InspectError` if the container is invalid or output fails.
pub fn inspect<W: Write>(args: &InspectArgs, out: &mut W) -> Result<(), InspectError> {
    let summary = summarize(&args.container)?;
    match args.format {
        OutputFormat::Text => out.write_all(render_text(&summary).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &summary).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Read the matrix stored for `(row, col)`.
///
/// # Errors
///
/// Returns `InspectError` if the container is invalid or a key is unknown.
pub fn extract_matrix(path: &Path, row: &str, col: &str) -> Result<Matrix, InspectError> {
    let mut reader = open(path)?;
    Ok(reader.read_matrix_by_keys(row, col)?)
}

/// Print the matrix for a pair in matrix text form.
///
/// # Errors
///
/// Returns `InspectError` if the container is invalid, a key is unknown, or
/// output fails.
pub fn extract<W: Write>(args: &ExtractArgs, out: &mut W) -> Result<(), InspectError> {
    let matrix = extract_matrix(&args.container, &args.row, &args.col)?;
    write_text(&matrix, out)?;
    Ok(())
}
