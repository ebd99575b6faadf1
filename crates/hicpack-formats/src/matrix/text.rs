//! Whitespace-delimited matrix text
//!
//! One row per line, values separated by ASCII whitespace. Blank lines are
//! skipped and `#` starts a comment that runs to the end of the line.

use crate::matrix::Matrix;
use crate::matrix::error::{MatrixError, Result};
use std::io::Write;
use std::str::FromStr;

/// Parse a square matrix from whitespace-delimited text
pub fn parse_text(input: &str) -> Result<Matrix> {
    let mut values = Vec::new();
    let mut cols = None;
    let mut rows = 0usize;

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(data, _)| data);
        let mut count = 0usize;
        for token in line.split_ascii_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|_| MatrixError::InvalidNumber {
                    line: idx + 1,
                    token: token.to_string(),
                })?;
            values.push(value as f32);
            count += 1;
        }

        if count == 0 {
            continue;
        }

        match cols {
            None => cols = Some(count),
            Some(expected) if expected != count => {
                return Err(MatrixError::RaggedRow {
                    line: idx + 1,
                    expected,
                    actual: count,
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let Some(cols) = cols else {
        return Err(MatrixError::Empty);
    };
    if rows != cols {
        return Err(MatrixError::NotSquare { rows, cols });
    }

    Matrix::from_values(cols, values)
}

/// Write a matrix as whitespace-delimited text, one row per line
pub fn write_text<W: Write>(matrix: &Matrix, writer: &mut W) -> std::io::Result<()> {
    for row in matrix.rows() {
        let mut first = true;
        for value in row {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{value}")?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

impl FromStr for Matrix {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        parse_text(s)
    }
}
