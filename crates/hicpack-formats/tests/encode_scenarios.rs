#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end encoding scenarios over a directory of matrix text files

use hicpack_formats::container::{Container, ContainerError, ContainerReader, KeyMap};
use hicpack_formats::encode::{ContainerEncoder, SubstitutionReason};
use hicpack_formats::matrix::Matrix;
use hicpack_formats::source::DirectorySource;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tempfile::TempDir;

const DISTANCE: &str = "intra.short";

fn write_source(root: &Path, row: &str, col: &str, text: &str) {
    let dir = root.join(DISTANCE);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("hep_{DISTANCE}_{row}_{col}.txt")), text).unwrap();
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[test]
fn two_key_scenario_exact_bytes() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "A", "A", "1 2\n3 4\n");
    // (A, B) deliberately absent
    write_source(dir.path(), "B", "A", "5 6\n7 8\n");
    write_source(dir.path(), "B", "B", "0 0\n0 0\n");

    let keys = KeyMap::new(["A", "B"]).unwrap();
    let source = DirectorySource::new(dir.path());
    let encoder = ContainerEncoder::new(&keys, &source, DISTANCE);

    let found = encoder.discover().unwrap();
    assert_eq!(found.matrix_size, 2);
    assert_eq!((found.row, found.col), (0, 0));

    let (data, summary) = encoder.encode(Vec::new(), found.matrix_size).unwrap();

    let keymap = br#"{"A":0,"B":1}"#;
    let mut expected = Vec::new();
    expected.extend_from_slice(&(keymap.len() as u32).to_le_bytes());
    expected.extend_from_slice(&2u32.to_le_bytes());
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(keymap);
    expected.extend(f32_bytes(&[1.0, 2.0, 3.0, 4.0]));
    expected.extend(f32_bytes(&[0.0, 0.0, 0.0, 0.0]));
    expected.extend(f32_bytes(&[5.0, 6.0, 7.0, 8.0]));
    expected.extend(f32_bytes(&[0.0, 0.0, 0.0, 0.0]));

    assert_eq!(data, expected);
    assert_eq!(summary.substitutions.len(), 1);
    assert_eq!(summary.substitutions[0].row_key, "A");
    assert_eq!(summary.substitutions[0].col_key, "B");
    assert_eq!(summary.substitutions[0].reason, SubstitutionReason::Missing);
}

#[test]
fn discovery_skips_unparseable_prefix() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "A", "A", "");
    write_source(dir.path(), "A", "B", "1 2 3\n4 5 6\n");
    write_source(dir.path(), "A", "C", "x y\nz w\n");
    write_source(dir.path(), "B", "A", "1 2 3\n4 5 6\n7 8 9\n");
    write_source(dir.path(), "C", "C", "1 2\n3 4\n");

    let keys = KeyMap::new(["A", "B", "C"]).unwrap();
    let source = DirectorySource::new(dir.path());
    let encoder = ContainerEncoder::new(&keys, &source, DISTANCE);

    let found = encoder.discover().unwrap();
    assert_eq!(found.matrix_size, 3);
    assert_eq!(found.attempted, 4);

    // (C, C) has a different size and becomes zeros
    let (data, summary) = encoder.encode(Vec::new(), found.matrix_size).unwrap();
    let container = Container::parse(&data).unwrap();
    assert!(container.matrix("C", "C").unwrap().is_zero());
    assert_eq!(container.matrix("B", "A").unwrap().get(2, 2), Some(9.0));
    assert_eq!(summary.loaded(), 1);
    assert_eq!(
        summary.count_where(|r| matches!(r, SubstitutionReason::ShapeMismatch { .. })),
        1
    );
}

#[test]
fn discovery_fails_when_nothing_parses() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "A", "A", "garbage\n");
    write_source(dir.path(), "A", "B", "1 2\n");

    let keys = KeyMap::new(["A", "B"]).unwrap();
    let source = DirectorySource::new(dir.path());
    let err = ContainerEncoder::new(&keys, &source, DISTANCE)
        .discover()
        .unwrap_err();
    match err {
        ContainerError::NoValidMatrix {
            distance,
            attempted,
        } => {
            assert_eq!(distance, DISTANCE);
            assert_eq!(attempted, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn encoding_is_deterministic() {
    let dir = TempDir::new().unwrap();
    write_source(dir.path(), "A", "B", "0.1 0.2\n0.3 0.4\n");
    write_source(dir.path(), "B", "B", "1e3 -1e-3\nnan 0\n");

    let keys = KeyMap::new(["A", "B"]).unwrap();
    let source = DirectorySource::new(dir.path());
    let encoder = ContainerEncoder::new(&keys, &source, DISTANCE);

    let (first, _) = encoder.encode(Vec::new(), 2).unwrap();
    let (second, _) = encoder.encode(Vec::new(), 2).unwrap();
    assert_eq!(first, second);
}

#[test]
fn file_output_supports_random_access() {
    let dir = TempDir::new().unwrap();
    let names = ["ADNP", "AFF4", "AGO1", "AGO2"];
    for (i, row) in names.iter().enumerate() {
        for (j, col) in names.iter().enumerate() {
            if (i + j) % 3 == 0 {
                continue;
            }
            let v = (i * 10 + j) as f32;
            write_source(dir.path(), row, col, &format!("{v} 0 0\n0 {v} 0\n0 0 {v}\n"));
        }
    }

    let keys = KeyMap::new(names).unwrap();
    let source = DirectorySource::new(dir.path());
    let encoder = ContainerEncoder::new(&keys, &source, DISTANCE);
    let size = encoder.discover().unwrap().matrix_size;

    let out_path = dir.path().join("hic_data_intra.short.bin");
    let file = BufWriter::new(File::create(&out_path).unwrap());
    let (_, summary) = encoder.encode(file, size).unwrap();
    assert_eq!(summary.matrices_written, 16);

    let mut reader = ContainerReader::open(File::open(&out_path).unwrap()).unwrap();
    assert_eq!(reader.keys(), &keys);
    assert_eq!(reader.stream_len(), reader.expected_len());

    let m = reader.read_matrix_by_keys("AGO2", "AFF4").unwrap();
    assert_eq!(m.get(1, 1), Some(31.0));
    assert_eq!(m.get(0, 1), Some(0.0));

    // (1, 2) sums to 3 and was never written
    let m = reader.read_matrix(1, 2).unwrap();
    assert_eq!(m, Matrix::zeros(3));
}
