//! Integration tests covering the delimited-text data file readers.

use std::io::Write;

use knn_providers_text::{TextProviderErrorCode, read_feature_matrix, read_label_vector, read_permutation};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("file must create");
    file.write_all(contents.as_bytes()).expect("file must write");
    path
}

#[test]
fn reads_a_complete_training_fixture() {
    let dir = tempfile::tempdir().expect("temp dir must create");
    let data_path = write_file(&dir, "train.csv", "0.0,0.0\n0.0,1.0\n10.0,10.0\n10.0,11.0\n");
    let labels_path = write_file(&dir, "train_labels.csv", "0\n0\n1\n1\n");
    let mrmr_path = write_file(&dir, "mrmr.csv", "1\n0\n");

    let rows = read_feature_matrix(&data_path).expect("features must parse");
    let labels = read_label_vector(&labels_path).expect("labels must parse");
    let permutation = read_permutation(&mrmr_path).expect("permutation must parse");

    assert_eq!(rows.len(), 4);
    assert_eq!(labels, vec![0, 0, 1, 1]);
    assert_eq!(permutation, vec![1, 0]);
}

#[test]
fn mixed_whitespace_and_comma_rows_across_a_file_both_parse() {
    let dir = tempfile::tempdir().expect("temp dir must create");
    let data_path = write_file(&dir, "mixed.csv", "1.0 2.0 3.0\n4.0,5.0,6.0\n");
    let rows = read_feature_matrix(&data_path).expect("features must parse");
    assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_feature_matrix(std::path::Path::new("/nonexistent/path/does-not-exist.csv"))
        .expect_err("missing file must fail");
    assert_eq!(err.code(), TextProviderErrorCode::Io);
}

#[test]
fn ragged_rows_are_accepted_by_the_reader_and_left_to_the_caller_to_validate() {
    // The reader only splits and parses fields; uniform column count across
    // rows is `knn_core::Matrix::from_rows`'s invariant to enforce, not this
    // crate's (§9: I/O stays a thin external collaborator).
    let dir = tempfile::tempdir().expect("temp dir must create");
    let data_path = write_file(&dir, "ragged.csv", "1.0,2.0\n3.0,4.0,5.0\n");
    let rows = read_feature_matrix(&data_path).expect("fields must still parse");
    assert_eq!(rows, vec![vec![1.0, 2.0], vec![3.0, 4.0, 5.0]]);
}
