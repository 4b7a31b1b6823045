//! Unit tests for the CLI argument parsing, execution, and rendering.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use super::commands::{Cli, CliError, CliMode, render_summary, run_cli};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

fn write_trivial_separation_fixture(dir: &TempDir) -> io::Result<PathBuf> {
    write_file(dir, "train.csv", "0.0,0.0\n0.1,0.1\n10.0,10.0\n10.1,10.1\n")?;
    write_file(dir, "train_labels.csv", "0\n0\n1\n1\n")?;
    write_file(dir, "mrmr.csv", "0\n1\n")?;
    let conf = format!(
        r#"{{
            "db_data_training": "{train}",
            "db_data_test": "{train}",
            "db_labels_training": "{labels}",
            "db_labels_test": "{labels}",
            "mrmr": "{mrmr}",
            "n_tuples": 4,
            "n_features": 2,
            "n_classes": 2,
            "mode": "homo",
            "max_features": 2,
            "chunk_size": 1,
            "k_min": 1,
            "k_max": 1
        }}"#,
        train = dir.path().join("train.csv").display(),
        labels = dir.path().join("train_labels.csv").display(),
        mrmr = dir.path().join("mrmr.csv").display(),
    );
    write_file(dir, "conf.json", &conf)
}

#[rstest]
#[case(CliMode::Homo, 2)]
#[case(CliMode::Hetero, 2)]
fn run_cli_discovers_the_optimum_on_a_trivially_separated_fixture(
    #[case] mode: CliMode,
    #[case] world_size: usize,
) -> TestResult {
    let dir = temp_dir();
    let conf = write_trivial_separation_fixture(&dir)?;
    let cli = Cli {
        conf,
        mode,
        world_size,
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.winner.k(), 1);
    assert_eq!(summary.winner.f(), 1);
    assert_eq!(summary.test_report.correct_count(), 4);
    Ok(())
}

#[rstest]
fn run_cli_rejects_a_missing_configuration_file() {
    let cli = Cli {
        conf: PathBuf::from("/nonexistent/conf.json"),
        mode: CliMode::Homo,
        world_size: 1,
    };
    let err = run_cli(cli).expect_err("missing configuration file must fail");
    assert!(matches!(err, CliError::ConfigFileIo { .. }));
}

#[rstest]
fn run_cli_rejects_hetero_mode_with_a_single_rank() -> TestResult {
    let dir = temp_dir();
    let conf = write_trivial_separation_fixture(&dir)?;
    let cli = Cli {
        conf,
        mode: CliMode::Hetero,
        world_size: 1,
    };
    let err = run_cli(cli).expect_err("hetero mode with one rank must fail");
    assert!(matches!(err, CliError::Config(_)));
    Ok(())
}

#[rstest]
fn render_summary_reports_the_optimum_and_confusion_matrix() -> TestResult {
    let dir = temp_dir();
    let conf = write_trivial_separation_fixture(&dir)?;
    let cli = Cli {
        conf,
        mode: CliMode::Homo,
        world_size: 1,
    };
    let summary = run_cli(cli)?;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.contains("optimum: k=1 f=1"));
    assert!(text.contains("confusion matrix"));
    assert!(text.contains("test accuracy: 1.0000"));
    Ok(())
}

#[rstest]
fn clap_rejects_an_unknown_mode() {
    let args = ["knn", "--conf", "conf.json", "--mode", "unsupported"];
    let result = Cli::try_parse_from(args);
    assert!(result.is_err());
}

#[rstest]
fn clap_accepts_the_help_flag() {
    let args = ["knn", "--help"];
    let result = Cli::try_parse_from(args);
    assert!(result.is_err_and(|err| err.kind() == clap::error::ErrorKind::DisplayHelp));
}
