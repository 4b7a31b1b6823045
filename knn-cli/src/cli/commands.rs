//! Command implementation and argument parsing for the knn CLI (§6).

use std::fs;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use knn_core::{
    Candidate, Config, ConfigError, DatasetError, LabeledSet, Matrix, Mode, MrmrPermutation,
    ScoreReport, prepare, score, search,
};
use knn_providers_text::{TextProviderError, read_feature_matrix, read_label_vector, read_permutation};
use thiserror::Error;
use tracing::instrument;

/// Coordination strategy accepted on the command line (`-mode homo|hetero`,
/// §6). Mirrors [`knn_core::Mode`]; kept as a distinct type so `clap`'s
/// [`ValueEnum`] derive does not have to reach into `knn-core` for a trait it
/// has no other reason to depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    /// Equally fast workers; the f-range is statically partitioned.
    Homo,
    /// Workers of unequal speed; the f-range is dynamically pulled.
    Hetero,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Homo => Self::Homo,
            CliMode::Hetero => Self::Hetero,
        }
    }
}

fn default_world_size() -> usize {
    std::thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// Top-level CLI options parsed by [`clap`] (§6: `-h`, `-conf <path>`,
/// `-mode homo|hetero`).
#[derive(Debug, Parser, Clone)]
#[command(name = "knn", about = "Run the distributed k-NN hyperparameter search.")]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long = "conf")]
    pub conf: PathBuf,

    /// Coordination strategy; overrides the `mode` field of the configuration
    /// file with the value supplied here.
    #[arg(long = "mode", value_enum)]
    pub mode: CliMode,

    /// Number of simulated ranks to search across. §6 assumes a distributed
    /// launcher (e.g. `mpirun -np N`) supplies this; this binary has no
    /// launcher of its own; a rank runs as a thread instead of a process, so
    /// the count comes from this flag (defaulting to the available
    /// parallelism) rather than from outside the process.
    #[arg(long = "world-size", default_value_t = default_world_size())]
    pub world_size: usize,
}

/// Errors surfaced while executing the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be read from disk.
    #[error("failed to read configuration file `{path}`: {source}")]
    ConfigFileIo {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration file failed to parse or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A data file failed to read.
    #[error(transparent)]
    DataFile(#[from] TextProviderError),
    /// Feature/label/permutation data failed to assemble into a dataset.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl CliError {
    /// Stable machine-readable code for this error, for diagnostic logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigFileIo { .. } => "CLI_CONFIG_FILE_IO",
            Self::Config(err) => err.code().as_str(),
            Self::DataFile(err) => err.code().as_str(),
            Self::Dataset(err) => err.code().as_str(),
        }
    }
}

/// Wall-clock timings for each phase of one run (§6: "Wall-clock timings for
/// (read, sort-by-MRMR, sweep, score)").
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Time spent reading and assembling the training/test/MRMR data files.
    pub read: Duration,
    /// Time spent normalizing and applying the MRMR permutation.
    pub sort: Duration,
    /// Time spent searching for the optimal (k, f) (C5 or C6).
    pub sweep: Duration,
    /// Time spent scoring the winner against the test and training sets.
    pub score: Duration,
}

/// The full outcome of one CLI invocation: the discovered optimum, its
/// scoring reports, and the phase timings.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The winning (k, f) candidate.
    pub winner: Candidate,
    /// Scoring report against the test set.
    pub test_report: ScoreReport,
    /// Scoring report against the training set (the overfitting diagnostic).
    pub training_report: ScoreReport,
    /// Per-phase wall-clock timings.
    pub timings: Timings,
}

fn read_dataset(features_path: &Path, labels_path: &Path) -> Result<LabeledSet, CliError> {
    let rows = read_feature_matrix(features_path)?;
    let labels = read_label_vector(labels_path)?;
    let matrix = Matrix::from_rows(rows)?;
    Ok(LabeledSet::new(matrix, labels)?)
}

fn load_config(conf_path: &Path, mode: CliMode) -> Result<Config, CliError> {
    let json = fs::read_to_string(conf_path).map_err(|source| CliError::ConfigFileIo {
        path: conf_path.to_path_buf(),
        source,
    })?;
    let mut config = Config::from_json(&json)?;
    config.mode = mode.into();
    Ok(config)
}

/// Executes the CLI command represented by `cli`: loads the configuration,
/// reads the data files, runs the search, and scores the winner.
///
/// # Errors
/// Returns [`CliError`] if the configuration cannot be read or validated, or
/// if a data file cannot be read or does not assemble into a valid dataset.
#[instrument(skip(cli), fields(conf = %cli.conf.display(), mode = ?cli.mode, world_size = cli.world_size))]
pub fn run_cli(cli: Cli) -> Result<RunSummary, CliError> {
    let config = load_config(&cli.conf, cli.mode)?;
    config.validate_world_size(cli.world_size)?;

    let read_start = Instant::now();
    let training = read_dataset(&config.db_data_training, &config.db_labels_training)?;
    let test = read_dataset(&config.db_data_test, &config.db_labels_test)?;
    let permutation = if config.sorting_by_mrmr {
        Some(MrmrPermutation::new(read_permutation(&config.mrmr)?)?)
    } else {
        None
    };
    let read = read_start.elapsed();

    let sort_start = Instant::now();
    let (training, test) = prepare(&config, training, test, permutation.as_ref())?;
    let sort = sort_start.elapsed();

    let sweep_start = Instant::now();
    let winner = search(&config, &training, &test, cli.world_size);
    let sweep = sweep_start.elapsed();

    let score_start = Instant::now();
    let test_report = score(&training, &test, winner.k(), winner.f(), config.metric, config.n_classes);
    let training_report = score(&training, &training, winner.k(), winner.f(), config.metric, config.n_classes);
    let score_elapsed = score_start.elapsed();

    Ok(RunSummary {
        winner,
        test_report,
        training_report,
        timings: Timings {
            read,
            sort,
            sweep,
            score: score_elapsed,
        },
    })
}

/// Renders `summary` to `writer` in the human-readable text format of §6's
/// stdout outputs: optimum (k, f), phase timings, the test confusion matrix,
/// and training/test accuracy.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &RunSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "optimum: k={} f={}", summary.winner.k(), summary.winner.f())?;
    writeln!(
        writer,
        "timings: read={:?} sort={:?} sweep={:?} score={:?}",
        summary.timings.read, summary.timings.sort, summary.timings.sweep, summary.timings.score
    )?;

    let confusion = summary.test_report.confusion();
    writeln!(writer, "confusion matrix (test; rows = true class, columns = predicted class):")?;
    for truth in 0..confusion.classes() {
        let row: Vec<String> =
            (0..confusion.classes()).map(|predicted| confusion.get(truth, predicted).to_string()).collect();
        writeln!(writer, "{}", row.join("\t"))?;
    }

    writeln!(writer, "training accuracy: {:.4}", summary.training_report.accuracy())?;
    writeln!(writer, "test accuracy: {:.4}", summary.test_report.accuracy())?;
    Ok(())
}
