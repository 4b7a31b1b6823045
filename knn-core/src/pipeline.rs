//! Top-level orchestration: permute, dispatch to C5 or C6, then score (§2).

use std::thread;

use tracing::{info, instrument};

use crate::candidate::{best, Candidate};
use crate::config::{Config, Mode};
use crate::coordinator::{run_master, run_worker};
use crate::dataset::{LabeledSet, MrmrPermutation};
use crate::energy::{EnergyGate, UreqEnergyOracleClient, DEFAULT_ENERGY_ORACLE_URL};
use crate::partition::{local_best, reduce};
use crate::scorer::ScoreReport;
use crate::transport::channel_transport;

/// The final outcome of one run: the discovered optimum, and scoring reports
/// for both the test set and the training set (the overfitting diagnostic of
/// §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub winner: Candidate,
    pub test_report: ScoreReport,
    pub training_report: ScoreReport,
}

/// Applies the MRMR permutation and min-max normalization configured by
/// `config`, in that order — matching the control flow of §2 ("features are
/// permuted by MRMR" after the normalize step implied by §3's field order).
///
/// # Errors
/// Propagates [`crate::dataset::DatasetError`] if the permutation's length
/// disagrees with either matrix's column count.
pub fn prepare(
    config: &Config,
    mut training: LabeledSet,
    mut test: LabeledSet,
    permutation: Option<&MrmrPermutation>,
) -> Result<(LabeledSet, LabeledSet), crate::dataset::DatasetError> {
    if config.normalize {
        training = LabeledSet::new(training.matrix().min_max_normalized(), training.labels().to_vec())?;
        test = LabeledSet::new(test.matrix().min_max_normalized(), test.labels().to_vec())?;
    }
    if config.sorting_by_mrmr {
        if let Some(permutation) = permutation {
            training = LabeledSet::new(training.matrix().permute_columns(permutation)?, training.labels().to_vec())?;
            test = LabeledSet::new(test.matrix().permute_columns(permutation)?, test.labels().to_vec())?;
        }
    }
    Ok((training, test))
}

/// Runs the homogeneous search (C5): every rank statically sweeps its
/// stride-assigned f-values and all local bests are reduced to one winner.
///
/// Ranks are simulated as a sequential loop over `0..world_size` rather than
/// real distributed processes — this binary has no distributed runtime of
/// its own (see `DESIGN.md`); each iteration's work is exactly what a real
/// rank would compute independently, so the result is identical to a truly
/// distributed run.
#[instrument(skip(training, test), fields(world_size))]
fn run_homogeneous(config: &Config, training: &LabeledSet, test: &LabeledSet, world_size: usize) -> Candidate {
    let locals: Vec<Candidate> = (0..world_size)
        .filter_map(|rank| {
            local_best(
                training,
                test,
                rank,
                world_size,
                config.max_features,
                config.k_min,
                config.k_max,
                config.metric,
            )
        })
        .collect();
    reduce(locals).expect("a non-empty max_features range always yields a winner")
}

/// Runs the heterogeneous search (C6): one master thread plus
/// `world_size - 1` worker threads communicating over an in-process channel
/// transport (see `crate::transport`).
///
/// When `config.saving_energy` is set, each worker is given its own
/// [`EnergyGate`] polling the pricing oracle (§4.8); workers are ranks
/// `1..=worker_count`, rank 0 being the master, which matches the stagger
/// offsets of `original_source/src/energySaving.cpp`'s `sleepThread`.
#[instrument(skip(training, test), fields(world_size))]
fn run_heterogeneous(config: &Config, training: &LabeledSet, test: &LabeledSet, world_size: usize) -> Candidate {
    let worker_count = world_size - 1;
    let (mut master_transport, mut worker_transports) = channel_transport(worker_count);

    let handles: Vec<_> = worker_transports
        .drain(..)
        .enumerate()
        .map(|(index, mut worker_transport)| {
            let training = training.clone();
            let test = test.clone();
            let max_features = config.max_features;
            let chunk_size = config.chunk_size;
            let k_min = config.k_min;
            let k_max = config.k_max;
            let metric = config.metric;
            let rank = index + 1;
            let gate = config
                .saving_energy
                .then(|| EnergyGate::spawn(UreqEnergyOracleClient::new(DEFAULT_ENERGY_ORACLE_URL), rank));
            thread::spawn(move || {
                run_worker(
                    &mut worker_transport,
                    &training,
                    &test,
                    max_features,
                    chunk_size,
                    k_min,
                    k_max,
                    metric,
                    gate.as_ref(),
                    rank,
                );
            })
        })
        .collect();

    let winner = run_master(&mut master_transport, worker_count, config.max_features, config.chunk_size);

    for handle in handles {
        handle.join().expect("worker thread must not panic");
    }

    winner
}

/// Runs C5 or C6 (dispatched by `config.mode`) to discover the best
/// (k, f) candidate, without scoring it — the C4-driven search half of §2's
/// control flow, split out from [`run`] so callers that need to time or
/// report the search and scoring phases separately (the CLI's §6 "wall-clock
/// timings for (read, sort-by-MRMR, sweep, score)" requirement) can do so
/// without duplicating the dispatch logic.
///
/// # Panics
/// Panics if `config.validate_world_size(world_size)` would have rejected
/// `world_size` — the caller is expected to have validated this already.
#[instrument(skip(config, training, test), fields(mode = %config.mode, world_size))]
pub fn search(config: &Config, training: &LabeledSet, test: &LabeledSet, world_size: usize) -> Candidate {
    config
        .validate_world_size(world_size)
        .expect("world size must already be validated for this mode");

    match config.mode {
        Mode::Homo => run_homogeneous(config, training, test, world_size),
        Mode::Hetero => run_heterogeneous(config, training, test, world_size),
    }
}

/// Runs the complete search-then-score pipeline: dispatches to C5 or C6
/// depending on `config.mode`, then scores the winning (k, f) on both the
/// test set and the training set.
///
/// # Panics
/// Panics if `config.validate_world_size(world_size)` would have rejected
/// `world_size` — the caller is expected to have validated this already.
#[instrument(skip(config, training, test), fields(mode = %config.mode, world_size))]
pub fn run(config: &Config, training: LabeledSet, test: LabeledSet, world_size: usize) -> PipelineOutcome {
    let winner = search(config, &training, &test, world_size);

    info!(k = winner.k(), f = winner.f(), correct = winner.correct_count(), "search complete");

    let test_report = crate::scorer::score(&training, &test, winner.k(), winner.f(), config.metric, config.n_classes);
    let training_report =
        crate::scorer::score(&training, &training, winner.k(), winner.f(), config.metric, config.n_classes);

    PipelineOutcome {
        winner,
        test_report,
        training_report,
    }
}
