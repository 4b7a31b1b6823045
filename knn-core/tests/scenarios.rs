//! End-to-end scenario coverage against the small literal fixtures shared
//! across the workspace.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use knn_core::{
    Candidate, Config, LabeledSet, Matrix, Metric, MrmrPermutation, best, majority_vote,
    rank_neighbors, run_master, run_sweep, run_worker,
};
use knn_test_support::fixtures;

fn config(mode: &str, max_features: usize, chunk_size: usize, k_min: usize, k_max: usize) -> Config {
    Config::from_json(&format!(
        r#"{{
            "db_data_training": "train.csv",
            "db_data_test": "test.csv",
            "db_labels_training": "train_labels.csv",
            "db_labels_test": "test_labels.csv",
            "mrmr": "mrmr.csv",
            "n_tuples": 4,
            "n_features": {max_features},
            "n_classes": 2,
            "mode": "{mode}",
            "max_features": {max_features},
            "chunk_size": {chunk_size},
            "k_min": {k_min},
            "k_max": {k_max}
        }}"#
    ))
    .expect("fixture config must be well-formed")
}

#[test]
fn trivial_separation_picks_the_smallest_winning_k_and_f() {
    let (rows, labels) = fixtures::trivial_separation();
    let data = LabeledSet::new(Matrix::from_rows(rows).unwrap(), labels).unwrap();

    let candidates = run_sweep(&data, &data, &[1, 2], 1, 1, Metric::Euclidean);
    let winner = best(candidates).unwrap();

    assert_eq!(winner.correct_count(), 4);
    assert_eq!(winner.k(), 1);
    assert_eq!(winner.f(), 1);
}

#[test]
fn ambiguous_boundary_breaks_ties_by_training_index() {
    let ((rows, labels), query) = fixtures::ambiguous_boundary();
    let training = LabeledSet::new(Matrix::from_rows(rows).unwrap(), labels).unwrap();
    let test_matrix = Matrix::from_rows(vec![query]).unwrap();

    let ranked = rank_neighbors(&training, &test_matrix, 0, 1, Metric::Euclidean, 2);
    assert_eq!(ranked[0].train_index(), 0);
    assert_eq!(majority_vote(&ranked, 1), 0);
}

#[test]
fn mrmr_sensitivity_prefers_the_informative_feature_once_permuted() {
    let (training_rows, training_labels, permutation_indices, test_rows, test_labels) =
        fixtures::mrmr_sensitivity();
    let permutation = MrmrPermutation::new(permutation_indices).unwrap();

    let raw_training = LabeledSet::new(Matrix::from_rows(training_rows).unwrap(), training_labels).unwrap();
    let raw_test = LabeledSet::new(Matrix::from_rows(test_rows).unwrap(), test_labels).unwrap();
    let training = LabeledSet::new(
        raw_training.matrix().permute_columns(&permutation).unwrap(),
        raw_training.labels().to_vec(),
    )
    .unwrap();
    let test = LabeledSet::new(
        raw_test.matrix().permute_columns(&permutation).unwrap(),
        raw_test.labels().to_vec(),
    )
    .unwrap();

    let candidates = run_sweep(&training, &test, &[1, 2, 3], 1, 1, Metric::Euclidean);
    let winner = best(candidates.clone()).unwrap();

    assert_eq!(winner.f(), 1);
    assert_eq!(winner.correct_count(), 2);

    let at_f2 = candidates.iter().find(|candidate| candidate.f() == 2).expect("f=2 must be present");
    assert_eq!(at_f2.correct_count(), 0);
}

#[test]
fn sweep_sharing_reuses_one_ranking_per_test_point_across_every_k() {
    let (rows, labels) = fixtures::trivial_separation();
    let data = LabeledSet::new(Matrix::from_rows(rows).unwrap(), labels).unwrap();

    // Mirrors C4's own shape: rank each test point exactly once per f, then
    // reuse that ranking for every k in range, rather than re-ranking per k.
    let ranking_calls = Arc::new(AtomicUsize::new(0));
    let mut expected = vec![0u32; 3];
    for test_index in 0..data.matrix().rows() {
        ranking_calls.fetch_add(1, Ordering::SeqCst);
        let ranked = rank_neighbors(&data, data.matrix(), test_index, 1, Metric::Euclidean, 3);
        let truth = data.labels()[test_index];
        for (k_idx, k) in (1..=3).enumerate() {
            if majority_vote(&ranked, k) == truth {
                expected[k_idx] += 1;
            }
        }
    }
    assert_eq!(ranking_calls.load(Ordering::SeqCst), data.matrix().rows());

    let candidates = run_sweep(&data, &data, &[1], 1, 3, Metric::Euclidean);
    assert_eq!(candidates.len(), 3);
    for candidate in &candidates {
        assert_eq!(candidate.correct_count(), expected[candidate.k() - 1]);
    }
}

#[test]
fn chunk_boundary_tiles_the_f_range_and_terminates_cleanly() {
    let (max_features, chunk_size) = fixtures::chunk_boundary();
    assert_eq!((max_features, chunk_size), (10, 3));

    let rows = vec![vec![0.0; max_features], vec![1.0; max_features]];
    let training = LabeledSet::new(Matrix::from_rows(rows).unwrap(), vec![0, 1]).unwrap();

    let worker_count = 3;
    let (mut master, mut workers) = knn_core::channel_transport(worker_count);
    let worker_handles: Vec<_> = workers
        .drain(..)
        .map(|mut worker| {
            let training = training.clone();
            std::thread::spawn(move || {
                run_worker(
                    &mut worker,
                    &training,
                    &training,
                    max_features,
                    chunk_size,
                    1,
                    1,
                    Metric::Euclidean,
                    None,
                    0,
                );
            })
        })
        .collect();

    let winner: Candidate = run_master(&mut master, worker_count, max_features, chunk_size);
    for handle in worker_handles {
        handle.join().unwrap();
    }

    // Both points separate perfectly at every f, so the winner's f must be
    // the smallest available (1) and correct_count must cover both rows.
    assert_eq!(winner.f(), 1);
    assert_eq!(winner.correct_count(), 2);
}

#[test]
fn homo_and_hetero_modes_agree_on_the_trivial_fixture() {
    let cfg_homo = config("homo", 2, 1, 1, 1);
    let cfg_hetero = config("hetero", 2, 1, 1, 1);
    let (rows, labels) = fixtures::trivial_separation();
    let training = LabeledSet::new(Matrix::from_rows(rows).unwrap(), labels).unwrap();

    let homo_outcome = knn_core::run(&cfg_homo, training.clone(), training.clone(), 2);
    let hetero_outcome = knn_core::run(&cfg_hetero, training.clone(), training, 2);

    assert_eq!(homo_outcome.winner, hetero_outcome.winner);
}
