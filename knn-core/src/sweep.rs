//! Hyperparameter sweep evaluator (C4): scores every (k, f) pair in a
//! worker's assigned feature-prefix slice against the shared test set.

use rayon::prelude::*;

use crate::candidate::Candidate;
use crate::dataset::LabeledSet;
use crate::distance::Metric;
use crate::ranker::rank_neighbors;
use crate::voter::majority_vote;

/// Scores every (k, f) pair for `f` in `f_values` and `k` in
/// `[k_min, k_max]`, returning one [`Candidate`] per pair.
///
/// For a fixed `f`, every test row's `k_max`-length ranked neighbour list
/// (C2) is computed once and reused to score every `k` in the range (§4.4):
/// the ranking is the expensive step, and it does not depend on `k`.
///
/// Test rows are scored independently, so the per-row work is distributed
/// across threads with `rayon` and combined with a running grid sum — the
/// grid, not the individual comparisons, is the unit of reduction, matching
/// how correctness counts compose: order of summation does not affect the
/// total.
///
/// # Panics
/// Panics if `f_values` is empty, `training`/`test` are empty, or
/// `k_min > k_max` — all caller violations; the partitioner (C5) never
/// produces an empty or inverted slice.
#[must_use]
pub fn run_sweep(
    training: &LabeledSet,
    test: &LabeledSet,
    f_values: &[usize],
    k_min: usize,
    k_max: usize,
    metric: Metric,
) -> Vec<Candidate> {
    assert!(!f_values.is_empty(), "f_values must be non-empty");
    assert!(!training.is_empty(), "training set must be non-empty");
    assert!(!test.is_empty(), "test set must be non-empty");
    assert!(k_min > 0 && k_min <= k_max, "k_min must be in [1, k_max]");

    let k_span = k_max - k_min + 1;
    let zero_grid = || vec![vec![0u32; k_span]; f_values.len()];

    let grid = (0..test.matrix().rows())
        .into_par_iter()
        .fold(zero_grid, |mut grid, test_index| {
            let true_label = test.labels()[test_index];
            for (f_idx, &f) in f_values.iter().enumerate() {
                let ranked = rank_neighbors(training, test.matrix(), test_index, f, metric, k_max);
                for (k_idx, k) in (k_min..=k_max).enumerate() {
                    if majority_vote(&ranked, k) == true_label {
                        grid[f_idx][k_idx] += 1;
                    }
                }
            }
            grid
        })
        .reduce(zero_grid, |mut a, b| {
            for (row_a, row_b) in a.iter_mut().zip(b.iter()) {
                for (count_a, count_b) in row_a.iter_mut().zip(row_b.iter()) {
                    *count_a += count_b;
                }
            }
            a
        });

    f_values
        .iter()
        .zip(grid.iter())
        .flat_map(|(&f, counts)| {
            (k_min..=k_max)
                .zip(counts.iter())
                .map(move |(k, &correct_count)| Candidate::new(k, f, correct_count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::best;
    use crate::dataset::Matrix;

    fn fixture() -> (LabeledSet, LabeledSet) {
        let training = LabeledSet::new(
            Matrix::from_rows(vec![
                vec![0.0, 0.0],
                vec![0.1, 0.1],
                vec![5.0, 5.0],
                vec![5.1, 5.1],
            ])
            .unwrap(),
            vec![0, 0, 1, 1],
        )
        .unwrap();
        let test = LabeledSet::new(
            Matrix::from_rows(vec![vec![0.05, 0.05], vec![5.05, 5.05]]).unwrap(),
            vec![0, 1],
        )
        .unwrap();
        (training, test)
    }

    #[test]
    fn perfectly_separated_classes_score_full_marks() {
        let (training, test) = fixture();
        let candidates = run_sweep(&training, &test, &[1, 2], 1, 2, Metric::Euclidean);
        assert_eq!(candidates.len(), 4);
        let winner = best(candidates).unwrap();
        assert_eq!(winner.correct_count(), 2);
    }

    #[test]
    fn covers_every_requested_f_and_k_pair() {
        let (training, test) = fixture();
        let candidates = run_sweep(&training, &test, &[1, 2], 1, 3.min(training.matrix().rows()), Metric::Manhattan);
        let mut pairs: Vec<(usize, usize)> = candidates.iter().map(|c| (c.f(), c.k())).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]);
    }
}
