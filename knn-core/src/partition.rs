//! Homogeneous partitioner (C5): a static stride split of the f-range across
//! ranks, with a deterministic rank-0 reduction.

use crate::candidate::{best, Candidate};
use crate::dataset::LabeledSet;
use crate::distance::Metric;
use crate::sweep::run_sweep;

/// Returns the feature-prefix values rank `rank` of `world_size` examines:
/// `{1 + rank, 1 + rank + world_size, …} ∩ [1, max_features]` (§4.5).
///
/// # Panics
/// Panics if `rank >= world_size` or `world_size` is zero — both caller
/// violations; the bootstrap never constructs an out-of-range rank.
#[must_use]
pub fn assigned_features(rank: usize, world_size: usize, max_features: usize) -> Vec<usize> {
    assert!(world_size > 0, "world_size must be non-zero");
    assert!(rank < world_size, "rank must be < world_size");

    (1..=max_features)
        .skip(rank)
        .step_by(world_size)
        .collect()
}

/// Runs C4 over this rank's assigned f-values and returns its local best
/// candidate, or `None` if no f-value was assigned (possible when
/// `world_size > max_features`).
#[must_use]
pub fn local_best(
    training: &LabeledSet,
    test: &LabeledSet,
    rank: usize,
    world_size: usize,
    max_features: usize,
    k_min: usize,
    k_max: usize,
    metric: Metric,
) -> Option<Candidate> {
    let f_values = assigned_features(rank, world_size, max_features);
    if f_values.is_empty() {
        return None;
    }
    let candidates = run_sweep(training, test, &f_values, k_min, k_max, metric);
    best(candidates)
}

/// Reduces every rank's local best candidate to the single global winner.
///
/// Applies the same [`Candidate`] ordering used at every other reduction
/// step (§4.5, §8 invariant 7), so the result does not depend on how many
/// ranks contributed or in what order their candidates arrive here.
#[must_use]
pub fn reduce(local_bests: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    best(local_bests)
}
