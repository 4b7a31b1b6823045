//! Neighbour ranker (C2): the k_max smallest (distance, label) pairs for one
//! test row, in ascending distance order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::dataset::{LabeledSet, Matrix};
use crate::distance::Metric;

/// One entry of a ranked neighbour list: a training point's distance to the
/// query row, its label, and its original row index (used only to break
/// distance ties deterministically).
#[derive(Clone, Copy, Debug)]
pub struct RankedNeighbor {
    distance: f32,
    label: u32,
    train_index: usize,
}

impl RankedNeighbor {
    /// Distance from the query row to this training row.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// The training row's label.
    #[must_use]
    pub const fn label(&self) -> u32 {
        self.label
    }

    /// The training row's index, used to break distance ties (smaller index
    /// wins, per §4.2).
    #[must_use]
    pub const fn train_index(&self) -> usize {
        self.train_index
    }
}

impl PartialEq for RankedNeighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedNeighbor {}

impl PartialOrd for RankedNeighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedNeighbor {
    /// Orders ascending by distance, then ascending by training index, so
    /// that a max-heap of bounded capacity evicts the farthest (and, on a
    /// distance tie, the later-inserted) candidate first — preserving the
    /// "smaller training index wins ties" rule of §4.2 among survivors.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.train_index.cmp(&other.train_index))
    }
}

/// For test row `test_index` at feature prefix `f`, returns the `k_max`
/// smallest (distance, label) pairs among `training`'s rows, ascending by
/// distance and tie-broken by ascending training index.
///
/// Uses a bounded [`BinaryHeap`] of capacity `k_max` updated in one
/// `O(N log k_max)` pass rather than a full `O(N log N)` sort, per §4.2's
/// preferred shape.
///
/// # Panics
/// Panics if `f` exceeds either matrix's column count, or if `test_index` or
/// any training row index is out of bounds — both are caller violations per
/// §4.1/§4.2, not recoverable input errors.
#[must_use]
pub fn rank_neighbors(
    training: &LabeledSet,
    test_matrix: &Matrix,
    test_index: usize,
    f: usize,
    metric: Metric,
    k_max: usize,
) -> Vec<RankedNeighbor> {
    let query = test_matrix
        .row_prefix(test_index, f)
        .expect("test row prefix must be in bounds");
    let mut heap: BinaryHeap<RankedNeighbor> = BinaryHeap::with_capacity(k_max);

    for train_index in 0..training.matrix().rows() {
        let candidate = training
            .matrix()
            .row_prefix(train_index, f)
            .expect("training row prefix must be in bounds");
        let distance = metric.distance(query, candidate);
        let label = training.labels()[train_index];
        heap.push(RankedNeighbor {
            distance,
            label,
            train_index,
        });
        if heap.len() > k_max {
            heap.pop();
        }
    }

    heap.into_sorted_vec()
}
