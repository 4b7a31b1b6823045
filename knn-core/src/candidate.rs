//! Hyperparameter candidates and the global ordering used to pick a winner
//! (C5's homogeneous reduction, C6's heterogeneous reduction across workers).

use std::cmp::Ordering;

/// One (k, f) point of the sweep grid together with the score it achieved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Candidate {
    k: usize,
    f: usize,
    correct_count: u32,
}

impl Candidate {
    #[must_use]
    pub const fn new(k: usize, f: usize, correct_count: u32) -> Self {
        Self { k, f, correct_count }
    }

    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub const fn f(&self) -> usize {
        self.f
    }

    #[must_use]
    pub const fn correct_count(&self) -> u32 {
        self.correct_count
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    /// The single global ordering used everywhere a winner must be picked:
    /// highest `correct_count` first; ties broken by smaller `f`, then by
    /// smaller `k` (§3). Applying this same rule at every reduction step
    /// (per-worker, then across workers) is what makes the overall result
    /// independent of the partition and of `world_size` (§8, invariant 7).
    fn cmp(&self, other: &Self) -> Ordering {
        self.correct_count
            .cmp(&other.correct_count)
            .then_with(|| other.f.cmp(&self.f))
            .then_with(|| other.k.cmp(&self.k))
    }
}

/// Returns the best candidate in `candidates` under the global ordering, or
/// `None` if `candidates` is empty.
#[must_use]
pub fn best(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    candidates.into_iter().max()
}
