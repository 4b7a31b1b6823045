//! Majority voter (C3): the most frequent label among the first k ranked
//! neighbours, with a deterministic, reproducible tie-break.

use std::collections::HashMap;

use crate::ranker::RankedNeighbor;

#[derive(Clone, Copy, Default)]
struct Tally {
    count: u32,
    cumulative_distance: f64,
}

/// Returns the most frequent label among `ranked[..k]`.
///
/// Ties are broken by the smallest cumulative distance among the tied
/// labels (§4.3) — not the source's `std::map<unsigned int, int,
/// std::greater<int>>` ordering, which happens to favour the numerically
/// largest label id and is explicitly not reproduced here (see `DESIGN.md`).
/// A residual tie (equal count and equal cumulative distance) falls back to
/// the smallest label id, keeping the result fully reproducible.
///
/// Depends only on `ranked[..k]`, satisfying voter idempotence (§8, invariant
/// 4): the exact slice is re-taken on every call rather than memoised.
///
/// # Panics
/// Panics if `k` is zero or exceeds `ranked.len()` — both are caller
/// violations; C4 never calls this outside `[k_min, k_max]` against a
/// `k_max`-sized ranked list.
#[must_use]
pub fn majority_vote(ranked: &[RankedNeighbor], k: usize) -> u32 {
    assert!(k > 0 && k <= ranked.len(), "k must be in [1, ranked.len()]");

    let mut tallies: HashMap<u32, Tally> = HashMap::new();
    for neighbor in &ranked[..k] {
        let tally = tallies.entry(neighbor.label()).or_default();
        tally.count += 1;
        tally.cumulative_distance += f64::from(neighbor.distance());
    }

    tallies
        .into_iter()
        .min_by(|(label_a, tally_a), (label_b, tally_b)| {
            tally_b
                .count
                .cmp(&tally_a.count)
                .then_with(|| tally_a.cumulative_distance.total_cmp(&tally_b.cumulative_distance))
                .then_with(|| label_a.cmp(label_b))
        })
        .map(|(label, _)| label)
        .expect("ranked[..k] is non-empty so at least one label was tallied")
}
