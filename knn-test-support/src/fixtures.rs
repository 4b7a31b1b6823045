//! Literal small fixtures shared by the end-to-end scenario tests.
//!
//! Plain `Vec`/row data rather than domain types: this crate is a dependency
//! of every other member, so it cannot depend back on the crate that owns
//! `Matrix`/`LabeledSet` without a cycle. Each fixture's caller wraps the
//! rows in its own types.

/// Two well-separated 2-feature classes, four points each set: trivial
/// separation, the `k*=1, f*=1` case.
#[must_use]
pub fn trivial_separation() -> (Vec<Vec<f32>>, Vec<u32>) {
    (
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
        ],
        vec![0, 0, 1, 1],
    )
}

/// One test point equidistant to two training points of different classes,
/// at index 0 and index 1 respectively — exercises the ascending-training-
/// index tie-break.
#[must_use]
pub fn ambiguous_boundary() -> ((Vec<Vec<f32>>, Vec<u32>), Vec<f32>) {
    (
        (vec![vec![-1.0], vec![1.0]], vec![0, 1]),
        vec![0.0],
    )
}

/// Three features where only feature index 2 is informative; feature 0 is
/// constructed so that, once it is included in the distance sum (f ≥ 2), it
/// overwhelms feature 2's small margin and flips the nearest-neighbour
/// decision. The MRMR permutation `[2, 0, 1]` brings the informative feature
/// to the front so `f* = 1` wins over `f = 2, 3` on accuracy.
///
/// Returns `(training_rows, training_labels, permutation, test_rows,
/// test_labels)`.
#[must_use]
#[expect(clippy::type_complexity, reason = "fixture tuple mirrors the five loose values its callers need")]
pub fn mrmr_sensitivity() -> (Vec<Vec<f32>>, Vec<u32>, Vec<usize>, Vec<Vec<f32>>, Vec<u32>) {
    let training = vec![
        vec![13.0, 0.0, 0.00],
        vec![7.0, 0.0, 0.10],
        vec![3.0, 0.0, 1.00],
        vec![17.0, 0.0, 1.10],
    ];
    let training_labels = vec![0, 0, 1, 1];
    let permutation = vec![2, 0, 1];
    let test = vec![vec![3.0, 0.0, 0.03], vec![7.5, 0.0, 1.07]];
    let test_labels = vec![0, 1];
    (training, training_labels, permutation, test, test_labels)
}

/// `max_features = 10`, `chunk_size = 3`: chunk bases `{1, 4, 7, 10}`, the
/// last chunk clipped to a single f-value.
#[must_use]
pub const fn chunk_boundary() -> (usize, usize) {
    (10, 3)
}
