/// Computes the Manhattan distance: Σ |a[i] − b[i]|.
///
/// The source exposes two incompatible argument orders for this function
/// across its historical revisions (see §9, open question 2); this is the
/// single consistent shape `(a, b)` shared with [`super::euclidean_distance`].
///
/// # Examples
/// ```
/// use knn_core::manhattan_distance;
///
/// let distance = manhattan_distance(&[1.0, 2.0, 3.0], &[4.0, 0.0, 3.0]);
/// assert_eq!(distance, 5.0);
/// ```
#[must_use]
pub fn manhattan_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).abs()).sum()
}
