/// Computes the Euclidean distance: √Σ (a[i] − b[i])².
///
/// Accumulates in `f64` to keep the sum stable across long feature prefixes
/// before narrowing back to `f32`, then takes the square root — the square
/// root is kept (rather than comparing squared distances) for numeric
/// compatibility with downstream tests, per §4.1.
///
/// # Examples
/// ```
/// use knn_core::euclidean_distance;
///
/// let distance = euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 6.0, 8.0]);
/// assert!((distance - 7.071_068).abs() < 1e-5);
/// ```
#[must_use]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let diff = f64::from(x) - f64::from(y);
        sum += diff * diff;
    }
    sum.sqrt() as f32
}
