//! Scorer & confusion (C7): classification and confusion-matrix reporting at
//! a fixed, already-optimal (k, f).

use rayon::prelude::*;

use crate::dataset::LabeledSet;
use crate::distance::Metric;
use crate::ranker::rank_neighbors;
use crate::voter::majority_vote;

/// A `classes × classes` non-negative integer confusion matrix: entry
/// `[true][predicted]` counts points of that true/predicted pair (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfusionMatrix {
    classes: usize,
    counts: Vec<u32>,
}

impl ConfusionMatrix {
    fn new(classes: usize) -> Self {
        Self {
            classes,
            counts: vec![0; classes * classes],
        }
    }

    fn record(&mut self, truth: u32, predicted: u32) {
        let row = truth as usize;
        let col = predicted as usize;
        self.counts[row * self.classes + col] += 1;
    }

    /// The count of points with true class `truth` predicted as `predicted`.
    #[must_use]
    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.classes + predicted]
    }

    /// The declared number of classes (matrix side length).
    #[must_use]
    pub const fn classes(&self) -> usize {
        self.classes
    }

    /// Sum of every entry, i.e. the number of points classified.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// The outcome of scoring a dataset at a fixed (k, f): per-row predictions, a
/// correct count, and the full confusion matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreReport {
    predictions: Vec<u32>,
    correct_count: u32,
    confusion: ConfusionMatrix,
}

impl ScoreReport {
    /// The predicted label for each row, in row order.
    #[must_use]
    pub fn predictions(&self) -> &[u32] {
        &self.predictions
    }

    /// Count of rows whose prediction matched their true label.
    #[must_use]
    pub const fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// `correct_count` as a fraction of the number of rows classified, or
    /// `0.0` for an empty report (never produced by [`score`], which rejects
    /// empty inputs up front, but kept total for callers constructing a
    /// report by hand).
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.predictions.is_empty() {
            0.0
        } else {
            f64::from(self.correct_count) / self.predictions.len() as f64
        }
    }

    #[must_use]
    pub const fn confusion(&self) -> &ConfusionMatrix {
        &self.confusion
    }
}

/// Classifies every row of `queries` against `training` at the fixed prefix
/// length `f` and neighbour count `k`, returning predictions, the correct
/// count, and the confusion matrix (§4.7).
///
/// Calling this with `queries` set to `training` itself yields the
/// train-as-test overfitting diagnostic of §4.7; the function does not treat
/// that case specially.
///
/// # Panics
/// Panics if `queries` or `training` is empty, or if any label in either set
/// is `>= classes` — both caller violations; the pipeline always supplies a
/// `classes` bound covering every label actually present.
#[must_use]
pub fn score(
    training: &LabeledSet,
    queries: &LabeledSet,
    k: usize,
    f: usize,
    metric: Metric,
    classes: usize,
) -> ScoreReport {
    assert!(!training.is_empty(), "training set must be non-empty");
    assert!(!queries.is_empty(), "queries must be non-empty");

    let predictions: Vec<u32> = (0..queries.matrix().rows())
        .into_par_iter()
        .map(|index| {
            let ranked = rank_neighbors(training, queries.matrix(), index, f, metric, k);
            majority_vote(&ranked, k)
        })
        .collect();

    let mut confusion = ConfusionMatrix::new(classes);
    let mut correct_count = 0u32;
    for (index, &predicted) in predictions.iter().enumerate() {
        let truth = queries.labels()[index];
        confusion.record(truth, predicted);
        if predicted == truth {
            correct_count += 1;
        }
    }

    ScoreReport {
        predictions,
        correct_count,
        confusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Matrix;
    use proptest::{prop_assert_eq, proptest};
    use std::collections::HashMap;

    fn fixture() -> LabeledSet {
        LabeledSet::new(
            Matrix::from_rows(vec![
                vec![0.0, 0.0],
                vec![0.1, 0.1],
                vec![10.0, 10.0],
                vec![10.1, 10.1],
            ])
            .unwrap(),
            vec![0, 0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn perfectly_separated_classes_are_scored_without_error() {
        let data = fixture();
        let report = score(&data, &data, 1, 2, Metric::Euclidean, 2);
        assert_eq!(report.correct_count(), 4);
        assert!((report.accuracy() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn confusion_matrix_sums_to_the_number_of_queries() {
        let data = fixture();
        let report = score(&data, &data, 1, 2, Metric::Euclidean, 2);
        assert_eq!(report.confusion().total(), 4);
    }

    #[test]
    fn confusion_matrix_places_correct_predictions_on_the_diagonal() {
        let data = fixture();
        let report = score(&data, &data, 1, 2, Metric::Euclidean, 2);
        assert_eq!(report.confusion().get(0, 0), 2);
        assert_eq!(report.confusion().get(1, 1), 2);
        assert_eq!(report.confusion().get(0, 1), 0);
    }

    proptest! {
        // Invariant 8 (DESIGN.md): the confusion matrix's total equals the
        // number of queries, and each true-class row sums to that class's
        // count among the queries, for arbitrary two-class point clouds.
        #[test]
        fn confusion_matrix_totals_match_query_counts(
            values in proptest::collection::vec(-50.0f32..50.0, 2..12),
            labels in proptest::collection::vec(0u32..2, 2..12),
        ) {
            let n = values.len().min(labels.len());
            let values = &values[..n];
            let labels = &labels[..n];

            let data = LabeledSet::new(
                Matrix::from_rows(values.iter().map(|&value| vec![value]).collect()).unwrap(),
                labels.to_vec(),
            ).unwrap();
            let report = score(&data, &data, 1, 1, Metric::Euclidean, 2);

            prop_assert_eq!(report.confusion().total(), n as u32);

            let mut expected_per_class: HashMap<u32, u32> = HashMap::new();
            for &label in labels {
                *expected_per_class.entry(label).or_default() += 1;
            }
            for truth in 0..2 {
                let row_sum: u32 = (0..2).map(|predicted| report.confusion().get(truth, predicted)).sum();
                prop_assert_eq!(row_sum, *expected_per_class.get(&(truth as u32)).unwrap_or(&0));
            }
        }
    }
}
