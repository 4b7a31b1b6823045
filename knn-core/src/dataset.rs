//! Row-major matrices, label vectors, and the MRMR permutation.
//!
//! Preserves the flat, cache-friendly row-major storage of the source while
//! replacing raw pointer arithmetic at component boundaries with an explicit
//! `(base, row_stride, row_index, length)` tuple, realised here as
//! [`Matrix::row_prefix`].

use std::fmt;

use thiserror::Error;

/// Stable codes describing [`DatasetError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum DatasetErrorCode {
    /// A row did not have the matrix's declared column count.
    ColumnCountMismatch,
    /// A matrix or label vector contained no rows.
    Empty,
    /// The training and test sets disagreed on feature count.
    FeatureCountMismatch,
    /// The label vector's length did not match the matrix's row count.
    LabelCountMismatch,
    /// A permutation was not a bijection on `[0, len)`.
    NotAPermutation,
    /// A requested feature prefix length exceeded the matrix's column count.
    PrefixTooLong,
}

impl DatasetErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColumnCountMismatch => "DATASET_COLUMN_COUNT_MISMATCH",
            Self::Empty => "DATASET_EMPTY",
            Self::FeatureCountMismatch => "DATASET_FEATURE_COUNT_MISMATCH",
            Self::LabelCountMismatch => "DATASET_LABEL_COUNT_MISMATCH",
            Self::NotAPermutation => "DATASET_NOT_A_PERMUTATION",
            Self::PrefixTooLong => "DATASET_PREFIX_TOO_LONG",
        }
    }
}

impl fmt::Display for DatasetErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while constructing or querying a [`Matrix`], label vector, or
/// [`MrmrPermutation`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DatasetError {
    /// A row did not have the matrix's declared column count.
    #[error("row {row} has {found} columns, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },
    /// A matrix or label vector contained no rows.
    #[error("{what} contains no rows")]
    Empty { what: &'static str },
    /// Training and test feature counts disagreed.
    #[error("training has {training} features but test has {test}")]
    FeatureCountMismatch { training: usize, test: usize },
    /// The label vector's length did not match the matrix's row count.
    #[error("{what} has {rows} rows but {labels} labels")]
    LabelCountMismatch {
        what: &'static str,
        rows: usize,
        labels: usize,
    },
    /// A permutation was not a bijection on `[0, len)`.
    #[error("permutation of length {len} is not a bijection on [0, {len})")]
    NotAPermutation { len: usize },
    /// A requested feature prefix length exceeded the matrix's column count.
    #[error("prefix length {f} exceeds {columns} columns")]
    PrefixTooLong { f: usize, columns: usize },
}

impl DatasetError {
    /// Retrieve the stable [`DatasetErrorCode`] for this error.
    pub const fn code(&self) -> DatasetErrorCode {
        match self {
            Self::ColumnCountMismatch { .. } => DatasetErrorCode::ColumnCountMismatch,
            Self::Empty { .. } => DatasetErrorCode::Empty,
            Self::FeatureCountMismatch { .. } => DatasetErrorCode::FeatureCountMismatch,
            Self::LabelCountMismatch { .. } => DatasetErrorCode::LabelCountMismatch,
            Self::NotAPermutation { .. } => DatasetErrorCode::NotAPermutation,
            Self::PrefixTooLong { .. } => DatasetErrorCode::PrefixTooLong,
        }
    }
}

/// A contiguous, row-major `f32` matrix of shape `(rows, columns)`.
///
/// Owns the flat backing buffer; read-only after construction and shared by
/// reference across worker threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    columns: usize,
}

impl Matrix {
    /// Builds a matrix from flat row-major data, validating that `data.len()`
    /// is an exact multiple of `columns`.
    ///
    /// # Errors
    /// Returns [`DatasetError::Empty`] if `data` or `columns` is zero, or
    /// [`DatasetError::ColumnCountMismatch`] if `data.len()` is not a
    /// multiple of `columns`.
    pub fn from_flat(data: Vec<f32>, columns: usize) -> Result<Self, DatasetError> {
        if columns == 0 || data.is_empty() {
            return Err(DatasetError::Empty { what: "matrix" });
        }
        if data.len() % columns != 0 {
            return Err(DatasetError::ColumnCountMismatch {
                row: data.len() / columns,
                found: data.len() % columns,
                expected: columns,
            });
        }
        Ok(Self { data, columns })
    }

    /// Builds a matrix from per-row vectors, validating uniform column count.
    ///
    /// # Errors
    /// Returns [`DatasetError::Empty`] if `rows` is empty, or
    /// [`DatasetError::ColumnCountMismatch`] if any row's length differs from
    /// the first row's.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, DatasetError> {
        let columns = rows.first().ok_or(DatasetError::Empty { what: "matrix" })?.len();
        if columns == 0 {
            return Err(DatasetError::Empty { what: "matrix" });
        }
        let mut data = Vec::with_capacity(rows.len() * columns);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != columns {
                return Err(DatasetError::ColumnCountMismatch {
                    row: index,
                    found: row.len(),
                    expected: columns,
                });
            }
            data.extend(row);
        }
        Ok(Self { data, columns })
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len() / self.columns
    }

    /// Number of columns (features) per row.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Returns the first `f` columns of row `row_index`, the
    /// `(base, row_stride, row_index, length)` tuple of §9 made concrete: the
    /// base and stride live in `self`, the row index and length are the call
    /// site's only explicit parameters.
    ///
    /// # Errors
    /// Returns [`DatasetError::PrefixTooLong`] if `f` exceeds `self.columns()`.
    pub fn row_prefix(&self, row_index: usize, f: usize) -> Result<&[f32], DatasetError> {
        if f > self.columns {
            return Err(DatasetError::PrefixTooLong {
                f,
                columns: self.columns,
            });
        }
        let start = row_index * self.columns;
        Ok(&self.data[start..start + f])
    }

    /// Returns a full row.
    ///
    /// # Errors
    /// Propagates [`Matrix::row_prefix`]'s errors; never fails for a valid
    /// `row_index` since `f == self.columns()`.
    pub fn row(&self, row_index: usize) -> Result<&[f32], DatasetError> {
        self.row_prefix(row_index, self.columns)
    }

    /// Returns a new matrix whose columns are permuted by `permutation`,
    /// implementing `row'[r] = row[π[r]]` of §3.
    ///
    /// # Errors
    /// Propagates [`DatasetError`] if `permutation`'s length does not match
    /// `self.columns()`.
    pub fn permute_columns(&self, permutation: &MrmrPermutation) -> Result<Self, DatasetError> {
        if permutation.len() != self.columns {
            return Err(DatasetError::FeatureCountMismatch {
                training: self.columns,
                test: permutation.len(),
            });
        }
        let mut data = Vec::with_capacity(self.data.len());
        for row in 0..self.rows() {
            let source = self.row(row)?;
            for &index in permutation.indices() {
                data.push(source[index]);
            }
        }
        Self::from_flat(data, self.columns)
    }

    /// Normalizes every column to `[0, 1]` via min-max scaling, matching the
    /// `normalize` configuration flag of §3. Columns with zero range are left
    /// unchanged (every value in the column is already identical).
    #[must_use]
    pub fn min_max_normalized(&self) -> Self {
        let columns = self.columns;
        let rows = self.rows();
        let mut mins = vec![f32::INFINITY; columns];
        let mut maxs = vec![f32::NEG_INFINITY; columns];
        for row in 0..rows {
            let start = row * columns;
            for col in 0..columns {
                let value = self.data[start + col];
                mins[col] = mins[col].min(value);
                maxs[col] = maxs[col].max(value);
            }
        }
        let mut data = self.data.clone();
        for row in 0..rows {
            let start = row * columns;
            for col in 0..columns {
                let range = maxs[col] - mins[col];
                if range > 0.0 {
                    data[start + col] = (data[start + col] - mins[col]) / range;
                }
            }
        }
        Self { data, columns }
    }
}

/// A bijective permutation of feature indices, importance descending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MrmrPermutation {
    indices: Vec<usize>,
}

impl MrmrPermutation {
    /// Validates that `indices` is a bijection on `[0, indices.len())`.
    ///
    /// # Errors
    /// Returns [`DatasetError::NotAPermutation`] otherwise.
    pub fn new(indices: Vec<usize>) -> Result<Self, DatasetError> {
        let len = indices.len();
        let mut seen = vec![false; len];
        for &index in &indices {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(DatasetError::NotAPermutation { len }),
            }
        }
        Ok(Self { indices })
    }

    /// Number of features covered by this permutation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the permutation covers zero features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The ordered indices, importance descending.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// A labeled set of rows: a [`Matrix`] paired with one label per row.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSet {
    matrix: Matrix,
    labels: Vec<u32>,
}

impl LabeledSet {
    /// Pairs `matrix` with `labels`, validating that every row has a label.
    ///
    /// # Errors
    /// Returns [`DatasetError::LabelCountMismatch`] if the counts disagree.
    pub fn new(matrix: Matrix, labels: Vec<u32>) -> Result<Self, DatasetError> {
        if matrix.rows() != labels.len() {
            return Err(DatasetError::LabelCountMismatch {
                what: "labeled set",
                rows: matrix.rows(),
                labels: labels.len(),
            });
        }
        Ok(Self { matrix, labels })
    }

    /// The underlying feature matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// The label vector, one entry per row of [`LabeledSet::matrix`].
    #[must_use]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of rows (equivalently, number of labels).
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set has zero rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{prop_assert_eq, prop_assume, proptest};

    #[test]
    fn row_prefix_returns_the_first_f_columns() {
        let matrix = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(matrix.row_prefix(1, 2).unwrap(), &[4.0, 5.0]);
    }

    #[test]
    fn row_prefix_rejects_overlong_prefixes() {
        let matrix = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let err = matrix.row_prefix(0, 3).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::PrefixTooLong);
    }

    #[test]
    fn permute_columns_reorders_by_importance() {
        let matrix = Matrix::from_rows(vec![vec![10.0, 20.0, 30.0]]).unwrap();
        let permutation = MrmrPermutation::new(vec![2, 0, 1]).unwrap();
        let permuted = matrix.permute_columns(&permutation).unwrap();
        assert_eq!(permuted.row(0).unwrap(), &[30.0, 10.0, 20.0]);
    }

    #[test]
    fn permutation_rejects_duplicate_indices() {
        let err = MrmrPermutation::new(vec![0, 0, 1]).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::NotAPermutation);
    }

    #[test]
    fn min_max_normalized_scales_each_column_into_unit_range() {
        let matrix = Matrix::from_rows(vec![vec![0.0, 5.0], vec![10.0, 5.0]]).unwrap();
        let normalized = matrix.min_max_normalized();
        assert_eq!(normalized.row(0).unwrap(), &[0.0, 5.0]);
        assert_eq!(normalized.row(1).unwrap(), &[1.0, 5.0]);
    }

    proptest! {
        // Invariant 1 (DESIGN.md): `permute_columns` implements
        // `row'[j] == row[π[j]]` for an arbitrary bijection on arbitrary rows.
        #[test]
        fn permute_columns_matches_the_permutation_definition(
            columns in 1usize..6,
            keys in proptest::collection::vec(0u32..1000, 1..6),
            row in proptest::collection::vec(-100.0f32..100.0, 1..6),
        ) {
            let columns = columns.min(keys.len()).min(row.len());
            prop_assume!(columns > 0);
            let keys = &keys[..columns];
            let row = &row[..columns];

            let mut indices: Vec<usize> = (0..columns).collect();
            indices.sort_by_key(|&i| keys[i]);
            let permutation = MrmrPermutation::new(indices.clone()).unwrap();

            let matrix = Matrix::from_rows(vec![row.to_vec()]).unwrap();
            let permuted = matrix.permute_columns(&permutation).unwrap();
            let permuted_row = permuted.row(0).unwrap();

            for (j, &pi_j) in indices.iter().enumerate() {
                prop_assert_eq!(permuted_row[j], row[pi_j]);
            }
        }
    }
}
