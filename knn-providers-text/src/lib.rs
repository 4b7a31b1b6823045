//! Delimited-text reading of training/test feature matrices, label vectors,
//! and the MRMR permutation (§6's "out of scope" I/O collaborator, specified
//! here as a real crate per `DESIGN.md`).
//!
//! Per §6, a features file is "N rows of F whitespace- or comma-separated
//! floats"; a labels file is "N unsigned integers, one per row (or
//! comma-separated)"; an MRMR file is "F unsigned integers". All three share
//! one row-splitting rule, implemented once in [`split_fields`]: a comma
//! anywhere on the line selects comma-splitting for that line, otherwise
//! runs of whitespace are the separator.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Stable codes describing [`TextProviderError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TextProviderErrorCode {
    /// The file could not be opened or read.
    Io,
    /// The file contained no data rows.
    Empty,
    /// A row's field could not be parsed as the expected numeric type.
    MalformedField,
}

impl TextProviderErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "TEXT_PROVIDER_IO",
            Self::Empty => "TEXT_PROVIDER_EMPTY",
            Self::MalformedField => "TEXT_PROVIDER_MALFORMED_FIELD",
        }
    }
}

impl std::fmt::Display for TextProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while reading a delimited-text data file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TextProviderError {
    /// The file could not be opened or read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file contained no data rows.
    #[error("`{path}` contains no rows")]
    Empty {
        /// Path that was empty.
        path: PathBuf,
    },
    /// A row's field could not be parsed as the expected numeric type.
    #[error("`{path}` line {line}: cannot parse `{raw}` as a number")]
    MalformedField {
        /// Path containing the offending line.
        path: PathBuf,
        /// One-based line number of the offending row.
        line: usize,
        /// The raw field text that failed to parse.
        raw: String,
    },
}

impl TextProviderError {
    /// Retrieve the stable [`TextProviderErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> TextProviderErrorCode {
        match self {
            Self::Io { .. } => TextProviderErrorCode::Io,
            Self::Empty { .. } => TextProviderErrorCode::Empty,
            Self::MalformedField { .. } => TextProviderErrorCode::MalformedField,
        }
    }
}

/// Splits one line into its whitespace- or comma-separated fields (§6): a
/// comma anywhere on the line selects comma-splitting, otherwise runs of
/// whitespace separate fields.
fn split_fields(line: &str) -> Vec<&str> {
    if line.contains(',') {
        line.split(',').map(str::trim).filter(|field| !field.is_empty()).collect()
    } else {
        line.split_whitespace().collect()
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, TextProviderError> {
    let contents = fs::read_to_string(path).map_err(|source| TextProviderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if lines.is_empty() {
        return Err(TextProviderError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(lines)
}

/// Reads a features file: N rows of whitespace- or comma-separated `f32`
/// values, returned as per-row vectors (handed to
/// [`knn_core::Matrix::from_rows`] by the caller, which validates uniform
/// column count).
///
/// # Errors
/// Returns [`TextProviderError::Io`] if the file cannot be read,
/// [`TextProviderError::Empty`] if it contains no rows, or
/// [`TextProviderError::MalformedField`] if a field does not parse as `f32`.
pub fn read_feature_matrix(path: &Path) -> Result<Vec<Vec<f32>>, TextProviderError> {
    let lines = read_lines(path)?;
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            split_fields(line)
                .into_iter()
                .map(|field| {
                    field.parse::<f32>().map_err(|_| TextProviderError::MalformedField {
                        path: path.to_path_buf(),
                        line: index + 1,
                        raw: field.to_owned(),
                    })
                })
                .collect()
        })
        .collect()
}

/// Reads a labels file: N unsigned integers, one per row (or
/// comma-separated, per §6 — only the first field of each row is used since
/// a label vector has exactly one value per row).
///
/// # Errors
/// Returns [`TextProviderError::Io`] if the file cannot be read,
/// [`TextProviderError::Empty`] if it contains no rows, or
/// [`TextProviderError::MalformedField`] if a row's label does not parse as
/// `u32`.
pub fn read_label_vector(path: &Path) -> Result<Vec<u32>, TextProviderError> {
    let lines = read_lines(path)?;
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let fields = split_fields(line);
            let raw = fields.first().copied().unwrap_or(line.as_str());
            raw.parse::<u32>().map_err(|_| TextProviderError::MalformedField {
                path: path.to_path_buf(),
                line: index + 1,
                raw: raw.to_owned(),
            })
        })
        .collect()
}

/// Reads an MRMR permutation file: F unsigned integers, a permutation of
/// `[0, F)` (validated by [`knn_core::MrmrPermutation::new`], not here).
///
/// # Errors
/// Returns [`TextProviderError::Io`] if the file cannot be read,
/// [`TextProviderError::Empty`] if it contains no rows, or
/// [`TextProviderError::MalformedField`] if a row's index does not parse as
/// `usize`.
pub fn read_permutation(path: &Path) -> Result<Vec<usize>, TextProviderError> {
    let lines = read_lines(path)?;
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let fields = split_fields(line);
            let raw = fields.first().copied().unwrap_or(line.as_str());
            raw.parse::<usize>().map_err(|_| TextProviderError::MalformedField {
                path: path.to_path_buf(),
                line: index + 1,
                raw: raw.to_owned(),
            })
        })
        .collect()
}
