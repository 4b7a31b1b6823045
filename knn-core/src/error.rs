//! Error types for the knn core library.
//!
//! Each fallible subsystem owns a small error enum with a stable machine
//! readable code; [`KnnError`] aggregates them behind `#[from]` conversions so
//! callers can match on one top-level type while still reaching the original
//! cause via `source()`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::transport::ProtocolError;

/// Stable codes describing [`KnnError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum KnnErrorCode {
    /// Configuration failed to load or validate.
    Config,
    /// A data file failed to parse into a [`crate::dataset::Matrix`] or label
    /// vector.
    Dataset,
    /// The master/worker coordinator observed a protocol violation.
    Protocol,
    /// A configured path could not be opened.
    Io,
}

impl KnnErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "KNN_CONFIG",
            Self::Dataset => "KNN_DATASET",
            Self::Protocol => "KNN_PROTOCOL",
            Self::Io => "KNN_IO",
        }
    }
}

impl fmt::Display for KnnErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error produced by the knn core library.
///
/// Every fatal kind in the error taxonomy (malformed config, invalid mode,
/// indivisible partitioning, undersized world, I/O failure, protocol
/// violation) is reachable through one of these variants. The energy oracle's
/// transient failures are deliberately absent: per the gate's contract they
/// are recovered locally and never propagate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum KnnError {
    /// Configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A data file failed to parse.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),
    /// The master/worker coordinator observed a protocol violation.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// A configured path could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl KnnError {
    /// Retrieve the stable [`KnnErrorCode`] for this error.
    pub const fn code(&self) -> KnnErrorCode {
        match self {
            Self::Config(_) => KnnErrorCode::Config,
            Self::Dataset(_) => KnnErrorCode::Dataset,
            Self::Protocol(_) => KnnErrorCode::Protocol,
            Self::Io { .. } => KnnErrorCode::Io,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, KnnError>;
