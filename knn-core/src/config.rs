//! Immutable run configuration, loaded once and threaded explicitly.
//!
//! Replaces the source's statically-registered JSON-to-struct mapping layer
//! (see `DESIGN.md`) with a value parsed by `serde_json` and validated on
//! construction, matching the validate-on-build shape of a builder.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::distance::Metric;

/// Coordination strategy selecting between the static and dynamic
/// hyperparameter search drivers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Equally fast workers; the f-range is statically partitioned.
    Homo,
    /// Workers of unequal speed; the f-range is dynamically pulled.
    Hetero,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Homo => "homo",
            Self::Hetero => "hetero",
        })
    }
}

/// Raw configuration fields as they appear in the JSON file of §6.
///
/// Deserialized directly, then validated into a [`Config`] by
/// [`Config::try_from_raw`]; kept as a separate type so serde's field-name
/// mapping stays decoupled from the validated, immutable value the rest of
/// the crate consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct RawConfig {
    pub db_data_training: PathBuf,
    pub db_data_test: PathBuf,
    pub db_labels_training: PathBuf,
    pub db_labels_test: PathBuf,
    pub mrmr: PathBuf,
    pub n_tuples: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub mode: Mode,
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub sorting_by_mrmr: bool,
    pub max_features: usize,
    pub chunk_size: usize,
    #[serde(default)]
    pub saving_energy: bool,
    /// Smallest neighbour count in the k-sweep. Absent from the distilled
    /// field list of §3 but required by C4's contract; defaulted to 1 when
    /// omitted (see `DESIGN.md` open question).
    #[serde(default = "default_k_min")]
    pub k_min: usize,
    /// Largest neighbour count in the k-sweep.
    pub k_max: usize,
    /// Distance function used throughout the sweep and the final scoring
    /// pass (§4.1). Absent from the distilled field list of §3 but required
    /// by C1's "selectable at configuration time"; defaulted to `euclidean`
    /// when omitted, matching the source's historical default.
    #[serde(default = "default_metric")]
    pub metric: Metric,
}

const fn default_k_min() -> usize {
    1
}

const fn default_metric() -> Metric {
    Metric::Euclidean
}

/// Validated, immutable run configuration.
///
/// Constructed once via [`Config::try_from_raw`] or [`Config::from_json`] and
/// never mutated afterward; every field below is a plain value rather than a
/// globally registered mapping.
#[derive(Clone, Debug)]
pub struct Config {
    pub db_data_training: PathBuf,
    pub db_data_test: PathBuf,
    pub db_labels_training: PathBuf,
    pub db_labels_test: PathBuf,
    pub mrmr: PathBuf,
    pub n_tuples: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub mode: Mode,
    pub normalize: bool,
    pub sorting_by_mrmr: bool,
    pub max_features: usize,
    pub chunk_size: usize,
    pub saving_energy: bool,
    pub k_min: usize,
    pub k_max: usize,
    pub metric: Metric,
}

/// Stable codes describing [`ConfigError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ConfigErrorCode {
    /// The configuration file was not valid JSON or was missing a field.
    Malformed,
    /// `mode` was not `homo` or `hetero`.
    InvalidMode,
    /// `max_features` was not a multiple of `chunk_size`.
    ChunkSizeIndivisible,
    /// `k_min` exceeded `k_max`, or either was zero while features existed.
    InvalidKRange,
    /// `max_features` exceeded `n_features`.
    MaxFeaturesOutOfRange,
    /// World size was too small for the configured mode.
    WorldTooSmall,
    /// `n_tuples * n_features` was not a multiple of the world size in
    /// homogeneous mode.
    WorldSizeIndivisible,
}

impl ConfigErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "CONFIG_MALFORMED",
            Self::InvalidMode => "CONFIG_INVALID_MODE",
            Self::ChunkSizeIndivisible => "CONFIG_CHUNK_SIZE_INDIVISIBLE",
            Self::InvalidKRange => "CONFIG_INVALID_K_RANGE",
            Self::MaxFeaturesOutOfRange => "CONFIG_MAX_FEATURES_OUT_OF_RANGE",
            Self::WorldTooSmall => "CONFIG_WORLD_TOO_SMALL",
            Self::WorldSizeIndivisible => "CONFIG_WORLD_SIZE_INDIVISIBLE",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while loading or validating a [`Config`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not valid JSON or was missing a field.
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    /// `max_features` was not a multiple of `chunk_size` (heterogeneous
    /// mode) or `n_tuples * n_features` was not a multiple of the world size
    /// (homogeneous mode).
    #[error("max_features ({max_features}) is not a multiple of chunk_size ({chunk_size})")]
    ChunkSizeIndivisible {
        max_features: usize,
        chunk_size: usize,
    },
    /// `k_min` exceeded `k_max`.
    #[error("k_min ({k_min}) must not exceed k_max ({k_max})")]
    InvalidKRange { k_min: usize, k_max: usize },
    /// `max_features` exceeded `n_features`.
    #[error("max_features ({max_features}) exceeds n_features ({n_features})")]
    MaxFeaturesOutOfRange {
        max_features: usize,
        n_features: usize,
    },
    /// World size was too small for heterogeneous mode (needs a master plus
    /// at least one worker).
    #[error("world size {world_size} is too small for hetero mode (need at least 2)")]
    WorldTooSmall { world_size: usize },
    /// `n_tuples * n_features` was not a multiple of `world_size` in
    /// homogeneous mode (§7).
    #[error(
        "n_tuples ({n_tuples}) * n_features ({n_features}) is not a multiple of world size ({world_size}) for homo mode"
    )]
    WorldSizeIndivisible {
        n_tuples: usize,
        n_features: usize,
        world_size: usize,
    },
}

impl ConfigError {
    /// Retrieve the stable [`ConfigErrorCode`] for this error.
    pub const fn code(&self) -> ConfigErrorCode {
        match self {
            Self::Malformed(_) => ConfigErrorCode::Malformed,
            Self::ChunkSizeIndivisible { .. } => ConfigErrorCode::ChunkSizeIndivisible,
            Self::InvalidKRange { .. } => ConfigErrorCode::InvalidKRange,
            Self::MaxFeaturesOutOfRange { .. } => ConfigErrorCode::MaxFeaturesOutOfRange,
            Self::WorldTooSmall { .. } => ConfigErrorCode::WorldTooSmall,
            Self::WorldSizeIndivisible { .. } => ConfigErrorCode::WorldSizeIndivisible,
        }
    }
}

impl Config {
    /// Parses and validates a configuration from a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Malformed`] if `json` does not deserialize into
    /// [`RawConfig`], or any other [`ConfigError`] variant if validation
    /// fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::try_from_raw(raw)
    }

    /// Validates a [`RawConfig`] into an immutable [`Config`].
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first validation rule that
    /// failed.
    pub fn try_from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.max_features == 0 || raw.max_features % raw.chunk_size != 0 {
            return Err(ConfigError::ChunkSizeIndivisible {
                max_features: raw.max_features,
                chunk_size: raw.chunk_size,
            });
        }
        if raw.k_min == 0 || raw.k_min > raw.k_max {
            return Err(ConfigError::InvalidKRange {
                k_min: raw.k_min,
                k_max: raw.k_max,
            });
        }
        if raw.max_features > raw.n_features {
            return Err(ConfigError::MaxFeaturesOutOfRange {
                max_features: raw.max_features,
                n_features: raw.n_features,
            });
        }

        Ok(Self {
            db_data_training: raw.db_data_training,
            db_data_test: raw.db_data_test,
            db_labels_training: raw.db_labels_training,
            db_labels_test: raw.db_labels_test,
            mrmr: raw.mrmr,
            n_tuples: raw.n_tuples,
            n_features: raw.n_features,
            n_classes: raw.n_classes,
            mode: raw.mode,
            normalize: raw.normalize,
            sorting_by_mrmr: raw.sorting_by_mrmr,
            max_features: raw.max_features,
            chunk_size: raw.chunk_size,
            saving_energy: raw.saving_energy,
            k_min: raw.k_min,
            k_max: raw.k_max,
            metric: raw.metric,
        })
    }

    /// Validates that `world_size` can run this configuration's mode,
    /// applying the world-size rules of §7 ("World size < 2 in hetero mode"
    /// and the homogeneous divisibility rule).
    ///
    /// # Errors
    /// Returns [`ConfigError::WorldTooSmall`] if `mode` is [`Mode::Hetero`]
    /// and `world_size < 2`, or [`ConfigError::WorldSizeIndivisible`] if
    /// `mode` is [`Mode::Homo`] and `n_tuples * n_features` is not a multiple
    /// of a non-zero `world_size`.
    pub const fn validate_world_size(&self, world_size: usize) -> Result<(), ConfigError> {
        match self.mode {
            Mode::Hetero if world_size < 2 => Err(ConfigError::WorldTooSmall { world_size }),
            Mode::Homo if world_size == 0 || (self.n_tuples * self.n_features) % world_size != 0 => {
                Err(ConfigError::WorldSizeIndivisible {
                    n_tuples: self.n_tuples,
                    n_features: self.n_features,
                    world_size,
                })
            }
            _ => Ok(()),
        }
    }
}
