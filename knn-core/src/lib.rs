//! Distributed k-Nearest-Neighbor hyperparameter search: the core library.
//!
//! Wires together the distance kernel (C1) through the energy gate (C8) of
//! `DESIGN.md`'s component table behind a narrow, transport-generic
//! [`pipeline::run`] entry point. A delimited-text I/O layer and CLI live in
//! sibling crates; this crate owns only the numerics and the coordination
//! state machines.

mod candidate;
mod config;
mod coordinator;
mod dataset;
mod distance;
mod energy;
mod error;
mod partition;
mod pipeline;
mod ranker;
mod scorer;
mod sweep;
mod transport;
mod voter;

pub use crate::candidate::{Candidate, best};
pub use crate::config::{Config, ConfigError, ConfigErrorCode, Mode, RawConfig};
pub use crate::coordinator::{run_master, run_worker};
pub use crate::dataset::{DatasetError, DatasetErrorCode, LabeledSet, Matrix, MrmrPermutation};
pub use crate::distance::{Metric, euclidean_distance, manhattan_distance};
pub use crate::energy::{EnergyGate, EnergyOracleClient, EnergyReading, UreqEnergyOracleClient};
pub use crate::error::{KnnError, KnnErrorCode, Result};
pub use crate::partition::{assigned_features, local_best};
pub use crate::pipeline::{PipelineOutcome, prepare, run, search};
pub use crate::ranker::{RankedNeighbor, rank_neighbors};
pub use crate::scorer::{ConfusionMatrix, ScoreReport, score};
pub use crate::sweep::run_sweep;
pub use crate::transport::{
    ChannelMasterTransport, ChannelWorkerTransport, MasterTransport, Message, ProtocolError,
    ProtocolErrorCode, WorkerId, WorkerTransport, channel_transport,
};
pub use crate::voter::majority_vote;
