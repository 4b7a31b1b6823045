//! Message-passing abstraction for the heterogeneous coordinator (C6).
//!
//! Isolates the master/worker state machine from any specific transport, so
//! it can run over real channels between OS threads or be driven directly
//! against an in-process fake in tests (§9, "master loop coupling to
//! transport specifics").

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;

/// A worker's stable identifier, stable for the lifetime of one run.
pub type WorkerId = usize;

/// The six wire-level messages of the C6 protocol (§4.6.2).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Message {
    /// Worker → master: "give me work".
    Ask,
    /// Master → worker: process f in `[f0, f0 + chunk_size)`.
    Job { f0: usize },
    /// Master → worker: no more work.
    Stop,
    /// Worker → master: this chunk's local optimum.
    Result { k: usize, f: usize, correct: u32 },
    /// Worker → master: acknowledged `Stop`, exiting.
    Done,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ProtocolErrorCode {
    Disconnected,
    UnexpectedMessage,
}

impl ProtocolErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "PROTOCOL_DISCONNECTED",
            Self::UnexpectedMessage => "PROTOCOL_UNEXPECTED_MESSAGE",
        }
    }
}

impl std::fmt::Display for ProtocolErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-level failure. Per §7, any such failure is fatal: a worker
/// that never sends `Done` (or a channel that drops) hangs or aborts the
/// whole run rather than being retried.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("transport channel disconnected unexpectedly")]
    Disconnected,
    #[error("received an unexpected message for this role: {0}")]
    UnexpectedMessage(&'static str),
}

impl ProtocolError {
    #[must_use]
    pub const fn code(&self) -> ProtocolErrorCode {
        match self {
            Self::Disconnected => ProtocolErrorCode::Disconnected,
            Self::UnexpectedMessage(_) => ProtocolErrorCode::UnexpectedMessage,
        }
    }
}

/// The master side of the transport: a blocking, source-wildcard probe and a
/// targeted send, matching the "probe any tag from any worker" discipline of
/// §4.6.5.
pub trait MasterTransport {
    /// Blocks until the next message arrives from any worker, returning its
    /// origin alongside it. Messages from distinct workers may arrive in any
    /// order; the master never waits on a specific worker (§4.6.5).
    fn probe(&mut self) -> Result<(WorkerId, Message), ProtocolError>;

    /// Sends `message` to `worker`.
    fn send(&mut self, worker: WorkerId, message: Message) -> Result<(), ProtocolError>;
}

/// The worker side of the transport: send to the master, receive the next
/// message addressed to this worker.
pub trait WorkerTransport {
    fn send(&mut self, message: Message) -> Result<(), ProtocolError>;
    fn recv(&mut self) -> Result<Message, ProtocolError>;
}

/// A `crossbeam-channel`-backed [`MasterTransport`]. Every worker shares one
/// multi-producer channel into the master so `probe` is a single blocking
/// receive regardless of which worker sent next; the master holds one
/// dedicated sender per worker for targeted replies.
pub struct ChannelMasterTransport {
    inbox: Receiver<(WorkerId, Message)>,
    outboxes: Vec<Sender<Message>>,
}

impl MasterTransport for ChannelMasterTransport {
    fn probe(&mut self) -> Result<(WorkerId, Message), ProtocolError> {
        self.inbox.recv().map_err(|_| ProtocolError::Disconnected)
    }

    fn send(&mut self, worker: WorkerId, message: Message) -> Result<(), ProtocolError> {
        self.outboxes
            .get(worker)
            .ok_or(ProtocolError::Disconnected)?
            .send(message)
            .map_err(|_| ProtocolError::Disconnected)
    }
}

/// A `crossbeam-channel`-backed [`WorkerTransport`] for one worker.
pub struct ChannelWorkerTransport {
    id: WorkerId,
    to_master: Sender<(WorkerId, Message)>,
    from_master: Receiver<Message>,
}

impl WorkerTransport for ChannelWorkerTransport {
    fn send(&mut self, message: Message) -> Result<(), ProtocolError> {
        self.to_master
            .send((self.id, message))
            .map_err(|_| ProtocolError::Disconnected)
    }

    fn recv(&mut self) -> Result<Message, ProtocolError> {
        self.from_master.recv().map_err(|_| ProtocolError::Disconnected)
    }
}

/// Builds one master transport and `world_size - 1` worker transports wired
/// together by in-process channels, ready to be run as OS threads (or driven
/// directly, single-threaded, in tests).
#[must_use]
pub fn channel_transport(worker_count: usize) -> (ChannelMasterTransport, Vec<ChannelWorkerTransport>) {
    let (to_master_tx, to_master_rx) = unbounded();
    let mut outboxes = Vec::with_capacity(worker_count);
    let mut workers = Vec::with_capacity(worker_count);

    for id in 0..worker_count {
        let (to_worker_tx, to_worker_rx) = unbounded();
        outboxes.push(to_worker_tx);
        workers.push(ChannelWorkerTransport {
            id,
            to_master: to_master_tx.clone(),
            from_master: to_worker_rx,
        });
    }

    (
        ChannelMasterTransport {
            inbox: to_master_rx,
            outboxes,
        },
        workers,
    )
}
