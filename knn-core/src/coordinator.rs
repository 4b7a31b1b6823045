//! Heterogeneous coordinator (C6): a pull-based master/worker scheduler over
//! f-axis chunks, generic over any [`MasterTransport`]/[`WorkerTransport`].

use crate::candidate::{best, Candidate};
use crate::dataset::LabeledSet;
use crate::distance::Metric;
use crate::energy::EnergyGate;
use crate::sweep::run_sweep;
use crate::transport::{MasterTransport, Message, ProtocolError, WorkerTransport, WorkerId};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum MasterState {
    Serving,
    Draining,
    Terminated,
}

/// Runs the master side of the C6 protocol to completion and returns the
/// global best [`Candidate`] across every chunk (§4.6.3).
///
/// The f-axis `[1, max_features]` is tiled into consecutive chunks of
/// `chunk_size`, the last one clipped short if `max_features` is not a
/// multiple of `chunk_size`. Chunks are handed out in increasing order on
/// demand; workers that ask after the last chunk is issued are told to stop.
///
/// # Panics
/// Panics if `worker_count` is zero, or if the protocol is violated (a
/// worker sending `Job` or `Stop`, or transport disconnection) — both cases
/// are fatal per the error taxonomy (§7) and are not recoverable here.
pub fn run_master(
    transport: &mut impl MasterTransport,
    worker_count: usize,
    max_features: usize,
    chunk_size: usize,
) -> Candidate {
    assert!(worker_count > 0, "worker_count must be non-zero");

    let mut state = MasterState::Serving;
    let mut next_chunk_base = 1usize;
    let mut global_best: Option<Candidate> = None;
    let mut drained = 0usize;

    while state != MasterState::Terminated {
        let (origin, message) = transport.probe().expect("master transport disconnected");
        match message {
            Message::Ask => {
                dispatch_ask(transport, origin, &mut next_chunk_base, max_features, chunk_size, &mut state);
            }
            Message::Result { k, f, correct } => {
                global_best = best(global_best.into_iter().chain([Candidate::new(k, f, correct)]));
            }
            Message::Done => {
                drained += 1;
                if state == MasterState::Draining && drained == worker_count {
                    state = MasterState::Terminated;
                }
            }
            Message::Job { .. } | Message::Stop => {
                panic!(
                    "{}",
                    ProtocolError::UnexpectedMessage("master received a worker-bound message")
                );
            }
        }
    }

    global_best.expect("a completed run always issues at least one chunk")
}

fn dispatch_ask(
    transport: &mut impl MasterTransport,
    origin: WorkerId,
    next_chunk_base: &mut usize,
    max_features: usize,
    chunk_size: usize,
    state: &mut MasterState,
) {
    if *next_chunk_base <= max_features {
        transport
            .send(origin, Message::Job { f0: *next_chunk_base })
            .expect("master transport disconnected");
        *next_chunk_base += chunk_size;
        if *next_chunk_base > max_features {
            *state = MasterState::Draining;
        }
    } else {
        transport.send(origin, Message::Stop).expect("master transport disconnected");
    }
}

/// Runs the worker side of the C6 protocol until it receives `Stop`,
/// processing chunks handed out by the master (§4.6.4).
///
/// If `energy_gate` is set, the worker checks it before every `Ask` and
/// sleeps through expensive hours (§4.8); a worker that sleeps forever is
/// just a slow worker and never affects protocol correctness.
///
/// # Panics
/// Panics on transport disconnection or an unexpected message tag (a worker
/// receiving `Ask`, `Result`, or `Done`) — both fatal per §7.
#[expect(clippy::too_many_arguments, reason = "mirrors the worker's full per-chunk computation context")]
pub fn run_worker(
    transport: &mut impl WorkerTransport,
    training: &LabeledSet,
    test: &LabeledSet,
    max_features: usize,
    chunk_size: usize,
    k_min: usize,
    k_max: usize,
    metric: Metric,
    energy_gate: Option<&EnergyGate>,
    rank: usize,
) {
    loop {
        if let Some(gate) = energy_gate {
            gate.sleep_if_expensive(rank);
        }
        transport.send(Message::Ask).expect("worker transport disconnected");
        match transport.recv().expect("worker transport disconnected") {
            Message::Job { f0 } => {
                let f_values: Vec<usize> = (f0..(f0 + chunk_size).min(max_features + 1)).collect();
                let candidates = run_sweep(training, test, &f_values, k_min, k_max, metric);
                let local_best = best(candidates).expect("a non-empty chunk always yields a best candidate");
                transport
                    .send(Message::Result {
                        k: local_best.k(),
                        f: local_best.f(),
                        correct: local_best.correct_count(),
                    })
                    .expect("worker transport disconnected");
            }
            Message::Stop => {
                transport.send(Message::Done).expect("worker transport disconnected");
                break;
            }
            Message::Ask | Message::Result { .. } | Message::Done => {
                panic!(
                    "{}",
                    ProtocolError::UnexpectedMessage("worker received a master-bound message")
                );
            }
        }
    }
}
