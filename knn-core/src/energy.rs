//! Energy gate (C8): a best-effort background poller that tracks whether the
//! current grid-energy hour is cheap, and staggers the first poll per rank to
//! avoid a thundering herd against the oracle.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use tracing::warn;

const SECONDS_PER_HOUR: u64 = 3600;
const STAGGER_SECONDS_PER_RANK: u64 = 5;

/// Default pricing oracle endpoint, carried over from
/// `original_source/src/energySaving.cpp`'s hardcoded `api.preciodelaluz.org`
/// host and `/v1/prices/now?zone=PCB` request line.
pub const DEFAULT_ENERGY_ORACLE_URL: &str = "https://api.preciodelaluz.org/v1/prices/now?zone=PCB";

/// The oracle's response shape (§6): `is-cheap`/`is-under-avg` are the only
/// fields this gate consumes; the rest are carried for diagnostic logging.
#[derive(Clone, Debug, Deserialize)]
struct OracleReading {
    date: String,
    hour: u32,
    #[serde(rename = "is-cheap")]
    is_cheap: bool,
    #[serde(rename = "is-under-avg")]
    is_under_avg: bool,
    market: String,
    price: f64,
    units: String,
}

/// The gate's current view of the grid. Defaults to "expensive" until the
/// first successful poll, and reverts to "expensive" on any transient
/// failure (§6, §7): an unreachable oracle must never be mistaken for a
/// cheap hour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnergyReading {
    is_cheap: bool,
    is_under_avg: bool,
}

impl EnergyReading {
    /// Builds a reading directly, for tests elsewhere in this crate that
    /// need to fix [`EnergyGate`] to a known state.
    #[cfg(test)]
    pub(crate) const fn for_test(is_cheap: bool, is_under_avg: bool) -> Self {
        Self {
            is_cheap,
            is_under_avg,
        }
    }

    #[must_use]
    pub const fn is_cheap(self) -> bool {
        self.is_cheap
    }

    #[must_use]
    pub const fn is_under_avg(self) -> bool {
        self.is_under_avg
    }

    const fn expensive() -> Self {
        Self {
            is_cheap: false,
            is_under_avg: false,
        }
    }
}

/// Queries the remote pricing oracle. Abstracted behind a trait so the
/// polling loop and stagger logic are testable without a real HTTP client.
pub trait EnergyOracleClient: Send + 'static {
    /// Fetches the current reading, or `None` on any transient failure
    /// (network error, timeout, malformed body) — the caller treats a
    /// `None` exactly as an expensive hour.
    fn fetch(&self) -> Option<EnergyReading>;
}

/// A `ureq`-backed [`EnergyOracleClient`] against an HTTPS endpoint returning
/// the JSON object of §6.
pub struct UreqEnergyOracleClient {
    url: String,
}

impl UreqEnergyOracleClient {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl EnergyOracleClient for UreqEnergyOracleClient {
    fn fetch(&self) -> Option<EnergyReading> {
        let reading: OracleReading = ureq::get(&self.url)
            .call()
            .inspect_err(|error| warn!(url = %self.url, %error, "energy oracle request failed"))
            .ok()?
            .into_body()
            .read_json()
            .inspect_err(|error| warn!(%error, "energy oracle response was not the expected shape"))
            .ok()?;

        tracing::debug!(
            date = %reading.date,
            hour = reading.hour,
            market = %reading.market,
            price = reading.price,
            units = %reading.units,
            "energy oracle reading"
        );

        Some(EnergyReading {
            is_cheap: reading.is_cheap,
            is_under_avg: reading.is_under_avg,
        })
    }
}

/// Shared, lock-protected current reading, updated by a background poller
/// and read by worker main threads before they ask for a new chunk (§4.8).
#[derive(Clone)]
pub struct EnergyGate {
    current: Arc<Mutex<EnergyReading>>,
}

impl EnergyGate {
    /// Builds a gate fixed to a given reading, bypassing the background
    /// poller — for tests elsewhere in this crate that need a gate without
    /// waiting on a real clock.
    #[cfg(test)]
    pub(crate) fn fixed(reading: EnergyReading) -> Self {
        Self {
            current: Arc::new(Mutex::new(reading)),
        }
    }

    /// Spawns a background thread that polls `client` once per hour, aligned
    /// to the top of the hour plus a `rank`-staggered offset, and updates the
    /// shared reading. The handle is detached: the gate is advisory and its
    /// thread never needs to be joined (§4.8, "MUST NOT affect protocol
    /// correctness").
    #[must_use]
    pub fn spawn(client: impl EnergyOracleClient, rank: usize) -> Self {
        let current = Arc::new(Mutex::new(EnergyReading::expensive()));
        let shared = Arc::clone(&current);

        thread::spawn(move || loop {
            let reading = client.fetch().unwrap_or_else(EnergyReading::expensive);
            if let Ok(mut guard) = shared.lock() {
                *guard = reading;
            }
            thread::sleep(duration_until_next_poll(rank));
        });

        Self { current }
    }

    /// The most recently polled reading. Never blocks on the poller thread.
    #[must_use]
    pub fn current(&self) -> EnergyReading {
        self.current.lock().map_or_else(|_| EnergyReading::expensive(), |guard| *guard)
    }

    /// Checks the current reading and, if the hour is expensive, blocks the
    /// calling thread until the top of the next hour plus `rank`'s stagger
    /// offset (§4.8: "sleep until the top of the next hour (+5s staggered
    /// offset)"). A cheap hour returns immediately.
    pub fn sleep_if_expensive(&self, rank: usize) {
        if !self.current().is_cheap() {
            thread::sleep(duration_until_next_poll(rank));
        }
    }
}

/// Time to sleep before the next poll: the remainder of the current hour
/// plus `rank * 5` seconds, so workers of a run poll the oracle in a
/// staggered sequence rather than all at once on the hour boundary.
fn duration_until_next_poll(rank: usize) -> Duration {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let seconds_into_hour = now.as_secs() % SECONDS_PER_HOUR;
    let seconds_to_next_hour = SECONDS_PER_HOUR - seconds_into_hour;
    let stagger = rank as u64 * STAGGER_SECONDS_PER_RANK;
    Duration::from_secs(seconds_to_next_hour + stagger)
}
