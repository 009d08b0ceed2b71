//! Host-name de-duplicator (C7): suppresses repeat scans of the same
//! hostname within a scan. Grounded in `notus/scanner/hostname.py`'s
//! `HostNameCache` -- a per-`scan_id` set of SHA-1 hashes with a single
//! time-windowed reset, re-expressed with a `Mutex` in place of Python's
//! implicit single-threaded access (spec §5: the core must be safe to
//! invoke concurrently across distinct scans).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sha1::{Digest, Sha1};

use notus_messaging::ScanStartMessage;

/// Outcome of [`HostNameCache::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostNameDecision {
    /// Hostname is not yet verified (or the message carries no hostname/scan
    /// id to key on) -- the scan driver should proceed.
    Continue,
    /// Hostname has already been seen for this `scan_id` within the window.
    Stop,
}

struct State {
    lookup: HashMap<String, HashSet<[u8; 20]>>,
    last_reset: Instant,
}

/// Suppresses repeat scans of the same hostname within a sliding time window.
pub struct HostNameCache {
    period: Duration,
    state: Mutex<State>,
}

fn hash_host_name(host_name: &str) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(host_name.as_bytes());
    hasher.finalize().into()
}

impl HostNameCache {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: Mutex::new(State {
                lookup: HashMap::new(),
                last_reset: Instant::now(),
            }),
        }
    }

    /// Decide whether `msg`'s `(scan_id, host_name)` pair has already been
    /// seen within the current window (spec §4.8).
    #[must_use]
    pub fn verify(&self, msg: &ScanStartMessage) -> HostNameDecision {
        self.verify_at(msg, Instant::now())
    }

    fn verify_at(&self, msg: &ScanStartMessage, now: Instant) -> HostNameDecision {
        if msg.scan_id.is_empty() || msg.host_name.is_empty() {
            return HostNameDecision::Continue;
        }

        let hashsum = hash_host_name(&msg.host_name);
        let mut state = self.state.lock().expect("hostname cache poisoned");

        if now >= state.last_reset + self.period {
            state.last_reset = now;
            state.lookup.clear();
        }

        let entry = state.lookup.entry(msg.scan_id.clone()).or_default();
        if entry.contains(&hashsum) {
            HostNameDecision::Stop
        } else {
            entry.insert(hashsum);
            HostNameDecision::Continue
        }
    }
}
