//! Request Admission Gate: reject-fast deduplication of concurrent lookups.
//!
//! Each key (a normalized DOI) is either unclaimed or claimed by one live
//! lease. A lease ends when any of these happens:
//! - its holder drops the returned `AdmissionLease` (work finished)
//! - `release` is called for the key
//! - its expiry timer fires, whether or not the guarded work has finished
//!
//! A lease is therefore an upper bound on exclusivity, not a completion
//! signal. A lookup slower than the lease duration can overlap a second
//! lookup for the same key; the merge step tolerates that race.
//!
//! ## Example
//!
//! ```rust,ignore
//! let gate = AdmissionGate::new(Duration::from_secs(30));
//!
//! let lease = gate.try_acquire("10.4137/cmc.s38446")?;
//! assert!(gate.try_acquire("10.4137/cmc.s38446").is_err());
//! drop(lease);
//! assert!(gate.try_acquire("10.4137/cmc.s38446").is_ok());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Default lease duration: longest expected time for one resolution.
pub const DEFAULT_LEASE_DURATION: Duration = Duration::from_secs(30);

/// Error returned when a key is already claimed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("already in progress: {0}")]
    AlreadyInProgress(String),
}

#[derive(Debug, Clone, Copy)]
struct LeaseEntry {
    /// Distinguishes successive leases on the same key.
    token: u64,
    expires_at: Instant,
}

impl LeaseEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug)]
struct GateInner {
    leases: Mutex<HashMap<String, LeaseEntry>>,
    lease_duration: Duration,
    next_token: AtomicU64,
}

impl GateInner {
    // Entries are plain values; a poisoned lock still guards a consistent map.
    fn leases(&self) -> MutexGuard<'_, HashMap<String, LeaseEntry>> {
        self.leases.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove the lease for `key` only if it is still the one holding `token`.
    fn remove_if_current(&self, key: &str, token: u64) -> bool {
        let mut leases = self.leases();
        match leases.get(key) {
            Some(entry) if entry.token == token => {
                leases.remove(key);
                true
            }
            _ => false,
        }
    }
}

/// Concurrency-safe table of admission leases keyed by request key.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    inner: Arc<GateInner>,
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new(DEFAULT_LEASE_DURATION)
    }
}

impl AdmissionGate {
    /// Creates a gate whose leases last `lease_duration`.
    pub fn new(lease_duration: Duration) -> Self {
        Self {
            inner: Arc::new(GateInner {
                leases: Mutex::new(HashMap::new()),
                lease_duration,
                next_token: AtomicU64::new(1),
            }),
        }
    }

    /// Claim `key` if it has no live lease.
    ///
    /// Never blocks waiting for another holder: a live lease means immediate
    /// rejection. When called inside a Tokio runtime, a timer is scheduled
    /// that drops the lease after the lease duration.
    pub fn try_acquire(&self, key: &str) -> Result<AdmissionLease, AdmissionError> {
        let now = Instant::now();
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);

        {
            let mut leases = self.inner.leases();
            if let Some(existing) = leases.get(key) {
                if existing.is_live(now) {
                    debug!(key, "Admission rejected: lease still live");
                    return Err(AdmissionError::AlreadyInProgress(key.to_string()));
                }
            }
            leases.insert(
                key.to_string(),
                LeaseEntry {
                    token,
                    expires_at: now + self.inner.lease_duration,
                },
            );
        }

        self.schedule_expiry(key, token);
        debug!(key, token, "Admission lease acquired");

        Ok(AdmissionLease {
            gate: Arc::downgrade(&self.inner),
            key: key.to_string(),
            token,
            released: false,
        })
    }

    /// Remove any lease for `key`. Idempotent.
    pub fn release(&self, key: &str) {
        if self.inner.leases().remove(key).is_some() {
            debug!(key, "Admission lease released");
        }
    }

    /// True if `key` currently has a live lease.
    pub fn is_claimed(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner
            .leases()
            .get(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    /// Number of lease entries in the table (live or awaiting their timer).
    pub fn len(&self) -> usize {
        self.inner.leases().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn schedule_expiry(&self, key: &str, token: u64) {
        // Outside a runtime, expired entries are still ignored by
        // `try_acquire` and replaced on the next claim.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let gate: Weak<GateInner> = Arc::downgrade(&self.inner);
        let key = key.to_string();
        let duration = self.inner.lease_duration;

        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = gate.upgrade() {
                if inner.remove_if_current(&key, token) {
                    info!(key = %key, "Admission lease expired");
                }
            }
        });
    }
}

/// Exclusive claim over a key. Dropping it releases the claim.
#[derive(Debug)]
#[must_use = "dropping the lease releases the claim immediately"]
pub struct AdmissionLease {
    gate: Weak<GateInner>,
    key: String,
    token: u64,
    released: bool,
}

impl AdmissionLease {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release the claim now. Equivalent to dropping the lease.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // A lease that already expired and was re-claimed by another caller
        // is left alone: the token no longer matches.
        if let Some(inner) = self.gate.upgrade() {
            if inner.remove_if_current(&self.key, self.token) {
                debug!(key = %self.key, "Admission lease released on completion");
            }
        }
    }
}

impl Drop for AdmissionLease {
    fn drop(&mut self) {
        self.release_inner();
    }
}
