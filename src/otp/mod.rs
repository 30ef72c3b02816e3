// One-time password store for the Identity Registry Service
//
// Ephemeral, process-local OTP state. Each identifier type (Aadhaar, PAN)
// gets its own store instance. Entries are single-use: a successful
// verification consumes the entry, and expiry is detected lazily on the
// next verification attempt rather than by a background sweeper.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Time source used by the OTP store.
///
/// Injected so tests can drive expiry deterministically instead of
/// sleeping through the real validity window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic expiry tests.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// A live OTP entry: the generated code and the end of its validity window.
#[derive(Debug, Clone)]
pub struct OtpEntry {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Why a verification attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerifyError {
    /// No entry exists for the key
    NotFound,
    /// The entry existed but its validity window has passed
    Expired,
    /// The supplied code does not match the stored one
    Mismatch,
}

/// In-memory store of one live OTP per key.
///
/// A new `generate` for the same key overwrites the previous entry. There
/// is no locking beyond the map's own sharding; concurrent requests for
/// the same key race as documented in the crate docs (last generate wins,
/// first successful verify wins).
pub struct OtpStore {
    entries: DashMap<String, OtpEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl OtpStore {
    /// Create a store with the given validity window, using wall-clock time.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a store with an injected time source.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Generate a random 6-digit code for `key`, overwriting any live
    /// entry, and return it.
    pub fn generate(&self, key: &str) -> String {
        let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();
        let expires_at = self.clock.now() + self.ttl;

        self.entries.insert(
            key.to_string(),
            OtpEntry {
                code: code.clone(),
                expires_at,
            },
        );

        debug!("OTP issued, expires at {}", expires_at);
        code
    }

    /// Verify `supplied` against the live entry for `key`.
    ///
    /// A successful verification consumes the entry; so does detecting an
    /// expired one. A mismatched code leaves the entry in place so the
    /// client can retry until expiry.
    pub fn verify(&self, key: &str, supplied: &str) -> Result<(), OtpVerifyError> {
        let entry = match self.entries.get(key) {
            Some(entry) => entry.value().clone(),
            None => return Err(OtpVerifyError::NotFound),
        };

        if self.clock.now() > entry.expires_at {
            self.entries.remove(key);
            return Err(OtpVerifyError::Expired);
        }

        if supplied != entry.code {
            return Err(OtpVerifyError::Mismatch);
        }

        self.entries.remove(key);
        Ok(())
    }

    /// Whether a live (possibly expired but unreclaimed) entry exists.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
