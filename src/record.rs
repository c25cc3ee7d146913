//! Lock record model: naming, key derivation, and the on-disk text format.
//!
//! A record is the pair `(name, expires_at)`. On disk it is a single line of
//! ASCII text, `"<expires_at>|<name>"`, where `expires_at` is fractional
//! seconds since the Unix epoch. Parsing is deliberately forgiving: anything
//! that does not parse as a timestamp reads back as expiry `0.0`, i.e. an
//! already-expired record, so corrupt files get reclaimed instead of wedging
//! the lock.

use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

/// Name used when the caller does not supply one.
pub const DEFAULT_NAME: &str = "common";

/// Names matching this pattern are used as storage keys verbatim; anything
/// else is hashed so the key stays filesystem- and identifier-safe.
static SAFE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[A-Za-z0-9]+$").unwrap());

/// Resolve an optional caller-supplied name to the effective lock name.
pub fn effective_name(name: Option<&str>) -> &str {
    name.unwrap_or(DEFAULT_NAME)
}

/// Derive the storage key for a lock name.
///
/// Pure and deterministic: a safe alphanumeric name maps to itself, anything
/// else to the lowercase hex MD5 of the name. Distinct unsafe names therefore
/// practically never collide, and a given name always lands on the same key.
pub fn storage_key(name: Option<&str>) -> String {
    let name = effective_name(name);
    if SAFE_NAME.is_match(name) {
        name.to_string()
    } else {
        format!("{:x}", md5::compute(name))
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub(crate) fn now_epoch() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// A named lock with an absolute expiry time.
#[derive(Debug, Clone, PartialEq)]
pub struct LockRecord {
    /// Original caller-supplied name, kept for diagnostics.
    pub name: String,

    /// Fractional epoch seconds after which the record is semantically absent.
    pub expires_at: f64,
}

impl LockRecord {
    /// Create a record expiring `max_execution_ms` from now.
    pub fn starting_now(name: Option<&str>, max_execution_ms: u64) -> Self {
        Self {
            name: effective_name(name).to_string(),
            expires_at: now_epoch() + max_execution_ms as f64 / 1000.0,
        }
    }

    /// Serialize to the on-disk text format.
    pub fn encode(&self) -> String {
        format!("{}|{}", self.expires_at, self.name)
    }

    /// Parse the on-disk text format.
    ///
    /// A missing or malformed expiry field defaults to `0.0`; the record then
    /// reads as already expired.
    pub fn parse(content: &str) -> Self {
        let (expiry, name) = match content.split_once('|') {
            Some((expiry, name)) => (expiry, name),
            None => (content, ""),
        };
        Self {
            name: name.to_string(),
            expires_at: expiry.trim().parse::<f64>().unwrap_or(0.0),
        }
    }

    /// Whether the record has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= now_epoch()
    }
}
