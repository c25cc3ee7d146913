//! The lock facade: wait/start/stop/is_running over a pluggable provider.
//!
//! `Lock` composes a polling wait loop on top of a [`TransactionProvider`].
//! Construct one per application (or share it; every method takes `&self`)
//! and inject a non-default provider where the filesystem is the wrong
//! medium, e.g. [`crate::MemoryTransactionProvider`] in tests.

use crate::error::Result;
use crate::provider::{FileTransactionProvider, TransactionProvider};
use std::time::{Duration, Instant};

/// Default wall-clock ceiling for [`Lock::wait`].
pub const DEFAULT_MAX_WAIT_MS: u64 = 30_000;

/// Default number of polls granted to [`Lock::wait`].
pub const DEFAULT_POLL_BUDGET: u32 = 500;

/// Default TTL for [`Lock::start`].
pub const DEFAULT_MAX_EXECUTION_MS: u64 = 3_000;

/// Sleep between wait-loop polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Named-lock API over a pluggable storage provider.
///
/// All methods take `name: Option<&str>`; `None` selects the reserved
/// default name `"common"`.
pub struct Lock {
    provider: Box<dyn TransactionProvider>,
}

impl Lock {
    /// Build a facade over the default [`FileTransactionProvider`].
    pub fn new() -> Result<Self> {
        Ok(Self::with_provider(Box::new(FileTransactionProvider::new()?)))
    }

    /// Build a facade over an explicit provider.
    pub fn with_provider(provider: Box<dyn TransactionProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &dyn TransactionProvider {
        self.provider.as_ref()
    }

    /// Block until the named lock is free, with default limits
    /// (30s wall clock, 500 polls).
    pub fn wait(&self, name: Option<&str>) -> Result<()> {
        self.wait_for(name, DEFAULT_MAX_WAIT_MS, DEFAULT_POLL_BUDGET)
    }

    /// Block until the named lock is free or the timeout is reached.
    ///
    /// Polls every 10ms. The timeout is a dual guard: the loop gives up only
    /// once the poll budget is exhausted AND elapsed wall time has reached
    /// `max_wait_ms`, so neither a tiny budget nor a stalled clock cuts the
    /// wait short on its own. Returns without indicating which exit was
    /// taken; callers that care must check [`Lock::is_running`] afterwards.
    pub fn wait_for(&self, name: Option<&str>, max_wait_ms: u64, poll_budget: u32) -> Result<()> {
        let started = Instant::now();
        let max_wait = Duration::from_millis(max_wait_ms);
        let mut budget = poll_budget as i64;
        loop {
            if !self.is_running(name)? {
                return Ok(());
            }
            std::thread::sleep(POLL_INTERVAL);
            budget -= 1;
            if budget <= 0 && started.elapsed() >= max_wait {
                return Ok(());
            }
        }
    }

    /// Claim the named lock with the default 3s TTL.
    ///
    /// Always overwrites: an already-active lock gets its expiry replaced
    /// rather than the call failing. That is the renewal mechanism, and also
    /// why exclusion is best-effort only.
    pub fn start(&self, name: Option<&str>) -> Result<()> {
        self.start_for(name, DEFAULT_MAX_EXECUTION_MS)
    }

    /// Claim the named lock with an explicit TTL in milliseconds.
    pub fn start_for(&self, name: Option<&str>, max_execution_ms: u64) -> Result<()> {
        self.provider.start(name, max_execution_ms)
    }

    /// Release the named lock. A lock that is not running (including one
    /// that just expired and got lazily reclaimed) is a no-op.
    pub fn stop(&self, name: Option<&str>) -> Result<()> {
        if !self.is_running(name)? {
            return Ok(());
        }
        self.provider.stop(name)
    }

    /// Whether a non-expired record exists for the named lock.
    pub fn is_running(&self, name: Option<&str>) -> Result<bool> {
        self.provider.is_running(name)
    }
}
