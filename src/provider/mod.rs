//! Transaction storage providers.
//!
//! A provider is the storage-facing half of the crate: it persists lock
//! records, deletes them, and answers "is this lock currently running?".
//! The [`TransactionProvider`] trait is the seam that lets callers swap the
//! backing store without touching the facade.
//!
//! # Providers
//!
//! - [`FileTransactionProvider`] — the default: one file per lock under a
//!   shared directory, readable by every process on the host.
//! - [`MemoryTransactionProvider`] — a HashMap behind a mutex, for tests and
//!   single-process embedding.
//!
//! # Lazy reclamation
//!
//! Every provider must treat an expired record as absent: when `is_running`
//! observes a record whose expiry has passed, it deletes the record before
//! reporting `false`. Failure of that delete escalates like any other storage
//! failure.

mod file;
mod memory;


pub use file::{FileProviderOptions, FileTransactionProvider};
pub use memory::MemoryTransactionProvider;

use crate::error::Result;

/// Capability set required of any lock storage backend.
pub trait TransactionProvider {
    /// Create or overwrite the record for `name`, expiring `max_execution_ms`
    /// from now. An existing record is replaced unconditionally; this is what
    /// makes lock renewal possible, and also why two racing `start` calls
    /// have an undefined winner.
    fn start(&self, name: Option<&str>, max_execution_ms: u64) -> Result<()>;

    /// Delete the record for `name` if present. Absence is a no-op; a delete
    /// that fails despite the record existing is a storage failure.
    fn stop(&self, name: Option<&str>) -> Result<()>;

    /// Whether a non-expired record exists for `name`. A found-but-expired
    /// record is deleted before this returns `false`.
    fn is_running(&self, name: Option<&str>) -> Result<bool>;
}
