//! txlock: named, TTL-bound locks backed by plain files.
//!
//! A lock here is a named "transaction": a small record in persistent storage
//! carrying an expiry timestamp. Any number of processes on the same host can
//! serialize access to a shared resource by agreeing on a lock name and a
//! storage directory, with no lock server involved.
//!
//! The typical flow:
//!
//! ```no_run
//! use txlock::Lock;
//!
//! let lock = Lock::new()?;
//! lock.wait(Some("nightly-import"))?;       // block until the name is free
//! lock.start(Some("nightly-import"))?;      // claim it (default 3s TTL)
//! // ... do the work ...
//! lock.stop(Some("nightly-import"))?;       // release early, or let it expire
//! # Ok::<(), txlock::TxlockError>(())
//! ```
//!
//! Exclusion is advisory and best-effort: there is no atomic acquire-or-fail,
//! and two racing `start` calls have an undefined winner. What the crate does
//! guarantee is that an expired lock never reports as running, that expired
//! records are reclaimed lazily on observation, and that stale records are
//! eventually garbage-collected by a probabilistic sweep.
//!
//! The storage backend is pluggable through [`TransactionProvider`];
//! [`FileTransactionProvider`] (one file per lock under a shared directory)
//! is the default, and [`MemoryTransactionProvider`] serves tests and
//! single-process embedding.

pub mod error;
pub mod lock;
pub mod provider;
pub mod record;

pub use error::{Result, TxlockError};
pub use lock::Lock;
pub use provider::{
    FileProviderOptions, FileTransactionProvider, MemoryTransactionProvider, TransactionProvider,
};
pub use record::DEFAULT_NAME;
