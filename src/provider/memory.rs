//! In-memory transaction provider.
//!
//! Same observable semantics as the file provider, minus the filesystem:
//! useful as a test double for the facade and for callers that only need
//! exclusion between threads of a single process.

use crate::error::{Result, TxlockError};
use crate::provider::TransactionProvider;
use crate::record::{LockRecord, storage_key};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A [`TransactionProvider`] keeping records in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryTransactionProvider {
    records: Mutex<HashMap<String, LockRecord>>,
}

impl MemoryTransactionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, LockRecord>>> {
        self.records
            .lock()
            .map_err(|_| TxlockError::Provider("lock table mutex poisoned".to_string()))
    }
}

impl TransactionProvider for MemoryTransactionProvider {
    fn start(&self, name: Option<&str>, max_execution_ms: u64) -> Result<()> {
        let record = LockRecord::starting_now(name, max_execution_ms);
        self.records()?.insert(storage_key(name), record);
        Ok(())
    }

    fn stop(&self, name: Option<&str>) -> Result<()> {
        self.records()?.remove(&storage_key(name));
        Ok(())
    }

    fn is_running(&self, name: Option<&str>) -> Result<bool> {
        let mut records = self.records()?;
        let key = storage_key(name);
        match records.get(&key) {
            Some(record) if record.is_expired() => {
                records.remove(&key);
                Ok(false)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }
}
