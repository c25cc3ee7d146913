//! Filesystem-backed transaction provider.
//!
//! Each lock is one file, `<base_dir>/<key>.tmp`, containing
//! `"<expires_at>|<name>"`. The base directory is shared by every process
//! using the same configuration, which is the whole point: the filesystem is
//! the coordination medium.
//!
//! Construction also doubles as the garbage-collection trigger: with
//! probability `gc_probability` a full sweep of the base directory runs
//! inline, deleting every expired record. Sweep failures are logged and
//! swallowed so a broken GC pass can never take down a normal lock operation.

use crate::error::{Result, TxlockError, strip_markup};
use crate::provider::TransactionProvider;
use crate::record::{LockRecord, storage_key};
use rand::Rng;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default permission bits for created directories and lock files.
pub const DEFAULT_MODE: u32 = 0o777;

/// Default probability that a sweep runs on construction.
pub const DEFAULT_GC_PROBABILITY: f64 = 0.001;

/// Configuration for [`FileTransactionProvider`].
#[derive(Debug, Clone)]
pub struct FileProviderOptions {
    /// Directory holding the lock files. `None` selects a fixed path under
    /// the system temporary directory, derived from this provider's identity
    /// so unrelated applications land in the same place only when they share
    /// the crate.
    pub base_dir: Option<PathBuf>,

    /// Permission bits applied to the base directory and every lock file
    /// (Unix only; ignored elsewhere).
    pub mode: u32,

    /// Probability in [0, 1] that construction runs a GC sweep. Negative
    /// values are clamped to zero.
    pub gc_probability: f64,
}

impl Default for FileProviderOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            mode: DEFAULT_MODE,
            gc_probability: DEFAULT_GC_PROBABILITY,
        }
    }
}

/// The default [`TransactionProvider`]: one record file per lock key.
#[derive(Debug)]
pub struct FileTransactionProvider {
    base_dir: PathBuf,
    mode: u32,
}

impl FileTransactionProvider {
    /// Construct with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(FileProviderOptions::default())
    }

    /// Construct with explicit options.
    ///
    /// Creates the base directory (including parents) if absent; a concurrent
    /// creation race is tolerated, any other failure is fatal. May then run
    /// the GC sweep, depending on the probability draw.
    pub fn with_options(options: FileProviderOptions) -> Result<Self> {
        let base_dir = options.base_dir.unwrap_or_else(default_base_dir);
        if !base_dir.is_dir() {
            create_dir(&base_dir, options.mode)?;
        }

        let provider = Self {
            base_dir,
            mode: options.mode,
        };

        let gc_probability = options.gc_probability.max(0.0);
        if rand::thread_rng().r#gen::<f64>() < gc_probability
            && let Err(e) = provider.sweep()
        {
            tracing::warn!("lock garbage collection failed: {}", e);
        }

        Ok(provider)
    }

    /// Directory holding the lock files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Delete every expired record in the base directory.
    ///
    /// Unreadable entries (including stray subdirectories) are skipped;
    /// a delete that fails on an expired record escalates. Runs automatically
    /// on a fraction of constructions, but callers that want deterministic
    /// cleanup can invoke it directly.
    pub fn sweep(&self) -> Result<()> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| {
            TxlockError::Storage(format!(
                "unable to list directory \"{}\": {}",
                self.base_dir.display(),
                strip_markup(&e.to_string())
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                TxlockError::Storage(format!(
                    "unable to list directory \"{}\": {}",
                    self.base_dir.display(),
                    strip_markup(&e.to_string())
                ))
            })?;
            let path = entry.path();

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(_) => continue,
            };
            if !LockRecord::parse(&content).is_expired() {
                continue;
            }

            fs::remove_file(&path).map_err(|e| {
                TxlockError::Storage(format!(
                    "unable to delete \"{}\": {}",
                    path.display(),
                    strip_markup(&e.to_string())
                ))
            })?;
        }

        Ok(())
    }

    fn record_path(&self, name: Option<&str>) -> PathBuf {
        self.base_dir.join(format!("{}.tmp", storage_key(name)))
    }

    #[cfg(unix)]
    fn apply_mode(&self, path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(self.mode)).map_err(|e| {
            TxlockError::Storage(format!(
                "unable to chmod file \"{}\" to mode {:o}: {}",
                path.display(),
                self.mode,
                strip_markup(&e.to_string())
            ))
        })
    }

    #[cfg(not(unix))]
    fn apply_mode(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

impl TransactionProvider for FileTransactionProvider {
    fn start(&self, name: Option<&str>, max_execution_ms: u64) -> Result<()> {
        let path = self.record_path(name);
        let record = LockRecord::starting_now(name, max_execution_ms);

        fs::write(&path, record.encode()).map_err(|e| {
            TxlockError::Storage(format!(
                "unable to write \"{}\": {}",
                path.display(),
                strip_markup(&e.to_string())
            ))
        })?;

        // The chmod is a separate step, not atomic with the write.
        self.apply_mode(&path)
    }

    fn stop(&self, name: Option<&str>) -> Result<()> {
        let path = self.record_path(name);
        if !path.is_file() {
            return Ok(());
        }

        fs::remove_file(&path).map_err(|e| {
            TxlockError::Storage(format!(
                "unable to delete \"{}\": {}",
                path.display(),
                strip_markup(&e.to_string())
            ))
        })
    }

    fn is_running(&self, name: Option<&str>) -> Result<bool> {
        let path = self.record_path(name);
        if !path.is_file() {
            return Ok(false);
        }

        // A file that vanished or turned unreadable between the existence
        // check and the read counts as not running.
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Ok(false),
        };
        if !LockRecord::parse(&content).is_expired() {
            return Ok(true);
        }

        // Expired: reclaim before answering.
        self.stop(name)?;
        Ok(false)
    }
}

/// Fixed default path under the system temporary directory, namespaced by a
/// digest of this provider's identity.
fn default_base_dir() -> PathBuf {
    std::env::temp_dir()
        .join("lock")
        .join(format!("{:x}", md5::compute(file!())))
}

/// Create a directory and its parents, tolerating a concurrent creation race.
fn create_dir(dir: &Path, mode: u32) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }

    match builder.create(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(TxlockError::Storage(format!(
            "unable to create directory \"{}\" with mode {:o}: {}",
            dir.display(),
            mode,
            strip_markup(&e.to_string())
        ))),
    }
}
