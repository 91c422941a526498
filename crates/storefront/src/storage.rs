//! Durable key-value slots for client-side state.
//!
//! Each store mirrors its full state into one slot under a fixed key. The
//! slot holds an opaque string (JSON in practice); decoding is the store's
//! concern, so a slot never fails on malformed content.
//!
//! # Backends
//!
//! - [`FileStorage`] - one `<key>.json` file per slot in a data directory
//! - [`MemoryStorage`] - process-local map, for tests and throwaway sessions
//! - [`WriteBehindStorage`] - hands writes to a background task so async
//!   callers never block on the filesystem

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Storage keys for the persisted stores.
pub mod keys {
    /// Key for the cart line items.
    pub const CART: &str = "cart-storage";

    /// Key for the wishlist entries.
    pub const WISHLIST: &str = "wishlist-storage";
}

/// Errors from reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters that cannot name a slot.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Underlying filesystem failure.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The background writer has stopped accepting writes.
    #[error("storage writer stopped")]
    WriterClosed,
}

/// A durable string-valued key-value slot.
///
/// Implementations must be shareable across the stores of one application
/// instance.
pub trait StorageSlot: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the slot. Removing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed storage: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the slots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` unless `key` is non-empty ASCII
    /// alphanumerics, `-` or `_`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl StorageSlot for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        // Atomic replace: readers see the old slot or the new one.
        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(io_error(&tmp))?;
        file.write_all(value.as_bytes()).map_err(io_error(&tmp))?;
        file.sync_all().map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

/// In-memory storage. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageSlot for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots().remove(key);
        Ok(())
    }
}

enum SlotWrite {
    Save { key: String, value: String },
    Remove { key: String },
    Flush(oneshot::Sender<()>),
}

/// Write-behind wrapper for use inside a tokio runtime.
///
/// `save` and `remove` enqueue and return immediately. A single writer task
/// applies them in order on the blocking pool. `load` reads the wrapped
/// storage directly and does not see writes still queued; call
/// [`flush`](Self::flush) first when that matters.
#[derive(Clone)]
pub struct WriteBehindStorage {
    inner: Arc<dyn StorageSlot>,
    tx: mpsc::UnboundedSender<SlotWrite>,
}

impl WriteBehindStorage {
    /// Wrap `inner` and start its writer task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(inner: Arc<dyn StorageSlot>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(Arc::clone(&inner), rx));
        Self { inner, tx }
    }

    /// Wait until every write queued so far has been applied.
    pub async fn flush(&self) {
        let (done, applied) = oneshot::channel();
        if self.tx.send(SlotWrite::Flush(done)).is_ok() {
            let _ = applied.await;
        }
    }

    fn enqueue(&self, write: SlotWrite) -> Result<(), StorageError> {
        self.tx.send(write).map_err(|_| StorageError::WriterClosed)
    }
}

impl std::fmt::Debug for WriteBehindStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteBehindStorage").finish_non_exhaustive()
    }
}

impl StorageSlot for WriteBehindStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.enqueue(SlotWrite::Save {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.enqueue(SlotWrite::Remove {
            key: key.to_string(),
        })
    }
}

async fn run_writer(inner: Arc<dyn StorageSlot>, mut rx: mpsc::UnboundedReceiver<SlotWrite>) {
    tracing::debug!("storage writer started");

    while let Some(write) = rx.recv().await {
        let slot = Arc::clone(&inner);
        let (key, op) = match write {
            SlotWrite::Flush(done) => {
                let _ = done.send(());
                continue;
            }
            SlotWrite::Save { key, value } => {
                let k = key.clone();
                (key, tokio::task::spawn_blocking(move || slot.save(&k, &value)))
            }
            SlotWrite::Remove { key } => {
                let k = key.clone();
                (key, tokio::task::spawn_blocking(move || slot.remove(&k)))
            }
        };

        match op.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(key = %key, error = %e, "failed to persist state"),
            Err(e) => tracing::error!(key = %key, error = %e, "storage write task failed"),
        }
    }

    tracing::debug!("storage writer stopped");
}
