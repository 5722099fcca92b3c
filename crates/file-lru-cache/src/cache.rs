//! Capacity-bounded file cache with least-recently-used eviction

use crate::error::{CacheError, Result};
use crate::eviction::{needs_eviction, select_victim, sort_by_recency};
use crate::hasher;
use crate::store::EntryStore;
use crate::types::{CacheConfig, CacheStats, EntryInfo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// A byte cache stored as one file per entry under a single directory.
///
/// Lookups share a read lock; writes, removals and clears take the lock
/// exclusively. Entry count is bounded by `capacity`: a `set` on a full store
/// first evicts the entry with the oldest modification time.
pub struct Cache {
    store: EntryStore,
    /// Maximum number of entries
    capacity: usize,
    /// Emit diagnostic events through `tracing`
    logging: AtomicBool,
    /// Guards the whole directory
    lock: RwLock<()>,
    /// Cache hit counter
    hits: AtomicU64,
    /// Cache miss counter
    misses: AtomicU64,
}

impl Cache {
    /// Open a cache rooted at `cache_dir`, creating the directory if needed
    pub fn new(cache_dir: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig {
            cache_dir: cache_dir.into(),
            capacity,
            logging: false,
        })
    }

    pub fn with_config(config: CacheConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(CacheError::Config(
                "capacity must be greater than zero".to_string(),
            ));
        }

        let store = EntryStore::new(config.cache_dir);
        if let Err(e) = store.create_root() {
            if config.logging {
                warn!(cache_dir = ?store.root(), error = %e, "Failed to create cache directory");
            }
            return Err(e);
        }

        let cache = Self {
            store,
            capacity: config.capacity,
            logging: AtomicBool::new(config.logging),
            lock: RwLock::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        };
        if cache.logging() {
            info!(cache_dir = ?cache.directory(), capacity = cache.capacity, "Cache initialized");
        }
        Ok(cache)
    }

    /// The on-disk identifier (file name) for a key
    pub fn identifier(key: &str) -> String {
        hasher::identifier(key)
    }

    pub fn directory(&self) -> &Path {
        self.store.root()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn logging(&self) -> bool {
        self.logging.load(Ordering::Relaxed)
    }

    /// Enable or disable diagnostic events
    pub fn set_logging(&self, enabled: bool) {
        self.logging.store(enabled, Ordering::Relaxed);
    }

    /// Copy the payload stored under `key` into `buf`, returning its length.
    ///
    /// A hit refreshes the entry's recency. Fails with `NotFound` on a miss and
    /// with an I/O error if `buf` is smaller than the payload.
    pub fn get(&self, key: &str, buf: &mut [u8]) -> Result<usize> {
        let id = hasher::identifier(key);
        let _guard = self.read_lock();
        let result = self.store.read_into(&id, buf);
        self.finish_lookup(&id, result)
    }

    /// Like [`Cache::get`], returning the payload in a buffer sized to fit
    pub fn get_vec(&self, key: &str) -> Result<Vec<u8>> {
        let id = hasher::identifier(key);
        let _guard = self.read_lock();
        let result = self.store.read(&id);
        self.finish_lookup(&id, result)
    }

    /// Store `data` under `key`, evicting the least recently used entry first
    /// when the store is already at capacity
    pub fn set(&self, key: &str, data: &[u8]) -> Result<()> {
        let id = hasher::identifier(key);
        let _guard = self.write_lock();

        self.evict_if_full()
            .map_err(|e| self.log_failure("set", &id, e))?;
        self.store
            .write(&id, data)
            .map_err(|e| self.log_failure("set", &id, e))?;

        if self.logging() {
            debug!(id = %id, size = data.len(), "Cached entry");
        }
        Ok(())
    }

    /// Delete the entry stored under `key`; fails with `NotFound` if absent
    pub fn remove(&self, key: &str) -> Result<()> {
        let id = hasher::identifier(key);
        let _guard = self.write_lock();

        self.store
            .remove(&id)
            .map_err(|e| self.log_failure("remove", &id, e))?;

        if self.logging() {
            debug!(id = %id, "Removed entry");
        }
        Ok(())
    }

    /// Delete every entry. The cache directory exists and is empty afterwards.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock();

        if let Err(e) = self.store.remove_all() {
            if self.logging() {
                warn!(cache_dir = ?self.directory(), error = %e, "Failed to clear cache");
            }
            return Err(e);
        }

        if self.logging() {
            info!(cache_dir = ?self.directory(), "Cache cleared");
        }
        Ok(())
    }

    /// Metadata for every entry, least recently used first
    pub fn entries(&self) -> Result<Vec<EntryInfo>> {
        let _guard = self.read_lock();
        let mut entries = self.store.list()?;
        sort_by_recency(&mut entries);
        Ok(entries)
    }

    /// Number of entries currently stored
    pub fn len(&self) -> Result<usize> {
        let _guard = self.read_lock();
        Ok(self.store.list()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Get current cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let entries = {
            let _guard = self.read_lock();
            self.store.list()?
        };
        Ok(CacheStats {
            entries: entries.len(),
            total_size: entries.iter().map(|e| e.size).sum(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }

    /// Evict one entry if the store is full. Caller holds the write lock.
    fn evict_if_full(&self) -> Result<()> {
        let entries = self.store.list()?;
        if !needs_eviction(entries.len(), self.capacity) {
            return Ok(());
        }

        if let Some(victim) = select_victim(&entries) {
            match self.store.remove(&victim.id) {
                Ok(()) => {}
                // Already gone, the store shrank anyway
                Err(CacheError::NotFound) => {}
                Err(e) => return Err(e),
            }
            if self.logging() {
                debug!(id = %victim.id, modified = %victim.modified, "Evicted least recently used entry");
            }
        }
        Ok(())
    }

    /// Count a lookup and, on a hit, refresh the entry's recency
    fn finish_lookup<T>(&self, id: &str, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                if self.logging() {
                    debug!(id = %id, "Cache hit");
                }
                // Only the shared lock is held here; concurrent hits on one
                // entry may race, which only blurs eviction order.
                if let Err(e) = self.store.touch(id) {
                    if self.logging() {
                        warn!(id = %id, error = %e, "Failed to refresh entry recency");
                    }
                }
                Ok(value)
            }
            Err(e) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Err(self.log_failure("get", id, e))
            }
        }
    }

    fn log_failure(&self, op: &'static str, id: &str, err: CacheError) -> CacheError {
        if self.logging() {
            if err.is_not_found() {
                debug!(op, id = %id, "Cache miss");
            } else {
                warn!(op, id = %id, error = %err, "Cache operation failed");
            }
        }
        err
    }

    // The lock guards no data of its own, so a poisoned lock is still usable.
    fn read_lock(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }
}
