//! crates/om_io/src/cache.rs
//! Read-only table cache: at most one loaded source per cache, reused until
//! the source changes on disk or `invalidate()` is called.
//!
//! Staleness is a cheap `(len, modified)` fingerprint; a changed fingerprint
//! is confirmed by re-hashing the bytes, so touching a file without editing
//! it keeps the cached table.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::hasher;
use crate::loader::{self, LoadOptions, LoadedTable};
use crate::IoError;

/// Metadata snapshot used to detect source changes without reading the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self, IoError> {
        let meta = fs::metadata(path)
            .map_err(|e| IoError::Read { path: path.display().to_string(), msg: e.to_string() })?;
        Ok(Self { len: meta.len(), modified: meta.modified().ok() })
    }
}

#[derive(Debug)]
struct Entry {
    path: PathBuf,
    opts: LoadOptions,
    fingerprint: SourceFingerprint,
    loaded: Arc<LoadedTable>,
}

#[derive(Debug, Default)]
pub struct TableCache {
    slot: RwLock<Option<Entry>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use or when
    /// the source (or the options) changed since the last load.
    pub fn get_or_load(&self, path: &Path, opts: &LoadOptions) -> Result<Arc<LoadedTable>, IoError> {
        let key = canonical(path)?;
        let fingerprint = SourceFingerprint::of(&key)?;

        {
            let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(e) = guard.as_ref() {
                if e.path == key && e.opts == *opts && e.fingerprint == fingerprint {
                    debug!(source = %key.display(), "table cache hit");
                    return Ok(Arc::clone(&e.loaded));
                }
            }
        }

        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have refreshed the slot while we waited.
        if let Some(e) = guard.as_mut() {
            if e.path == key && e.opts == *opts {
                if e.fingerprint == fingerprint {
                    return Ok(Arc::clone(&e.loaded));
                }
                if hasher::sha256_file(&key)? == e.loaded.digest.as_str() {
                    debug!(source = %key.display(), "source touched but unchanged; keeping cached table");
                    e.fingerprint = fingerprint;
                    return Ok(Arc::clone(&e.loaded));
                }
            }
        }

        debug!(source = %key.display(), "table cache miss");
        let loaded = Arc::new(loader::load_with(&key, opts)?);
        *guard = Some(Entry { path: key, opts: *opts, fingerprint, loaded: Arc::clone(&loaded) });
        Ok(loaded)
    }

    /// Drop the cached table; the next `get_or_load` reads the source again.
    pub fn invalidate(&self) {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("table cache invalidated");
        }
    }

    /// True when nothing is cached for `path` or its fingerprint moved.
    pub fn is_stale(&self, path: &Path) -> Result<bool, IoError> {
        let key = canonical(path)?;
        let fingerprint = SourceFingerprint::of(&key)?;
        let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Ok(match guard.as_ref() {
            Some(e) => e.path != key || e.fingerprint != fingerprint,
            None => true,
        })
    }
}

/// Process-wide cache.
pub fn shared() -> &'static TableCache {
    static SHARED: Lazy<TableCache> = Lazy::new(TableCache::new);
    &SHARED
}

fn canonical(path: &Path) -> Result<PathBuf, IoError> {
    fs::canonicalize(path)
        .map_err(|e| IoError::Read { path: path.display().to_string(), msg: e.to_string() })
}
