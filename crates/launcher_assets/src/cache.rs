//! Published, read-only asset index.
//!
//! An [`AssetCache`] is assembled once by the [`AssetLoader`](crate::AssetLoader)
//! and then frozen. It is handed to the rest of the process through an
//! [`AssetSlot`], a single-assignment cell: before publication nothing can be
//! read, after publication nothing can be written. Readers share the cache via
//! `Arc` and never take a lock.

use crate::compression::Transform;
use crate::error::{Error, Result};
use crate::platform::PlatformId;
use crate::service::AssetService;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// One distributable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Bytes sent to launchers (compressed or passthrough).
    pub stored_bytes: Vec<u8>,
    /// CRC-32 of the raw file, taken before the transform ran.
    pub checksum: u32,
    /// Transform that produced `stored_bytes`.
    pub transform: Transform,
    /// Length of the raw file.
    pub raw_len: usize,
}

/// Config blob and files for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformBundle {
    /// Raw config blob; never compressed.
    pub config_bytes: Vec<u8>,
    /// File name -> entry.
    pub files: HashMap<String, AssetEntry>,
}

impl PlatformBundle {
    pub fn file(&self, file_name: &str) -> Option<&AssetEntry> {
        self.files.get(file_name)
    }

    pub fn raw_bytes(&self) -> usize {
        self.files.values().map(|e| e.raw_len).sum()
    }

    pub fn stored_bytes(&self) -> usize {
        self.files.values().map(|e| e.stored_bytes.len()).sum()
    }
}

/// Platform id -> bundle.
///
/// Only the loader constructs a cache; once built there is no API to modify it.
#[derive(Debug, Default)]
pub struct AssetCache {
    bundles: HashMap<PlatformId, PlatformBundle>,
}

impl AssetCache {
    pub(crate) fn from_bundles(bundles: HashMap<PlatformId, PlatformBundle>) -> Self {
        Self { bundles }
    }

    pub fn bundle(&self, id: PlatformId) -> Option<&PlatformBundle> {
        self.bundles.get(&id)
    }

    /// Loaded platforms, sorted by wire value.
    pub fn platforms(&self) -> Vec<PlatformId> {
        let mut ids: Vec<PlatformId> = self.bundles.keys().copied().collect();
        ids.sort_unstable_by_key(|id| id.wire_value());
        ids
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// Externally observable lifecycle of an [`AssetSlot`].
///
/// Loading happens before publication and is not visible here: the slot goes
/// straight from `Empty` to `Ready` in a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Ready,
}

/// Single-assignment holder for the process-wide cache.
///
/// Cloning the slot clones the handle, not the cache.
#[derive(Debug, Clone, Default)]
pub struct AssetSlot {
    inner: Arc<OnceLock<Arc<AssetCache>>>,
}

impl AssetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fully built cache. Fails if a cache was already published.
    pub fn publish(&self, cache: AssetCache) -> Result<Arc<AssetCache>> {
        let cache = Arc::new(cache);
        self.inner
            .set(cache.clone())
            .map_err(|_| Error::AlreadyPublished)?;

        tracing::info!("Asset cache published with {} platform(s)", cache.len());
        Ok(cache)
    }

    pub fn get(&self) -> Option<Arc<AssetCache>> {
        self.inner.get().cloned()
    }

    pub fn state(&self) -> CacheState {
        if self.inner.get().is_some() {
            CacheState::Ready
        } else {
            CacheState::Empty
        }
    }

    /// Query surface over the published cache.
    pub fn service(&self) -> Result<AssetService> {
        self.get().map(AssetService::new).ok_or(Error::NotReady)
    }
}
