//! Query surface over a published [`AssetCache`].
//!
//! Lookups are synchronous, allocation-free reads. A miss of any kind (platform
//! not loaded, file not in the bundle) returns an empty slice, which is the
//! not-found signal launchers already understand.

use crate::cache::{AssetCache, AssetEntry};
use crate::platform::PlatformId;
use std::sync::Arc;

/// How [`AssetService::file`] treats the checksum a launcher sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChecksumPolicy {
    /// Accept and ignore the checksum. Lookup is by name only.
    #[default]
    Ignore,
    /// Treat a checksum mismatch as a miss.
    Verify,
}

/// Read-only handle to the published cache. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AssetService {
    cache: Arc<AssetCache>,
    checksum_policy: ChecksumPolicy,
}

impl AssetService {
    pub fn new(cache: Arc<AssetCache>) -> Self {
        Self {
            cache,
            checksum_policy: ChecksumPolicy::default(),
        }
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    pub fn cache(&self) -> &Arc<AssetCache> {
        &self.cache
    }

    /// Config blob for a platform, or an empty slice if the platform is not loaded.
    pub fn config(&self, platform: PlatformId) -> &[u8] {
        match self.cache.bundle(platform) {
            Some(bundle) => &bundle.config_bytes,
            None => {
                tracing::trace!("Config miss platform={}", platform);
                &[]
            }
        }
    }

    /// Stored bytes of a file, or an empty slice on a miss.
    ///
    /// `expected_checksum` is only compared when the service was configured with
    /// [`ChecksumPolicy::Verify`].
    pub fn file(&self, platform: PlatformId, file_name: &str, expected_checksum: u32) -> &[u8] {
        let Some(entry) = self.entry(platform, file_name) else {
            tracing::trace!("File miss platform={} file={}", platform, file_name);
            return &[];
        };

        if self.checksum_policy == ChecksumPolicy::Verify && entry.checksum != expected_checksum {
            tracing::trace!(
                "Checksum mismatch platform={} file={} expected={:08x} actual={:08x}",
                platform,
                file_name,
                expected_checksum,
                entry.checksum
            );
            return &[];
        }

        &entry.stored_bytes
    }

    pub fn entry(&self, platform: PlatformId, file_name: &str) -> Option<&AssetEntry> {
        self.cache.bundle(platform)?.file(file_name)
    }

    /// CRC-32 of the raw file, if present.
    pub fn checksum(&self, platform: PlatformId, file_name: &str) -> Option<u32> {
        self.entry(platform, file_name).map(|e| e.checksum)
    }
}
