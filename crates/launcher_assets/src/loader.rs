//! Eager, concurrent bundle loader.
//!
//! The [`AssetLoader`] turns a [`PlatformCatalog`] into a complete [`AssetCache`].
//!
//! # Load Algorithm
//!
//! 1. Start a bounded rayon pool (`workers` threads, default: available parallelism).
//! 2. Fan out one task per platform descriptor. Within a platform, the config
//!    blob and the files are read concurrently.
//! 3. For each file: read raw bytes, take the CRC-32 of the raw bytes, pick a
//!    transform from [`choose_transform`], and encode.
//! 4. Join every platform task. The first failure aborts the whole load and no
//!    cache is returned.
//! 5. Assemble the bundles into an [`AssetCache`] that the caller publishes
//!    through an [`AssetSlot`](crate::AssetSlot).

use crate::cache::{AssetCache, AssetEntry, PlatformBundle};
use crate::catalog::{PlatformCatalog, PlatformDescriptor};
use crate::compression::{choose_transform, FileRole};
use crate::content::AssetSource;
use crate::error::{Error, Result};
use crate::platform::PlatformId;
use crate::utils::checksum;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Progress information emitted while loading.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadProgress {
    pub stage: LoadStage,
    /// Platform that just finished (set during `PlatformLoaded`).
    pub platform: Option<PlatformId>,
    /// Number of platforms finished so far.
    pub current: u32,
    /// Number of platforms in the catalog.
    pub total: u32,
}

/// Stages of a load.
///
/// Emitted in order: `Started` -> `PlatformLoaded` (once per platform, any order) -> `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadStage {
    Started,
    PlatformLoaded,
    Complete,
}

/// Per-platform totals gathered during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformStats {
    pub platform: PlatformId,
    pub files: usize,
    pub config_bytes: usize,
    pub raw_bytes: usize,
    pub stored_bytes: usize,
}

/// Result of a successful load.
#[derive(Debug)]
pub struct LoadReport {
    /// The complete cache, ready to publish.
    pub cache: AssetCache,
    /// One entry per platform, in catalog order.
    pub stats: Vec<PlatformStats>,
    /// Wall-clock time for the whole load.
    pub load_time: Duration,
}

type ProgressCallback = Arc<dyn Fn(LoadProgress) + Send + Sync>;

/// Loads every platform bundle of a catalog into memory.
///
/// ```no_run
/// use launcher_assets::{AssetLoader, AssetSlot, FsAssetSource, PlatformCatalog};
///
/// # fn main() -> launcher_assets::Result<()> {
/// let slot = AssetSlot::new();
/// let report = AssetLoader::new(FsAssetSource::new("/srv/clients"))
///     .with_workers(4)
///     .load_all(&PlatformCatalog::default())?;
/// slot.publish(report.cache)?;
/// # Ok(())
/// # }
/// ```
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    workers: Option<usize>,
    timeout: Option<Duration>,
    progress_callback: Option<ProgressCallback>,
}

impl AssetLoader {
    pub fn new<S: AssetSource + 'static>(source: S) -> Self {
        Self::from_shared(Arc::new(source))
    }

    pub fn from_shared(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            workers: None,
            timeout: None,
            progress_callback: None,
        }
    }

    /// Size of the worker pool. Values below 1 are raised to 1.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Abort the load with [`Error::LoadTimeout`] if it runs longer than `timeout`.
    ///
    /// Reads already in flight are not interrupted; their results are discarded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(LoadProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers)
    }

    /// Load every platform in `catalog`.
    ///
    /// Returns only after all platforms loaded, or with the first error encountered.
    pub fn load_all(&self, catalog: &PlatformCatalog) -> Result<LoadReport> {
        let start = Instant::now();
        let job = LoadJob {
            source: self.source.clone(),
            workers: self.workers(),
            progress_callback: self.progress_callback.clone(),
        };

        tracing::info!(
            "Loading {} platform bundle(s) with {} worker(s)",
            catalog.len(),
            job.workers
        );

        let loaded = match self.timeout {
            Some(timeout) => job.run_with_timeout(catalog.clone(), timeout)?,
            None => job.run(catalog)?,
        };

        let total = catalog.len() as u32;
        let mut stats = Vec::with_capacity(loaded.len());
        let mut bundles = HashMap::with_capacity(loaded.len());
        for (stat, bundle) in loaded {
            bundles.insert(stat.platform, bundle);
            stats.push(stat);
        }

        let load_time = start.elapsed();
        tracing::info!(
            "Loaded {} platform bundle(s), raw={} stored={} elapsed_ms={}",
            bundles.len(),
            stats.iter().map(|s| s.raw_bytes).sum::<usize>(),
            stats.iter().map(|s| s.stored_bytes).sum::<usize>(),
            load_time.as_millis()
        );

        job.emit(LoadProgress {
            stage: LoadStage::Complete,
            platform: None,
            current: total,
            total,
        });

        Ok(LoadReport {
            cache: AssetCache::from_bundles(bundles),
            stats,
            load_time,
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Everything a load needs, detached from the loader so it can move to another thread.
#[derive(Clone)]
struct LoadJob {
    source: Arc<dyn AssetSource>,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl LoadJob {
    fn run(&self, catalog: &PlatformCatalog) -> Result<Vec<(PlatformStats, PlatformBundle)>> {
        let total = catalog.len() as u32;
        self.emit(LoadProgress {
            stage: LoadStage::Started,
            platform: None,
            current: 0,
            total,
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("asset-loader-{i}"))
            .build()?;

        let finished = AtomicU32::new(0);
        pool.install(|| {
            catalog
                .descriptors()
                .par_iter()
                .map(|descriptor| {
                    let loaded = self.load_platform(descriptor)?;
                    let current = finished.fetch_add(1, Ordering::SeqCst) + 1;
                    self.emit(LoadProgress {
                        stage: LoadStage::PlatformLoaded,
                        platform: Some(descriptor.id),
                        current,
                        total,
                    });
                    Ok(loaded)
                })
                .collect::<Result<Vec<_>>>()
        })
    }

    fn run_with_timeout(
        &self,
        catalog: PlatformCatalog,
        timeout: Duration,
    ) -> Result<Vec<(PlatformStats, PlatformBundle)>> {
        let (tx, rx) = mpsc::channel();
        let job = self.clone();
        let handle = std::thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                // The receiver is gone if the deadline already passed.
                let _ = tx.send(job.run(&catalog));
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!("Asset load exceeded {:?}; aborting", timeout);
                Err(Error::LoadTimeout(timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => match handle.join() {
                Err(panic) => std::panic::resume_unwind(panic),
                Ok(()) => Err(Error::Io(std::io::Error::other(
                    "asset loader exited without a result",
                ))),
            },
        }
    }

    fn load_platform(
        &self,
        descriptor: &PlatformDescriptor,
    ) -> Result<(PlatformStats, PlatformBundle)> {
        let mut targets: Vec<(&str, FileRole)> = Vec::with_capacity(descriptor.file_count());
        if let Some(primary) = &descriptor.primary_file {
            targets.push((primary.as_str(), FileRole::Primary));
        }
        targets.extend(
            descriptor
                .auxiliary_files
                .iter()
                .map(|name| (name.as_str(), FileRole::Auxiliary)),
        );

        let (config_bytes, entries) = rayon::join(
            || self.source.read(&descriptor.config_path()),
            || {
                targets
                    .par_iter()
                    .map(|&(name, role)| self.load_file(descriptor, name, role))
                    .collect::<Result<Vec<_>>>()
            },
        );
        let config_bytes = config_bytes?;
        let entries = entries?;

        // Auxiliary files come after the primary file, so a repeated name keeps
        // the auxiliary entry.
        let mut files = HashMap::with_capacity(entries.len());
        for (name, entry) in entries {
            if files.insert(name.to_string(), entry).is_some() {
                tracing::warn!(
                    "Platform={} lists '{}' more than once; keeping the last entry",
                    descriptor.id,
                    name
                );
            }
        }

        let bundle = PlatformBundle {
            config_bytes,
            files,
        };
        let stats = PlatformStats {
            platform: descriptor.id,
            files: bundle.files.len(),
            config_bytes: bundle.config_bytes.len(),
            raw_bytes: bundle.raw_bytes(),
            stored_bytes: bundle.stored_bytes(),
        };

        tracing::info!(
            "Platform={} loaded files={} raw={} stored={}",
            descriptor.id,
            stats.files,
            stats.raw_bytes,
            stats.stored_bytes
        );

        Ok((stats, bundle))
    }

    fn load_file<'a>(
        &self,
        descriptor: &PlatformDescriptor,
        file_name: &'a str,
        role: FileRole,
    ) -> Result<(&'a str, AssetEntry)> {
        let raw = self.source.read(&descriptor.source_path.join(file_name))?;

        // Checksum covers the raw bytes and must be taken before encoding.
        let crc = checksum(&raw);
        let transform = choose_transform(file_name, role);
        let stored_bytes = transform.encode(&raw)?;

        tracing::debug!(
            "Platform={} file='{}' role={:?} transform={:?} crc={:08x} raw={} stored={}",
            descriptor.id,
            file_name,
            role,
            transform,
            crc,
            raw.len(),
            stored_bytes.len()
        );

        Ok((
            file_name,
            AssetEntry {
                stored_bytes,
                checksum: crc,
                transform,
                raw_len: raw.len(),
            },
        ))
    }

    /// Emit a progress event if a callback was registered.
    fn emit(&self, progress: LoadProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}
