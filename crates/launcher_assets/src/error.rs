//! Error types for asset loading and lookup.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. Load-phase errors are fatal: the loader never hands back a
//! partially populated cache. Lookup misses are not errors at all, they surface as
//! an empty payload from [`AssetService`](crate::AssetService).

use crate::platform::PlatformId;
use camino::Utf8PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or serving client assets.
#[derive(Error, Debug)]
pub enum Error {
    /// A declared file or config blob could not be read during the load phase.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The LZMA or gzip encoder rejected its input.
    #[error("Compression error: {0}")]
    Compression(String),

    /// A wire platform type outside the closed enumeration.
    #[error("Unknown platform type: {0}")]
    UnknownPlatform(i32),

    /// A catalog was constructed with the same platform listed twice.
    #[error("Duplicate platform in catalog: {0}")]
    DuplicatePlatform(PlatformId),

    /// The asset slot already holds a published cache.
    #[error("Asset cache has already been published")]
    AlreadyPublished,

    /// A lookup surface was requested before the cache was published.
    #[error("Asset cache is not ready")]
    NotReady,

    /// The load phase did not finish before the configured deadline.
    #[error("Asset load did not complete within {0:?}")]
    LoadTimeout(Duration),

    /// The worker pool for the load phase could not be started.
    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Filesystem I/O failed outside of a declared file read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn read_failed(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Error::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Whether this error belongs to the load phase and must abort startup.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::ReadFailed { .. }
                | Error::Compression(_)
                | Error::LoadTimeout(_)
                | Error::ThreadPool(_)
                | Error::Io(_)
        )
    }
}
