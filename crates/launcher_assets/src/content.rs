//! Asset source abstraction.
//!
//! The loader never touches the filesystem directly. It asks an [`AssetSource`]
//! for the bytes at a path relative to the content root, which keeps the load
//! pipeline independent of where bundles actually live.
//!
//! The crate ships [`FsAssetSource`] for on-disk content trees and
//! [`MemoryAssetSource`] for embedding bundles or feeding the loader in tests.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::io;

/// Provides raw file bytes to the loader.
///
/// Implementations must be [`Send`] + [`Sync`]: platforms are loaded concurrently
/// and every worker reads through the same source.
pub trait AssetSource: Send + Sync {
    /// Read the full contents of `rel_path`.
    ///
    /// Any failure is a load failure; there is no notion of an optional file.
    fn read(&self, rel_path: &Utf8Path) -> Result<Vec<u8>>;
}

/// Filesystem-backed source rooted at a content directory.
///
/// ```text
/// content_root/
///   nxt/client/linux/
///     jav_config.ws
///     librs2client.so
///   jav/client/
///     jav_config.ws
///     gamepack.jar
///     browsercontrol_0.jar
///     browsercontrol_1.jar
/// ```
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: Utf8PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn read(&self, rel_path: &Utf8Path) -> Result<Vec<u8>> {
        let path = self.root.join(rel_path);
        std::fs::read(path.as_std_path()).map_err(|e| Error::read_failed(path, e))
    }
}

/// In-memory source keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    files: HashMap<Utf8PathBuf, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(
        mut self,
        rel_path: impl Into<Utf8PathBuf>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(rel_path, bytes);
        self
    }

    pub fn insert(&mut self, rel_path: impl Into<Utf8PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(rel_path.into(), bytes.into());
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, rel_path: &Utf8Path) -> Result<Vec<u8>> {
        self.files.get(rel_path).cloned().ok_or_else(|| {
            Error::read_failed(
                rel_path,
                io::Error::new(io::ErrorKind::NotFound, "no such file in memory source"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_fs_read() {
        let dir = tempdir().unwrap();
        let platform_dir = dir.path().join("nxt/client/linux");
        fs::create_dir_all(&platform_dir).unwrap();
        fs::write(platform_dir.join("jav_config.ws"), b"param=1").unwrap();

        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let source = FsAssetSource::new(root);

        let bytes = source
            .read(Utf8Path::new("nxt/client/linux/jav_config.ws"))
            .unwrap();
        assert_eq!(bytes, b"param=1");
    }

    #[test]
    fn test_fs_missing_file_reports_full_path() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let source = FsAssetSource::new(root.clone());

        let err = source.read(Utf8Path::new("missing.so")).unwrap_err();
        match err {
            Error::ReadFailed { path, source } => {
                assert_eq!(path, root.join("missing.so"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_memory_source() {
        let source = MemoryAssetSource::new().with_file("a/b.dll", b"MZ".to_vec());

        assert_eq!(source.read(Utf8Path::new("a/b.dll")).unwrap(), b"MZ");
        assert!(matches!(
            source.read(Utf8Path::new("a/c.dll")),
            Err(Error::ReadFailed { .. })
        ));
    }
}
