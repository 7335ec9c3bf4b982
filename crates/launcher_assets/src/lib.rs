//! In-memory distribution cache for launcher client bundles.
//!
//! At startup the [`AssetLoader`] reads every platform bundle listed in a
//! [`PlatformCatalog`], checksums and compresses each file, and produces an
//! immutable [`AssetCache`]. The cache is published once into an [`AssetSlot`]
//! and served from memory by [`AssetService`] with no disk I/O and no locking.
//!
//! - **Compression policy**: primary `.jar` files are re-wrapped in gzip,
//!   auxiliary `.jar` files pass through, everything else is LZMA-compressed
//! - **Checksums**: CRC-32 over the raw file, so launchers can skip unchanged downloads
//! - **Fail-fast loading**: any unreadable file aborts the whole load
//! - **Single publication**: readers never observe a partially built cache
//!
//! # Example
//!
//! ```no_run
//! use launcher_assets::{AssetLoader, AssetSlot, FsAssetSource, PlatformCatalog, PlatformId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let slot = AssetSlot::new();
//! let report = AssetLoader::new(FsAssetSource::new("/srv/clients"))
//!     .with_progress(|progress| {
//!         println!("Stage: {:?}, Progress: {}/{}",
//!             progress.stage, progress.current, progress.total);
//!     })
//!     .load_all(&PlatformCatalog::default())?;
//! slot.publish(report.cache)?;
//!
//! let service = slot.service()?;
//! let bytes = service.file(PlatformId::Linux, "librs2client.so", 0);
//! println!("librs2client.so: {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod compression;
pub mod content;
pub mod error;
pub mod loader;
pub mod platform;
pub mod rpc;
pub mod service;
pub mod utils;


// Re-export main types
pub use cache::{AssetCache, AssetEntry, AssetSlot, CacheState, PlatformBundle};
pub use catalog::{PlatformCatalog, PlatformDescriptor, CONFIG_FILE_NAME};
pub use compression::{choose_transform, FileRole, Transform};
pub use content::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use error::{Error, Result};
pub use loader::{AssetLoader, LoadProgress, LoadReport, LoadStage, PlatformStats};
pub use platform::PlatformId;
pub use rpc::{ClientRequest, ClientResponse, ConfigRequest, ConfigResponse, RpcHandler};
pub use service::{AssetService, ChecksumPolicy};
